// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene basics.
//!
//! Instantiate a prototype twice, move one copy, and cast rays.
//!
//! Run:
//! - `cargo run -p anchorage_demos --example scene_basics`

use anchorage_scene::{Category, Geometry, KindTag, LocalNode, Prototype, QueryFilter, Ray, Scene};
use glam::{Mat4, Vec3};

fn main() {
    // A table: an untagged root with a top and a leg.
    let mut table = Prototype::new(LocalNode::default());
    let _ = table.push_child(
        0,
        LocalNode {
            local_transform: Mat4::from_translation(Vec3::Y * 0.7),
            ..LocalNode::with_geometry(Geometry::cuboid(1.0, 0.05, 0.6))
        },
    );
    let _ = table.push_child(
        0,
        LocalNode {
            local_transform: Mat4::from_translation(Vec3::Y * 0.35),
            ..LocalNode::with_geometry(Geometry::cuboid(0.08, 0.7, 0.08))
        },
    );
    table.tag(KindTag::new("table"), Category::PLACEABLE);
    println!("prototype `table` has {} nodes", table.len());

    let mut scene = Scene::new();
    let a = scene.instantiate(&table, None);
    let b = scene.instantiate(&table, None);
    scene.set_world_position(b, Vec3::new(2.0, 0.0, 0.0));
    println!("scene has {} nodes", scene.len());

    let down = |x: f32| Ray::new(Vec3::new(x, 5.0, 0.0), Vec3::NEG_Y);
    for x in [0.0, 0.45, 2.0, 3.0] {
        match scene.hit_test_ray(&down(x), QueryFilter::default()) {
            Some(hit) => {
                let owner = hit.path.first().copied();
                let which = if owner == Some(a) { "a" } else { "b" };
                println!(
                    "ray at x={x:.2}: hit {:?} of table {which} at y={:.2} (distance {:.2})",
                    hit.node, hit.world_point.y, hit.distance
                );
            }
            None => println!("ray at x={x:.2}: miss"),
        }
    }

    // Tagging put every part of the table in PLACEABLE, so a filtered ray still strikes it.
    let placeable = QueryFilter::categories(Category::PLACEABLE);
    println!(
        "placeable-only hit at x=0: {:?}",
        scene.hit_test_ray(&down(0.0), placeable).map(|h| h.node)
    );
    let loose = scene.insert(None, LocalNode::with_geometry(Geometry::cuboid(0.3, 0.3, 0.3)));
    scene.set_world_position(loose, Vec3::new(-2.0, 0.15, 0.0));
    println!(
        "untagged crate at x=-2: any {:?}, placeable-only {:?}",
        scene.hit_test_ray(&down(-2.0), QueryFilter::default()).map(|h| h.node),
        scene.hit_test_ray(&down(-2.0), placeable).map(|h| h.node)
    );
    for root in [a, b] {
        println!(
            "root {:?}: kind {:?}, world position {:?}",
            root,
            scene.kind(root).map(KindTag::as_str),
            scene.world_position(root)
        );
    }
}
