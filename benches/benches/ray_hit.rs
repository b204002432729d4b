// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anchorage_scene::{Geometry, LocalNode, QueryFilter, Ray, Scene};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::{Mat4, Vec3};

/// An `n` by `n` grid of 0.2 m boxes on the floor, 0.5 m apart.
fn grid_scene(n: usize) -> Scene {
    let mut scene = Scene::new();
    for z in 0..n {
        for x in 0..n {
            let at = Vec3::new(x as f32 * 0.5, 0.1, z as f32 * 0.5);
            let _ = scene.insert(
                None,
                LocalNode {
                    local_transform: Mat4::from_translation(at),
                    ..LocalNode::with_geometry(Geometry::cuboid(0.2, 0.2, 0.2))
                },
            );
        }
    }
    scene
}

/// Nested chains: every grid box carries a stack of `depth` smaller boxes.
fn stacked_scene(n: usize, depth: usize) -> Scene {
    let mut scene = grid_scene(n);
    let roots: Vec<_> = scene.roots().collect();
    for root in roots {
        let mut parent = root;
        for _ in 0..depth {
            parent = scene.insert(
                Some(parent),
                LocalNode {
                    local_transform: Mat4::from_translation(Vec3::Y * 0.2),
                    ..LocalNode::with_geometry(Geometry::cuboid(0.1, 0.1, 0.1))
                },
            );
        }
    }
    scene
}

fn down_ray(x: f32, z: f32) -> Ray {
    Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_build");
    for &n in &[16_usize, 32, 64] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{n}"), |b| {
            b.iter(|| black_box(grid_scene(n).len()));
        });
    }
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test_ray");
    for &n in &[16_usize, 32, 64] {
        let scene = grid_scene(n);
        let center = (n / 2) as f32 * 0.5;
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("hit_grid_n{n}"), |b| {
            let ray = down_ray(center, center);
            b.iter(|| black_box(scene.hit_test_ray(&ray, QueryFilter::default())));
        });
        group.bench_function(format!("miss_grid_n{n}"), |b| {
            let ray = down_ray(center + 0.25, center + 0.25);
            b.iter(|| black_box(scene.hit_test_ray(&ray, QueryFilter::default())));
        });
    }
    group.finish();
}

fn bench_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test_ray_all");
    for &depth in &[1_usize, 8, 32] {
        let scene = stacked_scene(16, depth);
        group.throughput(Throughput::Elements(scene.len() as u64));
        group.bench_function(format!("stack_depth{depth}"), |b| {
            let ray = down_ray(4.0, 4.0);
            b.iter(|| black_box(scene.hit_test_ray_all(&ray, QueryFilter::default()).len()));
        });
    }
    group.finish();
}

fn bench_move_then_hit(c: &mut Criterion) {
    c.bench_function("move_then_hit_grid_n32", |b| {
        b.iter_batched(
            || grid_scene(32),
            |mut scene| {
                let roots: Vec<_> = scene.roots().collect();
                for (i, id) in roots.into_iter().enumerate() {
                    let dx = if i % 2 == 0 { 0.05 } else { -0.05 };
                    if let Some(p) = scene.world_position(id) {
                        scene.set_world_position(id, p + Vec3::new(dx, 0.0, 0.0));
                    }
                }
                black_box(scene.hit_test_ray(&down_ray(8.0, 8.0), QueryFilter::default()));
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_build, bench_nearest, bench_all, bench_move_then_hit);
criterion_main!(benches);
