// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anchorage_placement::{DEFAULT_MAX_OWNER_DEPTH, Kind, find_owner};
use anchorage_scene::{KindTag, LocalNode, NodeId};
use anchorage_session::{Camera, SceneView};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec3;
use kurbo::Size;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Furniture {
    Box,
}

impl Kind for Furniture {
    const ALL: &'static [Self] = &[Self::Box];

    fn tag(self) -> &'static str {
        "box"
    }
}

/// A tagged owner with an untagged chain of `depth` descendants. Returns the leaf.
fn chain(depth: usize) -> (SceneView, NodeId) {
    let camera = Camera::orthographic_top_down(Vec3::ZERO, 10.0, 5.0, Size::new(100.0, 100.0));
    let mut view = SceneView::new(camera);
    let scene = view.scene_mut();
    let mut leaf = scene.insert(
        None,
        LocalNode {
            kind: Some(KindTag::new("box")),
            ..Default::default()
        },
    );
    for _ in 0..depth {
        leaf = scene.insert(Some(leaf), LocalNode::default());
    }
    (view, leaf)
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_owner");
    for &depth in &[1_usize, 16, 256, 1000] {
        let (view, leaf) = chain(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("depth{depth}"), |b| {
            b.iter(|| {
                black_box(find_owner::<Furniture, _>(
                    &view,
                    black_box(leaf),
                    DEFAULT_MAX_OWNER_DEPTH,
                ))
            });
        });
    }
    group.finish();
}

fn bench_unowned(c: &mut Criterion) {
    // No tag within the bound: the walk visits the full bound and gives up.
    let (view, leaf) = chain(4 * DEFAULT_MAX_OWNER_DEPTH);
    c.bench_function("find_owner_bound_exhausted", |b| {
        b.iter(|| {
            black_box(find_owner::<Furniture, _>(
                &view,
                black_box(leaf),
                DEFAULT_MAX_OWNER_DEPTH,
            ))
        });
    });
}

criterion_group!(benches, bench_resolve, bench_unowned);
criterion_main!(benches);
