// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory world implementing every placement contract, for tests.
//!
//! Nodes only carry translations. Hit tests ignore the screen point and return
//! whatever the test staged with [`FakeWorld::stage_surface`] and [`FakeWorld::stage_objects`].

use std::cell::Cell;

use glam::{Mat4, Vec3};
use hashbrown::HashMap;
use kurbo::Point;

use crate::types::{
    AnchorStore, BoundAnchor, Category, HitTester, Kind, ObjectHit, SceneGraph,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Toy {
    Box,
    Chair,
}

impl Kind for Toy {
    const ALL: &'static [Self] = &[Self::Box, Self::Chair];

    fn tag(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Chair => "chair",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FakePrototype {
    pub(crate) kind: Option<String>,
    pub(crate) category: Category,
    pub(crate) offset: Vec3,
}

#[derive(Clone, Debug)]
struct FakeNode {
    parent: Option<usize>,
    kind: Option<String>,
    category: Category,
    position: Vec3,
    alive: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AnchorOp {
    Added { id: u32, tag: String, pose: Mat4 },
    Removed(u32),
}

#[derive(Debug, Default)]
pub(crate) struct FakeWorld {
    nodes: Vec<FakeNode>,
    anchors: HashMap<u32, (String, Mat4)>,
    bindings: HashMap<usize, u32>,
    next_anchor: u32,
    surface: Option<Mat4>,
    objects: Vec<ObjectHit<usize>>,
    pub(crate) ops: Vec<AnchorOp>,
    pub(crate) parent_lookups: Cell<usize>,
    /// Make `add_child` refuse every link.
    pub(crate) reject_links: bool,
}

impl FakeWorld {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn node(&mut self, parent: Option<usize>, kind: Option<&str>) -> usize {
        self.nodes.push(FakeNode {
            parent,
            kind: kind.map(str::to_owned),
            category: Category::DEFAULT,
            position: Vec3::ZERO,
            alive: true,
        });
        self.nodes.len() - 1
    }

    /// Set a parent link without any cycle check.
    pub(crate) fn force_parent(&mut self, node: usize, parent: Option<usize>) {
        self.nodes[node].parent = parent;
    }

    pub(crate) fn kill(&mut self, node: usize) {
        self.nodes[node].alive = false;
    }

    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| n.alive).count()
    }

    pub(crate) fn category(&self, node: usize) -> Category {
        self.nodes[node].category
    }

    pub(crate) fn set_category(&mut self, node: usize, category: Category) {
        self.nodes[node].category = category;
    }

    pub(crate) fn local_position(&self, node: usize) -> Vec3 {
        self.nodes[node].position
    }

    pub(crate) fn children(&self, node: usize) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].alive && self.nodes[i].parent == Some(node))
            .collect()
    }

    pub(crate) fn stage_surface(&mut self, pose: Option<Mat4>) {
        self.surface = pose;
    }

    pub(crate) fn stage_surface_at(&mut self, x: f32, y: f32, z: f32) {
        self.surface = Some(Mat4::from_translation(Vec3::new(x, y, z)));
    }

    pub(crate) fn stage_objects(&mut self, nodes: &[usize]) {
        self.objects = nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| ObjectHit {
                node,
                world_point: Vec3::ZERO,
                distance: i as f32,
            })
            .collect();
    }

    /// Confirm an anchor by binding it to `node`, as the engine would.
    pub(crate) fn bind(&mut self, node: usize, anchor: u32) {
        self.bindings.insert(node, anchor);
    }

    /// Confirm an anchor on a fresh top-level node placed at its pose.
    pub(crate) fn confirm(&mut self, anchor: u32) -> usize {
        let pose = self.anchors[&anchor].1;
        let node = self.node(None, None);
        self.nodes[node].position = pose.w_axis.truncate();
        self.bind(node, anchor);
        node
    }

    pub(crate) fn anchors(&self) -> Vec<(u32, String, Mat4)> {
        let mut out: Vec<_> = self
            .anchors
            .iter()
            .map(|(id, (tag, pose))| (*id, tag.clone(), *pose))
            .collect();
        out.sort_by_key(|(id, ..)| *id);
        out
    }

    pub(crate) fn add_untagged_anchor(&mut self, pose: Mat4) -> u32 {
        let id = self.next_anchor;
        self.next_anchor += 1;
        self.anchors.insert(id, (String::new(), pose));
        id
    }
}

impl SceneGraph for FakeWorld {
    type Node = usize;
    type Prototype = FakePrototype;

    fn contains(&self, node: usize) -> bool {
        self.nodes.get(node).is_some_and(|n| n.alive)
    }

    fn parent_of(&self, node: usize) -> Option<usize> {
        self.parent_lookups.set(self.parent_lookups.get() + 1);
        self.nodes.get(node)?.parent
    }

    fn kind_tag(&self, node: usize) -> Option<&str> {
        self.nodes.get(node)?.kind.as_deref()
    }

    fn world_transform(&self, node: usize) -> Option<Mat4> {
        let mut n = self.nodes.get(node)?;
        let mut p = n.position;
        // Bounded so that `force_parent` cycles cannot hang a test.
        for _ in 0..self.nodes.len() {
            let Some(parent) = n.parent else {
                return Some(Mat4::from_translation(p));
            };
            n = &self.nodes[parent];
            p += n.position;
        }
        None
    }

    fn set_world_position(&mut self, node: usize, position: Vec3) {
        let parent_world = self.nodes[node]
            .parent
            .and_then(|p| self.world_position(p))
            .unwrap_or(Vec3::ZERO);
        self.nodes[node].position = position - parent_world;
    }

    fn set_local_position(&mut self, node: usize, position: Vec3) {
        self.nodes[node].position = position;
    }

    fn clone_prototype(&mut self, prototype: &FakePrototype) -> usize {
        let node = self.node(None, prototype.kind.as_deref());
        self.nodes[node].category = prototype.category;
        self.nodes[node].position = prototype.offset;
        node
    }

    fn add_child(&mut self, parent: usize, child: usize) -> bool {
        if self.reject_links || parent == child {
            return false;
        }
        self.nodes[child].parent = Some(parent);
        true
    }

    fn remove_node(&mut self, node: usize) {
        let doomed: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| {
                let mut cur = Some(i);
                for _ in 0..=self.nodes.len() {
                    match cur {
                        Some(n) if n == node => return true,
                        Some(n) => cur = self.nodes[n].parent,
                        None => return false,
                    }
                }
                false
            })
            .collect();
        for i in doomed {
            self.nodes[i].alive = false;
        }
    }

    fn tag_prototype(&self, prototype: &mut FakePrototype, tag: &str, category: Category) {
        prototype.kind = Some(tag.to_owned());
        prototype.category |= category;
    }
}

impl HitTester for FakeWorld {
    fn hit_surface(&self, _point: Point) -> Option<Mat4> {
        self.surface
    }

    fn hit_objects(&self, _point: Point, categories: Category) -> Vec<ObjectHit<usize>> {
        self.objects
            .iter()
            .filter(|h| self.contains(h.node) && self.nodes[h.node].category.intersects(categories))
            .copied()
            .collect()
    }
}

impl AnchorStore for FakeWorld {
    type AnchorId = u32;

    fn add_anchor(&mut self, tag: &str, pose: Mat4) {
        let id = self.next_anchor;
        self.next_anchor += 1;
        self.anchors.insert(id, (tag.to_owned(), pose));
        self.ops.push(AnchorOp::Added {
            id,
            tag: tag.to_owned(),
            pose,
        });
    }

    fn remove_anchor(&mut self, id: u32) {
        self.anchors.remove(&id);
        self.bindings.retain(|_, a| *a != id);
        self.ops.push(AnchorOp::Removed(id));
    }

    fn anchor_for(&self, node: usize) -> Option<BoundAnchor<u32>> {
        let mut cur = Some(node);
        for _ in 0..=self.nodes.len() {
            let n = cur?;
            if let Some(id) = self.bindings.get(&n) {
                let (tag, pose) = self.anchors.get(id)?;
                return Some(BoundAnchor {
                    id: *id,
                    tag: (!tag.is_empty()).then(|| tag.clone()),
                    transform: *pose,
                });
            }
            cur = self.nodes.get(n)?.parent;
        }
        None
    }
}
