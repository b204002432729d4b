// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, transforms, instancing, queries.

use glam::{Mat4, Vec3};

use crate::geometry::{Geometry, Ray};
use crate::prototype::Prototype;
use crate::types::{Category, KindTag, LocalNode, NodeFlags, NodeId};

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level scene graph.
pub struct Scene {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

/// Result of a ray hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The struck node.
    pub node: NodeId,
    /// Distance from the ray origin, in world units.
    pub distance: f32,
    /// World-space point where the ray enters the node's bounds.
    pub world_point: Vec3,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
}

/// Filters applied during hit testing.
///
/// Used by [`Scene::hit_test_ray`] and [`Scene::hit_test_ray_all`].
#[derive(Clone, Copy, Debug)]
pub struct QueryFilter {
    /// If true, only consider nodes marked [`NodeFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only consider nodes marked [`NodeFlags::PICKABLE`].
    pub pickable_only: bool,
    /// Only consider nodes whose [`Category`] intersects this mask.
    pub categories: Category,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            visible_only: true,
            pickable_only: true,
            categories: Category::all(),
        }
    }
}

impl QueryFilter {
    /// Default filter restricted to `categories`.
    pub fn categories(categories: Category) -> Self {
        Self {
            categories,
            ..Default::default()
        }
    }

    fn accepts(&self, local: &LocalNode) -> bool {
        if self.visible_only && !local.flags.contains(NodeFlags::VISIBLE) {
            return false;
        }
        if self.pickable_only && !local.flags.contains(NodeFlags::PICKABLE) {
            return false;
        }
        local.category.intersects(self.categories)
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        }
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert a new node as a child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the node as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId slot indices are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId slot indices are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes[n.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(n.idx());
            }
        }
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// Returns false, leaving the scene unchanged, if either id is stale or if
    /// `parent` is `child` or one of its descendants. The scene stays a forest.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return false;
        }
        if self.is_ancestor_or_self(child, parent) {
            return false;
        }
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent);
        true
    }

    /// Detach `id` from its parent, making it a root.
    pub fn detach(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
    }

    /// Instantiate a prototype under `parent` (or as a root). Returns the instance root.
    ///
    /// Each instance node gets a copy of the template transform and shares its geometry.
    pub fn instantiate(&mut self, prototype: &Prototype, parent: Option<NodeId>) -> NodeId {
        let mut ids: Vec<NodeId> = Vec::with_capacity(prototype.nodes.len());
        for template in &prototype.nodes {
            let p = match template.parent {
                Some(i) => Some(ids[i]),
                None => parent,
            };
            ids.push(self.insert(p, template.local.clone()));
        }
        ids[0]
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True if the scene has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of a node in insertion order. Empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// All live root nodes in slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
            Some(n) if n.parent.is_none() =>
            {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId slot indices are 32-bit."
                )]
                Some(NodeId::new(i as u32, n.generation))
            }
            _ => None,
        })
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Kind tag of a live node.
    pub fn kind(&self, id: NodeId) -> Option<&KindTag> {
        self.node_opt(id)?.local.kind.as_ref()
    }

    /// Category of a live node.
    pub fn category(&self, id: NodeId) -> Option<Category> {
        self.node_opt(id).map(|n| n.local.category)
    }

    /// Geometry of a live node.
    pub fn geometry(&self, id: NodeId) -> Option<&Geometry> {
        self.node_opt(id)?.local.geometry.as_deref()
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Local transform of a live node.
    pub fn local_transform(&self, id: NodeId) -> Option<Mat4> {
        self.node_opt(id).map(|n| n.local.local_transform)
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Mat4) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Local translation of a live node.
    pub fn position(&self, id: NodeId) -> Option<Vec3> {
        self.node_opt(id)
            .map(|n| n.local.local_transform.w_axis.truncate())
    }

    /// Replace the local translation, keeping rotation and scale.
    pub fn set_position(&mut self, id: NodeId, position: Vec3) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform.w_axis = position.extend(1.0);
        }
    }

    /// World transform of a live node: the product of local transforms from the root down.
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node_opt(id)?;
        let mut world = node.local.local_transform;
        while let Some(p) = node.parent {
            node = self.node(p);
            world = node.local.local_transform * world;
        }
        Some(world)
    }

    /// World-space translation of a live node.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_transform(id).map(|m| m.w_axis.truncate())
    }

    /// Move a node so that its world translation becomes `position`.
    ///
    /// The new local translation is expressed through the inverse of the parent's world transform.
    pub fn set_world_position(&mut self, id: NodeId, position: Vec3) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        let local = match node.parent.and_then(|p| self.world_transform(p)) {
            Some(parent_world) => parent_world.inverse().transform_point3(position),
            None => position,
        };
        self.set_position(id, local);
    }

    /// Path from root to `id` (inclusive). Empty for stale ids.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut cur = id;
        loop {
            out.push(cur);
            match self.node(cur).parent {
                Some(p) => cur = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Hit test a world-space ray. Returns the nearest node whose geometry it strikes.
    ///
    /// If two nodes are struck at the same distance, the newer [`NodeId`] wins.
    pub fn hit_test_ray(&self, ray: &Ray, filter: QueryFilter) -> Option<Hit> {
        self.hit_test_ray_all(ray, filter).into_iter().next()
    }

    /// Hit test a world-space ray and return every struck node, nearest first.
    pub fn hit_test_ray_all(&self, ray: &Ray, filter: QueryFilter) -> Vec<Hit> {
        let mut hits: Vec<(NodeId, f32)> = Vec::new();
        // Depth-first walk carrying each parent's world transform.
        let mut stack: Vec<(NodeId, Mat4)> = self.roots().map(|r| (r, Mat4::IDENTITY)).collect();
        while let Some((id, parent_tf)) = stack.pop() {
            let node = self.node(id);
            let world = parent_tf * node.local.local_transform;
            for &c in &node.children {
                stack.push((c, world));
            }
            let Some(geometry) = node.local.geometry.as_deref() else {
                continue;
            };
            if !filter.accepts(&node.local) {
                continue;
            }
            let local_ray = ray.transformed(&world.inverse());
            if let Some(t) = geometry.local_bounds().intersect_ray(&local_ray) {
                hits.push((id, t));
            }
        }
        hits.sort_by(|(a_id, a), (b_id, b)| {
            a.partial_cmp(b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    if Self::id_is_newer(*a_id, *b_id) {
                        std::cmp::Ordering::Less
                    } else if Self::id_is_newer(*b_id, *a_id) {
                        std::cmp::Ordering::Greater
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
        });
        hits.into_iter()
            .map(|(node, distance)| Hit {
                node,
                distance,
                world_point: ray.at(distance),
                path: self.path_to_root(node),
            })
            .collect()
    }

    // --- internals ---

    #[inline]
    fn id_is_newer(a: NodeId, b: NodeId) -> bool {
        (a.1 > b.1) || (a.1 == b.1 && a.0 > b.0)
    }

    /// Access a live node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a live node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.node(id).parent {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
