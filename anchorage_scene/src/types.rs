// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene graph: node identifiers, flags, categories, kind tags, and local data.

use std::sync::Arc;
use std::fmt;

use glam::Mat4;

use crate::geometry::Geometry;

/// Identifier for a node in the scene.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (participates in rendering and hit testing).
        const VISIBLE  = 0b0000_0001;
        /// Node is pickable (participates in hit testing).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

bitflags::bitflags! {
    /// Category marker used to filter ray hit tests.
    ///
    /// A node is eligible for a query when its category intersects the
    /// query's [`QueryFilter::categories`](crate::QueryFilter::categories).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Category: u32 {
        /// Default category of every node.
        const DEFAULT   = 1 << 0;
        /// Instances of placeable prototypes.
        const PLACEABLE = 1 << 1;
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Human-readable tag naming which prototype a node or anchor represents (e.g. `"box"`).
///
/// Tags are cheap to clone; the text is shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindTag(Arc<str>);

impl KindTag {
    /// Create a tag from a string.
    pub fn new(tag: &str) -> Self {
        Self(Arc::from(tag))
    }

    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for KindTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl PartialEq<str> for KindTag {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for KindTag {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Local data for a node.
///
/// The kind tag is fixed once the node is inserted; [`Scene`](crate::Scene) offers no setter for it.
#[derive(Clone, Debug)]
pub struct LocalNode {
    /// Local transform relative to parent space.
    pub local_transform: Mat4,
    /// Shared geometry. Nodes without geometry are never struck by a ray.
    pub geometry: Option<Arc<Geometry>>,
    /// Tag of the prototype this node is the root of, if any.
    pub kind: Option<KindTag>,
    /// Category marker used by hit-test filters.
    pub category: Category,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_transform: Mat4::IDENTITY,
            geometry: None,
            kind: None,
            category: Category::default(),
            flags: NodeFlags::default(),
        }
    }
}

impl LocalNode {
    /// A node carrying `geometry` at the identity transform.
    pub fn with_geometry(geometry: Geometry) -> Self {
        Self {
            geometry: Some(Arc::new(geometry)),
            ..Default::default()
        }
    }

    /// A bare node placed at `transform`.
    pub fn at(transform: Mat4) -> Self {
        Self {
            local_transform: transform,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_compares_with_str() {
        let tag = KindTag::from("box");
        assert_eq!(tag, "box");
        assert_eq!(tag.as_str(), "box");
        assert_ne!(tag, KindTag::new("chair"));
        assert_eq!(format!("{tag}"), "box");
    }

    #[test]
    fn defaults_are_visible_pickable_default_category() {
        let local = LocalNode::default();
        assert!(local.flags.contains(NodeFlags::VISIBLE | NodeFlags::PICKABLE));
        assert_eq!(local.category, Category::DEFAULT);
        assert!(local.kind.is_none());
        assert_eq!(local.local_transform, Mat4::IDENTITY);
    }
}
