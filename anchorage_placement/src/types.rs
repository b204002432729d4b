// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for placement: contracts with the host engine, kinds, hits, and gesture phases.
//!
//! ## Overview
//!
//! The placement core never owns a scene or a tracking session. It talks to the host
//! through three contracts:
//!
//! - [`SceneGraph`]: parent links, kind tags, transforms, and prototype cloning.
//! - [`HitTester`]: surface and object hit tests through a screen point.
//! - [`AnchorStore`]: fire-and-forget anchor requests plus node-to-anchor lookup.
//!
//! Placeable kinds form a closed set described by [`Kind`].

use core::fmt::Debug;
use core::hash::Hash;

use glam::{Mat4, Vec3};
use kurbo::Point;

bitflags::bitflags! {
    /// Category mask used to filter object hit tests.
    ///
    /// Bit values match the scene categories of the host so adapters can convert with
    /// `from_bits_retain`.
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

/// A closed set of placeable kinds.
///
/// Implement this on an enum. The tag is what anchors and prototype roots carry.
///
/// ```
/// use anchorage_placement::Kind;
///
/// #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// enum Furniture {
///     Box,
///     Chair,
/// }
///
/// impl Kind for Furniture {
///     const ALL: &'static [Self] = &[Self::Box, Self::Chair];
///
///     fn tag(self) -> &'static str {
///         match self {
///             Self::Box => "box",
///             Self::Chair => "chair",
///         }
///     }
/// }
///
/// assert_eq!(Furniture::from_tag("chair"), Some(Furniture::Chair));
/// assert_eq!(Furniture::from_tag("lamp"), None);
/// ```
pub trait Kind: Copy + Eq + Hash + Debug + Send + 'static {
    /// Every kind, in a stable order.
    const ALL: &'static [Self];

    /// Tag carried by anchors and prototype roots of this kind.
    fn tag(self) -> &'static str;

    /// Kind for a tag, if any.
    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.tag() == tag)
    }
}

/// Scene graph operations the placement core needs.
pub trait SceneGraph {
    /// Node handle.
    type Node: Copy + Eq + Debug;
    /// Template handle that can be cloned into new nodes.
    type Prototype;

    /// Whether `node` is live.
    fn contains(&self, node: Self::Node) -> bool;

    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;

    /// Kind tag set on `node` when it was created.
    fn kind_tag(&self, node: Self::Node) -> Option<&str>;

    /// World transform of `node`.
    fn world_transform(&self, node: Self::Node) -> Option<Mat4>;

    /// World translation of `node`.
    fn world_position(&self, node: Self::Node) -> Option<Vec3> {
        self.world_transform(node).map(|m| m.w_axis.truncate())
    }

    /// Move `node` so that its world translation becomes `position`.
    fn set_world_position(&mut self, node: Self::Node, position: Vec3);

    /// Set the translation of `node` relative to its parent.
    fn set_local_position(&mut self, node: Self::Node, position: Vec3);

    /// Clone a prototype into a new detached subtree. Returns its root.
    fn clone_prototype(&mut self, prototype: &Self::Prototype) -> Self::Node;

    /// Attach `child` under `parent`. Returns false if the link was rejected.
    fn add_child(&mut self, parent: Self::Node, child: Self::Node) -> bool;

    /// Remove `node` and its subtree.
    fn remove_node(&mut self, node: Self::Node);

    /// Mark a prototype so its instances carry `tag` at the root and `category` on every node.
    fn tag_prototype(&self, prototype: &mut Self::Prototype, tag: &str, category: Category);
}

/// A node struck by an object hit test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObjectHit<N> {
    /// The struck node. It may be deep inside a placed object.
    pub node: N,
    /// World-space hit point.
    pub world_point: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Hit tests through a screen point.
pub trait HitTester: SceneGraph {
    /// Pose of the nearest detected surface under `point`.
    fn hit_surface(&self, point: Point) -> Option<Mat4>;

    /// Nodes under `point` whose category intersects `categories`, nearest first.
    fn hit_objects(&self, point: Point, categories: Category) -> Vec<ObjectHit<Self::Node>>;
}

/// An anchor bound to a node, as seen by [`AnchorStore::anchor_for`].
#[derive(Clone, Debug, PartialEq)]
pub struct BoundAnchor<A> {
    /// Anchor identity.
    pub id: A,
    /// Kind tag the anchor was created with. Surface anchors have none.
    pub tag: Option<String>,
    /// Anchor world transform.
    pub transform: Mat4,
}

/// Anchor requests and the node-to-anchor reverse lookup.
///
/// Requests are fire-and-forget. Confirmation arrives later through
/// [`Binder::anchor_added`](crate::Binder::anchor_added).
pub trait AnchorStore: SceneGraph {
    /// Anchor identity.
    type AnchorId: Copy + Eq + Debug;

    /// Request a new anchor.
    fn add_anchor(&mut self, tag: &str, pose: Mat4);

    /// Request removal of an anchor.
    fn remove_anchor(&mut self, id: Self::AnchorId);

    /// Anchor currently backing `node`.
    fn anchor_for(&self, node: Self::Node) -> Option<BoundAnchor<Self::AnchorId>>;
}

/// An anchor confirmed by the tracking session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfirmedAnchor<'a> {
    /// A detected surface. Never bound to a prototype.
    Surface,
    /// An application anchor with the tag it was created with.
    Placed {
        /// Kind tag, if the anchor carries one.
        tag: Option<&'a str>,
    },
}

/// Phases of a long-press gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LongPressPhase {
    /// The press was recognized. Ignored; dragging starts on the first `Changed`.
    Began,
    /// The finger moved.
    Changed,
    /// The finger lifted.
    Ended,
    /// The system cancelled the gesture.
    Cancelled,
    /// The gesture failed.
    Failed,
}

impl LongPressPhase {
    /// Whether this phase ends the gesture.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::Failed)
    }
}

/// What a long-press update did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragOutcome<N> {
    /// Nothing changed.
    Ignored,
    /// The owner moved to `position` (world space).
    Moved {
        /// Owning node.
        node: N,
        /// New world translation.
        position: Vec3,
    },
    /// The owner's anchor was replaced by one at `pose`.
    Committed {
        /// Owning node.
        node: N,
        /// Pose of the replacement anchor.
        pose: Mat4,
    },
}

/// Tracking health as seen by the placement core.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TrackingHealth {
    /// Poses are reliable.
    #[default]
    Normal,
    /// Poses are unreliable (limited, unavailable, or interrupted tracking).
    Degraded,
}
