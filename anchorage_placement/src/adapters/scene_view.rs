// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Anchorage Session's [`SceneView`].
//!
//! ## Feature
//!
//! Enable with `scene_view_adapter`.
//!
//! ## Notes
//!
//! [`SceneView`] implements all three placement contracts:
//!
//! - Surface hits intersect confirmed horizontal planes as infinite planes.
//! - Object hits cast the camera ray through the scene, nearest first.
//! - `anchor_for` walks up to the nearest node bound to an anchor, so clones attached
//!   under an anchor node are backed by that anchor.
//!
//! [`PlacementDelegate`] is the [`ViewDelegate`] that feeds confirmed anchors to a
//! [`Binder`] and records tracking health for the controller.

use anchorage_scene::{Category as SceneCategory, KindTag, NodeId, Prototype, QueryFilter};
use anchorage_session::{
    Anchor, AnchorId, AnchorKind, PlaneTest, SceneView, SessionError, TrackingState, ViewDelegate,
};
use glam::{Mat4, Vec3};
use kurbo::Point;

use crate::binder::Binder;
use crate::types::{
    AnchorStore, BoundAnchor, Category, ConfirmedAnchor, HitTester, Kind, ObjectHit, SceneGraph,
    TrackingHealth,
};

impl From<Category> for SceneCategory {
    fn from(category: Category) -> Self {
        Self::from_bits_retain(category.bits())
    }
}

impl From<TrackingState> for TrackingHealth {
    fn from(state: TrackingState) -> Self {
        if state.is_normal() {
            Self::Normal
        } else {
            Self::Degraded
        }
    }
}

impl<'a> From<&'a Anchor> for ConfirmedAnchor<'a> {
    fn from(anchor: &'a Anchor) -> Self {
        match &anchor.kind {
            AnchorKind::Plane(_) => Self::Surface,
            AnchorKind::Named(tag) => Self::Placed {
                tag: Some(tag.as_str()),
            },
        }
    }
}

impl SceneGraph for SceneView {
    type Node = NodeId;
    type Prototype = Prototype;

    fn contains(&self, node: NodeId) -> bool {
        self.scene().is_alive(node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.scene().parent(node)
    }

    fn kind_tag(&self, node: NodeId) -> Option<&str> {
        self.scene().kind(node).map(KindTag::as_str)
    }

    fn world_transform(&self, node: NodeId) -> Option<Mat4> {
        self.scene().world_transform(node)
    }

    fn set_world_position(&mut self, node: NodeId, position: Vec3) {
        self.scene_mut().set_world_position(node, position);
    }

    fn set_local_position(&mut self, node: NodeId, position: Vec3) {
        self.scene_mut().set_position(node, position);
    }

    fn clone_prototype(&mut self, prototype: &Prototype) -> NodeId {
        self.scene_mut().instantiate(prototype, None)
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.scene_mut().add_child(parent, child)
    }

    fn remove_node(&mut self, node: NodeId) {
        self.scene_mut().remove(node);
    }

    fn tag_prototype(&self, prototype: &mut Prototype, tag: &str, category: Category) {
        prototype.tag(KindTag::new(tag), category.into());
    }
}

impl HitTester for SceneView {
    fn hit_surface(&self, point: Point) -> Option<Mat4> {
        let ray = self.ray_through(point)?;
        self.session()
            .hit_test_planes(&ray, PlaneTest::Infinite)
            .map(|hit| hit.transform)
    }

    fn hit_objects(&self, point: Point, categories: Category) -> Vec<ObjectHit<NodeId>> {
        let Some(ray) = self.ray_through(point) else {
            return Vec::new();
        };
        self.scene()
            .hit_test_ray_all(&ray, QueryFilter::categories(categories.into()))
            .into_iter()
            .map(|hit| ObjectHit {
                node: hit.node,
                world_point: hit.world_point,
                distance: hit.distance,
            })
            .collect()
    }
}

impl AnchorStore for SceneView {
    type AnchorId = AnchorId;

    fn add_anchor(&mut self, tag: &str, pose: Mat4) {
        let _ = self.session_mut().add_anchor(KindTag::new(tag), pose);
    }

    fn remove_anchor(&mut self, id: AnchorId) {
        self.session_mut().remove_anchor(id);
    }

    fn anchor_for(&self, node: NodeId) -> Option<BoundAnchor<AnchorId>> {
        let anchor = self.anchor_for_node(node)?;
        Some(BoundAnchor {
            id: anchor.id,
            tag: anchor.tag().map(|t| t.as_str().to_owned()),
            transform: anchor.transform,
        })
    }
}

/// View delegate that forwards confirmed anchors to a [`Binder`].
///
/// Tracking changes, interruptions, and failures fold into a [`TrackingHealth`]
/// for [`PlacementController::set_tracking`](crate::PlacementController::set_tracking).
#[derive(Debug)]
pub struct PlacementDelegate<K> {
    binder: Binder<K, NodeId>,
    tracking: TrackingState,
    interrupted: bool,
    failed: bool,
}

impl<K: Kind> PlacementDelegate<K> {
    /// Create a delegate posting to `binder`.
    pub fn new(binder: Binder<K, NodeId>) -> Self {
        Self {
            binder,
            tracking: TrackingState::Normal,
            interrupted: false,
            failed: false,
        }
    }

    /// Health derived from the last notifications.
    pub fn tracking(&self) -> TrackingHealth {
        if self.interrupted || self.failed {
            TrackingHealth::Degraded
        } else {
            self.tracking.into()
        }
    }
}

impl<K: Kind> ViewDelegate for PlacementDelegate<K> {
    fn anchor_added(&mut self, anchor: &Anchor, node: NodeId) {
        let _ = self.binder.anchor_added(anchor.into(), node);
    }

    fn tracking_state_changed(&mut self, state: TrackingState) {
        self.tracking = state;
    }

    fn session_was_interrupted(&mut self) {
        self.interrupted = true;
    }

    fn session_interruption_ended(&mut self) {
        self.interrupted = false;
    }

    fn session_failed(&mut self, error: &SessionError) {
        tracing::warn!(%error, "placement paused after session failure");
        self.failed = true;
    }
}
