// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene view: keeps one top-level scene node per confirmed anchor.

use anchorage_scene::{LocalNode, NodeId, Ray, Scene};
use hashbrown::HashMap;
use kurbo::Point;

use crate::camera::Camera;
use crate::session::Session;
use crate::types::{Anchor, AnchorId, SessionError, SessionEvent, TrackingState};

/// Receives session notifications from [`SceneView::frame`].
///
/// The delegate gets anchors and node ids but no scene access. Work that touches
/// the scene must be handed back to the scene owner.
///
/// All methods default to no-ops.
pub trait ViewDelegate {
    /// An anchor was confirmed and `node` was created for it.
    fn anchor_added(&mut self, anchor: &Anchor, node: NodeId) {
        let _ = (anchor, node);
    }

    /// A plane anchor was refined and `node` moved with it.
    fn anchor_updated(&mut self, anchor: &Anchor, node: NodeId) {
        let _ = (anchor, node);
    }

    /// An anchor was removed along with the subtree under `node`.
    fn anchor_removed(&mut self, anchor: &Anchor, node: NodeId) {
        let _ = (anchor, node);
    }

    /// Tracking quality changed.
    fn tracking_state_changed(&mut self, state: TrackingState) {
        let _ = state;
    }

    /// The session was interrupted.
    fn session_was_interrupted(&mut self) {}

    /// An interruption ended.
    fn session_interruption_ended(&mut self) {}

    /// The session failed.
    fn session_failed(&mut self, error: &SessionError) {
        let _ = error;
    }
}

impl ViewDelegate for () {}

/// Owns a [`Scene`], a [`Session`], and a [`Camera`], and binds anchors to nodes.
#[derive(Debug)]
pub struct SceneView {
    scene: Scene,
    session: Session,
    camera: Camera,
    node_for_anchor: HashMap<AnchorId, NodeId>,
    anchor_for_node: HashMap<NodeId, AnchorId>,
}

impl SceneView {
    /// Create a view with an empty scene and a stopped session.
    pub fn new(camera: Camera) -> Self {
        Self {
            scene: Scene::new(),
            session: Session::new(),
            camera,
            node_for_anchor: HashMap::new(),
            anchor_for_node: HashMap::new(),
        }
    }

    /// The scene graph.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene graph, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The tracking session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The tracking session, mutably.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// World ray through a screen point.
    pub fn ray_through(&self, point: Point) -> Option<Ray> {
        self.camera.ray_through(point)
    }

    /// Commit the session and synchronize anchor nodes, forwarding every event to `delegate`.
    ///
    /// - Added anchors get a new top-level node at the anchor's transform.
    /// - Updated anchors move their node.
    /// - Removed anchors take their node's subtree with them.
    pub fn frame(&mut self, delegate: &mut impl ViewDelegate) {
        for event in self.session.update() {
            match event {
                SessionEvent::AnchorAdded(anchor) => {
                    let node = self.scene.insert(None, LocalNode::at(anchor.transform));
                    self.node_for_anchor.insert(anchor.id, node);
                    self.anchor_for_node.insert(node, anchor.id);
                    delegate.anchor_added(&anchor, node);
                }
                SessionEvent::AnchorUpdated(anchor) => {
                    if let Some(&node) = self.node_for_anchor.get(&anchor.id) {
                        self.scene.set_local_transform(node, anchor.transform);
                        delegate.anchor_updated(&anchor, node);
                    }
                }
                SessionEvent::AnchorRemoved(anchor) => {
                    if let Some(node) = self.node_for_anchor.remove(&anchor.id) {
                        self.anchor_for_node.remove(&node);
                        self.scene.remove(node);
                        delegate.anchor_removed(&anchor, node);
                    }
                }
                SessionEvent::TrackingStateChanged(state) => {
                    tracing::debug!(?state, "tracking state changed");
                    delegate.tracking_state_changed(state);
                }
                SessionEvent::Interrupted => {
                    tracing::info!("session interrupted");
                    delegate.session_was_interrupted();
                }
                SessionEvent::InterruptionEnded => {
                    tracing::info!("session interruption ended");
                    delegate.session_interruption_ended();
                }
                SessionEvent::Failed(error) => {
                    tracing::warn!(%error, "session failed");
                    delegate.session_failed(&error);
                }
            }
        }
    }

    /// Node created for an anchor.
    pub fn node_for_anchor(&self, id: AnchorId) -> Option<NodeId> {
        self.node_for_anchor.get(&id).copied()
    }

    /// Anchor backing `node`: the anchor bound to the nearest ancestor (inclusive).
    ///
    /// Clones attached under an anchor node are backed by that anchor. An anchor already
    /// marked for removal backs nothing.
    pub fn anchor_for_node(&self, node: NodeId) -> Option<&Anchor> {
        let mut cur = Some(node).filter(|n| self.scene.is_alive(*n));
        while let Some(n) = cur {
            if let Some(&id) = self.anchor_for_node.get(&n) {
                if self.session.is_pending_removal(id) {
                    return None;
                }
                return self.session.anchor(id);
            }
            cur = self.scene.parent(n);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlaneAnchor, SessionConfig};
    use anchorage_scene::{Geometry, KindTag};
    use glam::{Mat4, Vec3};
    use kurbo::Size;

    #[derive(Default)]
    struct Recorder {
        added: Vec<(AnchorId, NodeId)>,
        removed: Vec<(AnchorId, NodeId)>,
        failures: usize,
        interruptions: usize,
    }

    impl ViewDelegate for Recorder {
        fn anchor_added(&mut self, anchor: &Anchor, node: NodeId) {
            self.added.push((anchor.id, node));
        }
        fn anchor_removed(&mut self, anchor: &Anchor, node: NodeId) {
            self.removed.push((anchor.id, node));
        }
        fn session_was_interrupted(&mut self) {
            self.interruptions += 1;
        }
        fn session_failed(&mut self, _error: &SessionError) {
            self.failures += 1;
        }
    }

    fn view() -> SceneView {
        let mut view = SceneView::new(Camera::orthographic_top_down(
            Vec3::ZERO,
            10.0,
            5.0,
            Size::new(100.0, 100.0),
        ));
        view.session_mut().run(SessionConfig::default());
        view
    }

    #[test]
    fn added_anchor_gets_a_top_level_node_at_its_pose() {
        let mut view = view();
        let pose = Mat4::from_translation(Vec3::new(1.0, 0.0, 2.0));
        let id = view.session_mut().add_anchor(KindTag::from("box"), pose);
        let mut rec = Recorder::default();
        view.frame(&mut rec);

        assert_eq!(rec.added.len(), 1);
        let (anchor, node) = rec.added[0];
        assert_eq!(anchor, id);
        assert_eq!(view.node_for_anchor(id), Some(node));
        assert_eq!(view.scene().parent(node), None);
        assert_eq!(view.scene().world_transform(node), Some(pose));
    }

    #[test]
    fn anchor_for_node_walks_up_to_the_anchor_node() {
        let mut view = view();
        let id = view.session_mut().add_anchor(KindTag::from("box"), Mat4::IDENTITY);
        view.frame(&mut ());
        let node = view.node_for_anchor(id).unwrap();
        let child = view
            .scene_mut()
            .insert(Some(node), LocalNode::with_geometry(Geometry::cuboid(0.2, 0.2, 0.2)));
        let grandchild = view.scene_mut().insert(Some(child), LocalNode::default());
        assert_eq!(view.anchor_for_node(grandchild).map(|a| a.id), Some(id));

        let loose = view.scene_mut().insert(None, LocalNode::default());
        assert!(view.anchor_for_node(loose).is_none());
    }

    #[test]
    fn removed_anchor_takes_its_subtree() {
        let mut view = view();
        let id = view.session_mut().add_anchor(KindTag::from("box"), Mat4::IDENTITY);
        view.frame(&mut ());
        let node = view.node_for_anchor(id).unwrap();
        let child = view.scene_mut().insert(Some(node), LocalNode::default());

        view.session_mut().remove_anchor(id);
        assert!(view.session().is_pending_removal(id));
        assert!(view.anchor_for_node(child).is_none(), "a removed anchor backs nothing");
        let mut rec = Recorder::default();
        view.frame(&mut rec);
        assert_eq!(rec.removed, vec![(id, node)]);
        assert!(!view.scene().is_alive(node));
        assert!(!view.scene().is_alive(child));
        assert!(view.node_for_anchor(id).is_none());
    }

    #[test]
    fn plane_updates_move_the_node() {
        let mut view = view();
        let id = view
            .session_mut()
            .detect_plane(Mat4::IDENTITY, PlaneAnchor::horizontal(1.0, 1.0))
            .unwrap();
        view.frame(&mut ());
        let moved = Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0));
        view.session_mut()
            .update_plane(id, moved, PlaneAnchor::horizontal(2.0, 2.0));
        view.frame(&mut ());
        let node = view.node_for_anchor(id).unwrap();
        assert_eq!(view.scene().local_transform(node), Some(moved));
    }

    #[test]
    fn session_notifications_reach_the_delegate() {
        let mut view = view();
        view.session_mut().interrupt();
        view.session_mut().fail(SessionError::CameraUnavailable);
        let mut rec = Recorder::default();
        view.frame(&mut rec);
        assert_eq!(rec.interruptions, 1);
        assert_eq!(rec.failures, 1);
        assert!(!view.session().is_running());
    }
}
