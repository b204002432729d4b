// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchors, session events, tracking state, and session configuration.

use anchorage_scene::KindTag;
use glam::{Mat4, Vec2, Vec3};

/// Generational handle of an anchor, assigned when the add is requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnchorId(u32, u32);

impl AnchorId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "AnchorId slot indices are 32-bit."
    )]
    pub(crate) const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Orientation of a detected plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlaneAlignment {
    /// Floors, tables, and other surfaces facing up.
    Horizontal,
    /// Walls.
    Vertical,
}

/// Surface estimate carried by a plane anchor.
///
/// The plane lies in the anchor's local XZ plane; its normal is the anchor's local +Y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneAnchor {
    /// Orientation class.
    pub alignment: PlaneAlignment,
    /// Center of the estimated extent, in anchor space.
    pub center: Vec3,
    /// Width (X) and length (Z) of the estimated extent.
    pub extent: Vec2,
}

impl PlaneAnchor {
    /// Horizontal plane centered on its anchor.
    pub fn horizontal(width: f32, length: f32) -> Self {
        Self {
            alignment: PlaneAlignment::Horizontal,
            center: Vec3::ZERO,
            extent: Vec2::new(width, length),
        }
    }

    /// Vertical plane centered on its anchor.
    pub fn vertical(width: f32, length: f32) -> Self {
        Self {
            alignment: PlaneAlignment::Vertical,
            ..Self::horizontal(width, length)
        }
    }

    /// Whether an anchor-space point lies within the extent (inclusive, ignoring height).
    pub fn contains_local(&self, p: Vec3) -> bool {
        let half = self.extent * 0.5;
        (p.x - self.center.x).abs() <= half.x && (p.z - self.center.z).abs() <= half.y
    }
}

/// What an anchor represents.
#[derive(Clone, Debug, PartialEq)]
pub enum AnchorKind {
    /// A surface found by the tracking subsystem. Carries no application tag.
    Plane(PlaneAnchor),
    /// An application anchor carrying the tag it was created with.
    Named(KindTag),
}

/// A tracked pose.
///
/// Application anchors are immutable once added; moving one means removing it
/// and adding a replacement. Plane anchors are refined by the tracking subsystem.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    /// Identity.
    pub id: AnchorId,
    /// World transform.
    pub transform: Mat4,
    /// Surface or application anchor.
    pub kind: AnchorKind,
}

impl Anchor {
    /// Application tag, or `None` for plane anchors.
    pub fn tag(&self) -> Option<&KindTag> {
        match &self.kind {
            AnchorKind::Named(tag) => Some(tag),
            AnchorKind::Plane(_) => None,
        }
    }

    /// Plane estimate, or `None` for application anchors.
    pub fn plane(&self) -> Option<&PlaneAnchor> {
        match &self.kind {
            AnchorKind::Plane(plane) => Some(plane),
            AnchorKind::Named(_) => None,
        }
    }
}

/// Why tracking is limited.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LimitedReason {
    /// The session has just started.
    Initializing,
    /// The device is moving too fast.
    ExcessiveMotion,
    /// The scene lacks visible features.
    InsufficientFeatures,
    /// The session is recovering from an interruption.
    Relocalizing,
}

/// Quality of world tracking.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TrackingState {
    /// No tracking data.
    #[default]
    NotAvailable,
    /// Poses are available but unreliable.
    Limited(LimitedReason),
    /// Tracking is healthy.
    Normal,
}

impl TrackingState {
    /// True only for [`TrackingState::Normal`].
    pub fn is_normal(self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Failures reported by the tracking session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The camera could not be opened.
    #[error("camera unavailable")]
    CameraUnavailable,
    /// World tracking stopped and cannot recover.
    #[error("world tracking failed")]
    WorldTrackingFailed,
    /// A motion sensor reported an error.
    #[error("sensor failed: {0}")]
    SensorFailed(String),
}

/// Notification produced by [`Session::update`](crate::Session::update).
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// An anchor was confirmed.
    AnchorAdded(Anchor),
    /// A plane anchor was refined.
    AnchorUpdated(Anchor),
    /// A confirmed anchor was removed. Carries its last state.
    AnchorRemoved(Anchor),
    /// Tracking quality changed.
    TrackingStateChanged(TrackingState),
    /// The session was interrupted (for example the app lost the camera).
    Interrupted,
    /// An interruption ended.
    InterruptionEnded,
    /// The session failed and stopped.
    Failed(SessionError),
}

bitflags::bitflags! {
    /// Plane alignments the session looks for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PlaneDetection: u8 {
        /// Detect horizontal planes.
        const HORIZONTAL = 0b01;
        /// Detect vertical planes.
        const VERTICAL   = 0b10;
    }
}

impl PlaneDetection {
    /// Whether planes of `alignment` are enabled.
    pub fn accepts(self, alignment: PlaneAlignment) -> bool {
        match alignment {
            PlaneAlignment::Horizontal => self.contains(Self::HORIZONTAL),
            PlaneAlignment::Vertical => self.contains(Self::VERTICAL),
        }
    }
}

/// Configuration passed to [`Session::run`](crate::Session::run).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Plane alignments to detect.
    pub plane_detection: PlaneDetection,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            plane_detection: PlaneDetection::HORIZONTAL,
        }
    }
}

/// How [`Session::hit_test_planes`](crate::Session::hit_test_planes) treats plane bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaneTest {
    /// Treat every detected plane as infinite.
    #[default]
    Infinite,
    /// Only accept hits within the plane's estimated extent.
    WithinExtent,
}

/// Result of a plane hit test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneHit {
    /// Plane anchor that was struck.
    pub anchor: AnchorId,
    /// Distance along the ray.
    pub distance: f32,
    /// Pose at the hit: the plane's rotation with the hit point as translation.
    pub transform: Mat4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_detects_horizontal_only() {
        let config = SessionConfig::default();
        assert!(config.plane_detection.accepts(PlaneAlignment::Horizontal));
        assert!(!config.plane_detection.accepts(PlaneAlignment::Vertical));
    }

    #[test]
    fn plane_extent_is_centered() {
        let plane = PlaneAnchor::horizontal(2.0, 4.0);
        assert!(plane.contains_local(Vec3::new(1.0, 0.3, -2.0)));
        assert!(!plane.contains_local(Vec3::new(1.1, 0.0, 0.0)));
        assert!(!plane.contains_local(Vec3::new(0.0, 0.0, 2.1)));
    }

    #[test]
    fn only_named_anchors_have_tags() {
        let named = Anchor {
            id: AnchorId::new(0, 1),
            transform: Mat4::IDENTITY,
            kind: AnchorKind::Named(KindTag::from("box")),
        };
        let plane = Anchor {
            kind: AnchorKind::Plane(PlaneAnchor::horizontal(1.0, 1.0)),
            ..named.clone()
        };
        assert_eq!(named.tag().map(KindTag::as_str), Some("box"));
        assert!(plane.tag().is_none());
        assert!(plane.plane().is_some());
        assert_eq!(
            SessionError::SensorFailed("gyro".into()).to_string(),
            "sensor failed: gyro"
        );
    }
}
