// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchorage Session: a simulated world-tracking session and the scene view built on it.
//!
//! - [`Session`] batches anchor requests and confirms them on [`Session::update`],
//!   alongside tracking, interruption, and failure notifications.
//! - [`Camera`] turns screen points into world rays.
//! - [`SceneView`] creates one top-level [`anchorage_scene`] node per confirmed anchor
//!   and forwards notifications to a [`ViewDelegate`].
//!
//! Detected planes are supplied by the host through [`Session::detect_plane`]; this
//! crate does not estimate geometry or camera poses.
//!
//! ## Example
//!
//! ```
//! use anchorage_scene::KindTag;
//! use anchorage_session::{Camera, PlaneAnchor, PlaneTest, SceneView, SessionConfig};
//! use glam::{Mat4, Vec3};
//! use kurbo::{Point, Size};
//!
//! let camera = Camera::orthographic_top_down(Vec3::ZERO, 10.0, 5.0, Size::new(100.0, 100.0));
//! let mut view = SceneView::new(camera);
//! view.session_mut().run(SessionConfig::default());
//! view.session_mut().detect_plane(Mat4::IDENTITY, PlaneAnchor::horizontal(4.0, 4.0));
//! view.frame(&mut ());
//!
//! // Tap in the middle of the screen and place an anchor on the floor.
//! let ray = view.ray_through(Point::new(50.0, 50.0)).unwrap();
//! let hit = view.session().hit_test_planes(&ray, PlaneTest::Infinite).unwrap();
//! let id = view.session_mut().add_anchor(KindTag::from("box"), hit.transform);
//! view.frame(&mut ());
//!
//! let node = view.node_for_anchor(id).unwrap();
//! assert_eq!(view.anchor_for_node(node).map(|a| a.id), Some(id));
//! ```

mod camera;
mod session;
mod types;
mod view;

pub use camera::Camera;
pub use session::Session;
pub use types::{
    Anchor, AnchorId, AnchorKind, LimitedReason, PlaneAlignment, PlaneAnchor, PlaneDetection,
    PlaneHit, PlaneTest, SessionConfig, SessionError, SessionEvent, TrackingState,
};
pub use view::{SceneView, ViewDelegate};
