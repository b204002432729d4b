// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=anchorage_placement --heading-base-level=0

//! Anchorage Placement: tap-to-place and drag-to-move for anchored AR objects.
//!
//! ## Overview
//!
//! This crate holds the anchor lifecycle of a placement app. It does not render, track, or
//! hit test by itself. Instead, the host implements three contracts:
//! [`SceneGraph`], [`HitTester`], and [`AnchorStore`].
//!
//! ## Components
//!
//! - [`PlacementController`]: a tap requests one anchor per configured kind at the hit
//!   surface pose. A long-press drags the struck object's owner in X and Z, and its end
//!   replaces the owner's anchor with a fresh one at the owner's final pose.
//! - [`find_owner`]: a bounded walk from a struck sub-node to the placed object that owns it.
//! - [`Catalog`]: prototypes keyed by [`Kind`], tagged on registration.
//! - [`Binder`] and [`SceneExecutor`]: confirmed anchors arrive on the session's context;
//!   the binder posts tasks that the executor runs on the scene owner's context.
//!
//! ## Anchors are replaced, never moved
//!
//! Dragging moves nodes only. The anchor store changes on taps and when a long-press ends.
//! Between the removal of the old anchor and the confirmation of its replacement the
//! object is backed by no anchor.
//!
//! ## Errors
//!
//! Every missing hit aborts the current gesture callback. The `try_` entry points report
//! why with a [`PlacementError`]; the plain entry points log it at `debug` and move on.
//!
//! ## Features
//!
//! - `scene_view_adapter`: implements the contracts for `anchorage_session::SceneView`
//!   and provides a view delegate that feeds the [`Binder`].
//! - `serde`: [`PlacementSettings`], a deserializable form of [`PlacementConfig`].
//!
//! ## Example
//!
//! ```
//! use anchorage_placement::{Kind, LongPressPhase, PlacementConfig, PlacementController};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
//! enum Furniture {
//!     Box,
//!     Chair,
//! }
//!
//! impl Kind for Furniture {
//!     const ALL: &'static [Self] = &[Self::Box, Self::Chair];
//!
//!     fn tag(self) -> &'static str {
//!         match self {
//!             Self::Box => "box",
//!             Self::Chair => "chair",
//!         }
//!     }
//! }
//!
//! let config = PlacementConfig::default().with_tap_kinds([Furniture::Box, Furniture::Chair]);
//! let controller = PlacementController::<Furniture, u32>::new(config);
//! assert_eq!(controller.config().tap_kinds.len(), 2);
//! assert!(LongPressPhase::Ended.is_terminal());
//! ```

pub mod adapters;
mod binder;
mod catalog;
mod config;
mod controller;
mod error;
mod ownership;
mod types;

#[cfg(test)]
mod fake;

pub use binder::{BindTask, Binder, SceneExecutor, scene_channel};
pub use catalog::Catalog;
#[cfg(feature = "serde")]
pub use config::PlacementSettings;
pub use config::{DEFAULT_MAX_OWNER_DEPTH, PlacementConfig};
pub use controller::PlacementController;
pub use error::PlacementError;
pub use ownership::find_owner;
pub use types::{
    AnchorStore, BoundAnchor, Category, ConfirmedAnchor, DragOutcome, HitTester, Kind,
    LongPressPhase, ObjectHit, SceneGraph, TrackingHealth,
};
