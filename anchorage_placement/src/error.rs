// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement errors.

/// Why a gesture or binding did nothing.
///
/// Gesture entry points without the `try_` prefix absorb these and log them at `debug`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// No detected surface under the touch point.
    #[error("no surface under the touch point")]
    NoSurfaceHit,
    /// No placeable object under the touch point.
    #[error("no placed object under the touch point")]
    NoObjectHit,
    /// The struck node has no ancestor with a known kind tag.
    #[error("struck node has no recognized owner")]
    NoOwnerResolved,
    /// The owner is not backed by a tagged anchor.
    #[error("owner is not backed by an anchor")]
    NoBoundAnchor,
    /// A tag that names no known kind.
    #[error("unknown kind tag: {0}")]
    UnknownKindTag(String),
    /// Tracking is degraded and the gesture was paused.
    #[error("tracking is degraded")]
    TrackingDegraded,
}
