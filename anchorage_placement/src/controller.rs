// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement controller.
//!
//! ## Overview
//!
//! Interprets taps and long-presses against a world that implements [`HitTester`] and
//! [`AnchorStore`].
//!
//! - A tap hit-tests detected surfaces and requests one anchor per configured tap kind,
//!   all at the same pose. Nodes appear later, when the session confirms the anchors.
//! - A long-press drags the struck object's owner across the surface. Only X and Z
//!   follow the finger; the owner keeps its height.
//! - When the long-press ends (or is cancelled, or fails) the owner's anchor is replaced
//!   by a new one with the same tag at the owner's current world transform.
//!
//! Missing hits abort the current callback and leave the anchor store untouched.
//! The anchor store is only mutated by taps and terminal long-press phases.
//!
//! ## Drag stalls
//!
//! Every `Changed` update re-resolves the owner from a fresh object hit. If the finger
//! leaves all placed objects the drag stalls until it re-enters one; the gesture is
//! not cancelled and the object does not snap back.

use glam::{Mat4, Vec3};
use kurbo::Point;

use crate::config::{PlacementConfig, dedup};
use crate::error::PlacementError;
use crate::ownership::find_owner;
use crate::types::{
    AnchorStore, Category, DragOutcome, HitTester, Kind, LongPressPhase, TrackingHealth,
};

/// Turns gestures into anchor requests and node moves.
///
/// ## Usage
///
/// - Construct with [`PlacementController::new`], or [`PlacementController::default`]
///   to place the first kind on tap.
/// - Optionally adjust policies with the `set_*` methods.
/// - Feed tracking changes to [`PlacementController::set_tracking`].
/// - Call [`PlacementController::tap`] and [`PlacementController::long_press`] from the
///   scene owner's context, or their `try_` forms to see why nothing happened.
#[derive(Clone, Debug)]
pub struct PlacementController<K, N> {
    config: PlacementConfig<K>,
    tracking: TrackingHealth,
    dragging: Option<N>,
}

impl<K: Kind, N: Copy + Eq + core::fmt::Debug> Default for PlacementController<K, N> {
    fn default() -> Self {
        Self::new(PlacementConfig::default())
    }
}

impl<K: Kind, N: Copy + Eq + core::fmt::Debug> PlacementController<K, N> {
    /// Create a controller with `config`.
    pub fn new(config: PlacementConfig<K>) -> Self {
        Self {
            config,
            tracking: TrackingHealth::Normal,
            dragging: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PlacementConfig<K> {
        &self.config
    }

    /// Replace the kinds placed on tap. Repeats are dropped.
    pub fn set_tap_kinds(&mut self, kinds: impl IntoIterator<Item = K>) {
        self.config.tap_kinds = dedup(kinds);
    }

    /// Replace the categories eligible for object hit tests.
    pub fn set_object_category(&mut self, category: Category) {
        self.config.object_category = category;
    }

    /// Enable or disable the pause while tracking is degraded.
    pub fn set_pause_while_degraded(&mut self, pause: bool) {
        self.config.pause_while_degraded = pause;
    }

    /// Report tracking health.
    pub fn set_tracking(&mut self, health: TrackingHealth) {
        self.tracking = health;
    }

    /// Last reported tracking health.
    pub fn tracking(&self) -> TrackingHealth {
        self.tracking
    }

    /// Owner moved by the last `Changed` update of the active long-press, if any.
    pub fn dragging(&self) -> Option<N> {
        self.dragging
    }

    /// Handle a tap. Returns the number of anchors requested.
    ///
    /// Errors are logged at `debug` and reported as zero.
    pub fn tap<W>(&mut self, world: &mut W, point: Point) -> usize
    where
        W: HitTester<Node = N> + AnchorStore,
    {
        self.try_tap(world, point).unwrap_or_else(|error| {
            tracing::debug!(%error, x = point.x, y = point.y, "tap ignored");
            0
        })
    }

    /// Handle a tap, reporting why nothing was placed.
    ///
    /// With no tap kinds configured this does nothing and returns `Ok(0)`.
    pub fn try_tap<W>(&mut self, world: &mut W, point: Point) -> Result<usize, PlacementError>
    where
        W: HitTester<Node = N> + AnchorStore,
    {
        if self.config.tap_kinds.is_empty() {
            return Ok(0);
        }
        self.check_tracking()?;
        let pose = world.hit_surface(point).ok_or(PlacementError::NoSurfaceHit)?;
        for kind in &self.config.tap_kinds {
            world.add_anchor(kind.tag(), pose);
        }
        tracing::debug!(
            kinds = self.config.tap_kinds.len(),
            position = ?pose.w_axis.truncate(),
            "anchors requested"
        );
        Ok(self.config.tap_kinds.len())
    }

    /// Handle a long-press update.
    ///
    /// Errors are logged at `debug` and reported as [`DragOutcome::Ignored`].
    pub fn long_press<W>(
        &mut self,
        world: &mut W,
        point: Point,
        phase: LongPressPhase,
    ) -> DragOutcome<N>
    where
        W: HitTester<Node = N> + AnchorStore,
    {
        self.try_long_press(world, point, phase).unwrap_or_else(|error| {
            tracing::debug!(%error, ?phase, x = point.x, y = point.y, "long-press ignored");
            DragOutcome::Ignored
        })
    }

    /// Handle a long-press update, reporting why nothing happened.
    pub fn try_long_press<W>(
        &mut self,
        world: &mut W,
        point: Point,
        phase: LongPressPhase,
    ) -> Result<DragOutcome<N>, PlacementError>
    where
        W: HitTester<Node = N> + AnchorStore,
    {
        match phase {
            LongPressPhase::Began => Ok(DragOutcome::Ignored),
            LongPressPhase::Changed => self.drag(world, point),
            LongPressPhase::Ended | LongPressPhase::Cancelled | LongPressPhase::Failed => {
                self.dragging = None;
                self.commit(world, point)
            }
        }
    }

    fn drag<W>(&mut self, world: &mut W, point: Point) -> Result<DragOutcome<N>, PlacementError>
    where
        W: HitTester<Node = N> + AnchorStore,
    {
        self.check_tracking()?;
        let (owner, _) = self.resolve_owner(world, point)?;
        let surface = world.hit_surface(point).ok_or(PlacementError::NoSurfaceHit)?;
        let current = world
            .world_position(owner)
            .ok_or(PlacementError::NoOwnerResolved)?;
        let position = Vec3::new(surface.w_axis.x, current.y, surface.w_axis.z);
        world.set_world_position(owner, position);
        self.dragging = Some(owner);
        tracing::trace!(?owner, x = position.x, z = position.z, "drag");
        Ok(DragOutcome::Moved {
            node: owner,
            position,
        })
    }

    fn commit<W>(&mut self, world: &mut W, point: Point) -> Result<DragOutcome<N>, PlacementError>
    where
        W: HitTester<Node = N> + AnchorStore,
    {
        let (owner, kind) = self.resolve_owner(world, point)?;
        let old = world.anchor_for(owner).ok_or(PlacementError::NoBoundAnchor)?;
        let tag = old.tag.ok_or(PlacementError::NoBoundAnchor)?;
        let pose: Mat4 = world
            .world_transform(owner)
            .ok_or(PlacementError::NoOwnerResolved)?;
        world.remove_anchor(old.id);
        world.add_anchor(&tag, pose);
        tracing::info!(
            ?kind,
            tag = %tag,
            from = ?old.transform.w_axis.truncate(),
            to = ?pose.w_axis.truncate(),
            "anchor replaced"
        );
        Ok(DragOutcome::Committed { node: owner, pose })
    }

    fn resolve_owner<W>(&self, world: &W, point: Point) -> Result<(N, K), PlacementError>
    where
        W: HitTester<Node = N>,
    {
        let hit = world
            .hit_objects(point, self.config.object_category)
            .into_iter()
            .next()
            .ok_or(PlacementError::NoObjectHit)?;
        find_owner(world, hit.node, self.config.max_owner_depth)
            .ok_or(PlacementError::NoOwnerResolved)
    }

    fn check_tracking(&self) -> Result<(), PlacementError> {
        if self.config.pause_while_degraded && self.tracking == TrackingHealth::Degraded {
            return Err(PlacementError::TrackingDegraded);
        }
        Ok(())
    }
}
