// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated world-tracking session with batched anchor requests.

use anchorage_scene::{KindTag, Ray};
use glam::{Mat4, Vec3};

use crate::types::{
    Anchor, AnchorId, AnchorKind, PlaneAlignment, PlaneAnchor, PlaneHit, PlaneTest,
    SessionConfig, SessionError, SessionEvent, TrackingState,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mark {
    Added,
    Updated,
    Removed,
}

#[derive(Clone, Debug)]
struct Entry {
    anchor: Anchor,
    mark: Option<Mark>,
}

/// A world-tracking session.
///
/// Anchor requests are fire-and-forget: [`Session::add_anchor`] and
/// [`Session::remove_anchor`] only mark entries. [`Session::update`] commits them
/// and reports what changed, the way a host tracker confirms anchors on its next frame.
///
/// - Adding and then removing an anchor before the next update cancels both silently.
/// - While the session is paused, requests stay pending. Notifications are still delivered.
#[derive(Debug, Default)]
pub struct Session {
    entries: Vec<Option<Entry>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    notes: Vec<SessionEvent>,
    config: SessionConfig,
    tracking: TrackingState,
    running: bool,
}

impl Session {
    /// Create a stopped session with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the session with `config`.
    pub fn run(&mut self, config: SessionConfig) {
        self.config = config;
        self.running = true;
    }

    /// Pause the session. Pending requests are kept.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Whether the session is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current tracking quality.
    pub fn tracking_state(&self) -> TrackingState {
        self.tracking
    }

    /// Request an application anchor. It is confirmed on a later [`Session::update`].
    pub fn add_anchor(&mut self, tag: KindTag, transform: Mat4) -> AnchorId {
        self.insert(transform, AnchorKind::Named(tag))
    }

    /// Request removal of an anchor. Stale ids are ignored.
    pub fn remove_anchor(&mut self, id: AnchorId) {
        let Some(e) = self.entry_mut(id) else {
            return;
        };
        if matches!(e.mark, Some(Mark::Added)) {
            self.entries[id.idx()] = None;
            self.free_list.push(id.idx());
        } else {
            e.mark = Some(Mark::Removed);
        }
    }

    /// Report a newly detected plane. Returns `None` if its alignment is not enabled.
    pub fn detect_plane(&mut self, transform: Mat4, plane: PlaneAnchor) -> Option<AnchorId> {
        if !self.config.plane_detection.accepts(plane.alignment) {
            return None;
        }
        Some(self.insert(transform, AnchorKind::Plane(plane)))
    }

    /// Refine a plane anchor. Returns false if `id` is stale or not a plane.
    pub fn update_plane(&mut self, id: AnchorId, transform: Mat4, plane: PlaneAnchor) -> bool {
        let Some(e) = self.entry_mut(id) else {
            return false;
        };
        if !matches!(e.anchor.kind, AnchorKind::Plane(_)) || e.mark == Some(Mark::Removed) {
            return false;
        }
        e.anchor.transform = transform;
        e.anchor.kind = AnchorKind::Plane(plane);
        e.mark = Some(match e.mark {
            Some(Mark::Added) => Mark::Added,
            _ => Mark::Updated,
        });
        true
    }

    /// Change tracking quality. Reported on the next update if it differs.
    pub fn set_tracking_state(&mut self, state: TrackingState) {
        if self.tracking != state {
            self.tracking = state;
            self.notes.push(SessionEvent::TrackingStateChanged(state));
        }
    }

    /// Report an interruption.
    pub fn interrupt(&mut self) {
        self.notes.push(SessionEvent::Interrupted);
    }

    /// Report the end of an interruption.
    pub fn end_interruption(&mut self) {
        self.notes.push(SessionEvent::InterruptionEnded);
    }

    /// Report a failure. The session stops.
    pub fn fail(&mut self, error: SessionError) {
        self.running = false;
        self.notes.push(SessionEvent::Failed(error));
    }

    /// A confirmed anchor.
    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.entry(id)
            .filter(|e| e.mark != Some(Mark::Added))
            .map(|e| &e.anchor)
    }

    /// Whether `id` is confirmed but marked for removal on the next [`Session::update`].
    pub fn is_pending_removal(&self, id: AnchorId) -> bool {
        self.entry(id).is_some_and(|e| e.mark == Some(Mark::Removed))
    }

    /// All confirmed anchors in slot order.
    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> + '_ {
        self.entries
            .iter()
            .flatten()
            .filter(|e| e.mark != Some(Mark::Added))
            .map(|e| &e.anchor)
    }

    /// Number of requests waiting for the next update.
    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .flatten()
            .filter(|e| e.mark.is_some())
            .count()
    }

    /// Deliver queued notifications and, if running, commit pending anchor requests.
    ///
    /// Notifications come first, then anchor changes in slot order.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let mut events = std::mem::take(&mut self.notes);
        if !self.running {
            return events;
        }
        for i in 0..self.entries.len() {
            let Some(entry) = self.entries[i].as_mut() else {
                continue;
            };
            match entry.mark.take() {
                Some(Mark::Added) => events.push(SessionEvent::AnchorAdded(entry.anchor.clone())),
                Some(Mark::Updated) => {
                    events.push(SessionEvent::AnchorUpdated(entry.anchor.clone()));
                }
                Some(Mark::Removed) => {
                    if let Some(e) = self.entries[i].take() {
                        events.push(SessionEvent::AnchorRemoved(e.anchor));
                    }
                    self.free_list.push(i);
                }
                None => {}
            }
        }
        tracing::trace!(events = events.len(), "session update");
        events
    }

    /// Cast `ray` against confirmed horizontal planes. Returns the nearest hit.
    pub fn hit_test_planes(&self, ray: &Ray, test: PlaneTest) -> Option<PlaneHit> {
        let mut best: Option<PlaneHit> = None;
        for anchor in self.anchors() {
            let Some(plane) = anchor.plane() else {
                continue;
            };
            if plane.alignment != PlaneAlignment::Horizontal {
                continue;
            }
            let Some((distance, point)) = intersect_plane(ray, &anchor.transform) else {
                continue;
            };
            if test == PlaneTest::WithinExtent {
                let local = anchor.transform.inverse().transform_point3(point);
                if !plane.contains_local(local) {
                    continue;
                }
            }
            if best.is_some_and(|b| b.distance <= distance) {
                continue;
            }
            let mut transform = anchor.transform;
            transform.w_axis = point.extend(1.0);
            best = Some(PlaneHit {
                anchor: anchor.id,
                distance,
                transform,
            });
        }
        best
    }

    // --- internals ---

    fn insert(&mut self, transform: Mat4, kind: AnchorKind) -> AnchorId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].saturating_add(1);
            idx
        } else {
            self.entries.push(None);
            self.generations.push(1);
            self.entries.len() - 1
        };
        let id = AnchorId::new(idx, self.generations[idx]);
        self.entries[idx] = Some(Entry {
            anchor: Anchor {
                id,
                transform,
                kind,
            },
            mark: Some(Mark::Added),
        });
        id
    }

    fn entry(&self, id: AnchorId) -> Option<&Entry> {
        let e = self.entries.get(id.idx())?.as_ref()?;
        (e.anchor.id.generation() == id.generation()).then_some(e)
    }

    fn entry_mut(&mut self, id: AnchorId) -> Option<&mut Entry> {
        let e = self.entries.get_mut(id.idx())?.as_mut()?;
        (e.anchor.id.generation() == id.generation()).then_some(e)
    }
}

/// Intersect `ray` with the plane through `transform`'s origin, normal along its local +Y.
fn intersect_plane(ray: &Ray, transform: &Mat4) -> Option<(f32, Vec3)> {
    let normal = transform.transform_vector3(Vec3::Y).normalize_or_zero();
    let origin = transform.w_axis.truncate();
    let denom = ray.direction.dot(normal);
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let t = (origin - ray.origin).dot(normal) / denom;
    (t >= 0.0).then(|| (t, ray.at(t)))
}
