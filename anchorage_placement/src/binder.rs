// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor-to-node binding across the session and scene-owner contexts.
//!
//! ## Overview
//!
//! The tracking session confirms anchors on its own context. The [`Binder`] runs there:
//! it filters out surface anchors, resolves the anchor's tag to a kind, and posts a
//! [`BindTask`]. The [`SceneExecutor`] runs on the scene owner's context and drains
//! those tasks, cloning the kind's prototype under the anchor's node.
//!
//! The two halves are connected by a channel and created together by [`scene_channel`].
//! Nothing on the session side ever touches the scene.
//!
//! ```
//! use anchorage_placement::{ConfirmedAnchor, Kind, scene_channel};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
//! enum Furniture {
//!     Box,
//! }
//!
//! impl Kind for Furniture {
//!     const ALL: &'static [Self] = &[Self::Box];
//!     fn tag(self) -> &'static str {
//!         "box"
//!     }
//! }
//!
//! let (binder, executor) = scene_channel::<Furniture, u32>();
//! let session_side = std::thread::spawn(move || {
//!     binder.anchor_added(ConfirmedAnchor::Surface, 1);
//!     binder.anchor_added(ConfirmedAnchor::Placed { tag: Some("box") }, 2);
//!     binder.anchor_added(ConfirmedAnchor::Placed { tag: Some("house") }, 3);
//! });
//! session_side.join().unwrap();
//! assert_eq!(executor.pending().len(), 1);
//! ```

use std::sync::mpsc::{Receiver, Sender, channel};

use glam::Vec3;

use crate::catalog::Catalog;
use crate::types::{ConfirmedAnchor, Kind, SceneGraph};

/// Work posted from the session context: attach a `kind` clone under `node`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BindTask<K, N> {
    /// Kind to clone.
    pub kind: K,
    /// Engine-created node of the confirmed anchor.
    pub node: N,
}

/// Session-side half of the hand-off. Cheap to clone and `Send`.
#[derive(Debug)]
pub struct Binder<K, N> {
    tx: Sender<BindTask<K, N>>,
}

impl<K, N> Clone for Binder<K, N> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Scene-owner half of the hand-off.
#[derive(Debug)]
pub struct SceneExecutor<K, N> {
    rx: Receiver<BindTask<K, N>>,
}

/// Create a connected [`Binder`] and [`SceneExecutor`].
pub fn scene_channel<K, N>() -> (Binder<K, N>, SceneExecutor<K, N>) {
    let (tx, rx) = channel();
    (Binder { tx }, SceneExecutor { rx })
}

impl<K: Kind, N: Copy + core::fmt::Debug> Binder<K, N> {
    /// Handle a confirmed anchor and its engine-created node.
    ///
    /// Returns true if a [`BindTask`] was posted. Surface anchors, untagged anchors,
    /// and unknown tags post nothing.
    pub fn anchor_added(&self, anchor: ConfirmedAnchor<'_>, node: N) -> bool {
        let tag = match anchor {
            ConfirmedAnchor::Surface => {
                tracing::info!(?node, "surface detected");
                return false;
            }
            ConfirmedAnchor::Placed { tag: None } => {
                tracing::debug!(?node, "untagged anchor ignored");
                return false;
            }
            ConfirmedAnchor::Placed { tag: Some(tag) } => tag,
        };
        let Some(kind) = K::from_tag(tag) else {
            tracing::debug!(?node, tag, "unknown kind tag ignored");
            return false;
        };
        if self.tx.send(BindTask { kind, node }).is_err() {
            tracing::debug!(?node, ?kind, "scene executor gone; bind dropped");
            return false;
        }
        true
    }
}

impl<K: Kind, N: Copy + core::fmt::Debug> SceneExecutor<K, N> {
    /// Run every pending task against `scene`. Returns the number of clones attached.
    ///
    /// Each clone has its local position zeroed so it sits exactly at the anchor's pose.
    /// Tasks whose node has gone away, or whose kind has no prototype, are skipped.
    /// A clone the anchor node refuses is removed again.
    pub fn run_pending<S, P>(&self, catalog: &Catalog<K, P>, scene: &mut S) -> usize
    where
        S: SceneGraph<Node = N, Prototype = P> + ?Sized,
    {
        let mut bound = 0;
        for BindTask { kind, node } in self.rx.try_iter() {
            if !scene.contains(node) {
                tracing::debug!(?node, ?kind, "anchor node gone; bind skipped");
                continue;
            }
            let Some(prototype) = catalog.get(kind) else {
                tracing::debug!(?node, ?kind, "no prototype registered; bind skipped");
                continue;
            };
            let clone = scene.clone_prototype(prototype);
            scene.set_local_position(clone, Vec3::ZERO);
            if scene.add_child(node, clone) {
                bound += 1;
            } else {
                tracing::debug!(?node, ?clone, "clone rejected by anchor node");
                scene.remove_node(clone);
            }
        }
        bound
    }

    /// Drain pending tasks without running them.
    pub fn pending(&self) -> Vec<BindTask<K, N>> {
        self.rx.try_iter().collect()
    }
}
