// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement configuration.

use smallvec::SmallVec;

use crate::types::{Category, Kind};

/// Default bound on ownership walks.
pub const DEFAULT_MAX_OWNER_DEPTH: usize = 1024;

/// Configuration of a [`PlacementController`](crate::PlacementController).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementConfig<K> {
    /// Kinds placed on every tap, all at the tapped pose. Never holds duplicates.
    pub tap_kinds: SmallVec<[K; 4]>,
    /// Categories eligible for object hit tests during a drag.
    pub object_category: Category,
    /// Refuse taps and drag moves while tracking is degraded.
    pub pause_while_degraded: bool,
    /// Maximum number of nodes visited when resolving an owner.
    pub max_owner_depth: usize,
}

impl<K: Kind> Default for PlacementConfig<K> {
    /// Taps place the first kind in [`Kind::ALL`].
    fn default() -> Self {
        Self {
            tap_kinds: K::ALL.iter().copied().take(1).collect(),
            object_category: Category::PLACEABLE,
            pause_while_degraded: true,
            max_owner_depth: DEFAULT_MAX_OWNER_DEPTH,
        }
    }
}

impl<K: Kind> PlacementConfig<K> {
    /// Replace the tap kinds, dropping repeats but keeping first-seen order.
    pub fn with_tap_kinds(mut self, kinds: impl IntoIterator<Item = K>) -> Self {
        self.tap_kinds = dedup(kinds);
        self
    }

    /// Replace the object hit-test category.
    pub fn with_object_category(mut self, category: Category) -> Self {
        self.object_category = category;
        self
    }

    /// Enable or disable the tracking pause.
    pub fn with_pause_while_degraded(mut self, pause: bool) -> Self {
        self.pause_while_degraded = pause;
        self
    }

    /// Replace the ownership walk bound.
    pub fn with_max_owner_depth(mut self, depth: usize) -> Self {
        self.max_owner_depth = depth;
        self
    }
}

pub(crate) fn dedup<K: Kind>(kinds: impl IntoIterator<Item = K>) -> SmallVec<[K; 4]> {
    let mut out: SmallVec<[K; 4]> = SmallVec::new();
    for k in kinds {
        if !out.contains(&k) {
            out.push(k);
        }
    }
    out
}

#[cfg(feature = "serde")]
pub use settings::PlacementSettings;

#[cfg(feature = "serde")]
mod settings {
    use super::{DEFAULT_MAX_OWNER_DEPTH, PlacementConfig, dedup};
    use crate::error::PlacementError;
    use crate::types::{Category, Kind};

    /// Deserializable mirror of [`PlacementConfig`] that names kinds by tag.
    ///
    /// ```toml
    /// tap_kinds = ["box", "chair"]
    /// object_category = 2
    /// pause_while_degraded = true
    /// max_owner_depth = 64
    /// ```
    #[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct PlacementSettings {
        /// Tags placed on tap. `None` keeps the default kind.
        pub tap_kinds: Option<Vec<String>>,
        /// Raw category bits for object hit tests.
        pub object_category: u32,
        /// Refuse taps and drag moves while tracking is degraded.
        pub pause_while_degraded: bool,
        /// Maximum number of nodes visited when resolving an owner.
        pub max_owner_depth: usize,
    }

    impl Default for PlacementSettings {
        fn default() -> Self {
            Self {
                tap_kinds: None,
                object_category: Category::PLACEABLE.bits(),
                pause_while_degraded: true,
                max_owner_depth: DEFAULT_MAX_OWNER_DEPTH,
            }
        }
    }

    impl PlacementSettings {
        /// Resolve tags against `K`.
        ///
        /// Fails with [`PlacementError::UnknownKindTag`] on the first tag `K` does not know.
        pub fn resolve<K: Kind>(&self) -> Result<PlacementConfig<K>, PlacementError> {
            let mut config = PlacementConfig::<K>::default()
                .with_object_category(Category::from_bits_retain(self.object_category))
                .with_pause_while_degraded(self.pause_while_degraded)
                .with_max_owner_depth(self.max_owner_depth);
            if let Some(tags) = &self.tap_kinds {
                let kinds = tags
                    .iter()
                    .map(|t| {
                        K::from_tag(t).ok_or_else(|| PlacementError::UnknownKindTag(t.clone()))
                    })
                    .collect::<Result<Vec<K>, _>>()?;
                config.tap_kinds = dedup(kinds);
            }
            Ok(config)
        }
    }
}
