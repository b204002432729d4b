// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Prototype catalog keyed by kind.

use hashbrown::HashMap;

use crate::error::PlacementError;
use crate::types::{Category, Kind, SceneGraph};

/// Prototypes of placeable kinds.
///
/// Registering a prototype tags it, so every instance carries the kind's tag at its
/// root and the catalog category on every node.
pub struct Catalog<K, P> {
    prototypes: HashMap<K, P>,
    category: Category,
}

impl<K: Kind, P> core::fmt::Debug for Catalog<K, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut kinds: Vec<&K> = self.prototypes.keys().collect();
        kinds.sort_by_key(|k| k.tag());
        f.debug_struct("Catalog")
            .field("kinds", &kinds)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl<K: Kind, P> Default for Catalog<K, P> {
    fn default() -> Self {
        Self::new(Category::PLACEABLE)
    }
}

impl<K: Kind, P> Catalog<K, P> {
    /// Create an empty catalog whose instances join `category`.
    pub fn new(category: Category) -> Self {
        Self {
            prototypes: HashMap::new(),
            category,
        }
    }

    /// Category given to every instance.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Tag `prototype` for `kind` and register it. Returns the prototype it replaced.
    pub fn register<S>(&mut self, scene: &S, kind: K, mut prototype: P) -> Option<P>
    where
        S: SceneGraph<Prototype = P> + ?Sized,
    {
        scene.tag_prototype(&mut prototype, kind.tag(), self.category);
        self.prototypes.insert(kind, prototype)
    }

    /// Prototype registered for `kind`.
    pub fn get(&self, kind: K) -> Option<&P> {
        self.prototypes.get(&kind)
    }

    /// Whether `kind` has a prototype.
    pub fn contains(&self, kind: K) -> bool {
        self.prototypes.contains_key(&kind)
    }

    /// Kind named by a dynamic tag.
    pub fn resolve_tag(&self, tag: &str) -> Result<K, PlacementError> {
        K::from_tag(tag).ok_or_else(|| PlacementError::UnknownKindTag(tag.to_owned()))
    }

    /// Registered kinds in [`Kind::ALL`] order.
    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        K::ALL.iter().copied().filter(|k| self.contains(*k))
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}
