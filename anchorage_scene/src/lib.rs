// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=anchorage_scene --heading-base-level=0

//! Anchorage Scene: a generational 3D scene graph for AR placement.
//!
//! - Represents a forest of nodes with local transforms, shared geometry, kind tags, and category masks.
//! - Instantiates [`Prototype`] subtrees so that every clone gets its own transforms and shares geometry.
//! - Hit tests world-space rays against node bounds, nearest first, filtered by [`Category`].
//!
//! World transforms are computed on demand from the ancestor chain.
//! Geometry is only described by its bounds; rendering lives elsewhere.
//!
//! ## API overview
//!
//! - [`Scene`]: container managing nodes, parent links, and hit testing.
//! - [`LocalNode`]: per-node local data (transform, geometry, kind tag, category, flags).
//! - [`NodeId`]: generational handle of a node.
//! - [`Prototype`]: detached template subtree.
//! - [`QueryFilter`]: restricts ray hits by flags and category.
//!
//! ## Minimal usage
//!
//! ```
//! use anchorage_scene::{Category, Geometry, KindTag, LocalNode, Prototype, QueryFilter, Ray, Scene};
//! use glam::{Mat4, Vec3};
//!
//! let mut boxed = Prototype::new(LocalNode::with_geometry(Geometry::cuboid(0.2, 0.2, 0.2)));
//! boxed.tag(KindTag::from("box"), Category::PLACEABLE);
//!
//! let mut scene = Scene::new();
//! let anchor = scene.insert(None, LocalNode::at(Mat4::from_translation(Vec3::new(1.0, 0.0, -1.0))));
//! let clone = scene.instantiate(&boxed, Some(anchor));
//!
//! let ray = Ray::new(Vec3::new(1.0, 5.0, -1.0), Vec3::NEG_Y);
//! let hit = scene.hit_test_ray(&ray, QueryFilter::categories(Category::PLACEABLE)).unwrap();
//! assert_eq!(hit.node, clone);
//! assert_eq!(hit.path, vec![anchor, clone]);
//! assert_eq!(scene.kind(clone).map(KindTag::as_str), Some("box"));
//! ```

mod geometry;
mod prototype;
mod scene;
mod types;

pub use geometry::{Aabb3, Geometry, Ray};
pub use prototype::Prototype;
pub use scene::{Hit, QueryFilter, Scene};
pub use types::{Category, KindTag, LocalNode, NodeFlags, NodeId};
