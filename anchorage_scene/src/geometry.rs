// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry shared between prototype instances, plus the ray and box math used for picking.

use glam::{Mat4, Vec3};

/// Renderable shape attached to a node.
///
/// Geometry is shared behind an `Arc` between a prototype and all of its clones.
/// Only its local bounds matter to this crate.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// Box centered on the origin.
    Box {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Extent along Z.
        length: f32,
        /// Edge rounding radius. Ignored for picking.
        chamfer_radius: f32,
    },
    /// Flat rectangle in the local XZ plane, centered on the origin.
    Plane {
        /// Extent along X.
        width: f32,
        /// Extent along Z.
        length: f32,
    },
    /// Imported mesh described by its bounds.
    Mesh {
        /// Conservative local bounds.
        bounds: Aabb3,
    },
}

impl Geometry {
    /// Box of the given size with sharp edges.
    pub const fn cuboid(width: f32, height: f32, length: f32) -> Self {
        Self::Box {
            width,
            height,
            length,
            chamfer_radius: 0.0,
        }
    }

    /// Local (untransformed) bounds.
    pub fn local_bounds(&self) -> Aabb3 {
        match *self {
            Self::Box {
                width,
                height,
                length,
                ..
            } => {
                let half = Vec3::new(width, height, length) * 0.5;
                Aabb3::new(-half, half)
            }
            Self::Plane { width, length } => {
                let half = Vec3::new(width * 0.5, 0.0, length * 0.5);
                Aabb3::new(-half, half)
            }
            Self::Mesh { bounds } => bounds,
        }
    }
}

/// Axis-aligned bounding box in 3D.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb3 {
    /// Create a box from min/max corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Whether the box contains the point (inclusive).
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Slab test. Returns the entry parameter along `ray`, or `None` if it misses.
    ///
    /// Hits behind the origin are rejected; a ray starting inside the box reports `0.0`.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() <= f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }
        Some(t_min)
    }
}

/// Half-line in 3D.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction. World-space rays are normalized so that parameters are distances.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Map the ray through an affine transform without renormalizing.
    ///
    /// Parameters along the result match parameters along `self`.
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_bounds_are_centered() {
        let b = Geometry::cuboid(0.2, 0.4, 0.6).local_bounds();
        assert_eq!(b.min, Vec3::new(-0.1, -0.2, -0.3));
        assert_eq!(b.max, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn slab_hit_and_miss() {
        let b = Aabb3::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let down = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert_eq!(b.intersect_ray(&down), Some(4.0));

        let beside = Ray::new(Vec3::new(3.0, 5.0, 0.0), Vec3::NEG_Y);
        assert_eq!(b.intersect_ray(&beside), None);

        let away = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert_eq!(b.intersect_ray(&away), None);
    }

    #[test]
    fn ray_inside_box_hits_at_zero() {
        let b = Aabb3::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let r = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(b.intersect_ray(&r), Some(0.0));
        assert!(b.contains(Vec3::ZERO));
    }

    #[test]
    fn transformed_ray_keeps_parameters() {
        let r = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::NEG_Y);
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let t = r.transformed(&m);
        assert_eq!(t.at(2.0), m.transform_point3(r.at(2.0)));
    }
}
