// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera model used to turn screen points into world rays.

use anchorage_scene::Ray;
use glam::{Mat4, Vec3};
use kurbo::{Point, Size};

/// A camera with a world pose, a projection, and a viewport in pixels.
///
/// Projections use a `0..1` depth range (`glam`'s `*_rh` constructors).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// Camera-to-world transform.
    pub transform: Mat4,
    /// View-to-clip projection.
    pub projection: Mat4,
    /// Viewport size in pixels. Screen points have their origin at the top left.
    pub viewport: Size,
}

impl Camera {
    /// Create a camera from its parts.
    pub fn new(transform: Mat4, projection: Mat4, viewport: Size) -> Self {
        Self {
            transform,
            projection,
            viewport,
        }
    }

    /// Perspective camera at `transform` with a vertical field of view in radians.
    pub fn perspective(transform: Mat4, fov_y: f32, viewport: Size) -> Self {
        let projection = Mat4::perspective_rh(fov_y, aspect(viewport), 0.01, 100.0);
        Self::new(transform, projection, viewport)
    }

    /// Orthographic camera `height` above `center`, looking straight down.
    ///
    /// Screen right is world +X and screen down is world +Z. `half_extent` is
    /// the half height of the visible area in world units.
    pub fn orthographic_top_down(
        center: Vec3,
        height: f32,
        half_extent: f32,
        viewport: Size,
    ) -> Self {
        let eye = center + Vec3::Y * height;
        let view = Mat4::look_at_rh(eye, center, Vec3::NEG_Z);
        let half_width = half_extent * aspect(viewport);
        let projection = Mat4::orthographic_rh(
            -half_width,
            half_width,
            -half_extent,
            half_extent,
            0.1,
            height * 10.0,
        );
        Self::new(view.inverse(), projection, viewport)
    }

    /// World-to-clip transform.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.transform.inverse()
    }

    /// World ray through a screen point, from the near plane toward the far plane.
    ///
    /// Returns `None` for an empty viewport.
    pub fn ray_through(&self, point: Point) -> Option<Ray> {
        if self.viewport.is_zero_area() {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Screen coordinates fit comfortably in f32."
        )]
        let (ndc_x, ndc_y) = (
            (point.x / self.viewport.width * 2.0 - 1.0) as f32,
            (1.0 - point.y / self.viewport.height * 2.0) as f32,
        );
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Some(Ray::new(near, far - near))
    }

    /// Screen point of a world position. Returns `None` behind the camera.
    pub fn project(&self, world: Vec3) -> Option<Point> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Point::new(
            (f64::from(ndc.x) + 1.0) * 0.5 * self.viewport.width,
            (1.0 - f64::from(ndc.y)) * 0.5 * self.viewport.height,
        ))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Aspect ratios fit comfortably in f32."
)]
fn aspect(viewport: Size) -> f32 {
    if viewport.height > 0.0 {
        (viewport.width / viewport.height) as f32
    } else {
        1.0
    }
}
