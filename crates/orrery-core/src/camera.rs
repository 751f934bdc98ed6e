// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Perspective camera: projection, placement, screen-ray unprojection.

use glam::{Mat4, Vec3};

/// A world-space ray, used for picking.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// Ray start point.
    pub origin: Vec3,
    /// Normalized direction.
    pub dir: Vec3,
}

/// Perspective camera for one surface.
///
/// `aspect` is owned by the resize path: it only ever changes together with
/// the renderer's output size.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// Vertical field of view, radians.
    pub fov_y: f32,
    /// Output width / height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// World-space eye position.
    pub eye: Vec3,
    /// Look-at target.
    pub target: Vec3,
    /// Up reference.
    pub up: Vec3,
}

impl PerspectiveCamera {
    /// New camera; `fov_y_deg` in degrees to match the usual config surface.
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_y_deg.to_radians(),
            aspect,
            near,
            far,
            eye: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }

    /// Refresh the projection for a new output aspect ratio.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Point the camera at `target` from its current eye position.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Unit vector from eye toward target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// View matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix (0..1 depth range).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect.max(f32::EPSILON), self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray through a point given in normalized device coordinates
    /// (`x`, `y` in `[-1, 1]`, y up).
    pub fn screen_ray(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let inv = self.view_proj().inverse();
        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray {
            origin: near,
            dir: (far - near).normalize_or_zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn set_aspect_feeds_projection() {
        let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0);
        cam.set_aspect(16.0 / 9.0);
        assert_relative_eq!(cam.aspect, 16.0 / 9.0);
        // m00 = 1 / (aspect * tan(fov/2))
        let m00 = cam.projection().col(0).x;
        let expected = 1.0 / (cam.aspect * (cam.fov_y / 2.0).tan());
        assert_relative_eq!(m00, expected, epsilon = 1e-5);
    }

    #[test]
    fn center_ray_points_forward() {
        let mut cam = PerspectiveCamera::new(60.0, 1.5, 0.1, 100.0);
        cam.eye = Vec3::new(0.0, 0.0, 20.0);
        cam.look_at(Vec3::ZERO);
        let ray = cam.screen_ray(0.0, 0.0);
        assert_relative_eq!(ray.dir.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ray.dir.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ray.dir.z, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn off_center_ray_starts_near_the_near_plane() {
        let mut cam = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        cam.eye = Vec3::new(-3.0, 2.0, 8.0);
        cam.look_at(Vec3::ZERO);
        let ray = cam.screen_ray(0.4, -0.3);
        let from_eye = (ray.origin - cam.eye).length();
        assert!(from_eye < 0.5, "origin {from_eye} should sit on the near plane");
    }
}
