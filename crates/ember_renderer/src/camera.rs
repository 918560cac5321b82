//! Thin-lens camera with a shutter interval.

use crate::Ray;
use ember_math::sampling::{gen_range_f32, random_in_unit_disk};
use ember_math::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Construction parameters for a [`Camera`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Viewport width / height
    pub aspect_ratio: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,
    /// Shutter open time
    pub time0: f32,
    /// Shutter close time
    pub time1: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
        }
    }
}

impl CameraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the shutter open/close interval.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Derive the immutable camera.
    pub fn build(&self) -> Camera {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Camera basis
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = self.look_from;
        let horizontal = self.focus_dist * viewport_width * u;
        let vertical = self.focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - self.focus_dist * w;

        Camera {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: self.aperture / 2.0,
            time0: self.time0,
            time1: self.time1,
        }
    }
}

/// Camera for generating rays into the scene. Immutable after [`CameraConfig::build`].
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
    time0: f32,
    time1: f32,
}

impl Camera {
    /// Generate a ray through normalized viewport coordinates `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner, `(1, 1)` the upper right.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let ray_origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        let ray_time = gen_range_f32(rng, self.time0, self.time1);

        Ray::new(ray_origin, target - ray_origin, ray_time)
    }

    /// Eye position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}

impl Default for Camera {
    fn default() -> Self {
        CameraConfig::default().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_basis() {
        let camera = CameraConfig::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .build();

        assert_eq!(camera.origin(), Vec3::ZERO);
        assert!((camera.u - Vec3::X).length() < 1e-6);
        assert!((camera.v - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = CameraConfig::new()
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 10.0)
            .build();
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        let dir = ray.direction().normalize();
        assert!((dir - (-Vec3::Z)).length() < 1e-5);
    }

    #[test]
    fn test_corners_span_viewport() {
        // vfov 90, aspect 1, focus 1: viewport is 2x2 at z = -1
        let camera = CameraConfig::new()
            .with_aspect_ratio(1.0)
            .with_lens(90.0, 0.0, 1.0)
            .build();
        let mut rng = StdRng::seed_from_u64(1);

        let lower_left = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((lower_left.direction() - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);

        let upper_right = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((upper_right.direction() - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_pinhole_origin_is_eye() {
        let eye = Vec3::new(2.5, 2.5, 9.9);
        let camera = CameraConfig::new()
            .with_position(eye, Vec3::new(2.5, 2.5, 0.0), Vec3::Y)
            .with_lens(40.0, 0.0, 10.0)
            .build();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ray = camera.get_ray(0.3, 0.7, &mut rng);
            assert_eq!(ray.origin(), eye);
        }

        let a = camera.get_ray(0.3, 0.7, &mut StdRng::seed_from_u64(1));
        let b = camera.get_ray(0.3, 0.7, &mut StdRng::seed_from_u64(2));
        assert_eq!(a.direction(), b.direction());
    }

    #[test]
    fn test_aperture_offsets_origin_within_lens() {
        let camera = CameraConfig::new()
            .with_position(Vec3::ZERO, -Vec3::Z, Vec3::Y)
            .with_lens(40.0, 2.0, 10.0)
            .build();
        let mut rng = StdRng::seed_from_u64(3);

        let mut moved = false;
        for _ in 0..100 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert!(ray.origin().length() < 1.0 + 1e-6);
            // Lens lies in the camera's u/v plane
            assert!(ray.origin().z.abs() < 1e-6);
            moved |= ray.origin() != Vec3::ZERO;
        }
        assert!(moved);
    }

    #[test]
    fn test_ray_time_within_shutter() {
        let camera = CameraConfig::new().with_shutter(0.0, 5.0).build();
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..200 {
            let time = camera.get_ray(0.5, 0.5, &mut rng).time();
            assert!((0.0..5.0).contains(&time));
        }
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: CameraConfig =
            serde_json::from_str(r#"{ "look_from": [278, 278, -800], "vfov": 40 }"#).unwrap();
        assert_eq!(config.look_from, Vec3::new(278.0, 278.0, -800.0));
        assert_eq!(config.vfov, 40.0);
        assert_eq!(config.vup, Vec3::Y);
    }
}
