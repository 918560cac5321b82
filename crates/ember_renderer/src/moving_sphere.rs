//! Sphere whose center moves linearly over a time window (motion blur).

use crate::{
    hittable::{HitRecord, Hittable},
    sphere::hit_sphere,
    Material, Ray,
};
use ember_math::{Interval, Vec3};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<Material>,
}

impl MovingSphere {
    /// Sphere at `center0` at `time0` and `center1` at `time1`.
    pub fn new(
        (center0, center1): (Vec3, Vec3),
        (time0, time1): (f32, f32),
        radius: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at `time`. Extrapolates linearly outside the window; a zero-length
    /// window pins the sphere at `center0`.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(
            self.center(ray.time()),
            self.radius,
            &self.material,
            ray,
            ray_t,
        )
    }
}
