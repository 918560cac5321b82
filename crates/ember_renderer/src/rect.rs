//! Axis-aligned rectangles, used for walls and area lights.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Interval, Vec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Below this, a ray counts as parallel to the rectangle's plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Which plane a rectangle lies in. The omitted axis is the fixed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RectPlane {
    /// Spans x and y at constant z.
    Xy,
    /// Spans x and z at constant y.
    Xz,
    /// Spans y and z at constant x.
    Yz,
}

impl RectPlane {
    /// `(fixed, a, b)` component indices.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            RectPlane::Xy => (2, 0, 1),
            RectPlane::Xz => (1, 0, 2),
            RectPlane::Yz => (0, 1, 2),
        }
    }

    /// Outward normal: unit vector along the positive fixed axis.
    pub fn normal(self) -> Vec3 {
        match self {
            RectPlane::Xy => Vec3::Z,
            RectPlane::Xz => Vec3::Y,
            RectPlane::Yz => Vec3::X,
        }
    }
}

/// Rectangle `a × b` lying in `plane` at `fixed_axis = k`.
#[derive(Debug, Clone)]
pub struct AxisAlignedRect {
    plane: RectPlane,
    a: Interval,
    b: Interval,
    k: f32,
    material: Arc<Material>,
}

impl AxisAlignedRect {
    pub fn new(plane: RectPlane, a: Interval, b: Interval, k: f32, material: Arc<Material>) -> Self {
        Self {
            plane,
            a,
            b,
            k,
            material,
        }
    }

    /// Rectangle spanning `x0..x1`, `y0..y1` at `z = k`.
    pub fn xy((x0, x1): (f32, f32), (y0, y1): (f32, f32), k: f32, material: Arc<Material>) -> Self {
        Self::new(RectPlane::Xy, Interval::new(x0, x1), Interval::new(y0, y1), k, material)
    }

    /// Rectangle spanning `x0..x1`, `z0..z1` at `y = k`.
    pub fn xz((x0, x1): (f32, f32), (z0, z1): (f32, f32), k: f32, material: Arc<Material>) -> Self {
        Self::new(RectPlane::Xz, Interval::new(x0, x1), Interval::new(z0, z1), k, material)
    }

    /// Rectangle spanning `y0..y1`, `z0..z1` at `x = k`.
    pub fn yz((y0, y1): (f32, f32), (z0, z1): (f32, f32), k: f32, material: Arc<Material>) -> Self {
        Self::new(RectPlane::Yz, Interval::new(y0, y1), Interval::new(z0, z1), k, material)
    }
}

impl Hittable for AxisAlignedRect {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (fixed, ia, ib) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        if direction[fixed].abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.k - origin[fixed]) / direction[fixed];
        if !ray_t.surrounds(t) {
            return None;
        }

        let a = origin[ia] + t * direction[ia];
        let b = origin[ib] + t * direction[ib];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let uv = (
            (a - self.a.min) / self.a.size(),
            (b - self.b.min) / self.b.size(),
        );
        Some(HitRecord::new(ray, t, self.plane.normal(), uv, &self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, DiffuseLight};

    fn light() -> Arc<Material> {
        Arc::new(DiffuseLight::new(Color::splat(15.0)).into())
    }

    fn unit_interval() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_xz_rect_hit_from_below() {
        let rect = AxisAlignedRect::xz((213.0, 343.0), (227.0, 332.0), 554.0, light());
        let ray = Ray::new(Vec3::new(278.0, 0.0, 279.5), Vec3::Y, 0.0);

        let rec = rect.hit(&ray, unit_interval()).unwrap();
        assert!((rec.t - 554.0).abs() < 1e-3);
        assert!((rec.u - 0.5).abs() < 1e-4);
        assert!((rec.v - 0.5).abs() < 1e-4);
        // Outward normal is +y, ray travels +y: back face
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Y);
    }

    #[test]
    fn test_xy_rect_front_face() {
        let rect = AxisAlignedRect::xy((0.0, 2.0), (0.0, 1.0), -3.0, light());
        let ray = Ray::new(Vec3::new(0.5, 0.25, 0.0), -Vec3::Z, 0.0);

        let rec = rect.hit(&ray, unit_interval()).unwrap();
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.25).abs() < 1e-6);
        assert_eq!(rec.p, Vec3::new(0.5, 0.25, -3.0));
    }

    #[test]
    fn test_yz_rect_outside_bounds_misses() {
        let rect = AxisAlignedRect::yz((0.0, 1.0), (0.0, 1.0), 5.0, light());
        let inside = Ray::new(Vec3::new(0.0, 0.5, 0.5), Vec3::X, 0.0);
        let outside = Ray::new(Vec3::new(0.0, 1.5, 0.5), Vec3::X, 0.0);

        let rec = rect.hit(&inside, unit_interval()).unwrap();
        assert!((rec.normal.length() - 1.0).abs() < 1e-6);
        assert!(rect.hit(&outside, unit_interval()).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let rect = AxisAlignedRect::xz((-1.0, 1.0), (-1.0, 1.0), 0.0, light());
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(rect.hit(&ray, unit_interval()).is_none());
    }

    #[test]
    fn test_out_of_range_t_misses() {
        let rect = AxisAlignedRect::xy((-1.0, 1.0), (-1.0, 1.0), -10.0, light());
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);

        assert!(rect.hit(&ray, Interval::new(0.001, 5.0)).is_none());
        // Plane behind the ray
        let away = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        assert!(rect.hit(&away, unit_interval()).is_none());
    }

    #[test]
    fn test_plane_deserializes_lowercase() {
        let plane: RectPlane = serde_json::from_str("\"yz\"").unwrap();
        assert_eq!(plane, RectPlane::Yz);
        assert_eq!(plane.normal(), Vec3::X);
    }
}
