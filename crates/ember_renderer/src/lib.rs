//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer: spheres (static and moving) and axis-aligned
//! rectangles, Lambertian/metal/dielectric/emissive materials, a thin-lens
//! camera with a shutter interval, and a recursive radiance estimator.
//!
//! Primitives and materials are closed enums; materials are shared between
//! primitives through `Arc`. Randomness is always passed in explicitly.

mod bucket;
mod camera;
mod hittable;
mod material;
mod moving_sphere;
mod rect;
mod renderer;
mod sphere;
mod texture;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraConfig};
pub use hittable::{HitRecord, Hittable, HittableList, Primitive};
pub use material::{
    reflect, refract, Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult,
};
pub use moving_sphere::MovingSphere;
pub use rect::{AxisAlignedRect, RectPlane};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, ray_color, render, render_pixel, CosineWeighting,
    ImageBuffer, RenderConfig, HIT_EPSILON,
};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, Texture, DEFAULT_CHECKER_SCALE};

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Interval, Ray, Vec3};
