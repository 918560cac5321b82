//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation bounded by a bounce budget
//! - Anti-aliasing via jittered multi-sampling
//! - Parallel bucket rendering with one seeded RNG stream per bucket

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{Camera, Color, Hittable, Ray};
use ember_math::sampling::gen_f32;
use ember_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Lower bound of the hit interval; suppresses self-intersection acne.
pub const HIT_EPSILON: f32 = 0.001;

/// How the scattered contribution is weighted in [`ray_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CosineWeighting {
    /// `emitted + attenuation * incoming`. Lambertian sampling already
    /// carries the cosine, so this is the unbiased estimator.
    #[default]
    Off,
    /// Additionally scale the scattered term by
    /// `|dot(unit(scattered.direction), unit(normal))|`. Darkens grazing
    /// bounces; reproduces the look of older renders.
    Legacy,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub image_width: u32,
    /// Output image height in pixels
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Radiance returned by rays that escape the scene
    pub background: Color,
    /// Scattered-term weighting policy
    pub cosine_weighting: CosineWeighting,
    /// Base seed; bucket `i` uses `seed + i`
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            cosine_weighting: CosineWeighting::Off,
            seed: 0,
            bucket_size: crate::DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Compute the radiance carried back along a ray.
///
/// Terminates at black when the bounce budget is spent, at the background
/// on a miss, and at the emitted radiance when the material absorbs.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(HIT_EPSILON, f32::INFINITY)) else {
        return config.background;
    };

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    let Some(result) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    let incoming = ray_color(&result.scattered, world, depth - 1, config, rng);
    let scattered = result.attenuation * incoming;

    match config.cosine_weighting {
        CosineWeighting::Off => emitted + scattered,
        CosineWeighting::Legacy => {
            let cosine = result
                .scattered
                .direction()
                .normalize()
                .dot(rec.normal.normalize())
                .abs();
            emitted + scattered * cosine
        }
    }
}

/// Sum of `samples_per_pixel` radiance samples for pixel `(i, j)`.
///
/// `j` counts rows from the bottom of the viewport. The sum is not averaged;
/// see [`ImageBuffer`].
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let s_scale = config.image_width.saturating_sub(1).max(1) as f32;
    let t_scale = config.image_height.saturating_sub(1).max(1) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (i as f32 + gen_f32(rng)) / s_scale;
        let t = (j as f32 + gen_f32(rng)) / t_scale;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, config, rng);
    }

    pixel_color
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a summed pixel color to 8-bit RGB.
///
/// Averages by `samples`, maps NaN to 0, gamma-corrects and quantizes.
pub fn color_to_rgb8(sum: Color, samples: u32) -> [u8; 3] {
    let scale = 1.0 / samples.max(1) as f32;
    let intensity = Interval::new(0.0, 0.999);

    let channel = |c: f32| {
        let c = if c.is_nan() { 0.0 } else { c * scale };
        (256.0 * intensity.clamp(linear_to_gamma(c))) as u8
    };

    [channel(sum.x), channel(sum.y), channel(sum.z)]
}

/// Accumulated per-pixel radiance sums, row-major from the top row.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Number of samples summed into each pixel
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel sum at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Averaged linear color at (x, y).
    pub fn average(&self, x: u32, y: u32) -> Color {
        self.get(x, y) / self.samples_per_pixel.max(1) as f32
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (idx, color) in result.pixels.iter().enumerate() {
            let local_x = idx as u32 % bucket.width;
            let local_y = idx as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Gamma-corrected 8-bit RGB bytes, row-major from the top row.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color, self.samples_per_pixel));
        }
        bytes
    }
}

/// Percentage to report when the `done`-th of `total` buckets finishes,
/// once per 10% step.
fn progress_percent(done: usize, total: usize) -> Option<usize> {
    if total == 0 || done == 0 {
        return None;
    }
    let step = done * 10 / total;
    (step > (done - 1) * 10 / total).then_some(step * 10)
}

/// Render the entire scene, buckets in parallel.
///
/// Each bucket draws from its own `StdRng` seeded with `config.seed + index`,
/// so the result depends only on the seed, not on thread scheduling.
pub fn render(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(
        config.image_width,
        config.image_height,
        config.bucket_size.max(1),
    );
    let total = buckets.len();

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} buckets",
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
        config.max_depth,
        total
    );

    let completed = AtomicUsize::new(0);
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(bucket.index as u64));
            let pixels = render_bucket(bucket, camera, world, config, &mut rng);

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, done, total);
            if let Some(percent) = progress_percent(done, total) {
                log::info!("{}% ({}/{} buckets)", percent, done, total);
            }

            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(
        config.image_width,
        config.image_height,
        config.samples_per_pixel,
    );
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AxisAlignedRect, CameraConfig, Dielectric, DiffuseLight, HittableList, Lambertian,
        Material, Metal, Sphere,
    };
    use ember_math::Vec3;
    use std::sync::Arc;

    fn config(max_depth: u32, background: Color) -> RenderConfig {
        RenderConfig {
            max_depth,
            background,
            ..RenderConfig::default()
        }
    }

    fn toward_origin() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0)
    }

    fn mixed_scene() -> HittableList {
        let mut world = HittableList::new();
        world.add(Sphere::new(
            Vec3::new(0.0, -100.5, 0.0),
            100.0,
            Arc::new(Lambertian::new(Color::splat(0.5)).into()),
        ));
        world.add(Sphere::new(
            Vec3::ZERO,
            0.5,
            Arc::new(Metal::new(Color::splat(0.8), 0.2).into()),
        ));
        world.add(Sphere::new(
            Vec3::new(1.0, 0.0, 0.0),
            0.5,
            Arc::new(Dielectric::new(1.5).into()),
        ));
        world.add(AxisAlignedRect::xz(
            (-1.0, 1.0),
            (-1.0, 1.0),
            3.0,
            Arc::new(DiffuseLight::new(Color::splat(4.0)).into()),
        ));
        world
    }

    #[test]
    fn test_emitter_alone_returns_its_radiance() {
        let mut world = HittableList::new();
        world.add(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(DiffuseLight::new(Color::splat(3.0)).into()),
        ));
        let mut rng = StdRng::seed_from_u64(1);

        for depth in [1, 2, 5, 50] {
            let c = ray_color(&toward_origin(), &world, depth, &config(depth, Color::ZERO), &mut rng);
            assert_eq!(c, Color::splat(3.0));
        }

        let legacy = RenderConfig {
            cosine_weighting: CosineWeighting::Legacy,
            ..config(10, Color::ZERO)
        };
        let c = ray_color(&toward_origin(), &world, 10, &legacy, &mut rng);
        assert_eq!(c, Color::splat(3.0));
    }

    #[test]
    fn test_empty_world_returns_background() {
        let world = HittableList::new();
        let background = Color::new(0.5, 0.7, 1.0);
        let mut rng = StdRng::seed_from_u64(2);

        for depth in [1, 3, 50] {
            let c = ray_color(&toward_origin(), &world, depth, &config(depth, background), &mut rng);
            assert_eq!(c, background);
        }
    }

    #[test]
    fn test_zero_depth_is_black() {
        let world = mixed_scene();
        let mut rng = StdRng::seed_from_u64(3);

        for dir in [-Vec3::Z, Vec3::X, Vec3::new(0.3, -1.0, -0.2)] {
            let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), dir, 0.0);
            let c = ray_color(&ray, &world, 0, &config(0, Color::ONE), &mut rng);
            assert_eq!(c, Color::ZERO);
        }

        // Empty world too: the bounce budget is checked before the miss,
        // so the background only shows from depth 1 up
        let c = ray_color(&toward_origin(), &HittableList::new(), 0, &config(0, Color::ONE), &mut rng);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn test_lambertian_under_white_sky() {
        // A white diffuse surface in a uniformly white environment reflects
        // the environment exactly under the unbiased estimator.
        let mut world = HittableList::new();
        world.add(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::from(Lambertian::new(Color::ONE))),
        ));
        let mut rng = StdRng::seed_from_u64(4);

        let c = ray_color(&toward_origin(), &world, 50, &config(50, Color::ONE), &mut rng);
        assert!((c - Color::ONE).length() < 1e-5, "got {:?}", c);
    }

    #[test]
    fn test_legacy_weighting_darkens() {
        let mut world = HittableList::new();
        world.add(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::from(Lambertian::new(Color::ONE))),
        ));
        let legacy = RenderConfig {
            cosine_weighting: CosineWeighting::Legacy,
            ..config(2, Color::ONE)
        };
        let mut rng = StdRng::seed_from_u64(5);

        let c = ray_color(&toward_origin(), &world, 2, &legacy, &mut rng);
        assert!(c.x <= 1.0 && c.x > 0.0);
        assert_eq!(c.x, c.y);
        assert_eq!(c.y, c.z);
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::ZERO, 4), [0, 0, 0]);
        // Sum of 4 samples of 0.25 -> 0.25 -> gamma 0.5 -> 128
        assert_eq!(color_to_rgb8(Color::splat(1.0), 4), [128, 128, 128]);
        // Overexposed clamps to 255
        assert_eq!(color_to_rgb8(Color::splat(40.0), 4), [255, 255, 255]);
        // NaN and negatives become black
        assert_eq!(color_to_rgb8(Color::new(f32::NAN, -1.0, 0.0), 1), [0, 0, 0]);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_render_pixel_sums_samples() {
        let camera = CameraConfig::new().build();
        let background = Color::new(0.5, 0.7, 1.0);
        let config = RenderConfig {
            image_width: 8,
            image_height: 8,
            samples_per_pixel: 4,
            ..config(5, background)
        };
        let mut rng = StdRng::seed_from_u64(6);

        let sum = render_pixel(&camera, &HittableList::new(), 3, 3, &config, &mut rng);
        assert!((sum - background * 4.0).length() < 1e-5);
    }

    #[test]
    fn test_render_is_deterministic_per_seed() {
        let world = mixed_scene();
        let camera = CameraConfig::new()
            .with_position(Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 4.0)
            .with_aspect_ratio(1.5)
            .build();
        let config = RenderConfig {
            image_width: 24,
            image_height: 16,
            samples_per_pixel: 2,
            max_depth: 4,
            background: Color::new(0.5, 0.7, 1.0),
            bucket_size: 8,
            seed: 11,
            ..RenderConfig::default()
        };

        let a = render(&camera, &world, &config);
        let b = render(&camera, &world, &config);

        assert_eq!(a.pixels.len(), 24 * 16);
        assert_eq!(a.pixels, b.pixels);
        assert!(a.pixels.iter().any(|p| p.length() > 0.0));
    }

    #[test]
    fn test_render_empty_scene_fills_background() {
        let camera = CameraConfig::new().build();
        let background = Color::new(0.5, 0.7, 1.0);
        let config = RenderConfig {
            image_width: 5,
            image_height: 3,
            samples_per_pixel: 3,
            bucket_size: 2,
            ..config(3, background)
        };

        let image = render(&camera, &HittableList::new(), &config);
        for y in 0..3 {
            for x in 0..5 {
                assert!((image.average(x, y) - background).length() < 1e-5);
            }
        }
    }

    #[test]
    fn test_progress_reported_every_tenth() {
        let reported: Vec<usize> = (1..=100).filter_map(|d| progress_percent(d, 100)).collect();
        assert_eq!(reported, (1..=10).map(|p| p * 10).collect::<Vec<_>>());

        // Fewer buckets than steps: every bucket reports
        let few: Vec<usize> = (1..=4).filter_map(|d| progress_percent(d, 4)).collect();
        assert_eq!(few, vec![20, 50, 70, 100]);

        assert_eq!(progress_percent(0, 10), None);
        assert_eq!(progress_percent(1, 0), None);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_pixel_index_does_not_wrap() {
        // Only the indexing is exercised; no pixel storage is allocated
        let image = ImageBuffer {
            width: 70_000,
            height: 70_000,
            samples_per_pixel: 1,
            pixels: Vec::new(),
        };
        assert_eq!(image.index(69_999, 69_999), 4_899_999_999);
        assert_eq!(image.index(5, 1), 70_005);
    }

    #[test]
    fn test_image_buffer_write_bucket() {
        use crate::Bucket;

        let mut image = ImageBuffer::new(4, 4, 1);
        let bucket = Bucket::new(2, 1, 2, 2, 0);
        let pixels = vec![Color::X, Color::Y, Color::Z, Color::ONE];
        image.write_bucket(&BucketResult::new(bucket, pixels));

        assert_eq!(image.get(2, 1), Color::X);
        assert_eq!(image.get(3, 1), Color::Y);
        assert_eq!(image.get(2, 2), Color::Z);
        assert_eq!(image.get(3, 2), Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.to_rgb8().len(), 4 * 4 * 3);
    }
}
