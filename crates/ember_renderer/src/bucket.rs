//! Tiling of the image into buckets rendered independently on the rayon pool.

use crate::renderer::render_pixel;
use crate::{Camera, Color, Hittable, RenderConfig};
use rand::RngCore;

/// Default bucket edge length in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Rectangular tile of the image, in image coordinates (top row is `y = 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order. Also keys the bucket's random stream.
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }
}

/// Cover a `width` x `height` image with buckets of at most `bucket_size`
/// pixels per side, ordered center-out.
///
/// The order (and therefore every `index`) depends only on the arguments.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let step = bucket_size.max(1);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(step as usize)
        .flat_map(|y| {
            (0..width).step_by(step as usize).map(move |x| {
                Bucket::new(x, y, step.min(width - x), step.min(height - y), 0)
            })
        })
        .collect();

    let (cx, cy) = (width as f32 * 0.5, height as f32 * 0.5);
    let distance = |b: &Bucket| {
        let (bx, by) = b.center();
        (bx - cx).powi(2) + (by - cy).powi(2)
    };
    // Stable: ties keep row-major order
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));

    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }
    buckets
}

/// Pixel sums for one bucket, row-major within the bucket.
///
/// Image row `y` counts from the top; the camera's `t` counts from the
/// bottom, so it is rendered as viewport row `image_height - 1 - y`.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for y in bucket.y..bucket.y + bucket.height {
        let j = config.image_height - 1 - y;
        for i in bucket.x..bucket.x + bucket.width {
            pixels.push(render_pixel(camera, world, i, j, config, rng));
        }
    }

    pixels
}

/// A rendered bucket, ready to be copied into the image.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}
