//! Procedural textures sampled by materials.

use crate::Color;
use ember_math::Vec3;
use std::sync::Arc;

/// Default spatial frequency of [`CheckerTexture`].
pub const DEFAULT_CHECKER_SCALE: f32 = 10.0;

/// Maps a surface parametrization `(u, v)` and hit point to a color.
#[derive(Debug, Clone)]
pub enum Texture {
    /// The same color everywhere.
    Solid(Color),
    /// Alternating pattern of two sub-textures.
    Checker(CheckerTexture),
}

impl Texture {
    /// Constant color texture.
    pub fn solid(color: Color) -> Self {
        Texture::Solid(color)
    }

    /// Checker of two solid colors at the default scale.
    pub fn checker(even: Color, odd: Color) -> Self {
        Texture::Checker(CheckerTexture::new(
            Arc::new(Texture::Solid(even)),
            Arc::new(Texture::Solid(odd)),
            DEFAULT_CHECKER_SCALE,
        ))
    }

    /// Color at surface coordinates `(u, v)` and world point `p`.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker(checker) => checker.value(u, v, p),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::Solid(color)
    }
}

/// Checker pattern driven by the hit point's world coordinates.
///
/// The sign of `sin(sx) * sin(sy) * sin(sz)` selects `odd` (negative) or
/// `even`, so the cells are cubes of edge `PI / scale`.
#[derive(Debug, Clone)]
pub struct CheckerTexture {
    even: Arc<Texture>,
    odd: Arc<Texture>,
    scale: f32,
}

impl CheckerTexture {
    pub fn new(even: Arc<Texture>, odd: Arc<Texture>, scale: f32) -> Self {
        Self { even, odd, scale }
    }

    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sp = self.scale * p;
        let sines = sp.x.sin() * sp.y.sin() * sp.z.sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}
