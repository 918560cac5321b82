//! Ember math - vector algebra, rays and sampling primitives.
//!
//! `Vec3` from glam doubles as point, direction and linear RGB color.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;
pub mod sampling;

pub use interval::Interval;
pub use ray::Ray;
pub use sampling::{gen_f32, gen_range_f32, Vec3Ext};
