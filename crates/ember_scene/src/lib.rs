//! Ember Scene - scene construction for the Ember path tracer.
//!
//! This crate provides:
//!
//! - **Built-in presets**: `lit_room`, `cornell_box`, `spheres`
//! - **JSON scene descriptions**: named textures and materials, a camera and
//!   a list of objects, validated into a renderable [`Scene`]
//!
//! # Example
//!
//! ```ignore
//! use ember_scene::{load_scene, Preset};
//!
//! let scene = Preset::CornellBox.build();
//! let custom = load_scene("room.json")?;
//! println!("{} objects", custom.world.len());
//! ```

pub mod description;
pub mod presets;
pub mod scene;

pub use description::{load_scene, load_scene_from_str, SceneDescription};
pub use presets::Preset;
pub use scene::{Scene, SceneError, SceneResult, SceneSettings, MAX_IMAGE_PIXELS};
