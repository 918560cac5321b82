//! JSON scene descriptions.
//!
//! ```json
//! {
//!   "camera": { "look_from": [278, 278, -800], "look_at": [278, 278, 0], "vfov": 40 },
//!   "background": [0, 0, 0],
//!   "textures": { "ground": { "type": "checker", "even": [0.2, 0.3, 0.1], "odd": [0.9, 0.9, 0.9] } },
//!   "materials": {
//!     "floor": { "type": "lambertian", "albedo": "ground" },
//!     "lamp": { "type": "diffuse_light", "emit": [15, 15, 15] }
//!   },
//!   "objects": [
//!     { "type": "sphere", "center": [0, -1000, 0], "radius": 1000, "material": "floor" },
//!     { "type": "rect", "plane": "xz", "a": [213, 343], "b": [227, 332], "k": 554, "material": "lamp" }
//!   ]
//! }
//! ```
//!
//! A texture slot takes a texture name, an RGB triple, or an inline texture.

use crate::scene::{Scene, SceneError, SceneResult, SceneSettings};
use ember_renderer::{
    AxisAlignedRect, CameraConfig, CheckerTexture, Color, Dielectric, DiffuseLight,
    HittableList, Interval, Lambertian, Material, Metal, MovingSphere, RectPlane, Sphere,
    Texture, Vec3, DEFAULT_CHECKER_SCALE,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Top-level scene file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub background: Vec3,
    #[serde(default)]
    pub settings: SceneSettings,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureDesc>,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDesc {
    Solid {
        color: Vec3,
    },
    Checker {
        even: TextureRef,
        odd: TextureRef,
        #[serde(default = "default_checker_scale")]
        scale: f32,
    },
}

fn default_checker_scale() -> f32 {
    DEFAULT_CHECKER_SCALE
}

/// A texture slot: by name, as a plain color, or inline.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextureRef {
    Named(String),
    Color(Vec3),
    Inline(Box<TextureDesc>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian {
        albedo: TextureRef,
    },
    Metal {
        albedo: Vec3,
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        refractive_index: f32,
    },
    DiffuseLight {
        emit: TextureRef,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    Sphere {
        center: Vec3,
        radius: f32,
        material: String,
    },
    MovingSphere {
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: String,
    },
    Rect {
        plane: RectPlane,
        a: [f32; 2],
        b: [f32; 2],
        k: f32,
        material: String,
    },
}

/// Load and validate a scene file.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<Scene> {
    let path = path.as_ref();
    log::info!("Loading scene from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    load_scene_from_str(&text)
}

/// Parse and validate a scene from JSON text.
pub fn load_scene_from_str(text: &str) -> SceneResult<Scene> {
    let description: SceneDescription = serde_json::from_str(text)?;
    description.build()
}

impl SceneDescription {
    /// Resolve references and build the renderable scene.
    pub fn build(&self) -> SceneResult<Scene> {
        let mut textures = TextureResolver::new(&self.textures);

        let mut materials: HashMap<&str, Arc<Material>> = HashMap::new();
        for (name, desc) in &self.materials {
            let material = build_material(name, desc, &mut textures)?;
            materials.insert(name.as_str(), Arc::new(material));
        }

        let lookup = |name: &str| {
            materials
                .get(name)
                .cloned()
                .ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
        };

        let mut world = HittableList::new();
        for object in &self.objects {
            match object {
                ObjectDesc::Sphere {
                    center,
                    radius,
                    material,
                } => {
                    check_radius(*radius)?;
                    world.add(Sphere::new(*center, *radius, lookup(material)?));
                }
                ObjectDesc::MovingSphere {
                    center0,
                    center1,
                    time0,
                    time1,
                    radius,
                    material,
                } => {
                    check_radius(*radius)?;
                    world.add(MovingSphere::new(
                        (*center0, *center1),
                        (*time0, *time1),
                        *radius,
                        lookup(material)?,
                    ));
                }
                ObjectDesc::Rect {
                    plane,
                    a,
                    b,
                    k,
                    material,
                } => {
                    let a = check_bounds("rect a", *a)?;
                    let b = check_bounds("rect b", *b)?;
                    world.add(AxisAlignedRect::new(*plane, a, b, *k, lookup(material)?));
                }
            }
        }

        if self.background == Vec3::ZERO && !materials.values().any(|m| m.is_emissive()) {
            log::warn!("Scene has no emissive materials and a black background; it will render black");
        }
        if world.is_empty() {
            log::warn!("Scene has no objects; every ray will return the background");
        }
        log::info!(
            "Scene built: {} objects, {} materials",
            world.len(),
            materials.len()
        );

        Ok(Scene::new(world, self.camera.clone(), self.background).with_settings(self.settings))
    }
}

fn build_material(
    name: &str,
    desc: &MaterialDesc,
    textures: &mut TextureResolver<'_>,
) -> SceneResult<Material> {
    let material: Material = match desc {
        MaterialDesc::Lambertian { albedo } => {
            Lambertian::textured(textures.resolve_ref(albedo)?).into()
        }
        MaterialDesc::Metal { albedo, fuzz } => {
            if !(0.0..=1.0).contains(fuzz) {
                log::warn!("Material '{}': fuzz {} clamped to [0, 1]", name, fuzz);
            }
            Metal::new(*albedo, *fuzz).into()
        }
        MaterialDesc::Dielectric { refractive_index } => {
            if refractive_index.is_nan() || *refractive_index <= 0.0 {
                return Err(SceneError::invalid(
                    format!("refractive index of material '{}'", name),
                    format!("must be positive, got {}", refractive_index),
                ));
            }
            Dielectric::new(*refractive_index).into()
        }
        MaterialDesc::DiffuseLight { emit } => {
            DiffuseLight::textured(textures.resolve_ref(emit)?).into()
        }
    };
    Ok(material)
}

fn check_radius(radius: f32) -> SceneResult<()> {
    if radius >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(
            "sphere radius",
            format!("must be non-negative, got {}", radius),
        ))
    }
}

fn check_bounds(what: &str, [min, max]: [f32; 2]) -> SceneResult<Interval> {
    if min < max {
        Ok(Interval::new(min, max))
    } else {
        Err(SceneError::invalid(
            what,
            format!("bounds must be increasing, got [{}, {}]", min, max),
        ))
    }
}

/// Resolves named textures once, sharing the result, and rejects cycles.
struct TextureResolver<'a> {
    named: &'a BTreeMap<String, TextureDesc>,
    resolved: HashMap<&'a str, Arc<Texture>>,
    in_progress: Vec<&'a str>,
}

impl<'a> TextureResolver<'a> {
    fn new(named: &'a BTreeMap<String, TextureDesc>) -> Self {
        Self {
            named,
            resolved: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    fn resolve_ref(&mut self, texture: &TextureRef) -> SceneResult<Arc<Texture>> {
        match texture {
            TextureRef::Named(name) => self.resolve_named(name),
            TextureRef::Color(color) => Ok(Arc::new(Texture::solid(*color))),
            TextureRef::Inline(desc) => self.build(desc),
        }
    }

    fn resolve_named(&mut self, name: &str) -> SceneResult<Arc<Texture>> {
        let named = self.named;
        let (key, desc) = named
            .get_key_value(name)
            .ok_or_else(|| SceneError::UnknownTexture(name.to_string()))?;

        if let Some(texture) = self.resolved.get(key.as_str()) {
            return Ok(texture.clone());
        }
        if self.in_progress.contains(&key.as_str()) {
            return Err(SceneError::TextureCycle(name.to_string()));
        }

        self.in_progress.push(key.as_str());
        let texture = self.build(desc);
        self.in_progress.pop();

        let texture = texture?;
        self.resolved.insert(key.as_str(), texture.clone());
        Ok(texture)
    }

    fn build(&mut self, desc: &TextureDesc) -> SceneResult<Arc<Texture>> {
        let texture = match desc {
            TextureDesc::Solid { color } => Texture::solid(*color),
            TextureDesc::Checker { even, odd, scale } => Texture::Checker(CheckerTexture::new(
                self.resolve_ref(even)?,
                self.resolve_ref(odd)?,
                *scale,
            )),
        };
        Ok(Arc::new(texture))
    }
}
