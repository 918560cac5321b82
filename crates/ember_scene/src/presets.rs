//! Built-in scenes.

use crate::scene::{Scene, SceneError, SceneSettings};
use ember_math::sampling::{gen_f32, gen_range_f32, random_vec3};
use ember_renderer::{
    AxisAlignedRect, CameraConfig, Color, Dielectric, DiffuseLight, HittableList, Lambertian,
    Material, Metal, MovingSphere, Sphere, Texture, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Seed for the procedurally scattered spheres in [`Preset::Spheres`].
const SPHERES_SEED: u64 = 0x5EED;

/// Built-in scenes selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Room of giant diffuse spheres lit by one small emissive sphere.
    LitRoom,
    /// Cornell box made of axis-aligned rectangles with a mirror sphere.
    CornellBox,
    /// Field of small diffuse (moving), metal and glass spheres under a sky.
    Spheres,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::LitRoom, Preset::CornellBox, Preset::Spheres];

    pub fn name(self) -> &'static str {
        match self {
            Preset::LitRoom => "lit_room",
            Preset::CornellBox => "cornell_box",
            Preset::Spheres => "spheres",
        }
    }

    pub fn build(self) -> Scene {
        match self {
            Preset::LitRoom => lit_room(),
            Preset::CornellBox => cornell_box(),
            Preset::Spheres => spheres(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| SceneError::UnknownPreset(s.to_string()))
    }
}

fn lambertian(albedo: Color) -> Arc<Material> {
    Arc::new(Lambertian::new(albedo).into())
}

fn light(emit: Color) -> Arc<Material> {
    Arc::new(DiffuseLight::new(emit).into())
}

/// Walls are the insides of huge spheres; the only light is a small sphere.
pub fn lit_room() -> Scene {
    let white = lambertian(Color::ONE);
    let green = lambertian(Color::new(0.0, 1.0, 0.0));
    let red = lambertian(Color::new(1.0, 0.0, 0.0));

    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, white.clone()));
    world.add(Sphere::new(Vec3::new(-1000.0, 0.0, 0.0), 1000.0, green));
    world.add(Sphere::new(Vec3::new(1000.0, 0.0, 0.0), 995.0, red));
    world.add(Sphere::new(Vec3::new(0.0, 0.0, 1000.0), 990.0, white.clone()));
    world.add(Sphere::new(Vec3::new(0.0, 0.0, -1000.0), 1000.0, white.clone()));
    world.add(Sphere::new(Vec3::new(0.0, 1000.0, 0.0), 995.0, white));

    world.add(Sphere::new(
        Vec3::new(2.5, 2.5, 1.0),
        1.0,
        light(Color::new(7.0, 6.0, 5.0)),
    ));

    let camera = CameraConfig::new()
        .with_position(Vec3::new(2.5, 2.5, 9.9), Vec3::new(2.5, 2.5, 0.0), Vec3::Y)
        .with_lens(40.0, 0.1, 10.0)
        .with_aspect_ratio(16.0 / 9.0)
        .with_shutter(0.0, 5.0);

    Scene::new(world, camera, Color::ZERO).with_settings(SceneSettings {
        image_width: 600,
        samples_per_pixel: 100,
        max_depth: 50,
    })
}

/// The classic 555-unit Cornell box.
pub fn cornell_box() -> Scene {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let lamp = light(Color::splat(15.0));
    let mirror: Arc<Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0).into());

    let mut world = HittableList::new();
    world.add(AxisAlignedRect::yz((0.0, 555.0), (0.0, 555.0), 555.0, green));
    world.add(AxisAlignedRect::yz((0.0, 555.0), (0.0, 555.0), 0.0, red));
    world.add(AxisAlignedRect::xz((213.0, 343.0), (227.0, 332.0), 554.0, lamp));
    world.add(AxisAlignedRect::xz((0.0, 555.0), (0.0, 555.0), 0.0, white.clone()));
    world.add(AxisAlignedRect::xz((0.0, 555.0), (0.0, 555.0), 555.0, white.clone()));
    world.add(AxisAlignedRect::xy((0.0, 555.0), (0.0, 555.0), 555.0, white));
    world.add(Sphere::new(Vec3::splat(50.0), 50.0, mirror));

    let camera = CameraConfig::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_aspect_ratio(1.0)
        .with_shutter(0.0, 5.0);

    Scene::new(world, camera, Color::ZERO).with_settings(SceneSettings {
        image_width: 600,
        samples_per_pixel: 200,
        max_depth: 50,
    })
}

/// Checkered ground, three large feature spheres and a seeded field of
/// small ones. Diffuse spheres bounce upward during the shutter interval.
pub fn spheres() -> Scene {
    let mut rng = StdRng::seed_from_u64(SPHERES_SEED);
    let mut world = HittableList::new();

    let checker = Arc::new(Texture::checker(
        Color::new(0.2, 0.3, 0.1),
        Color::splat(0.9),
    ));
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(checker).into()),
    ));

    let glass: Arc<Material> = Arc::new(Dielectric::new(1.5).into());

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(&mut rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(&mut rng),
                0.2,
                b as f32 + 0.9 * gen_f32(&mut rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_vec3(&mut rng, 0.0, 1.0) * random_vec3(&mut rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, gen_range_f32(&mut rng, 0.0, 0.5), 0.0);
                world.add(MovingSphere::new(
                    (center, center1),
                    (0.0, 1.0),
                    0.2,
                    lambertian(albedo),
                ));
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = random_vec3(&mut rng, 0.5, 1.0);
                let fuzz = gen_range_f32(&mut rng, 0.0, 0.5);
                world.add(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz).into())));
            } else {
                // Glass
                world.add(Sphere::new(center, 0.2, glass.clone()));
            }
        }
    }

    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));
    world.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    world.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0).into()),
    ));

    log::debug!("spheres preset: {} objects", world.len());

    let camera = CameraConfig::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect_ratio(16.0 / 9.0)
        .with_shutter(0.0, 1.0);

    Scene::new(world, camera, Color::new(0.5, 0.7, 1.0)).with_settings(SceneSettings {
        image_width: 400,
        samples_per_pixel: 100,
        max_depth: 50,
    })
}
