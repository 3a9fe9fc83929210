//! Renderer-agnostic scene description.
//!
//! A scene is a flat list of spheres, each naming one of the scene's
//! materials. Many spheres may name the same material; the renderer builds
//! each material once and shares it between them.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use umbra_math::Vec3;

/// The optical behavior of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialKind {
    /// Diffuse surface scattering around the normal
    Lambertian { albedo: Vec3 },
    /// Reflective surface; `fuzz` roughens the reflection (0 = mirror)
    Metal { albedo: Vec3, fuzz: f32 },
    /// Clear refractive medium such as glass (1.5) or diamond (2.4)
    Dielectric { refractive_index: f32 },
}

/// A named material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    pub name: String,
    #[serde(flatten)]
    pub kind: MaterialKind,
}

impl MaterialDesc {
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn lambertian(name: impl Into<String>, albedo: Vec3) -> Self {
        Self::new(name, MaterialKind::Lambertian { albedo })
    }

    pub fn metal(name: impl Into<String>, albedo: Vec3, fuzz: f32) -> Self {
        Self::new(name, MaterialKind::Metal { albedo, fuzz })
    }

    pub fn dielectric(name: impl Into<String>, refractive_index: f32) -> Self {
        Self::new(name, MaterialKind::Dielectric { refractive_index })
    }
}

/// A sphere referencing a material by name.
///
/// A negative radius is allowed: it flips the surface normals inward, which
/// is how a hollow glass shell is built (an outer sphere plus a slightly
/// smaller inner sphere with negative radius).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f32,
    pub material: String,
}

impl SphereDesc {
    pub fn new(center: Vec3, radius: f32, material: impl Into<String>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
        }
    }
}

/// All materials and spheres of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub materials: Vec<MaterialDesc>,
    pub spheres: Vec<SphereDesc>,
}

impl SceneDescription {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material definition.
    pub fn add_material(&mut self, material: MaterialDesc) {
        self.materials.push(material);
    }

    /// Add a sphere.
    pub fn add_sphere(&mut self, sphere: SphereDesc) {
        self.spheres.push(sphere);
    }

    /// Find a material definition by name.
    pub fn material(&self, name: &str) -> Option<&MaterialDesc> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Small test scene: a diffuse sphere on a large ground sphere, flanked
    /// by a fuzzy metal sphere and a hollow glass sphere.
    ///
    /// Looks best from the origin towards -Z with a 90 degree field of view.
    pub fn three_spheres() -> Self {
        let mut scene = Self::new();

        scene.add_material(MaterialDesc::lambertian("center", Vec3::new(0.1, 0.2, 0.5)));
        scene.add_material(MaterialDesc::lambertian("ground", Vec3::new(0.8, 0.8, 0.0)));
        scene.add_material(MaterialDesc::metal("gold", Vec3::new(0.8, 0.6, 0.2), 0.2));
        scene.add_material(MaterialDesc::dielectric("glass", 1.5));

        scene.add_sphere(SphereDesc::new(Vec3::new(0.0, 0.0, -1.0), 0.5, "center"));
        scene.add_sphere(SphereDesc::new(Vec3::new(0.0, -100.5, -1.0), 100.0, "ground"));
        scene.add_sphere(SphereDesc::new(Vec3::new(1.0, 0.0, -1.0), 0.5, "gold"));
        scene.add_sphere(SphereDesc::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, "glass"));
        scene.add_sphere(SphereDesc::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, "glass"));

        scene
    }

    /// The "final scene": a large ground sphere, a 22x22 grid of small
    /// randomly placed spheres, and three large feature spheres.
    ///
    /// Small spheres are 80% diffuse, 15% metal and 5% glass. Spheres that
    /// would overlap the large metal sphere's spot are skipped. All glass
    /// spheres share a single material. A seed always produces the same
    /// layout, on every platform.
    pub fn random(seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut scene = Self::new();

        scene.add_material(MaterialDesc::lambertian("ground", Vec3::splat(0.5)));
        scene.add_material(MaterialDesc::dielectric("glass", 1.5));
        scene.add_sphere(SphereDesc::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, "ground"));

        let clearing = Vec3::new(4.0, 0.2, 0.0);

        for a in -11..11 {
            for b in -11..11 {
                let choose_mat: f32 = rng.gen();
                let center = Vec3::new(
                    a as f32 + 0.9 * rng.gen::<f32>(),
                    0.2,
                    b as f32 + 0.9 * rng.gen::<f32>(),
                );

                if (center - clearing).length() <= 0.9 {
                    continue;
                }

                if choose_mat < 0.8 {
                    // Diffuse
                    let name = format!("diffuse_{}_{}", a, b);
                    let albedo = Vec3::new(
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                    );
                    scene.add_material(MaterialDesc::lambertian(name.clone(), albedo));
                    scene.add_sphere(SphereDesc::new(center, 0.2, name));
                } else if choose_mat < 0.95 {
                    // Metal
                    let name = format!("metal_{}_{}", a, b);
                    let albedo = Vec3::new(
                        0.5 * (1.0 + rng.gen::<f32>()),
                        0.5 * (1.0 + rng.gen::<f32>()),
                        0.5 * (1.0 + rng.gen::<f32>()),
                    );
                    let fuzz = 0.5 * rng.gen::<f32>();
                    scene.add_material(MaterialDesc::metal(name.clone(), albedo, fuzz));
                    scene.add_sphere(SphereDesc::new(center, 0.2, name));
                } else {
                    // Glass
                    scene.add_sphere(SphereDesc::new(center, 0.2, "glass"));
                }
            }
        }

        scene.add_material(MaterialDesc::lambertian("brown", Vec3::new(0.4, 0.2, 0.1)));
        scene.add_material(MaterialDesc::metal("bronze", Vec3::new(0.7, 0.6, 0.5), 0.0));

        scene.add_sphere(SphereDesc::new(Vec3::new(0.0, 1.0, 0.0), 1.0, "glass"));
        scene.add_sphere(SphereDesc::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, "brown"));
        scene.add_sphere(SphereDesc::new(Vec3::new(4.0, 1.0, 0.0), 1.0, "bronze"));

        log::debug!(
            "Generated random scene: {} spheres, {} materials",
            scene.spheres.len(),
            scene.materials.len()
        );

        scene
    }
}
