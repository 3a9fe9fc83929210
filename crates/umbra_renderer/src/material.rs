//! Materials describing how light scatters off a surface.

use crate::{gen_f32, hittable::HitRecord, MaterialError, Ray};
use rand::RngCore;
use umbra_math::{unit_vector, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of a scattering event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel factor applied to the light carried back along `scattered`
    pub attenuation: Color,
    /// The continuation ray
    pub scattered: Ray,
}

/// Every material the renderer supports.
///
/// Materials are immutable once built and are shared between surfaces via
/// `Arc<Material>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `Some` with the attenuation and continuation ray if the ray
    /// scatters, or `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Result<Self, MaterialError> {
        check_albedo(albedo)?;
        Ok(Self { albedo })
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Aim at a random point in the unit sphere sitting on the normal
        let target = rec.p + rec.normal + random_in_unit_sphere(rng);
        let mut scatter_direction = target - rec.p;

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough.
    ///   Finite values outside [0, 1] are clamped.
    pub fn new(albedo: Color, fuzz: f32) -> Result<Self, MaterialError> {
        check_albedo(albedo)?;
        if !fuzz.is_finite() {
            return Err(MaterialError::InvalidFuzz(fuzz));
        }
        if !(0.0..=1.0).contains(&fuzz) {
            log::warn!("Metal fuzz {} outside [0, 1], clamping", fuzz);
        }
        Ok(Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        })
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(unit_vector(ray_in.direction()), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz can push the reflection below the surface; absorb those
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Dielectric {
    /// Index of refraction
    refractive_index: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refractive_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond.
    ///   Must be finite and positive.
    pub fn new(refractive_index: f32) -> Result<Self, MaterialError> {
        if !(refractive_index.is_finite() && refractive_index > 0.0) {
            return Err(MaterialError::InvalidRefractiveIndex(refractive_index));
        }
        Ok(Self { refractive_index })
    }

    pub fn refractive_index(&self) -> f32 {
        self.refractive_index
    }

    /// Probability of reflecting rather than refracting.
    ///
    /// An index of exactly 1 matches the surrounding air, so there is no
    /// interface to reflect from.
    fn reflect_probability(&self, cosine: f32) -> f32 {
        if self.refractive_index == 1.0 {
            0.0
        } else {
            schlick(cosine, self.refractive_index)
        }
    }

    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let direction = ray_in.direction();
        let d_dot_n = direction.dot(rec.normal);

        // Leaving the medium when travelling along the normal
        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            (
                -rec.normal,
                self.refractive_index,
                self.refractive_index * d_dot_n / direction.length(),
            )
        } else {
            (
                rec.normal,
                1.0 / self.refractive_index,
                -d_dot_n / direction.length(),
            )
        };

        // Total internal reflection leaves reflection as the only option
        let scatter_direction = match refract(direction, outward_normal, ni_over_nt) {
            Some(refracted) if gen_f32(rng) >= self.reflect_probability(cosine) => refracted,
            _ => reflect(direction, rec.normal),
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

fn check_albedo(albedo: Color) -> Result<(), MaterialError> {
    if albedo.is_finite() {
        Ok(())
    } else {
        Err(MaterialError::NonFiniteAlbedo(albedo))
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with normal `n` (facing the incoming side).
///
/// Returns `None` on total internal reflection.
#[inline]
fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = unit_vector(v);
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
#[inline]
fn schlick(cosine: f32, refractive_index: f32) -> f32 {
    let r0 = ((1.0 - refractive_index) / (1.0 + refractive_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Random point strictly inside the unit sphere, by rejection from the
/// enclosing cube.
pub(crate) fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
