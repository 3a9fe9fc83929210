//! Thin-lens camera for ray generation.

use crate::{gen_f32, Ray, RenderError, RenderResult};
use rand::RngCore;
use umbra_core::CameraSettings;
use umbra_math::{try_unit_vector, Vec3};

/// Camera for generating rays into the scene.
///
/// Built once from `CameraSettings` and the image aspect ratio, then only
/// read. The image plane sits at the focus distance, so every ray through a
/// given image point meets the same focal point whatever lens sample it
/// starts from.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Build a camera for an image with the given width/height ratio.
    pub fn new(settings: &CameraSettings, aspect_ratio: f32) -> RenderResult<Self> {
        if !(settings.vfov > 0.0 && settings.vfov < 180.0) {
            return Err(RenderError::InvalidGeometry(format!(
                "vertical field of view must be in (0, 180) degrees, got {}",
                settings.vfov
            )));
        }
        if !(aspect_ratio > 0.0 && aspect_ratio.is_finite()) {
            return Err(RenderError::InvalidGeometry(format!(
                "aspect ratio must be positive, got {}",
                aspect_ratio
            )));
        }
        if !(settings.focus_dist > 0.0 && settings.focus_dist.is_finite()) {
            return Err(RenderError::InvalidGeometry(format!(
                "focus distance must be positive, got {}",
                settings.focus_dist
            )));
        }
        if !(settings.aperture >= 0.0 && settings.aperture.is_finite()) {
            return Err(RenderError::InvalidGeometry(format!(
                "aperture must be non-negative, got {}",
                settings.aperture
            )));
        }

        // Calculate camera basis vectors
        let w = try_unit_vector(settings.look_from - settings.look_at).ok_or_else(|| {
            RenderError::InvalidGeometry("look_from and look_at coincide".into())
        })?;
        let u = try_unit_vector(settings.up.cross(w)).ok_or_else(|| {
            RenderError::InvalidGeometry("up vector is parallel to the view direction".into())
        })?;
        let v = w.cross(u);

        // Calculate viewport dimensions
        let half_height = (settings.vfov.to_radians() / 2.0).tan();
        let half_width = aspect_ratio * half_height;
        let focus = settings.focus_dist;

        let origin = settings.look_from;
        let lower_left_corner =
            origin - half_width * focus * u - half_height * focus * v - focus * w;

        Ok(Self {
            origin,
            lower_left_corner,
            horizontal: 2.0 * half_width * focus * u,
            vertical: 2.0 * half_height * focus * v,
            u,
            v,
            w,
            lens_radius: settings.aperture / 2.0,
        })
    }

    /// Generate a ray through normalized image coordinates `(s, t)`, where
    /// `(0, 0)` is the bottom-left corner and `(1, 1)` the top-right.
    ///
    /// With a zero aperture no random numbers are drawn.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Orthonormal camera basis: `u` right, `v` up, `w` backwards.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}

/// Sample a random point in the unit disk.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
