//! Umbra Renderer - CPU ray tracing
//!
//! A recursive Monte Carlo ray tracer over analytic spheres with diffuse,
//! metal and glass materials, a thin-lens camera, and a row-parallel image
//! driver built on rayon.
//!
//! Every random decision draws from an explicitly passed `RngCore`. The
//! image driver gives each pixel its own generator seeded from the pixel
//! coordinates, so renders are reproducible no matter how rows are
//! scheduled across threads.

mod camera;
mod error;
mod hittable;
mod material;
mod renderer;
mod sphere;
mod world;

pub use camera::Camera;
pub use error::{MaterialError, RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList, Surface};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, pixel_rng, ray_color, render, render_pixel, sky_gradient,
    CancelToken, ImageBuffer, HIT_EPSILON,
};
pub use sphere::Sphere;
pub use world::build_world;

/// Re-export Vec3 and common math types from umbra_math
pub use umbra_math::{Interval, Ray, Vec3};
/// Re-export the settings types the renderer consumes
pub use umbra_core::{CameraSettings, RenderSettings};

use rand::{Rng, RngCore};

/// Draw a uniform `f32` in `[0, 1)`.
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}
