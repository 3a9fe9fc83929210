//! Core ray tracing integrator and image driver.
//!
//! Implements Monte Carlo ray tracing with:
//! - Iterative scattering with a configurable depth cap
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction and clamped 8-bit quantization
//! - Row-parallel rendering with per-pixel random streams

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crate::{gen_f32, Camera, Color, Hittable, RenderError, RenderResult};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::{SplitMix64, Xoshiro256PlusPlus};
use rayon::prelude::*;
use umbra_core::RenderSettings;
use umbra_math::{unit_vector, Interval, Ray};

/// Lower bound for hit tests, so a bounce never re-hits the surface it
/// just left because of floating-point error.
pub const HIT_EPSILON: f32 = 0.001;

/// Compute the color seen by a ray.
///
/// `depth` counts the bounces taken so far. Once it reaches `max_depth` any
/// further hit is treated as absorbed; a miss always returns the sky.
///
/// The path is followed in a loop carrying the product of the attenuations
/// seen so far, so the depth cap is not limited by the call stack.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut ray = *ray;
    let mut depth = depth;
    let mut attenuation = Color::ONE;

    loop {
        let Some(rec) = world.hit(&ray, Interval::new(HIT_EPSILON, f32::INFINITY)) else {
            return attenuation * sky_gradient(&ray);
        };

        if depth >= max_depth {
            return Color::ZERO;
        }

        match rec.material.scatter(&ray, &rec, rng) {
            Some(result) => {
                attenuation *= result.attenuation;
                ray = result.scattered;
                depth += 1;
            }
            None => return Color::ZERO,
        }
    }
}

/// Background: white looking down, sky blue looking up.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-correct a linear color and quantize it to 8 bits per channel.
///
/// Components are clamped to [0, 1] first so bright or invalid values
/// saturate instead of wrapping around.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.99 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Deterministic random stream for one pixel.
///
/// Depends only on the seed and the pixel coordinates, never on which
/// thread renders the pixel or in which order. SplitMix64 and xoshiro256++
/// are fixed algorithms, so a seed gives the same image on every platform
/// and toolchain.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> Xoshiro256PlusPlus {
    let scrambled_seed = SplitMix64::seed_from_u64(seed).next_u64();
    let coords = (u64::from(x) << 32) | u64::from(y);
    Xoshiro256PlusPlus::seed_from_u64(scrambled_seed ^ coords)
}

/// Render a single pixel with multi-sampling.
///
/// `y` counts from the bottom of the image. Returns the linear (not yet
/// gamma-corrected) average of all samples.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..settings.samples_per_pixel {
        let (du, dv) = if settings.jitter {
            (gen_f32(rng), gen_f32(rng))
        } else {
            (0.5, 0.5)
        };
        let s = (x as f32 + du) / settings.width as f32;
        let t = (y as f32 + dv) / settings.height as f32;

        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, 0, settings.max_depth, rng);
    }

    // Average the samples
    pixel_color / settings.samples_per_pixel as f32
}

/// Cooperative cancellation flag shared between a render and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the render to stop. Rows already started still finish.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Rendered image: linear colors, row-major, top row first.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Set the pixel at column `x` of `row` (row 0 is the top).
    pub fn set(&mut self, x: u32, row: u32, color: Color) {
        self.pixels[(row * self.width + x) as usize] = color;
    }

    /// Gamma-corrected 8-bit triples in emission order.
    pub fn to_rgb8(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|c| color_to_rgb8(*c)).collect()
    }
}

/// Render the whole image, one rayon task per row.
///
/// The cancel token is checked before each row starts; once it is set the
/// render returns `RenderError::Cancelled`.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
    cancel: &CancelToken,
) -> RenderResult<ImageBuffer> {
    settings.validate()?;

    let (width, height) = (settings.width, settings.height);
    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        width,
        height,
        settings.samples_per_pixel,
        settings.max_depth
    );

    let rows_done = AtomicU32::new(0);
    let report_every = (height / 10).max(1);

    let rows: Vec<Vec<Color>> = (0..height)
        .into_par_iter()
        .map(|row| {
            if cancel.is_cancelled() {
                return Err(RenderError::Cancelled);
            }

            // Row 0 is the top of the image, i.e. the highest y
            let y = height - 1 - row;
            let pixels = (0..width)
                .map(|x| {
                    let mut rng = pixel_rng(settings.seed, x, y);
                    render_pixel(camera, world, x, y, settings, &mut rng)
                })
                .collect();

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % report_every == 0 || done == height {
                log::debug!("Rendered {}/{} rows", done, height);
            }

            Ok(pixels)
        })
        .collect::<RenderResult<_>>()?;

    let mut image = ImageBuffer::new(width, height);
    for (row, pixels) in (0u32..).zip(rows) {
        for (x, color) in (0u32..).zip(pixels) {
            image.set(x, row, color);
        }
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dielectric, HittableList, Lambertian, Material, Metal, Sphere, Vec3};
    use rand::rngs::StdRng;
    use umbra_core::CameraSettings;

    fn red_sphere_world() -> HittableList {
        let albedo = Color::new(0.8, 0.3, 0.3);
        let red = Arc::new(Material::from(Lambertian::new(albedo).unwrap()));
        let mut world = HittableList::new();
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, red));
        world
    }

    /// Background value after gamma and quantization, computed by hand.
    fn expected_background(direction: Vec3) -> [u8; 3] {
        let unit_y = direction.y / direction.length();
        let t = 0.5 * (unit_y + 1.0);
        let channel = |sky: f32| {
            let linear = (1.0 - t) + t * sky;
            (255.99 * linear.sqrt()).floor() as u8
        };
        [channel(0.5), channel(0.7), channel(1.0)]
    }

    fn assert_within_one(actual: [u8; 3], expected: [u8; 3]) {
        for c in 0..3 {
            assert!(
                (actual[c] as i32 - expected[c] as i32).abs() <= 1,
                "{:?} vs {:?}",
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);

        let down = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        assert!((down - Color::ONE).length() < 1e-6);

        let level = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)));
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_empty_world_returns_background() {
        let world = HittableList::new();
        let mut rng = StdRng::seed_from_u64(0);

        for direction in [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.3, 0.8, -0.2),
            Vec3::new(-1.0, -2.0, 0.5),
        ] {
            let ray = Ray::new(Vec3::ZERO, direction);
            assert_eq!(ray_color(&ray, &world, 0, 50, &mut rng), sky_gradient(&ray));
        }
    }

    #[test]
    fn test_depth_cap_absorbs() {
        let world = red_sphere_world();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(ray_color(&ray, &world, 5, 5, &mut rng), Color::ZERO);
        assert_eq!(ray_color(&ray, &world, 0, 0, &mut rng), Color::ZERO);
        // A miss is still background even at the cap
        let miss = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&miss, &world, 5, 5, &mut rng), sky_gradient(&miss));
    }

    #[test]
    fn test_single_bounce_attenuates_sky() {
        let world = red_sphere_world();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let color = ray_color(&ray, &world, 0, 1, &mut rng);
            // albedo * sky, where sky is between blue and white
            assert!(color.x >= 0.8 * 0.5 - 1e-5 && color.x <= 0.8 + 1e-5);
            assert!(color.y >= 0.3 * 0.7 - 1e-5 && color.y <= 0.3 + 1e-5);
            assert!((color.z - 0.3).abs() < 1e-5);
        }
    }

    #[test]
    fn test_large_depth_cap_inside_closed_sphere() {
        // Inward normals trap every path, so each sample bounces up to the cap
        let grey = Arc::new(Material::from(Lambertian::new(Color::splat(0.5)).unwrap()));
        let mut world = HittableList::new();
        world.add(Sphere::new(Vec3::ZERO, -10.0, grey));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.2, 0.1, -1.0));
        let mut rng = StdRng::seed_from_u64(13);
        assert_eq!(ray_color(&ray, &world, 0, 100_000, &mut rng), Color::ZERO);

        let settings = RenderSettings::default()
            .with_resolution(1, 1)
            .with_quality(1, 50_000);
        let camera_settings = CameraSettings::default()
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        let camera = Camera::new(&camera_settings, settings.aspect_ratio()).unwrap();

        let image = render(&camera, &world, &settings, &CancelToken::new()).unwrap();
        assert_eq!(image.to_rgb8(), vec![[0, 0, 0]]);
    }

    #[test]
    fn test_fuzzy_metal_can_absorb() {
        // A mirror ball seen almost edge-on with full fuzz loses some samples
        let metal = Arc::new(Material::from(Metal::new(Color::ONE, 1.0).unwrap()));
        let mut world = HittableList::new();
        world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, metal));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.57, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(12);

        let black = (0..200)
            .filter(|_| ray_color(&ray, &world, 0, 50, &mut rng) == Color::ZERO)
            .count();
        assert!(black > 0);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-0.5), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb8_clamps() {
        assert_eq!(color_to_rgb8(Color::new(0.0, 1.0, 0.25)), [0, 255, 127]);
        // Over-bright and negative components saturate rather than wrap
        assert_eq!(color_to_rgb8(Color::new(4.0, -1.0, 1.0001)), [255, 0, 255]);
        assert_eq!(color_to_rgb8(Color::new(f32::INFINITY, f32::NAN, 0.0)), [255, 0, 0]);
    }

    #[test]
    fn test_pixel_rng_is_per_pixel() {
        let a = pixel_rng(1, 3, 4).next_u64();
        let b = pixel_rng(1, 3, 4).next_u64();
        let c = pixel_rng(1, 4, 3).next_u64();
        let d = pixel_rng(2, 3, 4).next_u64();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    /// One diffuse sphere seen through a 4x2 pinhole camera with pixel-center
    /// sampling: the middle columns see the sphere, the corners see sky.
    #[test]
    fn test_render_small_scene() {
        let world = red_sphere_world();
        let settings = RenderSettings::default()
            .with_resolution(4, 2)
            .with_quality(1, 1)
            .with_jitter(false);

        // Half-height of the image plane at distance 1 is 0.5
        let vfov = 2.0 * 0.5f32.atan().to_degrees();
        let camera_settings = CameraSettings::default()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(vfov, 0.0, 1.0);
        let camera = Camera::new(&camera_settings, settings.aspect_ratio()).unwrap();

        let image = render(&camera, &world, &settings, &CancelToken::new()).unwrap();
        assert_eq!(image.pixels.len(), 8);
        let rgb = image.to_rgb8();

        // Pixel centers land on x in {-0.75, -0.25, 0.25, 0.75}, y in {0.25, -0.25}
        for (row, y) in [(0usize, 0.25f32), (1, -0.25)] {
            for (col, x) in [(0usize, -0.75f32), (3, 0.75)] {
                let pixel = rgb[row * 4 + col];
                assert_within_one(pixel, expected_background(Vec3::new(x, y, -1.0)));
            }
            for col in [1usize, 2] {
                let [r, g, b] = rgb[row * 4 + col];
                // Reddish: albedo (0.8, 0.3, 0.3) times sky, far from any sky value
                assert!(g < 150, "pixel ({}, {}) = {:?}", col, row, rgb[row * 4 + col]);
                assert!(r > g && r > b);
            }
        }

        // Top corner looks slightly upwards, so it is bluer than the bottom one
        assert!(rgb[0][0] < rgb[4][0]);
    }

    #[test]
    fn test_render_is_reproducible() {
        let glass = Arc::new(Material::from(Dielectric::new(1.5).unwrap()));
        let mut world = red_sphere_world();
        world.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass.clone()));
        world.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass));

        let settings = RenderSettings::default()
            .with_resolution(16, 8)
            .with_quality(4, 10)
            .with_seed(99);
        let camera_settings = CameraSettings::default()
            .with_position(Vec3::new(0.0, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(60.0, 0.2, 2.0);
        let camera = Camera::new(&camera_settings, settings.aspect_ratio()).unwrap();

        let first = render(&camera, &world, &settings, &CancelToken::new()).unwrap();
        let second = render(&camera, &world, &settings, &CancelToken::new()).unwrap();
        assert_eq!(first.to_rgb8(), second.to_rgb8());

        let reseeded = settings.clone().with_seed(100);
        let reseeded = render(&camera, &world, &reseeded, &CancelToken::new()).unwrap();
        assert_ne!(first.to_rgb8(), reseeded.to_rgb8());
    }

    #[test]
    fn test_render_cancelled() {
        let world = red_sphere_world();
        let settings = RenderSettings::default().with_resolution(8, 8).with_quality(1, 5);
        let camera = Camera::new(&CameraSettings::default(), 1.0).unwrap();

        let cancel = CancelToken::new();
        let handle = cancel.clone();
        handle.cancel();
        assert!(cancel.is_cancelled());

        assert!(matches!(
            render(&camera, &world, &settings, &cancel),
            Err(RenderError::Cancelled)
        ));
    }

    #[test]
    fn test_render_rejects_invalid_settings() {
        let world = HittableList::new();
        let settings = RenderSettings::default().with_quality(0, 5);
        let camera = Camera::new(&CameraSettings::default(), 1.0).unwrap();

        assert!(matches!(
            render(&camera, &world, &settings, &CancelToken::new()),
            Err(RenderError::Settings(_))
        ));
    }

    #[test]
    fn test_image_buffer_indexing() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        assert_eq!(image.pixels[5], Color::ONE);
        assert_eq!(image.to_rgb8()[5], [255, 255, 255]);
        assert_eq!(image.to_rgb8()[0], [0, 0, 0]);
    }
}
