//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Material, Ray, Sphere};
use umbra_math::{Interval, Vec3};

/// Record of a ray-object intersection.
///
/// The material is borrowed from the surface that was hit, so a record can
/// never outlive the world it came from.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at the intersection. Points outward for ordinary
    /// spheres and inward for negative-radius shells; it is NOT flipped to
    /// face the ray.
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the nearest intersection with `t` strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// Every kind of surface the renderer knows about.
pub enum Surface {
    Sphere(Sphere),
}

impl Hittable for Surface {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Surface::Sphere(sphere) => sphere.hit(ray, ray_t),
        }
    }
}

impl From<Sphere> for Surface {
    fn from(sphere: Sphere) -> Self {
        Surface::Sphere(sphere)
    }
}

/// A list of surfaces, reporting whichever is hit first.
#[derive(Default)]
pub struct HittableList {
    objects: Vec<Surface>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: impl Into<Surface>) {
        self.objects.push(object.into());
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over the surfaces.
    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.objects.iter()
    }
}

impl<S: Into<Surface>> FromIterator<S> for HittableList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        // Each accepted hit shrinks the search so later objects must be closer
        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
