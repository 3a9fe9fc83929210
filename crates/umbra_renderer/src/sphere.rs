//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use umbra_math::{Interval, Vec3};

/// A sphere primitive.
///
/// The radius may be negative. The intersection math only sees `radius²`,
/// but the normal is divided by the signed radius, so a negative sphere has
/// inward-facing normals. Nesting one inside a glass sphere makes a hollow
/// shell.
#[derive(Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere sharing `material` with any other surface that
    /// holds the same `Arc`.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// A zero radius has no surface and no defined normal; it is never hit.
    pub fn is_degenerate(&self) -> bool {
        self.radius == 0.0 || !self.radius.is_finite()
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if self.is_degenerate() {
            return None;
        }

        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        // Zero-length direction: nothing to solve for
        if a == 0.0 {
            return None;
        }
        let half_b = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        Some(HitRecord {
            t: root,
            p,
            normal: (p - self.center) / self.radius,
            material: self.material.as_ref(),
        })
    }
}
