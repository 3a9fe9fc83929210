//! Turn a scene description into a renderable world.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    Dielectric, HittableList, Lambertian, Material, Metal, RenderError, RenderResult, Sphere,
};
use umbra_core::{MaterialDesc, MaterialKind, SceneDescription};

fn build_material(desc: &MaterialDesc) -> RenderResult<Material> {
    let material = match desc.kind {
        MaterialKind::Lambertian { albedo } => Lambertian::new(albedo).map(Material::from),
        MaterialKind::Metal { albedo, fuzz } => Metal::new(albedo, fuzz).map(Material::from),
        MaterialKind::Dielectric { refractive_index } => {
            Dielectric::new(refractive_index).map(Material::from)
        }
    };

    material.map_err(|reason| RenderError::InvalidMaterial {
        name: desc.name.clone(),
        reason,
    })
}

/// Build the world for a scene.
///
/// Each named material is built once and shared by every sphere that uses
/// it. A later definition with the same name replaces an earlier one.
pub fn build_world(scene: &SceneDescription) -> RenderResult<HittableList> {
    let mut materials: HashMap<&str, Arc<Material>> =
        HashMap::with_capacity(scene.materials.len());
    for desc in &scene.materials {
        let material = Arc::new(build_material(desc)?);
        if materials.insert(desc.name.as_str(), material).is_some() {
            log::warn!("Material '{}' defined more than once, using the last one", desc.name);
        }
    }

    let world = scene
        .spheres
        .iter()
        .map(|desc| {
            let material = materials
                .get(desc.material.as_str())
                .ok_or_else(|| RenderError::UnknownMaterial(desc.material.clone()))?;

            let sphere = Sphere::new(desc.center, desc.radius, Arc::clone(material));
            if sphere.is_degenerate() {
                log::warn!(
                    "Sphere at {} has radius {} and will never be hit",
                    desc.center,
                    desc.radius
                );
            }
            Ok(sphere)
        })
        .collect::<RenderResult<HittableList>>()?;

    log::info!(
        "Built world: {} spheres sharing {} materials",
        world.len(),
        materials.len()
    );

    Ok(world)
}
