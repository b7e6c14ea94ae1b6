use lumel_geom::{Rect2, Transform};

use crate::types::{
    LightBakeMode, LightKind, LightRecord, LightRecordKind, MeshInstance, MeshRecord, MeshSurface,
    NodeKind, SceneNode,
};

/// A surface rewritten by the unwrap hook, together with the chart
/// generator's suggested lightmap resolution in texels.
#[derive(Clone, Debug)]
pub struct UnwrappedSurface {
    pub surface: MeshSurface,
    pub size_hint: (u32, u32),
}

/// Hook the orchestrator uses to unwrap surfaces that lack a UV2 channel.
/// Returns a rewritten private copy of the surface; the source scene is
/// never mutated during gathering.
pub trait SurfaceUnwrap {
    fn unwrap_surface(&self, surface: &MeshSurface) -> Option<UnwrappedSurface>;
}

pub struct GatherOptions<'a> {
    /// Mesh instances must share at least one bit with this mask.
    pub layer_mask: u32,
    /// When set, surfaces without UV2 are routed through it instead of
    /// being skipped.
    pub unwrapper: Option<&'a dyn SurfaceUnwrap>,
}

impl Default for GatherOptions<'_> {
    fn default() -> Self {
        GatherOptions {
            layer_mask: u32::MAX,
            unwrapper: None,
        }
    }
}

/// Walks the subtree under `root`, extracting static geometry and lights.
/// Hidden nodes hide their whole subtree.
pub fn gather_scene(
    root: &SceneNode,
    opts: &GatherOptions,
) -> (Vec<MeshRecord>, Vec<LightRecord>) {
    let mut meshes = Vec::new();
    let mut lights = Vec::new();
    walk(root, &Transform::IDENTITY, "", opts, &mut meshes, &mut lights);
    (meshes, lights)
}

fn walk(
    node: &SceneNode,
    parent_xform: &Transform,
    parent_path: &str,
    opts: &GatherOptions,
    meshes: &mut Vec<MeshRecord>,
    lights: &mut Vec<LightRecord>,
) {
    if !node.visible {
        return;
    }
    let xform = parent_xform.mul(&node.transform);
    let path = if parent_path.is_empty() {
        node.name.clone()
    } else {
        format!("{parent_path}/{}", node.name)
    };

    match &node.kind {
        NodeKind::Mesh(instance) => {
            if instance.layers & opts.layer_mask != 0 {
                process_mesh_instance(instance, &xform, &path, opts, meshes);
            }
        }
        NodeKind::Light(light) => {
            if light.bake_mode == LightBakeMode::Static {
                process_light(light, &xform, &node.name, lights);
            }
        }
        NodeKind::Group => {}
    }

    for child in &node.children {
        walk(child, &xform, &path, opts, meshes, lights);
    }
}

fn process_mesh_instance(
    instance: &MeshInstance,
    xform: &Transform,
    path: &str,
    opts: &GatherOptions,
    meshes: &mut Vec<MeshRecord>,
) {
    for (surface_idx, surface) in instance.mesh.surfaces.iter().enumerate() {
        let unwrapped;
        let mut unwrap_hint = None;
        let surface = if surface.has_uv2() {
            surface
        } else if let Some(u) = opts.unwrapper {
            match u.unwrap_surface(surface) {
                Some(r) if r.surface.has_uv2() => {
                    unwrap_hint = Some(r.size_hint);
                    unwrapped = r.surface;
                    &unwrapped
                }
                _ => {
                    log::warn!("surface {surface_idx} of '{path}' could not be unwrapped, skipping");
                    continue;
                }
            }
        } else {
            log::warn!("surface {surface_idx} of '{path}' has no UV2 channel, skipping");
            continue;
        };

        let albedo = instance
            .material_override
            .or(surface.material)
            .unwrap_or_default()
            .albedo;

        meshes.push(MeshRecord {
            positions: surface.positions.clone(),
            normals: surface.normals.clone(),
            uv2s: surface.uv2s.clone(),
            indices: surface.indices.clone(),
            transform: *xform,
            albedo,
            node_path: path.to_string(),
            sub_instance: surface_idx,
            // A freshly generated chart knows its own resolution; the
            // importer's hint applies to surfaces that arrived unwrapped.
            size_hint: unwrap_hint.or(instance.mesh.lightmap_size_hint),
            atlas_layer: 0,
            uv_rect: Rect2::UNIT,
        });
    }
}

fn process_light(
    light: &crate::types::Light,
    xform: &Transform,
    name: &str,
    lights: &mut Vec<LightRecord>,
) {
    // Lights shine along their node's -Z axis.
    let direction = (xform.basis_column(2) * -1.0).normalized();
    let position = xform.origin;

    let kind = match light.kind {
        LightKind::Directional => LightRecordKind::Directional { direction },
        LightKind::Omni { range, attenuation } => LightRecordKind::Omni {
            position,
            range,
            attenuation,
        },
        LightKind::Spot {
            range,
            attenuation,
            angle_deg,
            spot_attenuation,
        } => LightRecordKind::Spot {
            position,
            direction,
            range,
            attenuation,
            cos_spot_angle: angle_deg.to_radians().cos(),
            inv_spot_attenuation: 1.0 / spot_attenuation,
        },
    };

    lights.push(LightRecord {
        kind,
        color: light.color,
        energy: light.energy,
        cast_shadow: light.cast_shadow,
        name: name.to_string(),
    });
}

/// Structural validation of gathered meshes. Failures are logged and the
/// whole batch is rejected; the bake maps a `false` to `MeshesInvalid`.
pub fn validate_meshes(meshes: &[MeshRecord]) -> bool {
    for m in meshes {
        if m.positions.is_empty() {
            log::error!("mesh '{}' surface {} has no vertices", m.node_path, m.sub_instance);
            return false;
        }
        if m.uv2s.is_empty() {
            log::error!(
                "mesh '{}' surface {} has no UV2 coordinates",
                m.node_path,
                m.sub_instance
            );
            return false;
        }
        if m.uv2s.len() != m.positions.len() {
            log::error!(
                "mesh '{}' surface {}: vertex count {} does not match UV2 count {}",
                m.node_path,
                m.sub_instance,
                m.positions.len(),
                m.uv2s.len()
            );
            return false;
        }
    }
    true
}
