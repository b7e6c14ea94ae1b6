use lumel_geom::Vec3;
use lumel_scene::{LightRecord, LightRecordKind};

use crate::ray::{RayMesh, is_shadowed};

/// Knobs that shape per-texel shading. A subset of the bake settings,
/// copied here so evaluation depends on nothing mutable.
#[derive(Clone, Copy, Debug)]
pub struct ShadeParams {
    /// Linear ambient floor added before any light.
    pub ambient_energy: f32,
    /// Overall multiplier applied to the final color.
    pub lightmap_energy_scale: f32,
    pub use_material_albedo: bool,
    /// Divide diffuse contributions by pi to match runtime BRDFs.
    pub use_lambert_normalization: bool,
    pub use_shadowing: bool,
    /// Shadow-ray origin offset along the surface normal.
    pub bias: f32,
}

impl Default for ShadeParams {
    fn default() -> Self {
        ShadeParams {
            ambient_energy: 0.0,
            lightmap_energy_scale: 1.0,
            use_material_albedo: true,
            use_lambert_normalization: true,
            use_shadowing: true,
            bias: 0.0005,
        }
    }
}

/// Everything shading reads: static lights, occluder geometry, and
/// parameters. Shared immutably across the per-mesh raster fan-out.
pub struct LightingEnv<'a> {
    pub lights: &'a [LightRecord],
    pub occluders: &'a [RayMesh],
    pub params: ShadeParams,
}

/// Pure direct-lighting evaluation at a world-space sample. Deterministic
/// for identical arguments and environment; mutates nothing.
pub fn evaluate_direct(env: &LightingEnv, world_pos: Vec3, world_normal: Vec3, albedo: Vec3) -> Vec3 {
    let p = &env.params;
    let n = world_normal.normalized();
    let mut accum = Vec3::splat(p.ambient_energy);

    for light in env.lights {
        let (l_dir, atten) = match light.kind {
            LightRecordKind::Directional { direction } => ((direction * -1.0).normalized(), 1.0),
            LightRecordKind::Omni {
                position,
                range,
                attenuation,
            } => match positional_attenuation(world_pos, position, range, attenuation) {
                Some(v) => v,
                None => continue,
            },
            LightRecordKind::Spot {
                position,
                direction,
                range,
                attenuation,
                cos_spot_angle,
                inv_spot_attenuation,
            } => {
                let (l_dir, base) =
                    match positional_attenuation(world_pos, position, range, attenuation) {
                        Some(v) => v,
                        None => continue,
                    };
                let spot_dot = l_dir.dot((direction * -1.0).normalized());
                let atten = if spot_dot < cos_spot_angle {
                    0.0
                } else {
                    let edge = (spot_dot - cos_spot_angle) / (1.0 - cos_spot_angle).max(1e-4);
                    base * edge.powf(inv_spot_attenuation.max(0.01))
                };
                (l_dir, atten)
            }
        };

        let ndotl = n.dot(l_dir).max(0.0);
        if ndotl <= 0.0 || atten <= 0.0 {
            continue;
        }
        if p.use_shadowing
            && light.cast_shadow
            && is_shadowed(env.occluders, world_pos, n, p.bias, light)
        {
            continue;
        }

        let mut scale = light.energy * ndotl * atten;
        if p.use_lambert_normalization {
            scale /= std::f32::consts::PI;
        }
        accum += light.color * scale;
    }

    if p.use_material_albedo {
        accum = Vec3::new(accum.x * albedo.x, accum.y * albedo.y, accum.z * albedo.z);
    }
    accum * p.lightmap_energy_scale
}

/// Distance falloff toward a positional light:
/// `pow(max(0, 1 - d/range), attenuation)`. `None` when the sample sits
/// on the light.
#[inline]
fn positional_attenuation(
    world_pos: Vec3,
    light_pos: Vec3,
    range: f32,
    attenuation: f32,
) -> Option<(Vec3, f32)> {
    let to_light = light_pos - world_pos;
    let dist = to_light.length();
    if dist <= 1e-4 {
        return None;
    }
    let l_dir = to_light / dist;
    let range = range.max(0.001);
    let x = (1.0 - dist / range).max(0.0);
    Some((l_dir, x.powf(attenuation.max(0.0001))))
}
