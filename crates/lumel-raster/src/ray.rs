use lumel_geom::{Aabb, Vec3};
use lumel_scene::{LightRecord, LightRecordKind, MeshRecord};

/// One world-space occluder triangle.
#[derive(Clone, Copy, Debug)]
pub struct RayTri {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

/// Flat world-space triangle soup for one gathered mesh, with an
/// enclosing box for cheap rejection. No acceleration structure beyond
/// the AABB; shadow tests are O(triangles) per ray.
#[derive(Clone, Debug)]
pub struct RayMesh {
    pub aabb: Aabb,
    pub tris: Vec<RayTri>,
}

/// Builds shadow-test geometry for every gathered mesh. Records with
/// fewer than 3 vertices or no valid triangles produce nothing.
pub fn build_ray_meshes(meshes: &[MeshRecord]) -> Vec<RayMesh> {
    let mut out = Vec::with_capacity(meshes.len());

    for m in meshes {
        let vcount = m.positions.len();
        if vcount < 3 {
            continue;
        }

        let mut tris = Vec::new();
        let mut aabb: Option<Aabb> = None;
        let mut push_tri = |i0: usize, i1: usize, i2: usize| {
            let a = m.transform.xform(m.positions[i0]);
            let b = m.transform.xform(m.positions[i1]);
            let c = m.transform.xform(m.positions[i2]);
            tris.push(RayTri { a, b, c });
            let bb = aabb.get_or_insert_with(|| Aabb::at_point(a));
            bb.expand_to(a);
            bb.expand_to(b);
            bb.expand_to(c);
        };

        if m.indices.is_empty() {
            for i in (0..vcount).step_by(3) {
                if i + 2 < vcount {
                    push_tri(i, i + 1, i + 2);
                }
            }
        } else {
            for tri in m.indices.chunks_exact(3) {
                let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
                if i0 < vcount && i1 < vcount && i2 < vcount {
                    push_tri(i0, i1, i2);
                }
            }
        }

        if let Some(aabb) = aabb {
            out.push(RayMesh { aabb, tris });
        }
    }
    out
}

/// Möller–Trumbore segment/triangle test. A hit requires
/// `eps < t < t_max`; near-parallel rays are rejected.
#[inline]
fn ray_intersects_tri(origin: Vec3, dir: Vec3, tri: &RayTri, t_max: f32) -> bool {
    const EPS: f32 = 1e-7;
    let e1 = tri.b - tri.a;
    let e2 = tri.c - tri.a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return false;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - tri.a;
    let u = tvec.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return false;
    }
    let q = tvec.cross(e1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return false;
    }
    let t = e2.dot(q) * inv_det;
    t > EPS && t < t_max
}

/// Boolean occlusion query: is the straight path from `point` toward
/// `light` blocked? The origin is pushed `bias` along the normal to avoid
/// self-intersection acne. Returns on the first hit found.
pub fn is_shadowed(
    occluders: &[RayMesh],
    point: Vec3,
    normal: Vec3,
    bias: f32,
    light: &LightRecord,
) -> bool {
    let origin = point + normal * bias;

    let (dir, max_dist) = match light.kind {
        LightRecordKind::Directional { direction } => ((direction * -1.0).normalized(), 1e20),
        LightRecordKind::Omni { position, .. } | LightRecordKind::Spot { position, .. } => {
            let to_light = position - origin;
            let dist = to_light.length();
            if dist <= 1e-4 {
                return false;
            }
            let max_dist = (dist - bias).max(0.0);
            if max_dist <= 1e-4 {
                return false;
            }
            (to_light / dist, max_dist)
        }
    };

    for rm in occluders {
        if !rm.aabb.intersects_ray(origin, dir, max_dist) {
            continue;
        }
        for tri in &rm.tris {
            if ray_intersects_tri(origin, dir, tri, max_dist) {
                return true;
            }
        }
    }
    false
}
