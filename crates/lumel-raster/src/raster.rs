use lumel_geom::{Vec2, Vec3};
use lumel_scene::MeshRecord;

use crate::image::LightmapImage;
use crate::shade::{LightingEnv, evaluate_direct};

/// Signed parallelogram area of `(b - a) x (c - a)` in UV-texel space.
#[inline]
fn edge_function(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Rasterizes one mesh's UV2 triangles into `target`, shading each covered
/// texel at its interpolated world position/normal. Written texels carry
/// coverage alpha 1. Assumes non-overlapping UV islands; overlaps are
/// last-write-wins.
pub fn rasterize_direct(mesh: &MeshRecord, env: &LightingEnv, target: &mut LightmapImage) {
    let w = target.width();
    let h = target.height();
    let vertex_count = mesh.positions.len();
    if vertex_count < 3 || mesh.uv2s.len() != vertex_count {
        return;
    }

    let mut sample_triangle = |i0: usize, i1: usize, i2: usize| {
        let scale = Vec2::new(w as f32, h as f32);
        let p0 = Vec2::new(mesh.uv2s[i0].x * scale.x, mesh.uv2s[i0].y * scale.y);
        let p1 = Vec2::new(mesh.uv2s[i1].x * scale.x, mesh.uv2s[i1].y * scale.y);
        let p2 = Vec2::new(mesh.uv2s[i2].x * scale.x, mesh.uv2s[i2].y * scale.y);

        let area = edge_function(p0, p1, p2);
        if area.abs() < 1e-8 {
            // Degenerate in UV space; contributes no texels.
            return;
        }
        let inv_area = 1.0 / area;

        let min_x = (p0.x.min(p1.x).min(p2.x).floor() as i64).clamp(0, w as i64 - 1) as usize;
        let max_x = (p0.x.max(p1.x).max(p2.x).ceil() as i64).clamp(0, w as i64 - 1) as usize;
        let min_y = (p0.y.min(p1.y).min(p2.y).floor() as i64).clamp(0, h as i64 - 1) as usize;
        let max_y = (p0.y.max(p1.y).max(p2.y).ceil() as i64).clamp(0, h as i64 - 1) as usize;

        let v0 = mesh.transform.xform(mesh.positions[i0]);
        let v1 = mesh.transform.xform(mesh.positions[i1]);
        let v2 = mesh.transform.xform(mesh.positions[i2]);

        let local_normal = |i: usize| {
            if mesh.normals.is_empty() {
                Vec3::UP
            } else {
                mesh.normals[i]
            }
        };
        let n0 = mesh.transform.xform_basis(local_normal(i0)).normalized();
        let n1 = mesh.transform.xform_basis(local_normal(i1)).normalized();
        let n2 = mesh.transform.xform_basis(local_normal(i2)).normalized();

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge_function(p1, p2, p) * inv_area;
                let w1 = edge_function(p2, p0, p) * inv_area;
                let w2 = edge_function(p0, p1, p) * inv_area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let world_pos = v0 * w0 + v1 * w1 + v2 * w2;
                let world_nrm = (n0 * w0 + n1 * w1 + n2 * w2).normalized();
                let lit = evaluate_direct(env, world_pos, world_nrm, mesh.albedo);
                target.set(x, y, [lit.x, lit.y, lit.z, 1.0]);
            }
        }
    };

    if mesh.indices.is_empty() {
        for i in (0..vertex_count).step_by(3) {
            if i + 2 < vertex_count {
                sample_triangle(i, i + 1, i + 2);
            }
        }
    } else {
        for tri in mesh.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }
            sample_triangle(i0, i1, i2);
        }
    }
}
