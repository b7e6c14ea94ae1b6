use lumel_geom::Transform;
use lumel_scene::MeshSurface;

use crate::DEFAULT_TEXEL_SIZE;
use crate::cache::UnwrapCache;
use crate::contract::{UnwrapError, UnwrapInput, UnwrapOutput, Unwrapper};

/// Rebuilds a surface from an unwrap result: new vertex `i` inherits old
/// vertex `cross_refs[i]`'s attributes, UV2 and indices come from the
/// unwrap. Out-of-range cross references fall back to vertex 0.
pub fn apply_unwrap(surface: &MeshSurface, out: &UnwrapOutput) -> MeshSurface {
    let pick = |i: u32| -> usize {
        let i = i as usize;
        if i < surface.positions.len() { i } else { 0 }
    };

    let mut rebuilt = MeshSurface {
        positions: Vec::with_capacity(out.cross_refs.len()),
        normals: Vec::new(),
        uvs: Vec::new(),
        uv2s: out.uv2s.clone(),
        colors: Vec::new(),
        tangents: Vec::new(),
        indices: out.indices.clone(),
        material: surface.material,
    };

    for &xref in &out.cross_refs {
        let src = pick(xref);
        rebuilt.positions.push(surface.positions[src]);
        if !surface.normals.is_empty() {
            rebuilt.normals.push(surface.normals[src]);
        }
        if !surface.uvs.is_empty() {
            rebuilt.uvs.push(surface.uvs[src]);
        }
        if !surface.colors.is_empty() {
            rebuilt.colors.push(surface.colors[src]);
        }
        if !surface.tangents.is_empty() {
            rebuilt.tangents.push(surface.tangents[src]);
        }
    }
    rebuilt
}

/// Standalone unwrap-only entry point: generates UV2 for a caller-owned
/// surface and rewrites it in place. `transform` carries world scale into
/// the chart generator so texel density matches the placed mesh. A
/// non-positive `texel_size` selects [`DEFAULT_TEXEL_SIZE`].
pub fn unwrap_mesh(
    surface: &mut MeshSurface,
    transform: &Transform,
    texel_size: f32,
    unwrapper: &dyn Unwrapper,
    cache: &UnwrapCache,
) -> Result<(), UnwrapError> {
    let texel_size = if texel_size > 0.0 {
        texel_size
    } else {
        DEFAULT_TEXEL_SIZE
    };

    let world_positions: Vec<_> = surface.positions.iter().map(|&p| transform.xform(p)).collect();
    let world_normals: Vec<_> = surface
        .normals
        .iter()
        .map(|&n| transform.xform_basis(n).normalized())
        .collect();
    let indices: Vec<u32> = if surface.indices.is_empty() {
        (0..surface.positions.len() as u32).collect()
    } else {
        surface.indices.clone()
    };

    let input = UnwrapInput {
        positions: &world_positions,
        normals: &world_normals,
        indices: &indices,
        texel_size,
    };
    let out = cache.unwrap_cached(unwrapper, &input)?;
    *surface = apply_unwrap(surface, &out);
    Ok(())
}
