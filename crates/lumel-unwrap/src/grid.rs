use lumel_geom::Vec2;

use crate::contract::{UnwrapError, UnwrapInput, UnwrapOutput, Unwrapper};

/// Fallback chart generator: every triangle gets its own inset cell in a
/// uniform grid, so charts never overlap and never share texels. Wasteful
/// compared to a real atlas algorithm, but deterministic and dependency
/// free; production users plug a proper generator into [`Unwrapper`].
pub struct GridUnwrapper;

impl GridUnwrapper {
    /// Fraction of a cell kept clear on every side.
    const CELL_INSET: f32 = 0.15;
    const MIN_ATLAS: u32 = 32;
    const MAX_ATLAS: u32 = 4096;

    fn size_hint(input: &UnwrapInput, cols: u32, rows: u32) -> (u32, u32) {
        // Cell resolution from the longest world-space edge at the
        // requested texel density.
        let mut longest = 0.0f32;
        for tri in input.indices.chunks_exact(3) {
            let fetch = |i: u32| input.positions.get(i as usize).copied().unwrap_or_default();
            let (a, b, c) = (fetch(tri[0]), fetch(tri[1]), fetch(tri[2]));
            longest = longest
                .max((b - a).length())
                .max((c - b).length())
                .max((a - c).length());
        }
        let texel = input.texel_size.max(1e-4);
        let cell_px = ((longest / texel).ceil() as u32).clamp(4, 128);
        let w = (cols * cell_px).clamp(Self::MIN_ATLAS, Self::MAX_ATLAS);
        let h = (rows * cell_px).clamp(Self::MIN_ATLAS, Self::MAX_ATLAS);
        (w, h)
    }
}

impl Unwrapper for GridUnwrapper {
    fn unwrap(&self, input: &UnwrapInput) -> Result<UnwrapOutput, UnwrapError> {
        input.validate()?;

        let tri_count = (input.indices.len() / 3) as u32;
        let cols = (tri_count as f32).sqrt().ceil() as u32;
        let rows = tri_count.div_ceil(cols);

        let cell_w = 1.0 / cols as f32;
        let cell_h = 1.0 / rows as f32;
        let inset_x = cell_w * Self::CELL_INSET;
        let inset_y = cell_h * Self::CELL_INSET;

        let mut cross_refs = Vec::with_capacity(input.indices.len());
        let mut uv2s = Vec::with_capacity(input.indices.len());
        let mut indices = Vec::with_capacity(input.indices.len());

        for (t, tri) in input.indices.chunks_exact(3).enumerate() {
            let cx = (t as u32 % cols) as f32;
            let cy = (t as u32 / cols) as f32;
            let ox = cx * cell_w;
            let oy = cy * cell_h;

            cross_refs.extend_from_slice(tri);
            uv2s.push(Vec2::new(ox + inset_x, oy + inset_y));
            uv2s.push(Vec2::new(ox + cell_w - inset_x, oy + inset_y));
            uv2s.push(Vec2::new(ox + inset_x, oy + cell_h - inset_y));
            let base = (t * 3) as u32;
            indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        Ok(UnwrapOutput {
            cross_refs,
            uv2s,
            indices,
            size_hint: Self::size_hint(input, cols, rows),
        })
    }
}
