/// Linear-color texel grid. The alpha channel is a coverage mask: 1 marks
/// a texel inside a rasterized UV island, 0 an unwritten texel.
#[derive(Clone, Debug, PartialEq)]
pub struct LightmapImage {
    width: usize,
    height: usize,
    texels: Vec<[f32; 4]>,
}

impl LightmapImage {
    /// Coverage threshold; alpha at or above this counts as covered.
    pub const COVERED: f32 = 0.5;

    /// Fails on degenerate dimensions.
    pub fn new(width: u32, height: u32) -> Option<LightmapImage> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(LightmapImage {
            width: width as usize,
            height: height as usize,
            texels: vec![[0.0; 4]; width as usize * height as usize],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 4] {
        self.texels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, texel: [f32; 4]) {
        self.texels[y * self.width + x] = texel;
    }

    #[inline]
    pub fn is_covered(&self, x: usize, y: usize) -> bool {
        self.get(x, y)[3] >= Self::COVERED
    }

    pub fn fill(&mut self, texel: [f32; 4]) {
        self.texels.fill(texel);
    }

    /// True when every texel carries coverage.
    pub fn fully_covered(&self) -> bool {
        self.texels.iter().all(|t| t[3] >= Self::COVERED)
    }

    /// Adds `src`'s RGB scaled by `energy`; coverage alpha is untouched.
    /// Dimensions must match.
    pub fn add_scaled_rgb(&mut self, src: &LightmapImage, energy: f32) {
        debug_assert_eq!(self.width, src.width);
        debug_assert_eq!(self.height, src.height);
        for (dst, s) in self.texels.iter_mut().zip(&src.texels) {
            dst[0] += s[0] * energy;
            dst[1] += s[1] * energy;
            dst[2] += s[2] * energy;
        }
    }

    /// Copies `src` into this image with its top-left corner at
    /// `(dst_x, dst_y)`. The caller guarantees the placement fits.
    pub fn blit(&mut self, src: &LightmapImage, dst_x: usize, dst_y: usize) {
        debug_assert!(dst_x + src.width <= self.width);
        debug_assert!(dst_y + src.height <= self.height);
        for y in 0..src.height {
            let src_row = y * src.width;
            let dst_row = (dst_y + y) * self.width + dst_x;
            self.texels[dst_row..dst_row + src.width]
                .copy_from_slice(&src.texels[src_row..src_row + src.width]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_degenerate_dimensions() {
        assert!(LightmapImage::new(0, 4).is_none());
        assert!(LightmapImage::new(4, 0).is_none());
        assert!(LightmapImage::new(1, 1).is_some());
    }

    #[test]
    fn blit_places_source_at_offset() {
        let mut dst = LightmapImage::new(4, 4).unwrap();
        let mut src = LightmapImage::new(2, 2).unwrap();
        src.fill([1.0, 0.5, 0.25, 1.0]);
        dst.blit(&src, 1, 2);
        assert_eq!(dst.get(1, 2), [1.0, 0.5, 0.25, 1.0]);
        assert_eq!(dst.get(2, 3), [1.0, 0.5, 0.25, 1.0]);
        assert_eq!(dst.get(0, 0), [0.0; 4]);
        assert_eq!(dst.get(3, 2), [0.0; 4]);
    }

    #[test]
    fn add_scaled_rgb_preserves_coverage() {
        let mut a = LightmapImage::new(2, 1).unwrap();
        a.set(0, 0, [0.1, 0.1, 0.1, 1.0]);
        let mut b = LightmapImage::new(2, 1).unwrap();
        b.set(0, 0, [1.0, 2.0, 3.0, 1.0]);
        b.set(1, 0, [1.0, 1.0, 1.0, 1.0]);
        a.add_scaled_rgb(&b, 0.5);
        let t = a.get(0, 0);
        assert!((t[0] - 0.6).abs() < 1e-6 && (t[1] - 1.1).abs() < 1e-6);
        assert_eq!(t[3], 1.0);
        // Uncovered texel gains rgb but stays uncovered.
        assert_eq!(a.get(1, 0)[3], 0.0);
    }
}
