//! Shelf packing of per-mesh lightmaps into fixed-size atlas layers.
//!
//! Packing is split into a layout pass and a composite pass: geometry
//! does not change between the direct and post-processed lightmaps, so
//! one layout serves both the early UV-rect assignment and the final
//! pixel blit.
#![forbid(unsafe_code)]

use lumel_geom::{Rect2, Vec2};
use lumel_raster::LightmapImage;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackError {
    /// A single padded item exceeds the atlas on some axis; no layout can
    /// place it.
    #[error("item {index} ({width}x{height} px incl. padding) exceeds atlas size {atlas_size}")]
    AtlasTooSmall {
        index: usize,
        width: usize,
        height: usize,
        atlas_size: usize,
    },
}

/// Unpadded pixel extents of one lightmap to place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackItem {
    pub width: usize,
    pub height: usize,
}

/// Where one item landed: layer index plus the top-left pixel of its
/// content region (padding already applied).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub layer: usize,
    pub x: usize,
    pub y: usize,
}

/// Result of the layout pass, indexed parallel to the input items.
#[derive(Clone, Debug)]
pub struct AtlasLayout {
    pub atlas_size: usize,
    pub padding: usize,
    pub layer_count: usize,
    pub placements: Vec<Placement>,
}

impl AtlasLayout {
    /// Normalized UV offset/scale mapping an item's full `[0,1]^2` UV2
    /// onto its sub-rectangle of the atlas.
    pub fn uv_rect(&self, index: usize, item: PackItem) -> Rect2 {
        let inv = 1.0 / self.atlas_size as f32;
        let p = self.placements[index];
        Rect2::new(
            Vec2::new(p.x as f32 * inv, p.y as f32 * inv),
            Vec2::new(item.width as f32 * inv, item.height as f32 * inv),
        )
    }
}

/// Shelf layout: items sorted by descending padded height (stable on
/// index for determinism), placed left-to-right, wrapping to a new shelf
/// on width overflow and a new layer on height overflow.
pub fn pack(items: &[PackItem], atlas_size: usize, padding: usize) -> Result<AtlasLayout, PackError> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    let padded = |i: usize| {
        (
            items[i].width + padding * 2,
            items[i].height + padding * 2,
        )
    };
    order.sort_by_key(|&i| (std::cmp::Reverse(padded(i).1), i));

    let mut placements = vec![
        Placement {
            layer: 0,
            x: 0,
            y: 0
        };
        items.len()
    ];
    let mut layer = 0usize;
    let mut x = 0usize;
    let mut y = 0usize;
    let mut shelf_h = 0usize;

    for &i in &order {
        let (w, h) = padded(i);
        if w > atlas_size || h > atlas_size {
            return Err(PackError::AtlasTooSmall {
                index: i,
                width: w,
                height: h,
                atlas_size,
            });
        }

        if x + w > atlas_size {
            y += shelf_h;
            x = 0;
            shelf_h = 0;
        }
        if y + h > atlas_size {
            layer += 1;
            x = 0;
            y = 0;
            shelf_h = 0;
        }

        placements[i] = Placement {
            layer,
            x: x + padding,
            y: y + padding,
        };
        x += w;
        shelf_h = shelf_h.max(h);
    }

    Ok(AtlasLayout {
        atlas_size,
        padding,
        layer_count: if items.is_empty() { 0 } else { layer + 1 },
        placements,
    })
}

/// Blits per-mesh images into fresh atlas layers through an existing
/// layout. `images` must parallel the items the layout was built from.
pub fn composite(layout: &AtlasLayout, images: &[LightmapImage]) -> Option<Vec<LightmapImage>> {
    let size = layout.atlas_size as u32;
    let mut layers = Vec::with_capacity(layout.layer_count);
    for _ in 0..layout.layer_count {
        layers.push(LightmapImage::new(size, size)?);
    }
    for (img, p) in images.iter().zip(&layout.placements) {
        layers[p.layer].blit(img, p.x, p.y);
    }
    Some(layers)
}
