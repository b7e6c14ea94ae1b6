use crate::image::LightmapImage;

/// Fills uncovered texels with the average of covered texels inside the
/// square radius-R neighborhood (center excluded). Produces a new image;
/// texels with no covered neighbor stay uncovered. Radius 0 is identity.
pub fn dilate(image: &LightmapImage, radius: i32) -> LightmapImage {
    if radius <= 0 {
        return image.clone();
    }

    let w = image.width() as i32;
    let h = image.height() as i32;
    let mut out = image.clone();

    for y in 0..h {
        for x in 0..w {
            if image.is_covered(x as usize, y as usize) {
                continue;
            }
            let mut accum = [0.0f32; 3];
            let mut count = 0u32;
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x + dx;
                    let ny = y + dy;
                    if nx < 0 || nx >= w || ny < 0 || ny >= h {
                        continue;
                    }
                    if !image.is_covered(nx as usize, ny as usize) {
                        continue;
                    }
                    let t = image.get(nx as usize, ny as usize);
                    accum[0] += t[0];
                    accum[1] += t[1];
                    accum[2] += t[2];
                    count += 1;
                }
            }
            if count > 0 {
                let inv = 1.0 / count as f32;
                out.set(
                    x as usize,
                    y as usize,
                    [accum[0] * inv, accum[1] * inv, accum[2] * inv, 1.0],
                );
            }
        }
    }
    out
}

/// In-place convenience over a batch of per-mesh lightmaps.
pub fn dilate_all(images: &mut [LightmapImage], radius: i32) {
    if radius <= 0 {
        return;
    }
    for img in images.iter_mut() {
        *img = dilate(img, radius);
    }
}
