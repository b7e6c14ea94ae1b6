use crate::dilate::dilate;
use crate::image::LightmapImage;

/// Neighbor offsets sampled along each axis when estimating one bounce.
const BOUNCE_TAPS: [i32; 4] = [-2, -1, 1, 2];

/// Iterative diffuse-transfer approximation. Each bounce builds a fresh
/// "bounce light" image per map by averaging covered neighbor texels of
/// the previous iteration's source (the direct map on iteration 0) and
/// halving the result, lightly dilates it, then adds it into the running
/// accumulation with energy `indirect_energy * 0.5^(bounce+1)`.
///
/// Not a physical GI solve; a deliberate approximation. `bounces == 0`
/// leaves `maps` untouched. `on_bounce` fires before each iteration with
/// the zero-based bounce index.
pub fn accumulate_indirect(
    maps: &mut [LightmapImage],
    bounces: u32,
    indirect_energy: f32,
    mut on_bounce: impl FnMut(u32),
) {
    if maps.is_empty() || bounces == 0 {
        return;
    }

    let mut sources: Vec<LightmapImage> = maps.to_vec();

    for bounce in 0..bounces {
        on_bounce(bounce);

        let mut bounce_light: Vec<LightmapImage> = sources
            .iter()
            .map(|src| {
                let mut dst =
                    LightmapImage::new(src.width() as u32, src.height() as u32).expect("nonzero");
                gather_bounce(src, &mut dst);
                dst
            })
            .collect();

        // Light dilation smooths island borders before accumulation.
        for img in bounce_light.iter_mut() {
            *img = dilate(img, 1);
        }

        let energy = indirect_energy * 0.5f32.powi(bounce as i32 + 1);
        for (dst, src) in maps.iter_mut().zip(&bounce_light) {
            dst.add_scaled_rgb(src, energy);
        }

        // The next bounce redistributes this bounce's light only, so later
        // bounces decay instead of compounding the running total.
        sources = bounce_light;
    }
}

/// One diffusion step: for each covered texel of `src`, average the
/// covered neighbors at the fixed tap offsets on both axes and halve.
fn gather_bounce(src: &LightmapImage, dst: &mut LightmapImage) {
    let w = src.width() as i32;
    let h = src.height() as i32;

    for y in 0..h {
        for x in 0..w {
            if !src.is_covered(x as usize, y as usize) {
                continue;
            }

            let mut indirect = [0.0f32; 3];
            let mut samples = 0u32;
            let mut take = |nx: i32, ny: i32| {
                if nx < 0 || nx >= w || ny < 0 || ny >= h {
                    return;
                }
                if !src.is_covered(nx as usize, ny as usize) {
                    return;
                }
                let t = src.get(nx as usize, ny as usize);
                indirect[0] += t[0];
                indirect[1] += t[1];
                indirect[2] += t[2];
                samples += 1;
            };
            for d in BOUNCE_TAPS {
                take(x + d, y);
            }
            for d in BOUNCE_TAPS {
                take(x, y + d);
            }

            if samples > 0 {
                let s = 0.5 / samples as f32;
                dst.set(
                    x as usize,
                    y as usize,
                    [indirect[0] * s, indirect[1] * s, indirect[2] * s, 1.0],
                );
            }
        }
    }
}
