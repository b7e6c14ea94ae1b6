//! Output writers: tone-mapped PPM dumps of the atlas layers and a TOML
//! manifest of per-surface atlas placements.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use lumel_bake::BakedLightmap;
use lumel_raster::LightmapImage;

#[derive(Serialize)]
struct Manifest {
    atlas_size: usize,
    layer_count: usize,
    #[serde(rename = "user")]
    users: Vec<ManifestUser>,
}

#[derive(Serialize)]
struct ManifestUser {
    node_path: String,
    sub_instance: usize,
    atlas_layer: usize,
    uv_pos: [f32; 2],
    uv_size: [f32; 2],
}

/// Writes `layer_N.ppm` per atlas layer plus `manifest.toml` into `dir`,
/// creating it if needed.
pub fn write_outputs(dir: &Path, baked: &BakedLightmap) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    for (i, layer) in baked.layers().iter().enumerate() {
        let path = dir.join(format!("layer_{i}.ppm"));
        write_ppm(&path, layer)?;
        log::info!("wrote {}", path.display());
    }

    let manifest = Manifest {
        atlas_size: baked.layers().first().map_or(0, |l| l.width()),
        layer_count: baked.layers().len(),
        users: baked
            .users()
            .iter()
            .map(|u| ManifestUser {
                node_path: u.node_path.clone(),
                sub_instance: u.sub_instance,
                atlas_layer: u.atlas_layer,
                uv_pos: [u.uv_rect.pos.x, u.uv_rect.pos.y],
                uv_size: [u.uv_rect.size.x, u.uv_rect.size.y],
            })
            .collect(),
    };
    let path = dir.join("manifest.toml");
    fs::write(&path, toml::to_string_pretty(&manifest)?)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Binary PPM with a gamma 2.2 view transform; linear values clamp at 1.
fn write_ppm(path: &Path, image: &LightmapImage) -> std::io::Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    writeln!(out, "P6\n{} {}\n255", image.width(), image.height())?;
    for y in 0..image.height() {
        for x in 0..image.width() {
            let t = image.get(x, y);
            let px = [encode(t[0]), encode(t[1]), encode(t[2])];
            out.write_all(&px)?;
        }
    }
    out.flush()
}

#[inline]
fn encode(linear: f32) -> u8 {
    (linear.clamp(0.0, 1.0).powf(1.0 / 2.2) * 255.0).round() as u8
}
