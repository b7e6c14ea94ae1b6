use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use lumel_atlas::{PackItem, composite, pack};
use lumel_raster::{
    LightingEnv, LightmapImage, ShadeParams, accumulate_indirect, build_ray_meshes, dilate_all,
    rasterize_direct,
};
use lumel_scene::{
    GatherOptions, MeshRecord, SceneNode, gather_scene, validate_meshes,
};
use lumel_unwrap::{CachedSurfaceUnwrap, DEFAULT_TEXEL_SIZE, GridUnwrapper, UnwrapCache, Unwrapper};

use crate::error::BakeError;
use crate::output::{BakedLightmap, LightmapUser};
use crate::progress::{CancelToken, ProgressFn};
use crate::settings::BakeSettings;

/// Smallest workable atlas or per-mesh lightmap edge, in texels.
const MIN_LIGHTMAP_SIZE: u32 = 32;

/// Runs the whole pipeline: gather, rasterize, pack, bounce, dilate,
/// composite, output. The unwrapper and its cache are injected so shared
/// meshes unwrap once per content, and so hosts can swap in a real chart
/// generator.
pub struct LightmapBaker {
    pub settings: BakeSettings,
    unwrapper: Arc<dyn Unwrapper>,
    cache: UnwrapCache,
}

impl LightmapBaker {
    pub fn new(settings: BakeSettings) -> Self {
        Self::with_unwrapper(settings, Arc::new(GridUnwrapper))
    }

    pub fn with_unwrapper(settings: BakeSettings, unwrapper: Arc<dyn Unwrapper>) -> Self {
        LightmapBaker {
            settings,
            unwrapper,
            cache: UnwrapCache::default(),
        }
    }

    /// Bake without progress reporting or cancellation.
    pub fn bake(
        &self,
        root: Option<&SceneNode>,
        output: &mut BakedLightmap,
    ) -> Result<(), BakeError> {
        self.bake_with_progress(root, output, None, CancelToken::new())
    }

    /// Full bake entry point. Progress is reported as increasing fractions
    /// with phase labels; `cancel` is polled between phases and between
    /// per-mesh rasterize tasks.
    pub fn bake_with_progress(
        &self,
        root: Option<&SceneNode>,
        output: &mut BakedLightmap,
        progress: Option<&ProgressFn<'_>>,
        cancel: CancelToken,
    ) -> Result<(), BakeError> {
        let root = root.ok_or(BakeError::NoSceneRoot)?;
        let atlas_size = self.atlas_size()?;

        report(progress, 0.0, "gathering scene");
        let adapter;
        let mut opts = GatherOptions {
            layer_mask: self.settings.mesh_layer_mask,
            unwrapper: None,
        };
        if self.settings.auto_unwrap_uv2 {
            adapter = CachedSurfaceUnwrap {
                unwrapper: self.unwrapper.as_ref(),
                cache: &self.cache,
                texel_size: DEFAULT_TEXEL_SIZE,
            };
            opts.unwrapper = Some(&adapter);
        }
        let (mut meshes, lights) = gather_scene(root, &opts);
        if meshes.is_empty() {
            return Err(BakeError::NoMeshes);
        }
        if !validate_meshes(&meshes) {
            return Err(BakeError::MeshesInvalid);
        }
        log::info!(
            "baking {} surfaces with {} static lights into {atlas_size} px atlas",
            meshes.len(),
            lights.len()
        );
        check(&cancel)?;

        report(progress, 0.15, "building ray meshes");
        let occluders = build_ray_meshes(&meshes);
        check(&cancel)?;

        let dims: Vec<(u32, u32)> = meshes
            .iter()
            .map(|m| self.mesh_image_size(m, atlas_size))
            .collect();

        report(progress, 0.2, "rasterizing direct lighting");
        let env = LightingEnv {
            lights: &lights,
            occluders: &occluders,
            params: self.shade_params(),
        };
        let completed = AtomicUsize::new(0);
        // Reports are serialized through this gate so a preempted worker
        // can never publish a smaller fraction after a peer's larger one.
        let highest = Mutex::new(0.0f32);
        let total = meshes.len();
        let mut images: Vec<LightmapImage> = meshes
            .par_iter()
            .zip(dims.par_iter())
            .map(|(mesh, &(w, h))| {
                if cancel.is_cancelled() {
                    return Err(BakeError::UserAborted);
                }
                let mut img = LightmapImage::new(w, h).ok_or(BakeError::CantCreateImage)?;
                rasterize_direct(mesh, &env, &mut img);
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                let fraction = 0.2 + 0.35 * done as f32 / total as f32;
                {
                    let mut gate = highest.lock().expect("progress gate poisoned");
                    if fraction > *gate {
                        *gate = fraction;
                        report(progress, fraction, "rasterizing direct lighting");
                    }
                }
                Ok(img)
            })
            .collect::<Result<_, _>>()?;
        check(&cancel)?;

        report(progress, 0.6, "packing atlas");
        let items: Vec<PackItem> = dims
            .iter()
            .map(|&(w, h)| PackItem {
                width: w as usize,
                height: h as usize,
            })
            .collect();
        let layout = pack(
            &items,
            atlas_size as usize,
            self.settings.atlas_padding as usize,
        )
        .map_err(|e| {
            log::error!("{e}");
            BakeError::AtlasTooSmall
        })?;
        for (i, mesh) in meshes.iter_mut().enumerate() {
            mesh.atlas_layer = layout.placements[i].layer;
            mesh.uv_rect = layout.uv_rect(i, items[i]);
        }
        check(&cancel)?;

        if self.settings.bounces > 0 {
            report(progress, 0.65, "accumulating indirect light");
            let bounces = self.settings.bounces;
            accumulate_indirect(
                &mut images,
                bounces,
                self.settings.bounce_indirect_energy,
                |bounce| {
                    report(
                        progress,
                        0.65 + 0.1 * bounce as f32 / bounces as f32,
                        "accumulating indirect light",
                    );
                },
            );
            check(&cancel)?;
        }

        report(progress, 0.75, "dilating island seams");
        dilate_all(&mut images, self.settings.seam_dilation_radius as i32);
        check(&cancel)?;

        report(progress, 0.8, "compositing atlas layers");
        let layers = composite(&layout, &images).ok_or(BakeError::CantCreateImage)?;
        check(&cancel)?;

        report(progress, 0.85, "creating output texture");
        output.set_layers(layers);

        report(progress, 0.9, "writing lightmap users");
        output.clear_users();
        for mesh in &meshes {
            output.add_user(LightmapUser {
                node_path: mesh.node_path.clone(),
                sub_instance: mesh.sub_instance,
                atlas_layer: mesh.atlas_layer,
                uv_rect: mesh.uv_rect,
            });
        }

        report(progress, 1.0, "done");
        Ok(())
    }

    /// Atlas edge length: quality preset unless overridden, capped by the
    /// maximum texture size, never below the workable minimum.
    fn atlas_size(&self) -> Result<u32, BakeError> {
        if self.settings.max_texture_size < MIN_LIGHTMAP_SIZE {
            return Err(BakeError::TextureSizeTooSmall);
        }
        let base = if self.settings.atlas_size_override > 0 {
            self.settings.atlas_size_override
        } else {
            self.settings.quality.atlas_size()
        };
        let size = base.min(self.settings.max_texture_size);
        if size < MIN_LIGHTMAP_SIZE {
            return Err(BakeError::LightmapTooSmall);
        }
        Ok(size)
    }

    /// Per-mesh lightmap extents: the importer's size hint (whole atlas
    /// when absent), scaled by `texel_scale`, clamped to `[32, atlas]`.
    fn mesh_image_size(&self, mesh: &MeshRecord, atlas_size: u32) -> (u32, u32) {
        let (w, h) = mesh.size_hint.unwrap_or((atlas_size, atlas_size));
        let scale = self.settings.texel_scale.max(0.0);
        let apply =
            |v: u32| ((v as f32 * scale).round() as u32).clamp(MIN_LIGHTMAP_SIZE, atlas_size);
        (apply(w), apply(h))
    }

    fn shade_params(&self) -> ShadeParams {
        ShadeParams {
            ambient_energy: self.settings.ambient_energy,
            lightmap_energy_scale: self.settings.lightmap_energy_scale,
            use_material_albedo: self.settings.use_material_albedo,
            use_lambert_normalization: self.settings.use_lambert_normalization,
            use_shadowing: self.settings.use_shadowing,
            bias: self.settings.bias,
        }
    }
}

#[inline]
fn report(progress: Option<&ProgressFn<'_>>, fraction: f32, label: &str) {
    if let Some(p) = progress {
        p(fraction, label);
    }
}

#[inline]
fn check(cancel: &CancelToken) -> Result<(), BakeError> {
    if cancel.is_cancelled() {
        Err(BakeError::UserAborted)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumel_geom::Transform;

    fn baker(settings: BakeSettings) -> LightmapBaker {
        LightmapBaker::new(settings)
    }

    #[test]
    fn atlas_size_respects_override_and_cap() {
        let mut s = BakeSettings::default();
        assert_eq!(baker(s.clone()).atlas_size(), Ok(512));

        s.atlas_size_override = 300;
        assert_eq!(baker(s.clone()).atlas_size(), Ok(300));

        s.max_texture_size = 128;
        assert_eq!(baker(s.clone()).atlas_size(), Ok(128));

        s.max_texture_size = 16;
        assert_eq!(
            baker(s.clone()).atlas_size(),
            Err(BakeError::TextureSizeTooSmall)
        );

        s.max_texture_size = 16384;
        s.atlas_size_override = 16;
        assert_eq!(baker(s).atlas_size(), Err(BakeError::LightmapTooSmall));
    }

    #[test]
    fn mesh_image_size_scales_and_clamps() {
        let mut s = BakeSettings::default();
        s.texel_scale = 2.0;
        let b = baker(s);
        let mesh = MeshRecord {
            positions: Vec::new(),
            normals: Vec::new(),
            uv2s: Vec::new(),
            indices: Vec::new(),
            transform: Transform::IDENTITY,
            albedo: lumel_geom::Vec3::splat(1.0),
            node_path: "m".into(),
            sub_instance: 0,
            size_hint: Some((64, 8)),
            atlas_layer: 0,
            uv_rect: lumel_geom::Rect2::UNIT,
        };
        // Width doubles; height scales below the floor and clamps up.
        assert_eq!(b.mesh_image_size(&mesh, 256), (128, 32));

        let mut hintless = mesh.clone();
        hintless.size_hint = None;
        assert_eq!(b.mesh_image_size(&hintless, 256), (256, 256));

        // Fractional scales round to the nearest texel, not down.
        let mut s = BakeSettings::default();
        s.texel_scale = 0.9;
        let b = baker(s);
        let mut hinted = mesh;
        hinted.size_hint = Some((64, 39));
        // 64 * 0.9 = 57.6 and 39 * 0.9 = 35.1.
        assert_eq!(b.mesh_image_size(&hinted, 256), (58, 35));
    }
}
