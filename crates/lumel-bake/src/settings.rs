use serde::Deserialize;

/// Quality preset selecting the atlas resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BakeQuality {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl BakeQuality {
    /// Edge length in texels of one atlas layer for this preset.
    pub fn atlas_size(self) -> u32 {
        match self {
            BakeQuality::Low => 256,
            BakeQuality::Medium => 512,
            BakeQuality::High => 1024,
            BakeQuality::Ultra => 2048,
        }
    }
}

/// Every knob the bake recognizes. Deserializable so a `[bake]` TOML table
/// can override any subset; unset fields keep their defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BakeSettings {
    pub quality: BakeQuality,
    /// Indirect bounce iterations; 0 disables the indirect pass.
    pub bounces: u32,
    /// Energy multiplier applied to every bounce before its 0.5^n decay.
    pub bounce_indirect_energy: f32,
    /// Shadow-ray origin offset along the surface normal.
    pub bias: f32,
    /// Hard ceiling on the atlas edge length.
    pub max_texture_size: u32,
    /// Nonzero replaces the quality-derived atlas size.
    pub atlas_size_override: u32,
    /// Empty gutter around each packed lightmap, per side.
    pub atlas_padding: u32,
    pub seam_dilation_radius: u32,
    /// Multiplier on per-mesh lightmap resolution.
    pub texel_scale: f32,
    pub lightmap_energy_scale: f32,
    pub ambient_energy: f32,
    pub use_material_albedo: bool,
    pub use_lambert_normalization: bool,
    pub use_shadowing: bool,
    /// Mesh instances must share a render-layer bit with this mask.
    pub mesh_layer_mask: u32,
    /// Unwrap surfaces that lack a UV2 channel instead of skipping them.
    pub auto_unwrap_uv2: bool,
}

impl Default for BakeSettings {
    fn default() -> Self {
        BakeSettings {
            quality: BakeQuality::default(),
            bounces: 3,
            bounce_indirect_energy: 1.0,
            bias: 0.0005,
            max_texture_size: 16384,
            atlas_size_override: 0,
            atlas_padding: 2,
            seam_dilation_radius: 2,
            texel_scale: 1.0,
            lightmap_energy_scale: 1.0,
            ambient_energy: 0.0,
            use_material_albedo: true,
            use_lambert_normalization: true,
            use_shadowing: true,
            mesh_layer_mask: u32::MAX,
            auto_unwrap_uv2: false,
        }
    }
}
