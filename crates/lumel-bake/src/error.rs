use thiserror::Error;

/// Every way a bake can fail. Phase failures abort immediately; no partial
/// output is committed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BakeError {
    #[error("no scene root to bake")]
    NoSceneRoot,
    /// Reserved for hosts that plug in an external baking service.
    #[error("no lightmapper available")]
    NoLightmapper,
    #[error("scene contains no bakeable meshes")]
    NoMeshes,
    #[error("gathered meshes failed validation")]
    MeshesInvalid,
    #[error("could not allocate a lightmap image")]
    CantCreateImage,
    #[error("bake cancelled")]
    UserAborted,
    #[error("maximum texture size is below the 32 texel minimum")]
    TextureSizeTooSmall,
    #[error("computed atlas size is below the 32 texel minimum")]
    LightmapTooSmall,
    #[error("meshes do not fit the configured atlas size")]
    AtlasTooSmall,
}
