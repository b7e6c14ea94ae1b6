use lumel_geom::Rect2;
use lumel_raster::LightmapImage;

/// One surface's slot in the baked atlas: where the engine should point
/// the instance's lightmap sampler.
#[derive(Clone, Debug)]
pub struct LightmapUser {
    /// Slash-joined node path within the baked subtree.
    pub node_path: String,
    /// Surface index within the owning mesh.
    pub sub_instance: usize,
    pub atlas_layer: usize,
    /// Normalized UV offset/scale into the atlas layer.
    pub uv_rect: Rect2,
}

/// The bake's output sink: the layered atlas texture plus the table of
/// surfaces mapped into it. Only written once the whole bake succeeds.
#[derive(Debug, Default)]
pub struct BakedLightmap {
    layers: Vec<LightmapImage>,
    users: Vec<LightmapUser>,
}

impl BakedLightmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_layers(&mut self, layers: Vec<LightmapImage>) {
        self.layers = layers;
    }

    pub fn layers(&self) -> &[LightmapImage] {
        &self.layers
    }

    pub fn clear_users(&mut self) {
        self.users.clear();
    }

    pub fn add_user(&mut self, user: LightmapUser) {
        self.users.push(user);
    }

    pub fn users(&self) -> &[LightmapUser] {
        &self.users
    }

    pub fn find_user(&self, node_path: &str, sub_instance: usize) -> Option<&LightmapUser> {
        self.users
            .iter()
            .find(|u| u.node_path == node_path && u.sub_instance == sub_instance)
    }
}
