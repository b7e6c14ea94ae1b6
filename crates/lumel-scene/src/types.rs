use std::sync::Arc;

use lumel_geom::{Rect2, Transform, Vec2, Vec3};

/// Surface material, reduced to what the baker consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Linear-space diffuse albedo.
    pub albedo: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            albedo: Vec3::splat(1.0),
        }
    }
}

/// One renderable surface: parallel vertex attribute buffers plus an
/// optional triangle index list (empty means implicit sequential
/// triangulation).
#[derive(Clone, Debug, Default)]
pub struct MeshSurface {
    pub positions: Vec<Vec3>,
    /// Empty, or one normal per vertex.
    pub normals: Vec<Vec3>,
    /// Primary (material) UV channel. Empty, or one per vertex.
    pub uvs: Vec<Vec2>,
    /// Lightmap UV channel. Empty until unwrapped.
    pub uv2s: Vec<Vec2>,
    /// Empty, or one RGBA color per vertex.
    pub colors: Vec<[f32; 4]>,
    /// Empty, or one xyzw tangent per vertex.
    pub tangents: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
    pub material: Option<Material>,
}

impl MeshSurface {
    #[inline]
    pub fn has_uv2(&self) -> bool {
        !self.uv2s.is_empty()
    }

    /// Number of triangles, honoring implicit sequential triangulation.
    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.indices.len() / 3
        }
    }
}

/// A mesh resource: one or more surfaces, shareable between instances.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub surfaces: Vec<MeshSurface>,
    /// Desired lightmap resolution in texels, if the importer provided one.
    pub lightmap_size_hint: Option<(u32, u32)>,
}

#[derive(Clone, Debug)]
pub struct MeshInstance {
    pub mesh: Arc<Mesh>,
    /// Render-layer bits tested against the bake layer mask.
    pub layers: u32,
    /// Overrides every surface's own material when set.
    pub material_override: Option<Material>,
}

impl MeshInstance {
    pub fn new(mesh: Arc<Mesh>) -> Self {
        MeshInstance {
            mesh,
            layers: u32::MAX,
            material_override: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightBakeMode {
    Disabled,
    /// Lit at runtime; never contributes to the bake.
    Dynamic,
    #[default]
    Static,
}

/// Light payload, one variant per light shape. Range/attenuation only
/// exist where they are meaningful, so no field is ever "unset".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Shines along the node's -Z axis.
    Directional,
    Omni {
        range: f32,
        attenuation: f32,
    },
    Spot {
        range: f32,
        attenuation: f32,
        /// Half-angle of the cone, degrees.
        angle_deg: f32,
        spot_attenuation: f32,
    },
}

#[derive(Clone, Debug)]
pub struct Light {
    pub kind: LightKind,
    /// Linear-space color.
    pub color: Vec3,
    pub energy: f32,
    pub bake_mode: LightBakeMode,
    pub cast_shadow: bool,
}

impl Light {
    pub fn directional() -> Self {
        Light {
            kind: LightKind::Directional,
            color: Vec3::splat(1.0),
            energy: 1.0,
            bake_mode: LightBakeMode::Static,
            cast_shadow: true,
        }
    }

    pub fn omni(range: f32) -> Self {
        Light {
            kind: LightKind::Omni {
                range,
                attenuation: 1.0,
            },
            color: Vec3::splat(1.0),
            energy: 1.0,
            bake_mode: LightBakeMode::Static,
            cast_shadow: true,
        }
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Group,
    Mesh(MeshInstance),
    Light(Light),
}

/// A node in the scene subtree handed to the baker. Transforms are local
/// and composed during traversal.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub visible: bool,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: impl Into<String>) -> Self {
        SceneNode {
            name: name.into(),
            visible: true,
            transform: Transform::IDENTITY,
            kind: NodeKind::Group,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: impl Into<String>, instance: MeshInstance) -> Self {
        SceneNode {
            name: name.into(),
            visible: true,
            transform: Transform::IDENTITY,
            kind: NodeKind::Mesh(instance),
            children: Vec::new(),
        }
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        SceneNode {
            name: name.into(),
            visible: true,
            transform: Transform::IDENTITY,
            kind: NodeKind::Light(light),
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }
}

/// One gathered (instance, surface) pair, everything the raster and pack
/// stages need. `atlas_layer`/`uv_rect` are filled in by the packer.
#[derive(Clone, Debug)]
pub struct MeshRecord {
    /// Local-space positions; `transform` maps them to world space.
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uv2s: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub transform: Transform,
    /// Resolved linear albedo (override > surface > white).
    pub albedo: Vec3,
    /// Slash-joined path of the owning node within the gathered subtree.
    pub node_path: String,
    /// Surface index within the owning mesh.
    pub sub_instance: usize,
    pub size_hint: Option<(u32, u32)>,
    pub atlas_layer: usize,
    pub uv_rect: Rect2,
}

/// Gathered static light in world space, one variant per shape.
#[derive(Clone, Debug, PartialEq)]
pub enum LightRecordKind {
    Directional {
        /// Direction the light travels (already negated -Z basis).
        direction: Vec3,
    },
    Omni {
        position: Vec3,
        range: f32,
        attenuation: f32,
    },
    Spot {
        position: Vec3,
        direction: Vec3,
        range: f32,
        attenuation: f32,
        cos_spot_angle: f32,
        inv_spot_attenuation: f32,
    },
}

#[derive(Clone, Debug)]
pub struct LightRecord {
    pub kind: LightRecordKind,
    pub color: Vec3,
    pub energy: f32,
    pub cast_shadow: bool,
    pub name: String,
}
