//! TOML scene description for the CLI: primitive meshes, lights, and an
//! optional `[bake]` settings table, lowered into the scene-tree types.

use std::sync::Arc;

use serde::Deserialize;

use lumel_bake::BakeSettings;
use lumel_geom::{Transform, Vec2, Vec3};
use lumel_scene::{
    Light, LightBakeMode, LightKind, Material, Mesh, MeshInstance, MeshSurface, SceneNode,
};

#[derive(Debug, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub bake: BakeSettings,
    #[serde(default, rename = "mesh")]
    pub meshes: Vec<MeshEntry>,
    #[serde(default, rename = "light")]
    pub lights: Vec<LightEntry>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshShape {
    Quad,
    Box,
}

#[derive(Debug, Deserialize)]
pub struct MeshEntry {
    pub name: String,
    pub shape: MeshShape,
    /// Quad: x/z extents (y ignored). Box: full extents on each axis.
    #[serde(default = "default_size")]
    pub size: [f32; 3],
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotate_y_deg: f32,
    #[serde(default = "default_albedo")]
    pub albedo: [f32; 3],
    /// Lightmap resolution hint in texels.
    pub lightmap_size: Option<[u32; 2]>,
    #[serde(default = "default_layers")]
    pub layers: u32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightShape {
    Directional,
    Omni,
    Spot,
}

#[derive(Debug, Deserialize)]
pub struct LightEntry {
    pub name: String,
    pub shape: LightShape,
    #[serde(default)]
    pub position: [f32; 3],
    /// Orientation; lights shine along their local -Z axis.
    #[serde(default)]
    pub rotate_x_deg: f32,
    #[serde(default)]
    pub rotate_y_deg: f32,
    #[serde(default = "default_albedo")]
    pub color: [f32; 3],
    #[serde(default = "default_one")]
    pub energy: f32,
    #[serde(default = "default_range")]
    pub range: f32,
    #[serde(default = "default_one")]
    pub attenuation: f32,
    #[serde(default = "default_angle")]
    pub angle_deg: f32,
    #[serde(default = "default_one")]
    pub spot_attenuation: f32,
    #[serde(default = "default_true")]
    pub cast_shadow: bool,
}

fn default_size() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_albedo() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_layers() -> u32 {
    u32::MAX
}
fn default_one() -> f32 {
    1.0
}
fn default_range() -> f32 {
    10.0
}
fn default_angle() -> f32 {
    45.0
}
fn default_true() -> bool {
    true
}

impl SceneFile {
    /// Lowers the description into a scene tree rooted at a group node.
    pub fn build_scene(&self) -> SceneNode {
        let mut root = SceneNode::group("root");
        for entry in &self.meshes {
            root.children.push(entry.build_node());
        }
        for entry in &self.lights {
            root.children.push(entry.build_node());
        }
        root
    }
}

impl MeshEntry {
    fn build_node(&self) -> SceneNode {
        let surface = match self.shape {
            MeshShape::Quad => quad_surface(self.size[0], self.size[2]),
            MeshShape::Box => box_surface(Vec3::new(self.size[0], self.size[1], self.size[2])),
        };
        let mesh = Arc::new(Mesh {
            surfaces: vec![surface],
            lightmap_size_hint: self.lightmap_size.map(|[w, h]| (w, h)),
        });
        let mut instance = MeshInstance::new(mesh);
        instance.layers = self.layers;
        instance.material_override = Some(Material {
            albedo: Vec3::new(self.albedo[0], self.albedo[1], self.albedo[2]),
        });

        SceneNode::mesh(self.name.clone(), instance)
            .with_transform(placed(self.position, 0.0, self.rotate_y_deg))
    }
}

impl LightEntry {
    fn build_node(&self) -> SceneNode {
        let kind = match self.shape {
            LightShape::Directional => LightKind::Directional,
            LightShape::Omni => LightKind::Omni {
                range: self.range,
                attenuation: self.attenuation,
            },
            LightShape::Spot => LightKind::Spot {
                range: self.range,
                attenuation: self.attenuation,
                angle_deg: self.angle_deg,
                spot_attenuation: self.spot_attenuation,
            },
        };
        let light = Light {
            kind,
            color: Vec3::new(self.color[0], self.color[1], self.color[2]),
            energy: self.energy,
            bake_mode: LightBakeMode::Static,
            cast_shadow: self.cast_shadow,
        };
        SceneNode::light(self.name.clone(), light).with_transform(placed(
            self.position,
            self.rotate_x_deg,
            self.rotate_y_deg,
        ))
    }
}

fn placed(position: [f32; 3], rotate_x_deg: f32, rotate_y_deg: f32) -> Transform {
    let mut t = Transform::rotation_y(rotate_y_deg.to_radians())
        .mul(&Transform::rotation_x(rotate_x_deg.to_radians()));
    t.origin = Vec3::new(position[0], position[1], position[2]);
    t
}

/// Ground-plane quad centered on the origin with a full-square UV2 chart.
fn quad_surface(size_x: f32, size_z: f32) -> MeshSurface {
    let hx = size_x * 0.5;
    let hz = size_z * 0.5;
    MeshSurface {
        positions: vec![
            Vec3::new(-hx, 0.0, -hz),
            Vec3::new(hx, 0.0, -hz),
            Vec3::new(hx, 0.0, hz),
            Vec3::new(-hx, 0.0, hz),
        ],
        normals: vec![Vec3::UP; 4],
        uv2s: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
        ..Default::default()
    }
}

/// Axis-aligned box centered on the origin: 24 vertices, one UV2 chart per
/// face in a 3x2 grid, each inset to keep islands from touching.
fn box_surface(size: Vec3) -> MeshSurface {
    let h = size * 0.5;
    // (normal, two in-plane axes) per face.
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::UP),
        (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::UP),
        (Vec3::UP, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::UP),
        (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::UP),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut uv2s = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    const INSET: f32 = 0.02;
    for (face, &(n, u, v)) in faces.iter().enumerate() {
        let center = Vec3::new(n.x * h.x, n.y * h.y, n.z * h.z);
        let ex = Vec3::new(u.x * h.x, u.y * h.y, u.z * h.z);
        let ey = Vec3::new(v.x * h.x, v.y * h.y, v.z * h.z);

        // Chart cell in the 3x2 grid.
        let cell = Vec2::new((face % 3) as f32 / 3.0, (face / 3) as f32 / 2.0);
        let cw = 1.0 / 3.0;
        let ch = 0.5;

        let base = positions.len() as u32;
        for (sx, sy) in [(-1.0f32, -1.0f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            positions.push(center + ex * sx + ey * sy);
            normals.push(n);
            let fx = (sx + 1.0) * 0.5;
            let fy = (sy + 1.0) * 0.5;
            uv2s.push(Vec2::new(
                cell.x + cw * (INSET + fx * (1.0 - 2.0 * INSET)),
                cell.y + ch * (INSET + fy * (1.0 - 2.0 * INSET)),
            ));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshSurface {
        positions,
        normals,
        uv2s,
        indices,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_scene() {
        let text = r#"
            [bake]
            quality = "low"
            bounces = 0

            [[mesh]]
            name = "floor"
            shape = "quad"
            size = [4.0, 0.0, 4.0]
            lightmap_size = [64, 64]

            [[light]]
            name = "sun"
            shape = "directional"
            rotate_x_deg = -90.0
        "#;
        let scene: SceneFile = toml::from_str(text).expect("parses");
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.bake.bounces, 0);

        let root = scene.build_scene();
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn box_surface_has_disjoint_face_charts() {
        let s = box_surface(Vec3::splat(2.0));
        assert_eq!(s.positions.len(), 24);
        assert_eq!(s.indices.len(), 36);
        // All UVs stay inside the unit square.
        for uv in &s.uv2s {
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }
        // Face chart bounding boxes do not overlap.
        let rect = |f: usize| {
            let uvs = &s.uv2s[f * 4..f * 4 + 4];
            let min_x = uvs.iter().map(|u| u.x).fold(f32::MAX, f32::min);
            let max_x = uvs.iter().map(|u| u.x).fold(f32::MIN, f32::max);
            let min_y = uvs.iter().map(|u| u.y).fold(f32::MAX, f32::min);
            let max_y = uvs.iter().map(|u| u.y).fold(f32::MIN, f32::max);
            (min_x, max_x, min_y, max_y)
        };
        for a in 0..6 {
            for b in a + 1..6 {
                let (ax0, ax1, ay0, ay1) = rect(a);
                let (bx0, bx1, by0, by1) = rect(b);
                let overlap = ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1;
                assert!(!overlap, "face charts {a} and {b} overlap");
            }
        }
    }
}
