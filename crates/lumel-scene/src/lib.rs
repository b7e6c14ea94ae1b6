//! Scene-tree data model and static geometry/light gathering.
#![forbid(unsafe_code)]

mod gather;
mod types;

pub use gather::{GatherOptions, SurfaceUnwrap, UnwrappedSurface, gather_scene, validate_meshes};
pub use types::{
    Light, LightBakeMode, LightKind, LightRecord, LightRecordKind, Material, Mesh, MeshInstance,
    MeshRecord, MeshSurface, NodeKind, SceneNode,
};
