//! CPU lightmap rasterization: UV2-space triangle fill, direct-light
//! evaluation, ray-traced shadowing, indirect bounce accumulation, and
//! seam dilation.
#![forbid(unsafe_code)]

mod bounce;
mod dilate;
mod image;
mod raster;
mod ray;
mod shade;

pub use bounce::accumulate_indirect;
pub use dilate::{dilate, dilate_all};
pub use image::LightmapImage;
pub use raster::rasterize_direct;
pub use ray::{RayMesh, RayTri, build_ray_meshes, is_shadowed};
pub use shade::{LightingEnv, ShadeParams, evaluate_direct};
