//! UV2 unwrapping boundary: contract types, content-keyed caching, and
//! attribute remapping. The real chart-generation algorithm lives behind
//! the [`Unwrapper`] trait; [`GridUnwrapper`] is a deliberately simple
//! built-in fallback.
#![forbid(unsafe_code)]

mod cache;
mod contract;
mod grid;
mod remap;

pub use cache::{CachedSurfaceUnwrap, UnwrapCache, cache_key};
pub use contract::{UnwrapError, UnwrapInput, UnwrapOutput, Unwrapper};
pub use grid::GridUnwrapper;
pub use remap::{apply_unwrap, unwrap_mesh};

/// Texel size used when the caller passes a non-positive value.
pub const DEFAULT_TEXEL_SIZE: f32 = 0.1;
