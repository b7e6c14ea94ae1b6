//! Bake orchestration: settings, error codes, progress/cancellation, the
//! phase pipeline, and the baked-lightmap output sink.
#![forbid(unsafe_code)]

mod baker;
mod error;
mod output;
mod progress;
mod settings;

pub use baker::LightmapBaker;
pub use error::BakeError;
pub use output::{BakedLightmap, LightmapUser};
pub use progress::{CancelToken, ProgressFn};
pub use settings::{BakeQuality, BakeSettings};
