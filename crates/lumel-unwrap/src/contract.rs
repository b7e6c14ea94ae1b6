use lumel_geom::{Vec2, Vec3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnwrapError {
    /// The input does not satisfy the contract (too few vertices, empty or
    /// ragged index list).
    #[error("invalid unwrap input: {0}")]
    InvalidInput(&'static str),
    /// The backing algorithm could not produce charts for this geometry.
    #[error("unwrap unavailable for this geometry")]
    Unavailable,
}

/// Borrowed view of the buffers handed to the chart generator.
#[derive(Clone, Copy, Debug)]
pub struct UnwrapInput<'a> {
    pub positions: &'a [Vec3],
    /// May be empty; algorithms that need normals derive face normals.
    pub normals: &'a [Vec3],
    /// Non-empty, length a multiple of 3.
    pub indices: &'a [u32],
    /// World-space size of one lightmap texel.
    pub texel_size: f32,
}

impl UnwrapInput<'_> {
    pub fn validate(&self) -> Result<(), UnwrapError> {
        if self.positions.len() < 3 {
            return Err(UnwrapError::InvalidInput("fewer than 3 vertices"));
        }
        if self.indices.is_empty() {
            return Err(UnwrapError::InvalidInput("empty triangle index list"));
        }
        if self.indices.len() % 3 != 0 {
            return Err(UnwrapError::InvalidInput(
                "index count is not a multiple of 3",
            ));
        }
        Ok(())
    }
}

/// Chart-generation result. New vertex `i` descends from old vertex
/// `cross_refs[i]`; vertex-indexed attributes are remapped through that
/// table.
#[derive(Clone, Debug, PartialEq)]
pub struct UnwrapOutput {
    pub cross_refs: Vec<u32>,
    /// One non-overlapping UV2 per new vertex, inside `[0,1]^2`.
    pub uv2s: Vec<Vec2>,
    pub indices: Vec<u32>,
    /// Suggested lightmap resolution in texels.
    pub size_hint: (u32, u32),
}

/// The external chart-generation algorithm, treated as a pure function of
/// its input. Implementations must be deterministic: identical input bytes
/// produce identical output bytes.
pub trait Unwrapper: Send + Sync {
    fn unwrap(&self, input: &UnwrapInput) -> Result<UnwrapOutput, UnwrapError>;
}
