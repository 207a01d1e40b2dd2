//! Error taxonomy for layout computation.
//!
//! Every error is local to one compute call: no partially-finalized layout
//! escapes, and no state needs rolling back.

use mica_caps::{Generation, SurfaceFormat, TilingMode};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The format cannot be used with the requested usage or surface kind
    /// (e.g. depth usage on a block-compressed format).
    #[error("format {format:?} unsupported for this request: {reason}")]
    UnsupportedFormat {
        format: SurfaceFormat,
        reason: &'static str,
    },

    /// The tiling mode does not exist on the generation, or cannot carry the
    /// requested format.
    #[error("tiling {tiling:?} unsupported for {format:?} on {generation:?}")]
    UnsupportedTiling {
        tiling: TilingMode,
        format: SurfaceFormat,
        generation: Generation,
    },

    /// Structurally impossible input: zero dimension after normalization,
    /// LOD count past the chain, bad sample count, cube aspect violation.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// The finalized size exceeds the platform's maximum addressable
    /// surface size.
    #[error("surface too large: {size} bytes exceeds platform maximum {max}")]
    SurfaceTooLarge { size: u64, max: u64 },
}
