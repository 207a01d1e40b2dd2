#![forbid(unsafe_code)]

//! Surface layout engine for the mica graphics-accelerator family.
//!
//! Given a logical surface description (format, extents, mip/array/sample
//! counts, tiling, usage) and a generation's capability tables, this crate
//! computes the byte-exact physical layout the hardware requires: pitch,
//! padded extents, per-mip and per-slice offsets, plane placement for YUV
//! formats, and the size/alignment of auxiliary compression-state surfaces.
//!
//! The engine is a pure function: capability tables are read-only `'static`
//! data behind [`mica_caps::CapabilityTables`], requests are never mutated,
//! and results come back as immutable [`SurfaceLayout`] values. Two
//! independent layouts can be computed concurrently with no shared state.
//!
//! ```
//! use mica_caps::{CapabilityTables, Generation, SurfaceFormat, TilingMode};
//! use mica_layout::{compute_layout, Restrictions, SurfaceRequest};
//!
//! let caps = CapabilityTables::new(Generation::Gen12);
//! let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 800, 600);
//! req.tiling = TilingMode::Tile4;
//! let layout = compute_layout(&req, &caps, &Restrictions::default()).unwrap();
//! assert_eq!(layout.pitch % 128, 0);
//! assert_eq!(layout.size % 4096, 0);
//! ```

mod align;
mod descriptor;
mod error;
mod finalize;
mod mip;
mod planar;

mod address;
mod aux;

pub use address::{SubresourceIndex, SubresourceOffset};
pub use aux::{compute_aux_layout, AuxLayout, CompressionMode};
pub use descriptor::{Restrictions, SurfaceKind, SurfaceRequest, UsageFlags};
pub use error::LayoutError;
pub use finalize::{compute_layout, SurfaceLayout};
pub use planar::{PlaneDesc, PlaneIndex};
