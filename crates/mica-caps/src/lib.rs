#![forbid(unsafe_code)]

//! Read-only capability tables for the mica surface layout engine.
//!
//! Everything in this crate is `'static` data selected by a [`Generation`]
//! tag: format shape facts, horizontal/vertical/depth alignment units, tile
//! geometry, packed mip-tail slot tables, and compression (CCS) scaling
//! units. The layout engine in `mica-layout` consumes these tables through
//! an explicit [`CapabilityTables`] handle; there is no process-wide
//! "current platform" state.
//!
//! Tables are populated once (they are compile-time constants) and are safe
//! for unsynchronized concurrent reads.

pub mod alignment;
pub mod ccs;
pub mod format;
pub mod miptail;
pub mod tiling;

pub use alignment::{AlignmentClass, AlignmentUnits};
pub use ccs::{CcsUnit, FLAT_CCS_RATIO};
pub use format::{FormatInfo, PlaneArrangement, SurfaceFormat};
pub use miptail::MipTailSlot;
pub use tiling::{TileGeometry, TilingMode};

/// Hardware generation selector.
///
/// Generations differ in which tiling modes exist, which alignment units
/// apply, and how auxiliary compression surfaces scale. The numeric tables
/// in this crate are keyed by generation or by tiling class; retargeting to
/// another part in the family means supplying that part's constant set here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    Gen9,
    Gen11,
    Gen12,
}

/// Dimension and LOD limits for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformLimits {
    /// Maximum width/height for 1D/2D/Cube surfaces, in texels.
    pub max_extent_2d: u32,
    /// Maximum width/height/depth for 3D surfaces, in texels.
    pub max_extent_3d: u32,
    /// Maximum array length (before cube-face expansion).
    pub max_array_size: u32,
    /// Maximum mip index (LOD count - 1).
    pub max_lod: u32,
    /// Maximum addressable byte size of one surface (all slices included).
    pub max_surface_bytes: u64,
}

/// CPU page size used for auxiliary surface and base alignments.
pub const PAGE_SIZE: u64 = 4096;

/// Row-alignment granularity applied to each plane of a planar surface
/// before planes are stacked.
pub const PLANE_ROW_ALIGNMENT: u32 = 16;

/// The capability-table bundle for one hardware generation.
///
/// Cheap to construct and `Copy`; every contained table is `'static`.
/// Intended to be built once at initialization and shared by reference
/// across all surface computations for that generation.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityTables {
    generation: Generation,
    limits: PlatformLimits,
}

impl CapabilityTables {
    pub fn new(generation: Generation) -> Self {
        let limits = match generation {
            Generation::Gen9 | Generation::Gen11 => PlatformLimits {
                max_extent_2d: 16384,
                max_extent_3d: 2048,
                max_array_size: 2048,
                max_lod: 14,
                max_surface_bytes: 1 << 36,
            },
            Generation::Gen12 => PlatformLimits {
                max_extent_2d: 16384,
                max_extent_3d: 2048,
                max_array_size: 2048,
                max_lod: 14,
                max_surface_bytes: 1 << 38,
            },
        };
        Self { generation, limits }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn limits(&self) -> &PlatformLimits {
        &self.limits
    }

    /// Whether `tiling` exists at all on this generation.
    pub fn supports_tiling(&self, tiling: TilingMode) -> bool {
        use TilingMode::*;
        match self.generation {
            Generation::Gen9 | Generation::Gen11 => {
                matches!(tiling, Linear | TileX | TileY | TileYf | TileYs)
            }
            Generation::Gen12 => matches!(tiling, Linear | Tile4 | Tile64),
        }
    }

    /// Tile footprint for `tiling` at the given bytes-per-element.
    ///
    /// Returns `None` for [`TilingMode::Linear`], which has no tile
    /// granularity.
    pub fn tile_geometry(&self, tiling: TilingMode, bytes_per_element: u32) -> Option<TileGeometry> {
        tiling::tile_geometry(tiling, bytes_per_element)
    }

    /// Alignment units every mip level's padded extent must satisfy.
    ///
    /// Units are elements (blocks for block-compressed formats, after the
    /// caller converts extents to block counts).
    pub fn alignment(&self, class: AlignmentClass, tiling: TilingMode) -> AlignmentUnits {
        alignment::alignment_units(self.generation, class, tiling)
    }

    /// Hardware slot offsets for levels packed into the mip tail.
    ///
    /// Returns `None` when `tiling` has no packed mip tail.
    pub fn mip_tail_slots(
        &self,
        tiling: TilingMode,
        bytes_per_element: u32,
    ) -> Option<&'static [MipTailSlot]> {
        miptail::slots(tiling, bytes_per_element)
    }

    /// Compression scaling unit for a parent surface of the given tiling.
    ///
    /// Keyed by the tiling's footprint class (4KiB vs 64KiB), not the exact
    /// generation. Returns `None` for linear parents, which only support
    /// flat compression.
    pub fn ccs_unit(&self, parent_tiling: TilingMode) -> Option<&'static CcsUnit> {
        ccs::ccs_unit(parent_tiling)
    }

    /// Base alignment for an auxiliary surface attached to a parent of the
    /// given tiling.
    pub fn aux_base_alignment(&self, parent_tiling: TilingMode) -> u64 {
        match parent_tiling.footprint_bytes() {
            Some(f) if f >= 65536 => 65536,
            _ => PAGE_SIZE,
        }
    }
}
