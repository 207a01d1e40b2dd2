//! Compression-state (CCS) scaling units.
//!
//! A legacy-mode auxiliary surface has its own tiled layout scaled down from
//! the parent by fixed per-tiling-class factors; a flat-mode auxiliary
//! surface is a byte-linear buffer sized as a fixed fraction of the parent.
//! Both families map 256 parent bytes to one auxiliary byte.

use crate::TilingMode;

/// One auxiliary byte covers this many parent bytes in flat mode.
pub const FLAT_CCS_RATIO: u64 = 256;

/// Scaling record mapping parent byte dimensions to auxiliary byte
/// dimensions for legacy-mode compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcsUnit {
    /// Parent pitch is rounded up to this many bytes before downscaling.
    pub align_width: u32,
    /// Parent height is rounded up to this many rows before downscaling.
    pub align_height: u32,
    /// Parent depth is rounded up to this before downscaling.
    pub align_depth: u32,
    /// Parent bytes per auxiliary byte, horizontally.
    pub downscale_width: u32,
    /// Parent rows per auxiliary row.
    pub downscale_height: u32,
    /// Parent depth slices per auxiliary slice.
    pub downscale_depth: u32,
}

impl CcsUnit {
    /// Parent byte area covered by one auxiliary byte.
    pub const fn downscale_area(&self) -> u32 {
        self.downscale_width * self.downscale_height * self.downscale_depth
    }
}

// One unit per tiling footprint class. The 4KiB class trades a wide flat
// downscale; the 64KiB class covers square regions. Both preserve the
// 256:1 byte ratio.
static CCS_UNIT_4K: CcsUnit = CcsUnit {
    align_width: 32,
    align_height: 8,
    align_depth: 1,
    downscale_width: 32,
    downscale_height: 8,
    downscale_depth: 1,
};

static CCS_UNIT_64K: CcsUnit = CcsUnit {
    align_width: 16,
    align_height: 16,
    align_depth: 1,
    downscale_width: 16,
    downscale_height: 16,
    downscale_depth: 1,
};

/// Scaling unit for a parent of the given tiling, keyed by footprint class.
///
/// Linear parents have no legacy-mode unit; they only support flat
/// compression.
pub fn ccs_unit(parent_tiling: TilingMode) -> Option<&'static CcsUnit> {
    match parent_tiling.footprint_bytes() {
        None => None,
        Some(footprint) if footprint >= 65536 => Some(&CCS_UNIT_64K),
        Some(_) => Some(&CCS_UNIT_4K),
    }
}
