//! Tiling modes and tile footprint geometry.
//!
//! A tile is the unit of the hardware's address swizzle: a fixed byte
//! footprint with a width-in-bytes × height-in-rows split. Legacy tilings
//! (TileX/TileY/Tile4) use one fixed split regardless of element size; the
//! standard tilings (TileYf/TileYs/Tile64) split their footprint differently
//! per bytes-per-element so that a tile always covers a power-of-two element
//! rectangle.

/// Hardware memory layout of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilingMode {
    /// Row-major, no swizzle. The only mode without tile granularity.
    Linear,
    /// Legacy 4KiB tile, 512B × 8 rows.
    TileX,
    /// Legacy 4KiB tile, 128B × 32 rows.
    TileY,
    /// 4KiB standard tile with a per-element-size split; supports packed
    /// mip tails.
    TileYf,
    /// 64KiB standard tile with a per-element-size split; supports packed
    /// mip tails.
    TileYs,
    /// 4KiB tile, 128B × 32 rows.
    Tile4,
    /// 64KiB tile with a per-element-size split; supports packed mip tails.
    Tile64,
}

impl TilingMode {
    /// Total tile byte footprint, `None` for linear.
    pub fn footprint_bytes(self) -> Option<u32> {
        match self {
            TilingMode::Linear => None,
            TilingMode::TileX | TilingMode::TileY | TilingMode::TileYf | TilingMode::Tile4 => {
                Some(4096)
            }
            TilingMode::TileYs | TilingMode::Tile64 => Some(65536),
        }
    }

    /// Whether the smallest mip levels pack into a single reserved tile.
    pub fn has_mip_tail(self) -> bool {
        matches!(
            self,
            TilingMode::TileYf | TilingMode::TileYs | TilingMode::Tile64
        )
    }

    pub fn is_linear(self) -> bool {
        matches!(self, TilingMode::Linear)
    }
}

/// One tile's logical footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    /// Tile width in bytes.
    pub width_bytes: u32,
    /// Tile height in rows.
    pub height_rows: u32,
}

impl TileGeometry {
    pub const fn total_bytes(self) -> u32 {
        self.width_bytes * self.height_rows
    }

    /// Tile width in elements for the given element size.
    pub fn width_elements(self, bytes_per_element: u32) -> u32 {
        self.width_bytes / bytes_per_element
    }
}

const fn geom(width_bytes: u32, height_rows: u32) -> TileGeometry {
    TileGeometry {
        width_bytes,
        height_rows,
    }
}

// Standard-tiling splits keyed by log2(bytes-per-element). Each row keeps
// the footprint constant while trading width for height.
const TILE_YF_SPLITS: [TileGeometry; 5] = [
    geom(64, 64),  // 1 Bpe
    geom(128, 32), // 2 Bpe
    geom(128, 32), // 4 Bpe
    geom(256, 16), // 8 Bpe
    geom(256, 16), // 16 Bpe
];

const TILE_64K_SPLITS: [TileGeometry; 5] = [
    geom(256, 256),  // 1 Bpe
    geom(512, 128),  // 2 Bpe
    geom(512, 128),  // 4 Bpe
    geom(1024, 64),  // 8 Bpe
    geom(1024, 64),  // 16 Bpe
];

pub(crate) fn bpe_log2_index(bytes_per_element: u32) -> usize {
    debug_assert!(bytes_per_element.is_power_of_two());
    (bytes_per_element.trailing_zeros() as usize).min(4)
}

/// Tile footprint for `tiling` at `bytes_per_element`; `None` for linear.
pub fn tile_geometry(tiling: TilingMode, bytes_per_element: u32) -> Option<TileGeometry> {
    match tiling {
        TilingMode::Linear => None,
        TilingMode::TileX => Some(geom(512, 8)),
        TilingMode::TileY | TilingMode::Tile4 => Some(geom(128, 32)),
        TilingMode::TileYf => Some(TILE_YF_SPLITS[bpe_log2_index(bytes_per_element)]),
        TilingMode::TileYs | TilingMode::Tile64 => {
            Some(TILE_64K_SPLITS[bpe_log2_index(bytes_per_element)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_splits_preserve_the_footprint() {
        for split in TILE_YF_SPLITS {
            assert_eq!(split.total_bytes(), 4096);
        }
        for split in TILE_64K_SPLITS {
            assert_eq!(split.total_bytes(), 65536);
        }
    }

    #[test]
    fn geometry_matches_declared_footprint() {
        for tiling in [
            TilingMode::TileX,
            TilingMode::TileY,
            TilingMode::TileYf,
            TilingMode::TileYs,
            TilingMode::Tile4,
            TilingMode::Tile64,
        ] {
            for bpe in [1, 2, 4, 8, 16] {
                let geometry = tile_geometry(tiling, bpe).unwrap();
                assert_eq!(
                    geometry.total_bytes(),
                    tiling.footprint_bytes().unwrap(),
                    "{tiling:?} at {bpe} Bpe"
                );
            }
        }
        assert!(tile_geometry(TilingMode::Linear, 4).is_none());
    }

    #[test]
    fn standard_tile_width_is_a_whole_number_of_elements() {
        for bpe in [1u32, 2, 4, 8, 16] {
            for tiling in [TilingMode::TileYf, TilingMode::TileYs, TilingMode::Tile64] {
                let geometry = tile_geometry(tiling, bpe).unwrap();
                assert_eq!(geometry.width_bytes % bpe, 0);
                assert!(geometry.width_elements(bpe).is_power_of_two());
            }
        }
    }
}
