//! Packed mip-tail slot tables.
//!
//! Levels at or beyond the mip-tail start are not individually aligned;
//! they live at fixed (x, y, z) element offsets inside one reserved tile.
//! The offsets are hardware-defined constants per tiling footprint and
//! bytes-per-element, not derived arithmetically. Slot index 0 holds the
//! tail-start level, slot 1 the next smaller level, and so on; chains deep
//! enough to exhaust the table share the final slot.

use crate::tiling::{bpe_log2_index, TilingMode};

/// Fixed element offset of one packed level inside the tail tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipTailSlot {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

const fn s(x: u32, y: u32) -> MipTailSlot {
    MipTailSlot { x, y, z: 0 }
}

static TAIL_4K_BPE1: [MipTailSlot; 15] = [
    s(0, 0), s(32, 0), s(32, 32), s(48, 32), s(48, 48),
    s(56, 48), s(56, 56), s(60, 56), s(60, 60), s(62, 60),
    s(62, 62), s(63, 62), s(63, 63), s(63, 63), s(63, 63),
];
static TAIL_4K_BPE2: [MipTailSlot; 15] = [
    s(0, 0), s(32, 0), s(32, 16), s(48, 16), s(48, 24),
    s(56, 24), s(56, 28), s(60, 28), s(60, 30), s(62, 30),
    s(62, 31), s(63, 31), s(63, 31), s(63, 31), s(63, 31),
];
static TAIL_4K_BPE4: [MipTailSlot; 15] = [
    s(0, 0), s(16, 0), s(16, 16), s(24, 16), s(24, 24),
    s(28, 24), s(28, 28), s(30, 28), s(30, 30), s(31, 30),
    s(31, 31), s(31, 31), s(31, 31), s(31, 31), s(31, 31),
];
static TAIL_4K_BPE8: [MipTailSlot; 15] = [
    s(0, 0), s(16, 0), s(16, 8), s(24, 8), s(24, 12),
    s(28, 12), s(28, 14), s(30, 14), s(30, 15), s(31, 15),
    s(31, 15), s(31, 15), s(31, 15), s(31, 15), s(31, 15),
];
static TAIL_4K_BPE16: [MipTailSlot; 15] = [
    s(0, 0), s(8, 0), s(8, 8), s(12, 8), s(12, 12),
    s(14, 12), s(14, 14), s(15, 14), s(15, 15), s(15, 15),
    s(15, 15), s(15, 15), s(15, 15), s(15, 15), s(15, 15),
];

static TAIL_64K_BPE1: [MipTailSlot; 15] = [
    s(0, 0), s(128, 0), s(128, 128), s(192, 128), s(192, 192),
    s(224, 192), s(224, 224), s(240, 224), s(240, 240), s(248, 240),
    s(248, 248), s(252, 248), s(252, 252), s(254, 252), s(254, 254),
];
static TAIL_64K_BPE2: [MipTailSlot; 15] = [
    s(0, 0), s(128, 0), s(128, 64), s(192, 64), s(192, 96),
    s(224, 96), s(224, 112), s(240, 112), s(240, 120), s(248, 120),
    s(248, 124), s(252, 124), s(252, 126), s(254, 126), s(254, 127),
];
static TAIL_64K_BPE4: [MipTailSlot; 15] = [
    s(0, 0), s(64, 0), s(64, 64), s(96, 64), s(96, 96),
    s(112, 96), s(112, 112), s(120, 112), s(120, 120), s(124, 120),
    s(124, 124), s(126, 124), s(126, 126), s(127, 126), s(127, 127),
];
static TAIL_64K_BPE8: [MipTailSlot; 15] = [
    s(0, 0), s(64, 0), s(64, 32), s(96, 32), s(96, 48),
    s(112, 48), s(112, 56), s(120, 56), s(120, 60), s(124, 60),
    s(124, 62), s(126, 62), s(126, 63), s(127, 63), s(127, 63),
];
static TAIL_64K_BPE16: [MipTailSlot; 15] = [
    s(0, 0), s(32, 0), s(32, 32), s(48, 32), s(48, 48),
    s(56, 48), s(56, 56), s(60, 56), s(60, 60), s(62, 60),
    s(62, 62), s(63, 62), s(63, 63), s(63, 63), s(63, 63),
];

/// Slot table for `tiling` at `bytes_per_element`, `None` when the tiling
/// has no packed mip tail.
pub fn slots(tiling: TilingMode, bytes_per_element: u32) -> Option<&'static [MipTailSlot]> {
    if !tiling.has_mip_tail() {
        return None;
    }
    let tables_4k: [&'static [MipTailSlot]; 5] = [
        &TAIL_4K_BPE1,
        &TAIL_4K_BPE2,
        &TAIL_4K_BPE4,
        &TAIL_4K_BPE8,
        &TAIL_4K_BPE16,
    ];
    let tables_64k: [&'static [MipTailSlot]; 5] = [
        &TAIL_64K_BPE1,
        &TAIL_64K_BPE2,
        &TAIL_64K_BPE4,
        &TAIL_64K_BPE8,
        &TAIL_64K_BPE16,
    ];
    let index = bpe_log2_index(bytes_per_element);
    match tiling {
        TilingMode::TileYf => Some(tables_4k[index]),
        TilingMode::TileYs | TilingMode::Tile64 => Some(tables_64k[index]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::tile_geometry;

    #[test]
    fn every_slot_lies_inside_its_tile() {
        for tiling in [TilingMode::TileYf, TilingMode::TileYs, TilingMode::Tile64] {
            for bpe in [1u32, 2, 4, 8, 16] {
                let geometry = tile_geometry(tiling, bpe).unwrap();
                let width_elements = geometry.width_elements(bpe);
                for slot in slots(tiling, bpe).unwrap() {
                    assert!(slot.x < width_elements, "{tiling:?}/{bpe}: x {}", slot.x);
                    assert!(slot.y < geometry.height_rows, "{tiling:?}/{bpe}: y {}", slot.y);
                    assert_eq!(slot.z, 0);
                }
            }
        }
    }

    #[test]
    fn slot_zero_is_the_tile_origin() {
        for tiling in [TilingMode::TileYf, TilingMode::TileYs, TilingMode::Tile64] {
            let table = slots(tiling, 4).unwrap();
            assert_eq!(table[0], s(0, 0));
            assert_eq!(table.len(), 15);
        }
    }

    #[test]
    fn tilings_without_a_tail_have_no_slot_table() {
        assert!(slots(TilingMode::Linear, 4).is_none());
        assert!(slots(TilingMode::TileY, 4).is_none());
        assert!(slots(TilingMode::Tile4, 4).is_none());
    }
}
