//! Horizontal/vertical/depth unit-alignment tables.
//!
//! HAlign/VAlign are the element-granular units that *every* mip level's
//! padded extent must round up to, not just LOD0. They are always powers of
//! two. For block-compressed formats the engine converts extents to block
//! counts first and then applies these units divided down to block
//! granularity (collapsing to one block when the raw unit is smaller than a
//! block).

use crate::{Generation, TilingMode};

/// Usage class selecting an alignment row. Derived from usage flags by the
/// layout engine; depth and stencil carry their own hardware units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentClass {
    Color,
    Depth,
    Stencil,
}

/// The alignment triple, in elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentUnits {
    pub halign: u32,
    pub valign: u32,
    pub dalign: u32,
}

/// Alignment units for one generation/class/tiling combination.
///
/// Mip-tail-capable tilings carry a depth alignment so 3D depth slices pack
/// at tile granularity; everything else leaves depth unconstrained.
pub fn alignment_units(
    generation: Generation,
    class: AlignmentClass,
    tiling: TilingMode,
) -> AlignmentUnits {
    let (halign, valign) = match (generation, class) {
        (Generation::Gen9 | Generation::Gen11, AlignmentClass::Color) => (16, 4),
        (Generation::Gen9 | Generation::Gen11, AlignmentClass::Depth) => (8, 4),
        (Generation::Gen9 | Generation::Gen11, AlignmentClass::Stencil) => (8, 8),
        (Generation::Gen12, AlignmentClass::Color) => (16, 4),
        (Generation::Gen12, AlignmentClass::Depth) => (8, 8),
        (Generation::Gen12, AlignmentClass::Stencil) => (16, 8),
    };
    let dalign = if tiling.has_mip_tail() { 4 } else { 1 };
    AlignmentUnits {
        halign,
        valign,
        dalign,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_units_are_powers_of_two() {
        for generation in [Generation::Gen9, Generation::Gen11, Generation::Gen12] {
            for class in [
                AlignmentClass::Color,
                AlignmentClass::Depth,
                AlignmentClass::Stencil,
            ] {
                for tiling in [TilingMode::Linear, TilingMode::TileYs, TilingMode::Tile64] {
                    let units = alignment_units(generation, class, tiling);
                    assert!(units.halign.is_power_of_two());
                    assert!(units.valign.is_power_of_two());
                    assert!(units.dalign.is_power_of_two());
                }
            }
        }
    }

    #[test]
    fn depth_alignment_only_applies_to_mip_tail_tilings() {
        let linear = alignment_units(Generation::Gen12, AlignmentClass::Color, TilingMode::Linear);
        let tile64 = alignment_units(Generation::Gen12, AlignmentClass::Color, TilingMode::Tile64);
        assert_eq!(linear.dalign, 1);
        assert_eq!(tile64.dalign, 4);
    }
}
