//! Plane placement for multi-plane (YUV) formats.
//!
//! Planes stack vertically: luma first, chroma after it, every plane's
//! height independently rounded to the plane row-alignment granularity
//! before stacking. The two fully-planar variants that differ only in U/V
//! order share one placement routine plus an index swap.

use mica_caps::{
    CapabilityTables, FormatInfo, Generation, PlaneArrangement, TilingMode, PLANE_ROW_ALIGNMENT,
};
use tracing::warn;

use crate::align::align_up_u32;
use crate::descriptor::SurfaceRequest;
use crate::error::LayoutError;

/// Which plane of a multi-plane surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneIndex {
    Y,
    /// Interleaved chroma plane of UV-packed formats.
    Uv,
    U,
    V,
}

/// One plane's placement relative to the surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneDesc {
    pub plane: PlaneIndex,
    /// Byte offset of the plane within its rows.
    pub offset_x_bytes: u32,
    /// Scanline offset of the plane from the surface origin.
    pub offset_y_rows: u32,
    /// Padded plane height in rows.
    pub height_rows: u32,
    /// The plane's pitch is the surface pitch divided by this (2 for the
    /// half-resolution chroma planes of fully-planar formats).
    pub pitch_divisor: u32,
}

pub(crate) struct PlanarLayout {
    pub planes: Vec<PlaneDesc>,
    /// Sum of the padded plane heights; the scanline count the size
    /// computation uses.
    pub total_rows: u32,
    /// The tiling actually used; fully-planar formats downgrade to linear
    /// when the requested tiling cannot express their chroma pitch ratio.
    pub effective_tiling: TilingMode,
    pub tiling_downgraded: bool,
}

pub(crate) fn compute(
    req: &SurfaceRequest,
    info: &FormatInfo,
    valign: u32,
    caps: &CapabilityTables,
) -> Result<PlanarLayout, LayoutError> {
    match info.planes {
        PlaneArrangement::UvPacked { full_height_chroma } => {
            uv_packed(req, full_height_chroma, valign, caps)
        }
        PlaneArrangement::FullyPlanar { swapped_uv } => fully_planar(req, swapped_uv, caps),
        PlaneArrangement::Single => Err(LayoutError::InvalidDescriptor(
            "single-plane format in the planar path".into(),
        )),
    }
}

/// Luma plane followed by one interleaved chroma plane sharing the luma
/// pitch (U and V horizontally co-sited per element pair).
fn uv_packed(
    req: &SurfaceRequest,
    full_height_chroma: bool,
    valign: u32,
    caps: &CapabilityTables,
) -> Result<PlanarLayout, LayoutError> {
    let tiling = req.tiling;
    let y_aligned = align_up_u32(req.height, valign)?;
    let mut y_rows = align_up_u32(y_aligned, PLANE_ROW_ALIGNMENT)?;
    let chroma = if full_height_chroma {
        req.height
    } else {
        req.height.div_ceil(2)
    };
    let mut chroma_rows = align_up_u32(chroma, PLANE_ROW_ALIGNMENT)?;

    // Tile-aligned-plane mode: each plane starts on a tile boundary, so
    // every plane height rounds to the tile row granularity independently.
    if tile_aligned_planes(caps, tiling) {
        let tile = caps
            .tile_geometry(tiling, req.format.info().bytes_per_element)
            .expect("tiled mode has geometry");
        y_rows = align_up_u32(y_rows, tile.height_rows)?;
        chroma_rows = align_up_u32(chroma_rows, tile.height_rows)?;
    }

    let planes = vec![
        PlaneDesc {
            plane: PlaneIndex::Y,
            offset_x_bytes: 0,
            offset_y_rows: 0,
            height_rows: y_rows,
            pitch_divisor: 1,
        },
        PlaneDesc {
            plane: PlaneIndex::Uv,
            offset_x_bytes: 0,
            offset_y_rows: y_rows,
            height_rows: chroma_rows,
            pitch_divisor: 1,
        },
    ];
    Ok(PlanarLayout {
        planes,
        total_rows: y_rows + chroma_rows,
        effective_tiling: tiling,
        tiling_downgraded: false,
    })
}

/// Separate half-resolution U and V planes. Their pitch is half the luma
/// pitch, which no tiled mode in the family can express; a tiled request
/// downgrades to linear rather than keeping an inconsistent pitch.
fn fully_planar(
    req: &SurfaceRequest,
    swapped_uv: bool,
    caps: &CapabilityTables,
) -> Result<PlanarLayout, LayoutError> {
    let mut tiling = req.tiling;
    let mut downgraded = false;
    if !tiling.is_linear() {
        warn!(
            requested = ?tiling,
            generation = ?caps.generation(),
            "fully-planar chroma pitch ratio is incompatible with tiling; \
             downgrading to linear"
        );
        tiling = TilingMode::Linear;
        downgraded = true;
    }

    let y_rows = align_up_u32(req.height, PLANE_ROW_ALIGNMENT)?;
    let chroma_rows = align_up_u32(req.height.div_ceil(2), PLANE_ROW_ALIGNMENT)?;

    let (first, second) = if swapped_uv {
        (PlaneIndex::V, PlaneIndex::U)
    } else {
        (PlaneIndex::U, PlaneIndex::V)
    };
    let planes = vec![
        PlaneDesc {
            plane: PlaneIndex::Y,
            offset_x_bytes: 0,
            offset_y_rows: 0,
            height_rows: y_rows,
            pitch_divisor: 1,
        },
        PlaneDesc {
            plane: first,
            offset_x_bytes: 0,
            offset_y_rows: y_rows,
            height_rows: chroma_rows,
            pitch_divisor: 2,
        },
        PlaneDesc {
            plane: second,
            offset_x_bytes: 0,
            offset_y_rows: y_rows + chroma_rows,
            height_rows: chroma_rows,
            pitch_divisor: 2,
        },
    ];
    Ok(PlanarLayout {
        planes,
        total_rows: y_rows + 2 * chroma_rows,
        effective_tiling: tiling,
        tiling_downgraded: downgraded,
    })
}

/// Generations with auxiliary translation require every plane to begin at a
/// tile boundary when the surface is tiled.
fn tile_aligned_planes(caps: &CapabilityTables, tiling: TilingMode) -> bool {
    caps.generation() == Generation::Gen12 && !tiling.is_linear()
}
