//! Mip-chain layout: per-level aligned extents, mip-tail packing, and the
//! block height (QPitch) shared by every array slice.
//!
//! Levels are placed in the classic two-column arrangement: LOD0 at the
//! origin, LOD1 directly below it, LOD2 to the right of LOD1, and LOD3+
//! stacked below LOD2. The surface is therefore never wider than
//! `max(w0, w1 + w2)` and never taller per slice than
//! `h0 + max(h1, h2 + h3 + ...)`.
//!
//! All extents here are in *units*: elements for uncompressed formats,
//! compressed blocks otherwise. One unit row corresponds to one memory row.

use mica_caps::{AlignmentUnits, CapabilityTables, FormatInfo, TileGeometry, TilingMode};

use crate::align::align_up_u32;
use crate::descriptor::{SurfaceKind, SurfaceRequest};
use crate::error::LayoutError;

/// Origin of one level (or of the mip-tail tile) in unit coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LodOrigin {
    pub x_units: u32,
    pub y_units: u32,
}

/// The mip walk's result, consumed by the finalizer and address resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MipLayout {
    /// Origins for levels below the mip tail, indexed by LOD.
    pub lod_origins: Vec<LodOrigin>,
    /// First packed level, if the chain reaches the tail.
    pub mip_tail_start: Option<u32>,
    /// Origin of the reserved tail tile.
    pub tail_origin: Option<LodOrigin>,
    /// Padded surface width in units.
    pub aligned_width_units: u32,
    /// Per-slice padded height in unit rows (QPitch); tile-row aligned for
    /// tiled modes.
    pub qpitch_rows: u32,
    /// Array count after cube-face, 3D-depth, and MSAA pseudo-array
    /// expansion. Sample expansion happens here and only here.
    pub expanded_array_count: u32,
}

/// Interleaved-MSAA extent scaling for tilings that do not store samples as
/// pseudo-array planes.
fn interleave_scale(sample_count: u32) -> (u32, u32) {
    match sample_count {
        2 => (2, 1),
        4 => (2, 2),
        8 => (4, 2),
        16 => (4, 4),
        _ => (1, 1),
    }
}

/// Whether this tiling stores MSAA samples as pseudo-array planes rather
/// than interleaving them into the pixel grid.
fn samples_as_array(tiling: TilingMode) -> bool {
    matches!(tiling.footprint_bytes(), Some(f) if f >= 65536)
}

fn lod_extent(base: u32, lod: u32) -> u32 {
    (base >> lod).max(1)
}

fn units(extent: u32, block: u32) -> u32 {
    extent.div_ceil(block)
}

pub(crate) fn compute(
    req: &SurfaceRequest,
    info: &FormatInfo,
    units_align: AlignmentUnits,
    caps: &CapabilityTables,
) -> Result<MipLayout, LayoutError> {
    // Alignment collapses to one block for compressed formats whose block
    // exceeds the raw unit.
    let mut halign = (units_align.halign / info.block_width).max(1);
    let mut valign = (units_align.valign / info.block_height).max(1);

    let tile = caps.tile_geometry(req.tiling, info.bytes_per_element);

    // Standard tilings place every level on a tile corner, so the reserved
    // tail tile never straddles a tile boundary.
    if let Some(tile) = tile {
        if req.tiling.has_mip_tail() {
            halign = halign.max(tile.width_elements(info.bytes_per_element));
            valign = valign.max(tile.height_rows);
        }
    }

    let (mut base_w, mut base_h) = (req.width, req.height);
    if req.sample_count > 1 && !samples_as_array(req.tiling) {
        let (sx, sy) = interleave_scale(req.sample_count);
        base_w = crate::align::checked_mul_u32(base_w, sx)?;
        base_h = crate::align::checked_mul_u32(base_h, sy)?;
    }

    // 1D chains are a single row of elements per level; the vertical and
    // depth units do not apply.
    let one_dimensional = matches!(req.kind, SurfaceKind::Surf1D);

    let aligned_w = |lod: u32| -> Result<u32, LayoutError> {
        align_up_u32(units(lod_extent(base_w, lod), info.block_width), halign)
    };
    let aligned_h = |lod: u32| -> Result<u32, LayoutError> {
        if one_dimensional {
            return Ok(1);
        }
        align_up_u32(units(lod_extent(base_h, lod), info.block_height), valign)
    };

    let mip_tail_start = match (tile, req.tiling.has_mip_tail()) {
        (Some(tile), true) => first_tail_level(req, info, base_w, base_h, tile),
        _ => None,
    };

    // Effective per-level extents for stacking: levels below the tail keep
    // their aligned extents; the tail itself is one tile.
    let last_level = mip_tail_start.unwrap_or(req.max_lod);
    let mut widths = Vec::with_capacity(last_level as usize + 1);
    let mut heights = Vec::with_capacity(last_level as usize + 1);
    for lod in 0..=last_level {
        if Some(lod) == mip_tail_start {
            let tile = tile.expect("mip tail implies tiled");
            widths.push(tile.width_elements(info.bytes_per_element));
            heights.push(tile.height_rows);
        } else {
            widths.push(aligned_w(lod)?);
            heights.push(aligned_h(lod)?);
        }
    }

    let w0 = widths[0];
    let w1 = widths.get(1).copied().unwrap_or(0);
    let w2 = widths.get(2).copied().unwrap_or(0);
    let aligned_width_units = w0.max(
        w1.checked_add(w2)
            .ok_or_else(|| LayoutError::InvalidDescriptor("width overflow".into()))?,
    );

    let h0 = heights[0];
    let block_height = if heights.len() == 1 {
        h0
    } else {
        let h1 = heights[1];
        let lower: u32 = heights[2..].iter().sum();
        align_up_u32(h0 + h1.max(lower), valign)?
    };

    // Origins follow the two-column placement. The tail tile, when present,
    // takes the origin its start level would have had.
    let mut origins = Vec::with_capacity(heights.len());
    let mut below_lod2 = h0;
    for lod in 0..heights.len() as u32 {
        let origin = match lod {
            0 => LodOrigin {
                x_units: 0,
                y_units: 0,
            },
            1 => LodOrigin {
                x_units: 0,
                y_units: h0,
            },
            _ => {
                let origin = LodOrigin {
                    x_units: w1,
                    y_units: below_lod2,
                };
                below_lod2 += heights[lod as usize];
                origin
            }
        };
        origins.push(origin);
    }
    let tail_origin = mip_tail_start.map(|start| origins[start as usize]);
    if mip_tail_start.is_some() {
        origins.pop();
    }

    // Each slice must begin on a tile row so slices never share a tile.
    let qpitch_rows = match tile {
        Some(tile) => align_up_u32(block_height, tile.height_rows)?,
        None => block_height,
    };

    let expanded_array_count = expanded_array_count(req, units_align)?;

    Ok(MipLayout {
        lod_origins: origins,
        mip_tail_start,
        tail_origin,
        aligned_width_units,
        qpitch_rows,
        expanded_array_count,
    })
}

/// The smallest LOD whose unpadded footprint fits within one tile, if the
/// chain reaches it.
fn first_tail_level(
    req: &SurfaceRequest,
    info: &FormatInfo,
    base_w: u32,
    base_h: u32,
    tile: TileGeometry,
) -> Option<u32> {
    for lod in 0..=req.max_lod {
        let width_bytes =
            units(lod_extent(base_w, lod), info.block_width).checked_mul(info.bytes_per_element)?;
        let height_rows = units(lod_extent(base_h, lod), info.block_height);
        if width_bytes <= tile.width_bytes && height_rows <= tile.height_rows {
            return Some(lod);
        }
    }
    None
}

fn expanded_array_count(
    req: &SurfaceRequest,
    units_align: AlignmentUnits,
) -> Result<u32, LayoutError> {
    let mut count = match req.kind {
        SurfaceKind::Surf3D => align_up_u32(req.depth, units_align.dalign)?,
        SurfaceKind::Cube => crate::align::checked_mul_u32(req.array_size, 6)?,
        _ => req.array_size,
    };
    if req.sample_count > 1 && samples_as_array(req.tiling) {
        count = crate::align::checked_mul_u32(count, req.sample_count)?;
    }
    Ok(count)
}
