//! Pitch/size finalization and the top-level layout entry point.
//!
//! `compute_layout` is the whole engine: resolve format and alignment
//! facts, walk the mip chain (or place planes), then finalize pitch and
//! size under the caller's restrictions and the tiling granularity. The
//! input request is never mutated; the result is a new, immutable
//! [`SurfaceLayout`].

use mica_caps::{
    AlignmentClass, CapabilityTables, Generation, SurfaceFormat, TilingMode,
};
use tracing::debug;

use crate::align::{align_up_u32, align_up_u64, checked_mul_u32, checked_mul_u64};
use crate::descriptor::{Restrictions, SurfaceKind, SurfaceRequest, UsageFlags};
use crate::error::LayoutError;
use crate::mip::{self, LodOrigin};
use crate::planar::{self, PlaneDesc};

/// A finalized surface layout.
///
/// Produced exactly once per request; all fields are set by the engine and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub kind: SurfaceKind,
    pub format: SurfaceFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub array_size: u32,
    pub max_lod: u32,
    pub sample_count: u32,
    pub usage: UsageFlags,
    pub generation: Generation,

    /// The tiling actually laid out; may differ from the request when the
    /// planar engine downgraded to linear.
    pub tiling: TilingMode,
    pub tiling_downgraded: bool,

    /// Alignment units, in elements.
    pub halign: u32,
    pub valign: u32,
    pub dalign: u32,

    /// Final row pitch in bytes.
    pub pitch: u32,
    /// Distance between array slices, in rows.
    pub qpitch_rows: u32,
    /// Total scanline count used for the size computation.
    pub total_rows: u32,
    /// Total byte size, rounded to the base alignment.
    pub size: u64,
    /// The base alignment the size was rounded to.
    pub base_alignment: u64,

    /// Array count after cube/3D/MSAA expansion.
    pub expanded_array_count: u32,
    /// First packed mip level, when the chain reaches the tail.
    pub mip_tail_start: Option<u32>,
    /// Plane placements for multi-plane formats; empty otherwise.
    pub planes: Vec<PlaneDesc>,

    /// Bytes per element (per block for compressed formats).
    pub bytes_per_element: u32,

    pub(crate) lod_origins: Vec<LodOrigin>,
    pub(crate) tail_origin: Option<LodOrigin>,
}

/// Compute the full physical layout for one surface request.
pub fn compute_layout(
    req: &SurfaceRequest,
    caps: &CapabilityTables,
    restrictions: &Restrictions,
) -> Result<SurfaceLayout, LayoutError> {
    let req = req.normalized();
    req.validate(caps)?;
    let info = req.format.info();

    if matches!(req.kind, SurfaceKind::Buffer) {
        return buffer_layout(&req, caps, restrictions);
    }

    let class = alignment_class(&req);
    let mut units = caps.alignment(class, req.tiling);
    if matches!(req.kind, SurfaceKind::Surf1D) {
        units.valign = 1;
        units.dalign = 1;
    }

    let lockable = req.usage.contains(UsageFlags::CPU_LOCKABLE);

    let (layout, effective_tiling) = if req.is_planar() {
        let planar = planar::compute(&req, &info, units.valign, caps)?;
        let tiling = planar.effective_tiling;
        let width_units = align_up_u32(req.width, units.halign)?;
        let pitch = finalize_pitch(
            width_units,
            info.bytes_per_element,
            tiling,
            lockable,
            restrictions,
            caps,
        )?;
        let total_rows = finalize_rows(planar.total_rows, tiling, &info, caps)?;
        let (size, base_alignment) =
            finalize_size(pitch, total_rows, restrictions, caps)?;
        (
            SurfaceLayout {
                kind: req.kind,
                format: req.format,
                width: req.width,
                height: req.height,
                depth: req.depth,
                array_size: req.array_size,
                max_lod: req.max_lod,
                sample_count: req.sample_count,
                usage: req.usage,
                generation: caps.generation(),
                tiling,
                tiling_downgraded: planar.tiling_downgraded,
                halign: units.halign,
                valign: units.valign,
                dalign: units.dalign,
                pitch,
                qpitch_rows: total_rows,
                total_rows,
                size,
                base_alignment,
                expanded_array_count: 1,
                mip_tail_start: None,
                planes: planar.planes,
                bytes_per_element: info.bytes_per_element,
                lod_origins: vec![LodOrigin {
                    x_units: 0,
                    y_units: 0,
                }],
                tail_origin: None,
            },
            tiling,
        )
    } else {
        let mip = mip::compute(&req, &info, units, caps)?;
        let pitch = finalize_pitch(
            mip.aligned_width_units,
            info.bytes_per_element,
            req.tiling,
            lockable,
            restrictions,
            caps,
        )?;
        let slice_rows = checked_mul_u32(mip.qpitch_rows, mip.expanded_array_count)?;
        let total_rows = finalize_rows(slice_rows, req.tiling, &info, caps)?;
        let (size, base_alignment) =
            finalize_size(pitch, total_rows, restrictions, caps)?;
        (
            SurfaceLayout {
                kind: req.kind,
                format: req.format,
                width: req.width,
                height: req.height,
                depth: req.depth,
                array_size: req.array_size,
                max_lod: req.max_lod,
                sample_count: req.sample_count,
                usage: req.usage,
                generation: caps.generation(),
                tiling: req.tiling,
                tiling_downgraded: false,
                halign: units.halign,
                valign: units.valign,
                dalign: units.dalign,
                pitch,
                qpitch_rows: mip.qpitch_rows,
                total_rows,
                size,
                base_alignment,
                expanded_array_count: mip.expanded_array_count,
                mip_tail_start: mip.mip_tail_start,
                planes: Vec::new(),
                bytes_per_element: info.bytes_per_element,
                lod_origins: mip.lod_origins,
                tail_origin: mip.tail_origin,
            },
            req.tiling,
        )
    };

    debug!(
        format = ?layout.format,
        tiling = ?effective_tiling,
        pitch = layout.pitch,
        rows = layout.total_rows,
        size = layout.size,
        "surface layout finalized"
    );
    Ok(layout)
}

/// Buffers bypass 2D alignment entirely: the padded byte width is the whole
/// layout.
fn buffer_layout(
    req: &SurfaceRequest,
    caps: &CapabilityTables,
    restrictions: &Restrictions,
) -> Result<SurfaceLayout, LayoutError> {
    let info = req.format.info();
    let width_bytes = checked_mul_u32(req.width, info.bytes_per_element)?;
    let mut pitch = width_bytes.max(restrictions.min_pitch);
    pitch = align_up_u32(pitch, restrictions.pitch_alignment)?;
    let (size, base_alignment) = finalize_size(pitch, 1, restrictions, caps)?;
    Ok(SurfaceLayout {
        kind: req.kind,
        format: req.format,
        width: req.width,
        height: 1,
        depth: 1,
        array_size: 1,
        max_lod: 0,
        sample_count: 1,
        usage: req.usage,
        generation: caps.generation(),
        tiling: TilingMode::Linear,
        tiling_downgraded: false,
        halign: 1,
        valign: 1,
        dalign: 1,
        pitch,
        qpitch_rows: 1,
        total_rows: 1,
        size,
        base_alignment,
        expanded_array_count: 1,
        mip_tail_start: None,
        planes: Vec::new(),
        bytes_per_element: info.bytes_per_element,
        lod_origins: vec![LodOrigin {
            x_units: 0,
            y_units: 0,
        }],
        tail_origin: None,
    })
}

fn alignment_class(req: &SurfaceRequest) -> AlignmentClass {
    if req.usage.contains(UsageFlags::STENCIL) {
        AlignmentClass::Stencil
    } else if req.usage.contains(UsageFlags::DEPTH) {
        AlignmentClass::Depth
    } else if req.format == SurfaceFormat::S8Uint {
        AlignmentClass::Stencil
    } else if req.format.is_depth_or_stencil() {
        AlignmentClass::Depth
    } else {
        AlignmentClass::Color
    }
}

/// Steps 1-4 of pitch finalization: element width to bytes, external
/// minimum and alignment restrictions, then tile-width granularity.
fn finalize_pitch(
    width_units: u32,
    bytes_per_element: u32,
    tiling: TilingMode,
    lockable: bool,
    restrictions: &Restrictions,
    caps: &CapabilityTables,
) -> Result<u32, LayoutError> {
    let width_bytes = checked_mul_u32(width_units, bytes_per_element)?;
    let mut pitch = width_bytes.max(restrictions.min_pitch);
    pitch = align_up_u32(pitch, restrictions.pitch_alignment)?;
    if lockable {
        pitch = align_up_u32(pitch, restrictions.lock_pitch_alignment)?;
    }
    if let Some(tile) = caps.tile_geometry(tiling, bytes_per_element) {
        pitch = align_up_u32(pitch, tile.width_bytes)?;
    }
    Ok(pitch)
}

/// Format-driven row padding, then tile-row granularity. The format padding
/// must land before the tile rounding so the tile rounding covers it.
fn finalize_rows(
    rows: u32,
    tiling: TilingMode,
    info: &mica_caps::FormatInfo,
    caps: &CapabilityTables,
) -> Result<u32, LayoutError> {
    let mut rows = rows;
    if info.packed_422 {
        rows = align_up_u32(rows, 2)?;
    }
    if let Some(tile) = caps.tile_geometry(tiling, info.bytes_per_element) {
        rows = align_up_u32(rows, tile.height_rows)?;
    }
    Ok(rows)
}

fn finalize_size(
    pitch: u32,
    rows: u32,
    restrictions: &Restrictions,
    caps: &CapabilityTables,
) -> Result<(u64, u64), LayoutError> {
    let size = checked_mul_u64(u64::from(pitch), u64::from(rows))?;
    let size = align_up_u64(size, restrictions.base_alignment)?;
    let max = caps.limits().max_surface_bytes;
    if size > max {
        return Err(LayoutError::SurfaceTooLarge { size, max });
    }
    Ok((size, restrictions.base_alignment))
}
