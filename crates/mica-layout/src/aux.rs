//! Auxiliary compression-state (CCS) surface sizing.
//!
//! Two families: legacy mode gives the auxiliary surface its own tiled
//! layout scaled down from the parent by the tiling-class `CcsUnit`
//! factors; flat mode is a byte-linear buffer at a fixed fraction of the
//! parent's size. Both consume only the parent's *finalized* byte
//! dimensions: MSAA sample expansion already happened in the mip walk and
//! is never reapplied here.

use mica_caps::{CapabilityTables, Generation, TileGeometry, FLAT_CCS_RATIO, PAGE_SIZE};

use crate::align::{align_up_u32, align_up_u64, checked_mul_u64};
use crate::error::LayoutError;
use crate::finalize::SurfaceLayout;

/// Which compression-state family the auxiliary surface serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Per-tiling-class downscaled aux surface with its own tiled layout.
    LegacyCcs,
    /// Byte-linear aux buffer sized as `parent_size / 256`, page-aligned.
    FlatCcs,
}

/// Granularity of the auxiliary surface's own tiled layout in legacy mode.
const AUX_TILE: TileGeometry = TileGeometry {
    width_bytes: 128,
    height_rows: 32,
};

/// A finalized auxiliary surface layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxLayout {
    pub mode: CompressionMode,
    /// Aux row pitch in bytes; zero in flat mode, which has no rows.
    pub pitch: u32,
    /// Aux scanline count; zero in flat mode.
    pub total_rows: u32,
    /// Total aux byte size, rounded to `base_alignment`.
    pub size: u64,
    pub base_alignment: u64,
    /// Byte offset of each plane's aux region; one entry per parent plane
    /// (a single entry for non-planar parents) in legacy mode, empty in
    /// flat mode.
    pub plane_offsets: Vec<u64>,
    /// Byte offset of the aux surface when co-allocated immediately after
    /// the parent's aligned size in one backing allocation.
    pub unified_offset: u64,
}

/// Size and align the auxiliary surface for a finalized parent layout.
pub fn compute_aux_layout(
    parent: &SurfaceLayout,
    mode: CompressionMode,
    caps: &CapabilityTables,
) -> Result<AuxLayout, LayoutError> {
    let base_alignment = caps.aux_base_alignment(parent.tiling);
    let unified_offset = align_up_u64(parent.size, base_alignment)?;
    match mode {
        CompressionMode::FlatCcs => {
            if caps.generation() != Generation::Gen12 {
                return Err(LayoutError::UnsupportedTiling {
                    tiling: parent.tiling,
                    format: parent.format,
                    generation: caps.generation(),
                });
            }
            let size = align_up_u64(parent.size.div_ceil(FLAT_CCS_RATIO), PAGE_SIZE)?;
            Ok(AuxLayout {
                mode,
                pitch: 0,
                total_rows: 0,
                size,
                base_alignment,
                plane_offsets: Vec::new(),
                unified_offset,
            })
        }
        CompressionMode::LegacyCcs => legacy_ccs(parent, caps, base_alignment, unified_offset),
    }
}

fn legacy_ccs(
    parent: &SurfaceLayout,
    caps: &CapabilityTables,
    base_alignment: u64,
    unified_offset: u64,
) -> Result<AuxLayout, LayoutError> {
    // Linear parents have no legacy-mode unit; compression state tracks
    // tiles.
    let Some(unit) = caps.ccs_unit(parent.tiling) else {
        return Err(LayoutError::UnsupportedTiling {
            tiling: parent.tiling,
            format: parent.format,
            generation: caps.generation(),
        });
    };

    let aux_width_bytes =
        align_up_u32(parent.pitch, unit.align_width)? / unit.downscale_width;
    let pitch = align_up_u32(aux_width_bytes.max(1), AUX_TILE.width_bytes)?;

    // Each plane's aux region is sized independently and packed at
    // page-aligned boundaries; later offsets are the running total.
    let plane_rows: Vec<u32> = if parent.planes.is_empty() {
        vec![parent.total_rows]
    } else {
        parent.planes.iter().map(|p| p.height_rows).collect()
    };

    let mut plane_offsets = Vec::with_capacity(plane_rows.len());
    let mut running = 0u64;
    let mut total_rows = 0u32;
    for rows in plane_rows {
        plane_offsets.push(running);
        let aux_rows = align_up_u32(
            align_up_u32(rows, unit.align_height)? / unit.downscale_height,
            AUX_TILE.height_rows,
        )?;
        total_rows += aux_rows;
        let plane_size = checked_mul_u64(u64::from(pitch), u64::from(aux_rows))?;
        running = align_up_u64(running + plane_size, PAGE_SIZE)?;
    }

    let size = align_up_u64(running, base_alignment)?;
    Ok(AuxLayout {
        mode: CompressionMode::LegacyCcs,
        pitch,
        total_rows,
        size,
        base_alignment,
        plane_offsets,
        unified_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Restrictions, SurfaceRequest};
    use crate::finalize::compute_layout;
    use mica_caps::{SurfaceFormat, TilingMode};

    fn tiled_parent(width: u32, height: u32) -> (SurfaceLayout, CapabilityTables) {
        let caps = CapabilityTables::new(Generation::Gen12);
        let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, width, height);
        req.tiling = TilingMode::Tile4;
        (
            compute_layout(&req, &caps, &Restrictions::default()).unwrap(),
            caps,
        )
    }

    #[test]
    fn flat_ccs_is_a_page_aligned_fraction_of_the_parent() {
        let (parent, caps) = tiled_parent(1024, 1024);
        let aux = compute_aux_layout(&parent, CompressionMode::FlatCcs, &caps).unwrap();
        assert_eq!(aux.size % PAGE_SIZE, 0);
        assert!(aux.size * FLAT_CCS_RATIO >= parent.size);
        assert!(aux.plane_offsets.is_empty());
    }

    #[test]
    fn flat_ccs_requires_the_flat_generation() {
        let caps = CapabilityTables::new(Generation::Gen9);
        let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 256, 256);
        req.tiling = TilingMode::TileY;
        let parent = compute_layout(&req, &caps, &Restrictions::default()).unwrap();
        assert!(matches!(
            compute_aux_layout(&parent, CompressionMode::FlatCcs, &caps),
            Err(LayoutError::UnsupportedTiling { .. })
        ));
    }

    #[test]
    fn legacy_ccs_rejects_linear_parents() {
        let caps = CapabilityTables::new(Generation::Gen12);
        let req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 256, 256);
        let parent = compute_layout(&req, &caps, &Restrictions::default()).unwrap();
        assert!(matches!(
            compute_aux_layout(&parent, CompressionMode::LegacyCcs, &caps),
            Err(LayoutError::UnsupportedTiling { .. })
        ));
    }

    #[test]
    fn legacy_ccs_scales_by_the_tiling_class_unit() {
        let (parent, caps) = tiled_parent(2048, 2048);
        let aux = compute_aux_layout(&parent, CompressionMode::LegacyCcs, &caps).unwrap();
        let unit = caps.ccs_unit(parent.tiling).unwrap();
        assert_eq!(
            aux.pitch,
            (parent.pitch / unit.downscale_width).next_multiple_of(AUX_TILE.width_bytes)
        );
        assert_eq!(aux.plane_offsets, vec![0]);
        assert_eq!(aux.size % aux.base_alignment, 0);
    }

    #[test]
    fn planar_parents_pack_per_plane_aux_regions_at_page_boundaries() {
        let caps = CapabilityTables::new(Generation::Gen12);
        let mut req = SurfaceRequest::texture_2d(SurfaceFormat::Nv12, 1024, 1024);
        req.tiling = TilingMode::Tile4;
        let parent = compute_layout(&req, &caps, &Restrictions::default()).unwrap();
        let aux = compute_aux_layout(&parent, CompressionMode::LegacyCcs, &caps).unwrap();
        assert_eq!(aux.plane_offsets.len(), 2);
        assert_eq!(aux.plane_offsets[0], 0);
        assert!(aux.plane_offsets[1] > 0);
        assert_eq!(aux.plane_offsets[1] % PAGE_SIZE, 0);
    }

    #[test]
    fn unified_offset_follows_the_aligned_parent() {
        let (parent, caps) = tiled_parent(512, 512);
        let aux = compute_aux_layout(&parent, CompressionMode::LegacyCcs, &caps).unwrap();
        assert_eq!(aux.unified_offset % aux.base_alignment, 0);
        assert!(aux.unified_offset >= parent.size);
    }

    #[test]
    fn msaa_parents_are_not_double_scaled() {
        let caps = CapabilityTables::new(Generation::Gen12);
        let mut single = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 512, 512);
        single.tiling = TilingMode::Tile64;
        let mut msaa = single;
        msaa.sample_count = 4;
        let single_parent = compute_layout(&single, &caps, &Restrictions::default()).unwrap();
        let msaa_parent = compute_layout(&msaa, &caps, &Restrictions::default()).unwrap();
        let single_aux =
            compute_aux_layout(&single_parent, CompressionMode::FlatCcs, &caps).unwrap();
        let msaa_aux = compute_aux_layout(&msaa_parent, CompressionMode::FlatCcs, &caps).unwrap();
        // The parent already folded the 4 samples into its size; the aux
        // ratio stays exactly 1:256 of that finalized size.
        assert_eq!(msaa_parent.size, 4 * single_parent.size);
        assert_eq!(
            msaa_aux.size,
            align_up_u64(msaa_parent.size.div_ceil(FLAT_CCS_RATIO), PAGE_SIZE).unwrap()
        );
        assert!(msaa_aux.size >= single_aux.size);
    }
}
