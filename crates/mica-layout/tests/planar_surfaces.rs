//! Plane placement for UV-packed and fully-planar YUV formats.

use mica_caps::{CapabilityTables, Generation, SurfaceFormat, TilingMode, PLANE_ROW_ALIGNMENT};
use mica_layout::{
    compute_layout, PlaneIndex, Restrictions, SubresourceIndex, SurfaceRequest,
};
use pretty_assertions::assert_eq;

fn gen9() -> CapabilityTables {
    CapabilityTables::new(Generation::Gen9)
}

#[test]
fn nv12_stacks_half_height_chroma_below_luma() {
    let width = 640;
    let height = 480;
    let req = SurfaceRequest::texture_2d(SurfaceFormat::Nv12, width, height);
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();

    let y_height = height.next_multiple_of(PLANE_ROW_ALIGNMENT);
    let uv_height = (height / 2).next_multiple_of(PLANE_ROW_ALIGNMENT);
    assert_eq!(layout.planes[0].height_rows, y_height);
    assert_eq!(layout.planes[1].offset_y_rows, y_height);
    assert_eq!(layout.planes[1].height_rows, uv_height);
    assert_eq!(layout.total_rows, y_height + uv_height);
    assert_eq!(
        layout.size,
        (u64::from(layout.pitch) * u64::from(y_height + uv_height)).next_multiple_of(4096)
    );
}

#[test]
fn plane_heights_sum_to_the_size_scanline_count() {
    for format in [
        SurfaceFormat::Nv12,
        SurfaceFormat::P010,
        SurfaceFormat::Nv16,
        SurfaceFormat::I420,
        SurfaceFormat::Yv12,
    ] {
        let req = SurfaceRequest::texture_2d(format, 320, 240);
        let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
        let sum: u32 = layout.planes.iter().map(|p| p.height_rows).sum();
        assert_eq!(layout.total_rows, sum, "{format:?}");
    }
}

#[test]
fn fully_planar_tiled_requests_downgrade_to_linear() {
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::I420, 320, 240);
    req.tiling = TilingMode::TileY;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    assert!(layout.tiling_downgraded);
    assert_eq!(layout.tiling, TilingMode::Linear);
    // A downgraded surface never keeps tile-granular pitch it no longer
    // needs; the pitch follows the linear restrictions only.
    assert_eq!(layout.pitch, 320_u32.next_multiple_of(16).next_multiple_of(32));
}

#[test]
fn uv_packed_tiled_requests_keep_their_tiling() {
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::Nv12, 640, 480);
    req.tiling = TilingMode::TileY;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    assert!(!layout.tiling_downgraded);
    assert_eq!(layout.tiling, TilingMode::TileY);
    assert_eq!(layout.pitch % 128, 0);
}

#[test]
fn chroma_planes_of_swapped_variants_trade_places_only() {
    let i420 = compute_layout(
        &SurfaceRequest::texture_2d(SurfaceFormat::I420, 320, 240),
        &gen9(),
        &Restrictions::default(),
    )
    .unwrap();
    let yv12 = compute_layout(
        &SurfaceRequest::texture_2d(SurfaceFormat::Yv12, 320, 240),
        &gen9(),
        &Restrictions::default(),
    )
    .unwrap();
    assert_eq!(i420.planes[1].plane, PlaneIndex::U);
    assert_eq!(i420.planes[2].plane, PlaneIndex::V);
    assert_eq!(yv12.planes[1].plane, PlaneIndex::V);
    assert_eq!(yv12.planes[2].plane, PlaneIndex::U);
    assert_eq!(i420.size, yv12.size);
}

#[test]
fn fully_planar_chroma_advertises_the_half_pitch() {
    let req = SurfaceRequest::texture_2d(SurfaceFormat::I420, 320, 240);
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    assert_eq!(layout.planes[0].pitch_divisor, 1);
    assert_eq!(layout.planes[1].pitch_divisor, 2);
    assert_eq!(layout.planes[2].pitch_divisor, 2);
}

#[test]
fn planes_never_overlap_and_stay_inside_the_surface() {
    for format in [SurfaceFormat::Nv12, SurfaceFormat::P010, SurfaceFormat::Yv12] {
        let req = SurfaceRequest::texture_2d(format, 1920, 1080);
        let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
        for pair in layout.planes.windows(2) {
            assert!(
                pair[1].offset_y_rows >= pair[0].offset_y_rows + pair[0].height_rows,
                "{format:?}"
            );
        }
        let last = layout.planes.last().unwrap();
        assert!(last.offset_y_rows + last.height_rows <= layout.total_rows);
    }
}

#[test]
fn plane_selectors_resolve_to_the_plane_origins() {
    let req = SurfaceRequest::texture_2d(SurfaceFormat::Nv12, 640, 480);
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    let uv = layout
        .subresource(SubresourceIndex {
            plane: Some(PlaneIndex::Uv),
            ..SubresourceIndex::base()
        })
        .unwrap();
    assert_eq!(
        uv.byte_offset,
        u64::from(layout.planes[1].offset_y_rows) * u64::from(layout.pitch)
    );
    // Asking for a plane the format does not have is a caller bug.
    assert!(layout
        .subresource(SubresourceIndex {
            plane: Some(PlaneIndex::V),
            ..SubresourceIndex::base()
        })
        .is_err());
}

#[test]
fn gen12_tile_aligned_planes_round_to_tile_rows() {
    let caps = CapabilityTables::new(Generation::Gen12);
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::Nv12, 640, 500);
    req.tiling = TilingMode::Tile4;
    let layout = compute_layout(&req, &caps, &Restrictions::default()).unwrap();
    for plane in &layout.planes {
        assert_eq!(plane.offset_y_rows % 32, 0);
        assert_eq!(plane.height_rows % 32, 0);
    }
}
