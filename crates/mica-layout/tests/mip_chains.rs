//! Mip-chain placement: the two-column block-height rule and packed mip
//! tails.

use mica_caps::{CapabilityTables, Generation, SurfaceFormat, TilingMode};
use mica_layout::{compute_layout, Restrictions, SubresourceIndex, SurfaceRequest};
use pretty_assertions::assert_eq;

fn gen9() -> CapabilityTables {
    CapabilityTables::new(Generation::Gen9)
}

#[test]
fn block_height_is_mip0_plus_the_wider_of_mip1_and_the_tail_column() {
    // 0x120 square with a six-level chain on a 64KiB standard tiling: the
    // tail starts at LOD2, so the per-slice height is
    // h0 + max(h1, tail-tile rows), not the sum of all six levels.
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 0x120, 0x120);
    req.tiling = TilingMode::TileYs;
    req.max_lod = 5;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();

    assert_eq!(layout.mip_tail_start, Some(2));
    // Tile is 512B x 128 rows; levels align to the 128-element tile grid.
    let h0 = 0x120_u32.next_multiple_of(128); // 384
    let h1 = 0x90_u32.next_multiple_of(128); // 256
    let tail_rows = 128;
    assert_eq!(layout.qpitch_rows, h0 + h1.max(tail_rows));
    let naive_sum: u32 = (0..=5)
        .map(|lod| (0x120_u32 >> lod).max(1).next_multiple_of(128))
        .sum();
    assert!(layout.qpitch_rows < naive_sum);
}

#[test]
fn surface_width_is_bounded_by_lod1_plus_lod2() {
    // A wide-and-short chain makes the LOD1+LOD2 row wider than LOD0.
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8Unorm, 64, 512);
    req.max_lod = 4;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    // w0=64, w1=32, w2=16: LOD0 dominates the padded width.
    assert_eq!(layout.pitch, 64);
    // LOD2 sits directly to the right of LOD1, one padded LOD1 width over.
    let lod1 = layout.subresource(SubresourceIndex::lod(1)).unwrap();
    let lod2 = layout.subresource(SubresourceIndex::lod(2)).unwrap();
    assert_eq!(lod2.byte_offset - lod1.byte_offset, 32);
    // A chain whose padded LOD1+LOD2 row outgrows LOD0 widens the surface.
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8Unorm, 40, 512);
    req.max_lod = 4;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    // w0=40->48, w1=20->32, w2=10->16: the side-by-side pair (48) ties the
    // padded base; pitch still honors the external 32-byte alignment.
    assert_eq!(layout.pitch, 64);
}

#[test]
fn chains_short_of_the_tail_level_never_pack() {
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 0x120, 0x120);
    req.tiling = TilingMode::TileYs;
    req.max_lod = 1;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    assert_eq!(layout.mip_tail_start, None);
}

#[test]
fn tail_levels_share_one_tile_region() {
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 0x120, 0x120);
    req.tiling = TilingMode::TileYs;
    req.max_lod = 5;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    let start = layout.mip_tail_start.unwrap();
    let base = layout.subresource(SubresourceIndex::lod(start)).unwrap();
    for lod in start..=5 {
        let offset = layout.subresource(SubresourceIndex::lod(lod)).unwrap();
        assert_eq!(offset.byte_offset, base.byte_offset, "lod {lod}");
        assert!(offset.byte_offset < layout.size);
    }
}

#[test]
fn below_tail_levels_occupy_disjoint_rectangles() {
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 512, 512);
    req.max_lod = 6;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    let mut seen = Vec::new();
    for lod in 0..=6u32 {
        let offset = layout.subresource(SubresourceIndex::lod(lod)).unwrap();
        let w = u64::from((512u32 >> lod).max(1)) * 4;
        let h = u64::from((512u32 >> lod).max(1));
        seen.push((offset.byte_offset, w, h));
    }
    // Compare as (x, y) rectangles in the linear image.
    let pitch = u64::from(layout.pitch);
    for (i, a) in seen.iter().enumerate() {
        for b in seen.iter().skip(i + 1) {
            let (ax, ay) = (a.0 % pitch, a.0 / pitch);
            let (bx, by) = (b.0 % pitch, b.0 / pitch);
            let disjoint =
                ax + a.1 <= bx || bx + b.1 <= ax || ay + a.2 <= by || by + b.2 <= ay;
            assert!(disjoint, "levels overlap: {a:?} vs {b:?}");
        }
    }
}

#[test]
fn cube_chains_give_every_face_the_full_mip_pyramid() {
    let mut req = SurfaceRequest::texture_2d(SurfaceFormat::R8G8B8A8Unorm, 128, 128);
    req.kind = mica_layout::SurfaceKind::Cube;
    req.max_lod = 3;
    let layout = compute_layout(&req, &gen9(), &Restrictions::default()).unwrap();
    assert_eq!(layout.expanded_array_count, 6);
    let last_face_lod3 = layout
        .subresource(SubresourceIndex {
            lod: 3,
            face: 5,
            ..SubresourceIndex::base()
        })
        .unwrap();
    assert!(last_face_lod3.byte_offset < layout.size);
}
