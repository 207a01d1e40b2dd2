//! Surface formats and their elemental shape facts.
//!
//! The layout engine never inspects channel semantics; all it needs from a
//! format is captured by [`FormatInfo`]: element size, compressed-block
//! dimensions, and how the format's planes are arranged in memory.

/// How a format's planes are arranged in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneArrangement {
    /// One plane; includes packed 4:2:2 formats, which interleave chroma
    /// inside each element pair rather than in a separate plane.
    Single,
    /// Luma plane followed by one interleaved chroma plane.
    UvPacked {
        /// Chroma plane has the full luma height (4:2:2) instead of half
        /// (4:2:0).
        full_height_chroma: bool,
    },
    /// Luma plane followed by two separate chroma planes at half resolution
    /// in both axes. The chroma pitch is half the luma pitch.
    FullyPlanar {
        /// V precedes U in memory (the swapped variant of the same layout).
        swapped_uv: bool,
    },
}

/// Elemental shape facts for one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Bytes per element: per texel for uncompressed formats, per block for
    /// block-compressed formats, per luma sample for planar formats.
    pub bytes_per_element: u32,
    /// Compressed block width in texels (1 for uncompressed).
    pub block_width: u32,
    /// Compressed block height in texels (1 for uncompressed).
    pub block_height: u32,
    /// Compressed block depth in texels (1 for everything 2D).
    pub block_depth: u32,
    pub planes: PlaneArrangement,
    /// Packed 4:2:2 single-plane format (YUY2 class). These carry an
    /// even-row padding requirement in the size finalizer.
    pub packed_422: bool,
}

impl FormatInfo {
    pub fn is_compressed(&self) -> bool {
        self.block_width > 1 || self.block_height > 1 || self.block_depth > 1
    }

    pub fn plane_count(&self) -> u32 {
        match self.planes {
            PlaneArrangement::Single => 1,
            PlaneArrangement::UvPacked { .. } => 2,
            PlaneArrangement::FullyPlanar { .. } => 3,
        }
    }

    pub fn is_planar(&self) -> bool {
        self.plane_count() > 1
    }
}

/// Enumerated pixel/block formats known to the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFormat {
    R8Unorm,
    R8G8Unorm,
    R8G8B8A8Unorm,
    R8G8B8A8UnormSrgb,
    B8G8R8A8Unorm,
    B8G8R8A8UnormSrgb,
    B5G6R5Unorm,
    B5G5R5A1Unorm,
    R10G10B10A2Unorm,
    R11G11B10Float,
    R16Unorm,
    R16Float,
    R16G16Unorm,
    R16G16Float,
    R16G16B16A16Unorm,
    R16G16B16A16Float,
    R32Float,
    R32G32Float,
    R32G32B32A32Float,
    D16Unorm,
    D24UnormX8,
    D32Float,
    S8Uint,
    Bc1,
    Bc2,
    Bc3,
    Bc4,
    Bc5,
    Bc6h,
    Bc7,
    Yuy2,
    Uyvy,
    Nv12,
    Nv21,
    P010,
    Nv16,
    I420,
    Yv12,
}

const fn texel(bytes_per_element: u32) -> FormatInfo {
    FormatInfo {
        bytes_per_element,
        block_width: 1,
        block_height: 1,
        block_depth: 1,
        planes: PlaneArrangement::Single,
        packed_422: false,
    }
}

const fn bc(bytes_per_block: u32) -> FormatInfo {
    FormatInfo {
        bytes_per_element: bytes_per_block,
        block_width: 4,
        block_height: 4,
        block_depth: 1,
        planes: PlaneArrangement::Single,
        packed_422: false,
    }
}

const fn packed_422(bytes_per_element: u32) -> FormatInfo {
    FormatInfo {
        bytes_per_element,
        block_width: 1,
        block_height: 1,
        block_depth: 1,
        planes: PlaneArrangement::Single,
        packed_422: true,
    }
}

const fn uv_packed(bytes_per_element: u32, full_height_chroma: bool) -> FormatInfo {
    FormatInfo {
        bytes_per_element,
        block_width: 1,
        block_height: 1,
        block_depth: 1,
        planes: PlaneArrangement::UvPacked { full_height_chroma },
        packed_422: false,
    }
}

const fn fully_planar(swapped_uv: bool) -> FormatInfo {
    FormatInfo {
        bytes_per_element: 1,
        block_width: 1,
        block_height: 1,
        block_depth: 1,
        planes: PlaneArrangement::FullyPlanar { swapped_uv },
        packed_422: false,
    }
}

impl SurfaceFormat {
    /// Elemental shape facts for this format. Pure lookup, total over the
    /// enum; unsupported format/tiling *combinations* are rejected by the
    /// layout engine, not here.
    pub const fn info(self) -> FormatInfo {
        use SurfaceFormat::*;
        match self {
            R8Unorm => texel(1),
            R8G8Unorm => texel(2),
            R8G8B8A8Unorm | R8G8B8A8UnormSrgb | B8G8R8A8Unorm | B8G8R8A8UnormSrgb => texel(4),
            B5G6R5Unorm | B5G5R5A1Unorm => texel(2),
            R10G10B10A2Unorm | R11G11B10Float => texel(4),
            R16Unorm | R16Float => texel(2),
            R16G16Unorm | R16G16Float => texel(4),
            R16G16B16A16Unorm | R16G16B16A16Float => texel(8),
            R32Float => texel(4),
            R32G32Float => texel(8),
            R32G32B32A32Float => texel(16),
            D16Unorm => texel(2),
            D24UnormX8 | D32Float => texel(4),
            S8Uint => texel(1),
            Bc1 | Bc4 => bc(8),
            Bc2 | Bc3 | Bc5 | Bc6h | Bc7 => bc(16),
            Yuy2 | Uyvy => packed_422(2),
            // NV21 swaps U and V inside each chroma element pair, which does
            // not move any bytes as far as layout is concerned.
            Nv12 | Nv21 => uv_packed(1, false),
            P010 => uv_packed(2, false),
            Nv16 => uv_packed(1, true),
            I420 => fully_planar(false),
            Yv12 => fully_planar(true),
        }
    }

    pub fn is_depth_or_stencil(self) -> bool {
        use SurfaceFormat::*;
        matches!(self, D16Unorm | D24UnormX8 | D32Float | S8Uint)
    }
}
