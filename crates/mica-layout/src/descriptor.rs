//! Surface descriptors: the engine's input types and their validation.

use bitflags::bitflags;
use mica_caps::{CapabilityTables, PlaneArrangement, SurfaceFormat, TilingMode};

use crate::error::LayoutError;

/// Resource dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Untyped byte buffer; linear, no mips, no 2D alignment.
    Buffer,
    Surf1D,
    Surf2D,
    Surf3D,
    /// Six-faced cube; faces fold into the array dimension.
    Cube,
}

bitflags! {
    /// Intended usages that influence alignment and scaling rules.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UsageFlags: u32 {
        const RENDER_TARGET = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
        const TEXTURE = 1 << 3;
        const UAV = 1 << 4;
        /// CPU lock access; adds the lock pitch alignment restriction.
        const CPU_LOCKABLE = 1 << 5;
    }
}

/// External pitch/size restrictions supplied by the caller's capability
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restrictions {
    /// Minimum pitch in bytes.
    pub min_pitch: u32,
    /// Pitch alignment in bytes (power of two).
    pub pitch_alignment: u32,
    /// Total-size alignment in bytes (power of two).
    pub base_alignment: u64,
    /// Extra pitch alignment applied to CPU-lockable surfaces.
    pub lock_pitch_alignment: u32,
}

impl Default for Restrictions {
    fn default() -> Self {
        Self {
            min_pitch: 32,
            pitch_alignment: 32,
            base_alignment: 4096,
            lock_pitch_alignment: 64,
        }
    }
}

/// A resource-creation request: the logical surface description before
/// layout.
///
/// The engine never mutates a request; layout results live in
/// [`crate::SurfaceLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRequest {
    pub kind: SurfaceKind,
    pub format: SurfaceFormat,
    /// Width in texels (bytes for [`SurfaceKind::Buffer`]).
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub array_size: u32,
    /// Highest mip index; 0 means just the base level.
    pub max_lod: u32,
    pub tiling: TilingMode,
    pub sample_count: u32,
    pub usage: UsageFlags,
}

impl SurfaceRequest {
    /// A linear 2D texture request with everything else at its identity
    /// value; tests and callers adjust from here.
    pub fn texture_2d(format: SurfaceFormat, width: u32, height: u32) -> Self {
        Self {
            kind: SurfaceKind::Surf2D,
            format,
            width,
            height,
            depth: 1,
            array_size: 1,
            max_lod: 0,
            tiling: TilingMode::Linear,
            sample_count: 1,
            usage: UsageFlags::TEXTURE,
        }
    }

    /// Degenerate dimensions normalize to 1, matching the descriptor
    /// contract that all extents are >= 1 when layout begins.
    pub(crate) fn normalized(&self) -> Self {
        let mut req = *self;
        req.height = req.height.max(1);
        req.depth = req.depth.max(1);
        req.array_size = req.array_size.max(1);
        req.sample_count = req.sample_count.max(1);
        req
    }

    /// Structural validation; everything here is detected before any layout
    /// math runs.
    pub(crate) fn validate(&self, caps: &CapabilityTables) -> Result<(), LayoutError> {
        let limits = caps.limits();
        let info = self.format.info();

        if self.width == 0 {
            return Err(LayoutError::InvalidDescriptor("zero width".into()));
        }

        if !caps.supports_tiling(self.tiling) {
            return Err(LayoutError::UnsupportedTiling {
                tiling: self.tiling,
                format: self.format,
                generation: caps.generation(),
            });
        }

        match self.kind {
            SurfaceKind::Buffer => {
                if !self.tiling.is_linear() {
                    return Err(LayoutError::InvalidDescriptor("tiled buffer".into()));
                }
                if self.max_lod != 0 || self.height > 1 || self.depth > 1 {
                    return Err(LayoutError::InvalidDescriptor(
                        "buffers have no mips or 2D extent".into(),
                    ));
                }
            }
            SurfaceKind::Surf1D => {
                if self.height > 1 || self.depth > 1 {
                    return Err(LayoutError::InvalidDescriptor("1D surface with height".into()));
                }
                if self.width > limits.max_extent_2d {
                    return Err(LayoutError::InvalidDescriptor("width exceeds maximum".into()));
                }
            }
            SurfaceKind::Surf2D => {
                if self.width > limits.max_extent_2d || self.height > limits.max_extent_2d {
                    return Err(LayoutError::InvalidDescriptor("extent exceeds maximum".into()));
                }
                if self.depth > 1 {
                    return Err(LayoutError::InvalidDescriptor("2D surface with depth".into()));
                }
            }
            SurfaceKind::Surf3D => {
                if self.width > limits.max_extent_3d
                    || self.height > limits.max_extent_3d
                    || self.depth > limits.max_extent_3d
                {
                    return Err(LayoutError::InvalidDescriptor("extent exceeds maximum".into()));
                }
                if self.array_size > 1 {
                    return Err(LayoutError::InvalidDescriptor("arrayed 3D surface".into()));
                }
            }
            SurfaceKind::Cube => {
                if self.width != self.height {
                    return Err(LayoutError::InvalidDescriptor(
                        "cube faces must be square".into(),
                    ));
                }
                if self.width > limits.max_extent_2d {
                    return Err(LayoutError::InvalidDescriptor("extent exceeds maximum".into()));
                }
                if self.depth > 1 {
                    return Err(LayoutError::InvalidDescriptor("cube with depth".into()));
                }
            }
        }

        if self.array_size > limits.max_array_size {
            return Err(LayoutError::InvalidDescriptor(
                "array size exceeds maximum".into(),
            ));
        }

        if !matches!(self.sample_count, 1 | 2 | 4 | 8 | 16) {
            return Err(LayoutError::InvalidDescriptor(format!(
                "unsupported sample count {}",
                self.sample_count
            )));
        }
        if self.sample_count > 1 {
            if !matches!(self.kind, SurfaceKind::Surf2D) {
                return Err(LayoutError::InvalidDescriptor(
                    "multisampling requires a 2D surface".into(),
                ));
            }
            if self.max_lod != 0 {
                return Err(LayoutError::InvalidDescriptor(
                    "multisampled surfaces have a single level".into(),
                ));
            }
        }

        let full_chain = 32 - self.max_extent().leading_zeros() - 1;
        if self.max_lod > limits.max_lod || self.max_lod > full_chain {
            return Err(LayoutError::InvalidDescriptor(format!(
                "max_lod {} exceeds the mip chain",
                self.max_lod
            )));
        }

        if info.is_planar() {
            if !matches!(self.kind, SurfaceKind::Surf2D) {
                return Err(LayoutError::UnsupportedFormat {
                    format: self.format,
                    reason: "planar formats are 2D only",
                });
            }
            if self.max_lod != 0 || self.array_size > 1 || self.sample_count > 1 {
                return Err(LayoutError::UnsupportedFormat {
                    format: self.format,
                    reason: "planar formats carry a single subresource per plane",
                });
            }
            // Standard tilings have no planar support on any generation in
            // the family; the fully-planar linear fallback is handled later.
            if matches!(
                self.tiling,
                TilingMode::TileX | TilingMode::TileYf | TilingMode::TileYs | TilingMode::Tile64
            ) {
                return Err(LayoutError::UnsupportedTiling {
                    tiling: self.tiling,
                    format: self.format,
                    generation: caps.generation(),
                });
            }
        }

        if self.usage.intersects(UsageFlags::DEPTH | UsageFlags::STENCIL) {
            if info.is_compressed() || info.is_planar() {
                return Err(LayoutError::UnsupportedFormat {
                    format: self.format,
                    reason: "depth/stencil usage requires a depth-capable format",
                });
            }
            if self.tiling == TilingMode::TileX {
                return Err(LayoutError::UnsupportedTiling {
                    tiling: self.tiling,
                    format: self.format,
                    generation: caps.generation(),
                });
            }
        }

        Ok(())
    }

    fn max_extent(&self) -> u32 {
        self.width.max(self.height).max(self.depth).max(1)
    }

    pub(crate) fn cube_faces(&self) -> u32 {
        if matches!(self.kind, SurfaceKind::Cube) {
            6
        } else {
            1
        }
    }

    pub(crate) fn is_planar(&self) -> bool {
        !matches!(self.format.info().planes, PlaneArrangement::Single)
    }
}
