//! Sub-resource address resolution on a finalized layout.
//!
//! Offsets compose additively: the array slice contributes
//! `index * qpitch` rows, the plane contributes its precomputed origin, and
//! the level contributes either its entry in the per-level origin table or,
//! inside the mip tail, the tail tile's origin plus a hardware slot offset.

use mica_caps::TilingMode;

use crate::error::LayoutError;
use crate::finalize::SurfaceLayout;
use crate::planar::PlaneIndex;

/// Selector for one sub-resource of a finalized surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceIndex {
    pub lod: u32,
    pub array_index: u32,
    /// Cube face, 0 for everything else.
    pub face: u32,
    /// Plane selector for multi-plane formats; `None` addresses plane 0.
    pub plane: Option<PlaneIndex>,
}

impl SubresourceIndex {
    pub fn base() -> Self {
        Self {
            lod: 0,
            array_index: 0,
            face: 0,
            plane: None,
        }
    }

    pub fn lod(lod: u32) -> Self {
        Self {
            lod,
            ..Self::base()
        }
    }
}

/// A resolved sub-resource address.
///
/// For linear surfaces `byte_offset` is exact and the intra-tile offsets
/// are zero. For tiled surfaces `byte_offset` addresses the containing
/// tile's first byte and the x/y/z offsets locate the sub-resource inside
/// that tile, which is how hardware descriptor registers consume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubresourceOffset {
    pub byte_offset: u64,
    pub x_offset_bytes: u32,
    pub y_offset_rows: u32,
    pub z_offset: u32,
}

impl SurfaceLayout {
    /// Resolve the offset of one (lod, array, face, plane) sub-resource.
    pub fn subresource(&self, index: SubresourceIndex) -> Result<SubresourceOffset, LayoutError> {
        if index.lod > self.max_lod {
            return Err(LayoutError::InvalidDescriptor(format!(
                "lod {} out of range",
                index.lod
            )));
        }
        let faces = if matches!(self.kind, crate::descriptor::SurfaceKind::Cube) {
            6
        } else {
            1
        };
        if index.face >= faces {
            return Err(LayoutError::InvalidDescriptor(format!(
                "face {} out of range",
                index.face
            )));
        }
        // 3D surfaces address depth slices through the array index; they
        // stack at QPitch granularity exactly like array slices.
        let slice_count = if matches!(self.kind, crate::descriptor::SurfaceKind::Surf3D) {
            self.depth
        } else {
            self.array_size.max(1)
        };
        if index.array_index >= slice_count {
            return Err(LayoutError::InvalidDescriptor(format!(
                "array index {} out of range",
                index.array_index
            )));
        }

        let slice = index.array_index * faces + index.face;
        let slice_rows = u64::from(slice) * u64::from(self.qpitch_rows);

        let (plane_x, plane_y) = self.plane_origin(index.plane)?;

        // Level contribution in unit coordinates, plus any in-tail slot.
        let (lod_x_units, lod_y_units, slot) = match self.mip_tail_start {
            Some(start) if index.lod >= start => {
                let tail = self.tail_origin.expect("tail start implies tail origin");
                let slots = mica_caps::miptail::slots(self.tiling, self.bytes_per_element)
                    .expect("mip tail implies a slot table");
                let slot_index = ((index.lod - start) as usize).min(slots.len() - 1);
                (tail.x_units, tail.y_units, Some(slots[slot_index]))
            }
            _ => {
                let origin = self.lod_origins.get(index.lod as usize).ok_or_else(|| {
                    LayoutError::InvalidDescriptor(format!("lod {} out of range", index.lod))
                })?;
                (origin.x_units, origin.y_units, None)
            }
        };

        let x_bytes = lod_x_units * self.bytes_per_element + plane_x;
        let y_rows = u64::from(lod_y_units) + u64::from(plane_y) + slice_rows;

        let offset = match self.tiling {
            TilingMode::Linear => SubresourceOffset {
                byte_offset: y_rows * u64::from(self.pitch)
                    + u64::from(x_bytes)
                    + u64::from(slot_x_bytes(slot, self.bytes_per_element)),
                x_offset_bytes: 0,
                y_offset_rows: slot.map(|s| s.y).unwrap_or(0),
                z_offset: slot.map(|s| s.z).unwrap_or(0),
            },
            tiling => {
                let tile = mica_caps::tiling::tile_geometry(tiling, self.bytes_per_element)
                    .expect("tiled mode has geometry");
                let tile_row = y_rows / u64::from(tile.height_rows);
                let tile_col = u64::from(x_bytes / tile.width_bytes);
                let byte_offset = tile_row
                    * u64::from(self.pitch)
                    * u64::from(tile.height_rows)
                    + tile_col * u64::from(tile.total_bytes());
                SubresourceOffset {
                    byte_offset,
                    x_offset_bytes: x_bytes % tile.width_bytes
                        + slot_x_bytes(slot, self.bytes_per_element),
                    y_offset_rows: (y_rows % u64::from(tile.height_rows)) as u32
                        + slot.map(|s| s.y).unwrap_or(0),
                    z_offset: slot.map(|s| s.z).unwrap_or(0),
                }
            }
        };
        Ok(offset)
    }

    fn plane_origin(&self, plane: Option<PlaneIndex>) -> Result<(u32, u32), LayoutError> {
        let Some(plane) = plane else {
            return Ok((0, 0));
        };
        if self.planes.is_empty() {
            return match plane {
                PlaneIndex::Y => Ok((0, 0)),
                other => Err(LayoutError::InvalidDescriptor(format!(
                    "plane {other:?} on a single-plane surface"
                ))),
            };
        }
        self.planes
            .iter()
            .find(|desc| desc.plane == plane)
            .map(|desc| (desc.offset_x_bytes, desc.offset_y_rows))
            .ok_or_else(|| {
                LayoutError::InvalidDescriptor(format!("plane {plane:?} not present"))
            })
    }
}

fn slot_x_bytes(slot: Option<mica_caps::MipTailSlot>, bytes_per_element: u32) -> u32 {
    slot.map(|s| s.x * bytes_per_element).unwrap_or(0)
}
