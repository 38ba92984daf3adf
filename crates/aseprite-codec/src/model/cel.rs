//! Cel records (chunk 0x2005) and their extra bounds (chunk 0x2006).

use crate::model::{Fixed, UserData};

/// Cel type codes.
pub const CEL_TYPE_RAW: u16 = 0;
pub const CEL_TYPE_LINKED: u16 = 1;
pub const CEL_TYPE_COMPRESSED_IMAGE: u16 = 2;
pub const CEL_TYPE_COMPRESSED_TILEMAP: u16 = 3;

/// CelExtra flag: the precise bounds are set.
pub const CEL_EXTRA_FLAG_PRECISE_BOUNDS: u32 = 0x1;

/// The content of one layer in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cel {
    /// Index into the file-wide flattened layer list.
    pub layer_index: u16,
    pub x: i16,
    pub y: i16,
    pub opacity: u8,
    /// Ordering relative to other cels in the same frame (0 = layer order).
    pub z_index: i16,
    pub content: CelContent,
    pub extra: Option<CelExtra>,
    pub user_data: Option<UserData>,
}

/// Type-specific cel payload.
///
/// Pixel buffers are row-major, top to bottom, and always hold
/// `width * height * bytes_per_pixel` bytes for the file's color depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CelContent {
    /// Type 0: uncompressed pixels.
    Raw {
        width: u16,
        height: u16,
        pixels: Vec<u8>,
    },
    /// Type 1: reuse the cel of the same layer in another frame.
    Linked { frame: u16 },
    /// Type 2: zlib-compressed pixels, stored here decompressed.
    Image {
        width: u16,
        height: u16,
        pixels: Vec<u8>,
    },
    /// Type 3: zlib-compressed tiles, stored here decompressed.
    Tilemap(Tilemap),
    /// A cel type this crate does not know, with its remaining payload.
    Unknown { cel_type: u16, data: Vec<u8> },
}

impl CelContent {
    /// Returns the wire cel type.
    pub fn cel_type(&self) -> u16 {
        match self {
            CelContent::Raw { .. } => CEL_TYPE_RAW,
            CelContent::Linked { .. } => CEL_TYPE_LINKED,
            CelContent::Image { .. } => CEL_TYPE_COMPRESSED_IMAGE,
            CelContent::Tilemap(_) => CEL_TYPE_COMPRESSED_TILEMAP,
            CelContent::Unknown { cel_type, .. } => *cel_type,
        }
    }

    /// Returns the decoded pixel buffer for raw and image cels.
    pub fn pixels(&self) -> Option<&[u8]> {
        match self {
            CelContent::Raw { pixels, .. } | CelContent::Image { pixels, .. } => Some(pixels),
            _ => None,
        }
    }
}

/// Tile geometry, bit masks and decompressed tiles of a tilemap cel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    /// Width in tiles.
    pub width: u16,
    /// Height in tiles.
    pub height: u16,
    /// Bits per tile (32 in current files).
    pub bits_per_tile: u16,
    pub tile_id_mask: u32,
    pub x_flip_mask: u32,
    pub y_flip_mask: u32,
    /// Mask for the diagonal flip (90 degree clockwise rotation).
    pub diagonal_flip_mask: u32,
    /// Row-major tiles, `bits_per_tile / 8` bytes each.
    pub tiles: Vec<u8>,
}

impl Tilemap {
    /// Bytes per tile, when the bit width is a whole number of bytes.
    pub fn bytes_per_tile(&self) -> Option<usize> {
        match self.bits_per_tile {
            8 | 16 | 32 => Some(self.bits_per_tile as usize / 8),
            _ => None,
        }
    }

    /// Iterates 32-bit tiles; `None` if the tiles are not 32-bit.
    pub fn tiles_u32(&self) -> Option<impl Iterator<Item = u32> + '_> {
        if self.bits_per_tile != 32 {
            return None;
        }
        Some(
            self.tiles
                .chunks_exact(4)
                .map(|t| u32::from_le_bytes([t[0], t[1], t[2], t[3]])),
        )
    }
}

/// Precise sub-pixel bounds of a cel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CelExtra {
    pub flags: u32,
    pub x: Fixed,
    pub y: Fixed,
    /// Width of the cel in the sprite (scaled in real time).
    pub width: Fixed,
    pub height: Fixed,
}

impl CelExtra {
    /// True if the precise bounds are meaningful.
    pub fn has_precise_bounds(&self) -> bool {
        self.flags & CEL_EXTRA_FLAG_PRECISE_BOUNDS != 0
    }
}
