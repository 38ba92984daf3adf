//! Tilesets (chunk 0x2023).

use crate::model::UserData;

/// Tileset flag: links to a tileset in an external file.
pub const TILESET_FLAG_EXTERNAL: u32 = 0x1;
/// Tileset flag: tiles are embedded in this file.
pub const TILESET_FLAG_EMBEDDED: u32 = 0x2;
/// Tileset flag: tile ID 0 is the empty tile.
pub const TILESET_FLAG_ZERO_IS_EMPTY: u32 = 0x4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub id: u32,
    /// Flag bits. The external and embedded bits are derived from
    /// [`external`](Tileset::external) and [`image`](Tileset::image) on encode.
    pub flags: u32,
    pub tile_count: u32,
    pub tile_width: u16,
    pub tile_height: u16,
    /// Number shown in the UI for the tile at index 1. Not used by the data.
    pub base_index: i16,
    pub name: String,
    pub external: Option<ExternalTileset>,
    /// Decompressed tileset image: `tile_width` x (`tile_height` * `tile_count`).
    pub image: Option<Vec<u8>>,
    pub user_data: Option<UserData>,
}

/// Link to a tileset stored in another file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalTileset {
    /// Entry ID in the external files chunk.
    pub file_id: u32,
    /// Tileset ID inside that file.
    pub tileset_id: u32,
}

impl Tileset {
    pub fn zero_is_empty(&self) -> bool {
        self.flags & TILESET_FLAG_ZERO_IS_EMPTY != 0
    }
}
