//! Data model types for Aseprite files.
//!
//! This module contains the in-memory representation produced by decoding:
//! - The file header and frames
//! - The chunk union and one record type per chunk kind
//! - Small shared value types (colors, fixed-point numbers)

pub mod cel;
pub mod file;
pub mod frame;
pub mod header;
pub mod layer;
pub mod palette;
pub mod record;
pub mod slice;
pub mod tags;
pub mod tileset;
pub mod value;

pub use cel::{Cel, CelContent, CelExtra, Tilemap};
pub use file::AseFile;
pub use frame::{Chunk, ChunkType, Frame};
pub use header::{ColorDepth, Header};
pub use layer::{Layer, LayerKind};
pub use palette::{LegacyPalette, Palette, PaletteEntry, PalettePacket};
pub use record::{ColorProfile, ColorProfileKind, ExternalFile, ExternalFiles, Mask, UserData};
pub use slice::{Slice, SliceCenter, SliceKey, SlicePivot};
pub use tags::{LoopDirection, Tag, Tags};
pub use tileset::{ExternalTileset, Tileset};
pub use value::{Fixed, Rgb, Rgba};
