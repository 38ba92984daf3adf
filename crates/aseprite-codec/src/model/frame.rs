//! Frames and the chunk union.

use crate::model::{
    Cel, ColorProfile, ExternalFiles, Layer, LegacyPalette, Mask, Palette, Slice, Tags, Tileset,
};

/// Chunk type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
    /// 0x0004, legacy palette with 8-bit channels.
    LegacyPalette,
    /// 0x0011, legacy palette with 6-bit channels.
    LegacyPalette6Bit,
    Layer,
    Cel,
    CelExtra,
    ColorProfile,
    ExternalFiles,
    /// 0x2016, deprecated.
    Mask,
    Tags,
    Palette,
    UserData,
    Slice,
    Tileset,
    /// Any other code, including the never-used path chunk (0x2017).
    Unknown(u16),
}

impl ChunkType {
    pub fn from_u16(code: u16) -> Self {
        match code {
            0x0004 => ChunkType::LegacyPalette,
            0x0011 => ChunkType::LegacyPalette6Bit,
            0x2004 => ChunkType::Layer,
            0x2005 => ChunkType::Cel,
            0x2006 => ChunkType::CelExtra,
            0x2007 => ChunkType::ColorProfile,
            0x2008 => ChunkType::ExternalFiles,
            0x2016 => ChunkType::Mask,
            0x2018 => ChunkType::Tags,
            0x2019 => ChunkType::Palette,
            0x2020 => ChunkType::UserData,
            0x2022 => ChunkType::Slice,
            0x2023 => ChunkType::Tileset,
            other => ChunkType::Unknown(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            ChunkType::LegacyPalette => 0x0004,
            ChunkType::LegacyPalette6Bit => 0x0011,
            ChunkType::Layer => 0x2004,
            ChunkType::Cel => 0x2005,
            ChunkType::CelExtra => 0x2006,
            ChunkType::ColorProfile => 0x2007,
            ChunkType::ExternalFiles => 0x2008,
            ChunkType::Mask => 0x2016,
            ChunkType::Tags => 0x2018,
            ChunkType::Palette => 0x2019,
            ChunkType::UserData => 0x2020,
            ChunkType::Slice => 0x2022,
            ChunkType::Tileset => 0x2023,
            ChunkType::Unknown(code) => code,
        }
    }
}

/// A structural record of a frame.
///
/// UserData (0x2020) and CelExtra (0x2006) records are not chunks of their own
/// here: the decoder attaches them to the record they follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    LegacyPalette(LegacyPalette),
    LegacyPalette6Bit(LegacyPalette),
    Layer(Layer),
    Cel(Cel),
    ColorProfile(ColorProfile),
    ExternalFiles(ExternalFiles),
    Mask(Mask),
    Tags(Tags),
    Palette(Palette),
    Slice(Slice),
    Tileset(Tileset),
    /// A chunk this crate does not decode, kept verbatim.
    Unknown { chunk_type: u16, data: Vec<u8> },
}

impl Chunk {
    pub fn chunk_type(&self) -> ChunkType {
        match self {
            Chunk::LegacyPalette(_) => ChunkType::LegacyPalette,
            Chunk::LegacyPalette6Bit(_) => ChunkType::LegacyPalette6Bit,
            Chunk::Layer(_) => ChunkType::Layer,
            Chunk::Cel(_) => ChunkType::Cel,
            Chunk::ColorProfile(_) => ChunkType::ColorProfile,
            Chunk::ExternalFiles(_) => ChunkType::ExternalFiles,
            Chunk::Mask(_) => ChunkType::Mask,
            Chunk::Tags(_) => ChunkType::Tags,
            Chunk::Palette(_) => ChunkType::Palette,
            Chunk::Slice(_) => ChunkType::Slice,
            Chunk::Tileset(_) => ChunkType::Tileset,
            Chunk::Unknown { chunk_type, .. } => ChunkType::Unknown(*chunk_type),
        }
    }
}

/// One animation step.
///
/// Chunks are kept in stream order; the accessors below give the per-kind
/// views, each in decode order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub duration_ms: u16,
    pub chunks: Vec<Chunk>,
}

macro_rules! chunk_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self) -> impl Iterator<Item = &$ty> + '_ {
            self.chunks.iter().filter_map(|chunk| match chunk {
                Chunk::$variant(inner) => Some(inner),
                _ => None,
            })
        }
    };
}

impl Frame {
    pub fn new(duration_ms: u16) -> Self {
        Self {
            duration_ms,
            chunks: Vec::new(),
        }
    }

    chunk_accessor!(
        /// Legacy palettes from 0x0004 chunks.
        legacy_palettes, LegacyPalette, LegacyPalette
    );
    chunk_accessor!(
        /// Legacy palettes from 0x0011 chunks (6-bit channels).
        legacy_palettes_6bit, LegacyPalette6Bit, LegacyPalette
    );
    chunk_accessor!(layers, Layer, Layer);
    chunk_accessor!(cels, Cel, Cel);
    chunk_accessor!(color_profiles, ColorProfile, ColorProfile);
    chunk_accessor!(external_files, ExternalFiles, ExternalFiles);
    chunk_accessor!(masks, Mask, Mask);
    chunk_accessor!(tags, Tags, Tags);
    chunk_accessor!(palettes, Palette, Palette);
    chunk_accessor!(slices, Slice, Slice);
    chunk_accessor!(tilesets, Tileset, Tileset);

    /// Chunks this crate did not recognize, as (type code, payload).
    pub fn unknown_chunks(&self) -> impl Iterator<Item = (u16, &[u8])> + '_ {
        self.chunks.iter().filter_map(|chunk| match chunk {
            Chunk::Unknown { chunk_type, data } => Some((*chunk_type, data.as_slice())),
            _ => None,
        })
    }

    /// Number of chunks this frame occupies on the wire, counting attached
    /// UserData and CelExtra records. Tag user data past the last tag is not
    /// written and not counted.
    pub fn wire_chunk_count(&self) -> usize {
        self.chunks
            .iter()
            .map(|chunk| match chunk {
                Chunk::Layer(layer) => 1 + layer.user_data.is_some() as usize,
                Chunk::Cel(cel) => {
                    1 + cel.extra.is_some() as usize + cel.user_data.is_some() as usize
                }
                Chunk::Tags(tags) => 1 + tags.user_data.len().min(tags.tags.len()),
                Chunk::Palette(palette) => 1 + palette.user_data.is_some() as usize,
                Chunk::Slice(slice) => 1 + slice.user_data.is_some() as usize,
                Chunk::Tileset(tileset) => 1 + tileset.user_data.is_some() as usize,
                _ => 1,
            })
            .sum()
    }
}
