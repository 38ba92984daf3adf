//! Palette records: legacy packets (0x0004, 0x0011) and the new palette (0x2019).

use crate::model::{Rgb, Rgba, UserData};

/// A legacy palette chunk.
///
/// Chunk 0x0004 stores 8-bit channels; chunk 0x0011 stores the same layout with
/// channels in 0-63. Which of the two a record came from is carried by the
/// [`Chunk`](crate::model::Chunk) variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyPalette {
    pub packets: Vec<PalettePacket>,
}

/// Skip-count plus a run of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettePacket {
    /// Entries to skip since the end of the previous packet.
    pub skip: u8,
    /// 1 to 256 colors. A count byte of 0 on the wire means 256.
    pub colors: Vec<Rgb>,
}

impl LegacyPalette {
    /// Yields each color with its absolute palette index.
    pub fn entries(&self) -> impl Iterator<Item = (usize, Rgb)> + '_ {
        let mut index = 0usize;
        self.packets.iter().flat_map(move |packet| {
            index += packet.skip as usize;
            let start = index;
            index += packet.colors.len();
            packet
                .colors
                .iter()
                .enumerate()
                .map(move |(i, color)| (start + i, *color))
        })
    }
}

/// Palette entry flag: the entry carries a name.
pub const PALETTE_ENTRY_FLAG_HAS_NAME: u16 = 0x1;

/// A new-format palette chunk covering the inclusive index range
/// `first..=last()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// New total number of palette entries.
    pub size: u32,
    /// First index changed by this chunk.
    pub first: u32,
    /// One entry per index, starting at `first`. Never empty on the wire.
    pub entries: Vec<PaletteEntry>,
    /// In the first frame this is the sprite's user data.
    pub user_data: Option<UserData>,
}

impl Palette {
    /// Last index changed by this chunk (inclusive), saturating at `u32::MAX`.
    pub fn last(&self) -> u32 {
        let span = u32::try_from(self.entries.len().saturating_sub(1)).unwrap_or(u32::MAX);
        self.first.saturating_add(span)
    }

    /// Yields each entry with its absolute palette index.
    pub fn indexed_entries(&self) -> impl Iterator<Item = (u32, &PaletteEntry)> + '_ {
        (self.first..).zip(self.entries.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Rgba,
    pub name: Option<String>,
}
