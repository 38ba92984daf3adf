//! Palette chunk encoding/decoding (0x0004, 0x0011, 0x2019).

use crate::codec::primitives::{checked_u16, checked_u32, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::model::palette::PALETTE_ENTRY_FLAG_HAS_NAME;
use crate::model::{LegacyPalette, Palette, PaletteEntry, PalettePacket, Rgb, Rgba};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a legacy palette payload (same layout for 0x0004 and 0x0011).
pub fn decode_legacy_palette(reader: &mut Reader<'_>) -> Result<LegacyPalette, DecodeError> {
    let packet_count = reader.read_u16("packet_count")? as usize;
    // each packet is at least 2 + 3 bytes
    let mut packets = Vec::with_capacity(packet_count.min(reader.remaining_len() / 5));

    for _ in 0..packet_count {
        let skip = reader.read_u8("packet_skip")?;
        let count = match reader.read_u8("packet_color_count")? {
            0 => 256,
            n => n as usize,
        };
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            let rgb = reader.read_bytes(3, "packet_color")?;
            colors.push(Rgb::new(rgb[0], rgb[1], rgb[2]));
        }
        packets.push(PalettePacket { skip, colors });
    }

    Ok(LegacyPalette { packets })
}

/// Decodes a new palette payload (0x2019).
///
/// One entry is read per index in `first..=last`, independent of the declared
/// palette size.
pub fn decode_palette(reader: &mut Reader<'_>) -> Result<Palette, DecodeError> {
    let size = reader.read_u32("palette_size")?;
    let first = reader.read_u32("palette_first")?;
    let last = reader.read_u32("palette_last")?;
    reader.skip(8, "palette_reserved")?;

    if last < first {
        return Err(DecodeError::MalformedEncoding {
            context: "palette last index precedes first index",
        });
    }
    let count = (last - first) as usize + 1;
    // each entry is at least 6 bytes
    if count > reader.remaining_len() / 6 {
        return Err(DecodeError::UnexpectedEof {
            context: "palette_entries",
        });
    }

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let flags = reader.read_u16("palette_entry_flags")?;
        let rgba = reader.read_bytes(4, "palette_entry_color")?;
        let color = Rgba::new(rgba[0], rgba[1], rgba[2], rgba[3]);
        let name = if flags & PALETTE_ENTRY_FLAG_HAS_NAME != 0 {
            Some(reader.read_string("palette_entry_name")?)
        } else {
            None
        };
        entries.push(PaletteEntry { color, name });
    }

    Ok(Palette {
        size,
        first,
        entries,
        user_data: None,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

pub fn encode_legacy_palette(writer: &mut Writer, palette: &LegacyPalette) -> Result<(), EncodeError> {
    writer.write_u16(checked_u16(palette.packets.len(), "palette packets")?);

    for packet in &palette.packets {
        let count = packet.colors.len();
        if count == 0 {
            return Err(EncodeError::EmptyPalettePacket);
        }
        if count > 256 {
            return Err(EncodeError::LengthExceedsLimit {
                field: "palette packet colors",
                len: count,
                max: 256,
            });
        }
        writer.write_u8(packet.skip);
        // 256 wraps to 0, which means 256
        writer.write_u8(count as u8);
        for color in &packet.colors {
            writer.write_bytes(&[color.r, color.g, color.b]);
        }
    }

    Ok(())
}

pub fn encode_palette(writer: &mut Writer, palette: &Palette) -> Result<(), EncodeError> {
    if palette.entries.is_empty() {
        return Err(EncodeError::EmptyPaletteRange);
    }
    let last = palette
        .first
        .checked_add(checked_u32(palette.entries.len() - 1, "palette entries")?)
        .ok_or(EncodeError::LengthExceedsLimit {
            field: "palette last index",
            len: palette.first as usize + palette.entries.len() - 1,
            max: u32::MAX as usize,
        })?;

    writer.write_u32(palette.size);
    writer.write_u32(palette.first);
    writer.write_u32(last);
    writer.write_zeros(8);

    for entry in &palette.entries {
        let flags = if entry.name.is_some() {
            PALETTE_ENTRY_FLAG_HAS_NAME
        } else {
            0
        };
        writer.write_u16(flags);
        writer.write_bytes(&[entry.color.r, entry.color.g, entry.color.b, entry.color.a]);
        if let Some(name) = &entry.name {
            writer.write_string(name, "palette entry name")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_color_count_reads_256() {
        let mut writer = Writer::new();
        writer.write_u16(1);
        writer.write_u8(0);
        writer.write_u8(0);
        for i in 0..256u32 {
            writer.write_bytes(&[i as u8, 0, 0]);
        }

        let mut reader = Reader::new(writer.as_bytes());
        let palette = decode_legacy_palette(&mut reader).unwrap();
        assert_eq!(palette.packets[0].colors.len(), 256);
        assert_eq!(palette.packets[0].colors[255], Rgb::new(255, 0, 0));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_full_packet_encodes_as_zero() {
        let palette = LegacyPalette {
            packets: vec![PalettePacket {
                skip: 0,
                colors: vec![Rgb::new(1, 2, 3); 256],
            }],
        };
        let mut writer = Writer::new();
        encode_legacy_palette(&mut writer, &palette).unwrap();
        assert_eq!(&writer.as_bytes()[..4], &[1, 0, 0, 0]);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_legacy_palette(&mut reader).unwrap(), palette);
    }

    #[test]
    fn test_empty_packet_rejected() {
        let palette = LegacyPalette {
            packets: vec![PalettePacket {
                skip: 1,
                colors: vec![],
            }],
        };
        let mut writer = Writer::new();
        assert_eq!(
            encode_legacy_palette(&mut writer, &palette),
            Err(EncodeError::EmptyPalettePacket)
        );
    }

    #[test]
    fn test_range_two_to_four_has_three_entries() {
        let mut writer = Writer::new();
        writer.write_u32(5);
        writer.write_u32(2);
        writer.write_u32(4);
        writer.write_zeros(8);
        for i in 0..3u8 {
            writer.write_u16(0);
            writer.write_bytes(&[i, i, i, 255]);
        }

        let mut reader = Reader::new(writer.as_bytes());
        let palette = decode_palette(&mut reader).unwrap();
        assert_eq!(palette.entries.len(), 3);
        let indices: Vec<u32> = palette.indexed_entries().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(palette.entries[2].color, Rgba::new(2, 2, 2, 255));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_entry_name_gated_by_its_flag() {
        let palette = Palette {
            size: 2,
            first: 0,
            entries: vec![
                PaletteEntry {
                    color: Rgba::new(1, 2, 3, 4),
                    name: Some("skin".to_string()),
                },
                PaletteEntry {
                    color: Rgba::new(5, 6, 7, 8),
                    name: None,
                },
            ],
            user_data: None,
        };
        let mut writer = Writer::new();
        encode_palette(&mut writer, &palette).unwrap();
        // 20 fixed + (6 + 2 + 4) + 6
        assert_eq!(writer.len(), 38);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_palette(&mut reader).unwrap(), palette);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut writer = Writer::new();
        writer.write_u32(5);
        writer.write_u32(4);
        writer.write_u32(2);
        writer.write_zeros(8);
        let mut reader = Reader::new(writer.as_bytes());
        assert!(matches!(
            decode_palette(&mut reader),
            Err(DecodeError::MalformedEncoding { .. })
        ));
    }
}
