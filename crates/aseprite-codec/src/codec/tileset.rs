//! Tileset chunk encoding/decoding (0x2023).

use crate::codec::compress::{deflate, inflate};
use crate::codec::primitives::{checked_u32, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_DECOMPRESSED_SIZE;
use crate::model::tileset::{TILESET_FLAG_EMBEDDED, TILESET_FLAG_EXTERNAL};
use crate::model::{ColorDepth, ExternalTileset, Tileset};

/// Byte length of the tileset image, or `None` if it does not fit a `usize`.
fn image_len(tile_width: u16, tile_height: u16, tile_count: u32, bpp: usize) -> Option<usize> {
    (tile_width as usize)
        .checked_mul(tile_height as usize)?
        .checked_mul(tile_count as usize)?
        .checked_mul(bpp)
}

pub fn decode_tileset(reader: &mut Reader<'_>, color_depth: ColorDepth) -> Result<Tileset, DecodeError> {
    let id = reader.read_u32("tileset_id")?;
    let flags = reader.read_u32("tileset_flags")?;
    let tile_count = reader.read_u32("tileset_tile_count")?;
    let tile_width = reader.read_u16("tileset_tile_width")?;
    let tile_height = reader.read_u16("tileset_tile_height")?;
    let base_index = reader.read_i16("tileset_base_index")?;
    reader.skip(14, "tileset_reserved")?;
    let name = reader.read_string("tileset_name")?;

    let external = if flags & TILESET_FLAG_EXTERNAL != 0 {
        Some(ExternalTileset {
            file_id: reader.read_u32("tileset_external_file_id")?,
            tileset_id: reader.read_u32("tileset_external_id")?,
        })
    } else {
        None
    };

    let image = if flags & TILESET_FLAG_EMBEDDED != 0 {
        let len = reader.read_u32("tileset_image_length")? as usize;
        let compressed = reader.read_bytes(len, "tileset_image")?;
        let expected = match color_depth.bytes_per_pixel() {
            Some(bpp) => Some(image_len(tile_width, tile_height, tile_count, bpp).ok_or(
                DecodeError::LengthExceedsLimit {
                    field: "tileset_image",
                    len: usize::MAX,
                    max: MAX_DECOMPRESSED_SIZE,
                },
            )?),
            None => None,
        };
        Some(inflate(compressed, expected, "tileset_image")?)
    } else {
        None
    };

    Ok(Tileset {
        id,
        flags,
        tile_count,
        tile_width,
        tile_height,
        base_index,
        name,
        external,
        image,
        user_data: None,
    })
}

/// Encodes a tileset. The external and embedded flag bits are taken from the
/// presence of [`Tileset::external`] and [`Tileset::image`].
pub fn encode_tileset(
    writer: &mut Writer,
    tileset: &Tileset,
    color_depth: ColorDepth,
    level: u32,
) -> Result<(), EncodeError> {
    let mut flags = tileset.flags & !(TILESET_FLAG_EXTERNAL | TILESET_FLAG_EMBEDDED);
    if tileset.external.is_some() {
        flags |= TILESET_FLAG_EXTERNAL;
    }
    if tileset.image.is_some() {
        flags |= TILESET_FLAG_EMBEDDED;
    }

    writer.write_u32(tileset.id);
    writer.write_u32(flags);
    writer.write_u32(tileset.tile_count);
    writer.write_u16(tileset.tile_width);
    writer.write_u16(tileset.tile_height);
    writer.write_i16(tileset.base_index);
    writer.write_zeros(14);
    writer.write_string(&tileset.name, "tileset name")?;

    if let Some(external) = &tileset.external {
        writer.write_u32(external.file_id);
        writer.write_u32(external.tileset_id);
    }

    if let Some(image) = &tileset.image {
        if let Some(bpp) = color_depth.bytes_per_pixel() {
            let expected = image_len(
                tileset.tile_width,
                tileset.tile_height,
                tileset.tile_count,
                bpp,
            )
            .ok_or(EncodeError::LengthExceedsLimit {
                field: "tileset image",
                len: usize::MAX,
                max: MAX_DECOMPRESSED_SIZE,
            })?;
            if image.len() != expected {
                return Err(EncodeError::PixelBufferMismatch {
                    context: "tileset image",
                    expected,
                    actual: image.len(),
                });
            }
        }
        let compressed = deflate(image, level)?;
        writer.write_u32(checked_u32(compressed.len(), "tileset image")?);
        writer.write_bytes(&compressed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tileset::TILESET_FLAG_ZERO_IS_EMPTY;

    fn tileset() -> Tileset {
        Tileset {
            id: 0,
            flags: TILESET_FLAG_ZERO_IS_EMPTY,
            tile_count: 3,
            tile_width: 2,
            tile_height: 2,
            base_index: 1,
            name: "terrain".to_string(),
            external: None,
            image: None,
            user_data: None,
        }
    }

    #[test]
    fn test_embedded_image_roundtrip() {
        let mut tileset = tileset();
        tileset.image = Some((0..24).collect());

        let mut writer = Writer::new();
        encode_tileset(&mut writer, &tileset, ColorDepth::Grayscale, 6).unwrap();

        let mut reader = Reader::new(writer.as_bytes());
        let decoded = decode_tileset(&mut reader, ColorDepth::Grayscale).unwrap();
        assert_eq!(decoded.flags, TILESET_FLAG_ZERO_IS_EMPTY | TILESET_FLAG_EMBEDDED);
        assert_eq!(decoded.image, tileset.image);
        assert!(decoded.zero_is_empty());
        assert!(reader.is_empty());
    }

    #[test]
    fn test_external_link_roundtrip() {
        let mut tileset = tileset();
        tileset.flags = TILESET_FLAG_EXTERNAL;
        tileset.external = Some(ExternalTileset {
            file_id: 4,
            tileset_id: 2,
        });

        let mut writer = Writer::new();
        encode_tileset(&mut writer, &tileset, ColorDepth::Rgba, 6).unwrap();
        // 32 fixed + 9 name + 8 link
        assert_eq!(writer.len(), 49);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_tileset(&mut reader, ColorDepth::Rgba).unwrap(), tileset);
    }

    #[test]
    fn test_stale_flag_bits_cleared() {
        let mut tileset = tileset();
        tileset.flags |= TILESET_FLAG_EXTERNAL | TILESET_FLAG_EMBEDDED;

        let mut writer = Writer::new();
        encode_tileset(&mut writer, &tileset, ColorDepth::Rgba, 6).unwrap();
        let mut reader = Reader::new(writer.as_bytes());
        let decoded = decode_tileset(&mut reader, ColorDepth::Rgba).unwrap();
        assert_eq!(decoded.flags, TILESET_FLAG_ZERO_IS_EMPTY);
        assert_eq!(decoded.external, None);
        assert_eq!(decoded.image, None);
    }

    #[test]
    fn test_image_size_checked_against_tiles() {
        let mut writer = Writer::new();
        let mut tileset = tileset();
        tileset.flags |= TILESET_FLAG_EMBEDDED;
        tileset.image = Some(vec![0; 10]);
        assert_eq!(
            encode_tileset(&mut writer, &tileset, ColorDepth::Indexed, 6),
            Err(EncodeError::PixelBufferMismatch {
                context: "tileset image",
                expected: 12,
                actual: 10,
            })
        );
    }

    #[test]
    fn test_oversized_tile_geometry_rejected() {
        let mut tileset = tileset();
        tileset.tile_count = u32::MAX;
        tileset.tile_width = u16::MAX;
        tileset.tile_height = u16::MAX;
        tileset.image = Some(vec![0; 4]);

        let mut writer = Writer::new();
        assert_eq!(
            encode_tileset(&mut writer, &tileset, ColorDepth::Rgba, 6),
            Err(EncodeError::LengthExceedsLimit {
                field: "tileset image",
                len: usize::MAX,
                max: MAX_DECOMPRESSED_SIZE,
            })
        );

        // same geometry on the wire, with a small zlib stream
        let mut writer = Writer::new();
        tileset.image = None;
        encode_tileset(&mut writer, &tileset, ColorDepth::Rgba, 6).unwrap();
        let mut bytes = writer.into_bytes();
        bytes[4..8].copy_from_slice(&TILESET_FLAG_EMBEDDED.to_le_bytes());
        let compressed = deflate(&[0; 4], 6).unwrap();
        bytes.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&compressed);

        assert_eq!(
            decode_tileset(&mut Reader::new(&bytes), ColorDepth::Rgba),
            Err(DecodeError::LengthExceedsLimit {
                field: "tileset_image",
                len: usize::MAX,
                max: MAX_DECOMPRESSED_SIZE,
            })
        );
    }

    #[test]
    fn test_unknown_depth_skips_size_check() {
        let mut tileset = tileset();
        tileset.image = Some(vec![7; 5]);

        let mut writer = Writer::new();
        encode_tileset(&mut writer, &tileset, ColorDepth::Other(24), 6).unwrap();
        let mut reader = Reader::new(writer.as_bytes());
        let decoded = decode_tileset(&mut reader, ColorDepth::Other(24)).unwrap();
        assert_eq!(decoded.image, Some(vec![7; 5]));
    }
}
