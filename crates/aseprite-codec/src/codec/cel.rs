//! Cel chunk encoding/decoding (0x2005) and cel extra (0x2006).
//!
//! Cel content is sized by the file's color depth, so both directions take it
//! from the header.

use crate::codec::compress::{deflate, inflate};
use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::model::cel::{
    CEL_TYPE_COMPRESSED_IMAGE, CEL_TYPE_COMPRESSED_TILEMAP, CEL_TYPE_LINKED, CEL_TYPE_RAW,
};
use crate::model::{Cel, CelContent, CelExtra, ColorDepth, Tilemap};

/// Byte length of a `width` x `height` pixel buffer at `color_depth`.
fn pixel_len(width: u16, height: u16, color_depth: ColorDepth) -> Option<usize> {
    color_depth
        .bytes_per_pixel()
        .map(|bpp| width as usize * height as usize * bpp)
}

/// Byte length of a tile buffer, when the tile width is a whole byte count.
fn tile_len(width: u16, height: u16, bits_per_tile: u16) -> Option<usize> {
    match bits_per_tile {
        8 | 16 | 32 => Some(width as usize * height as usize * bits_per_tile as usize / 8),
        _ => None,
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a cel payload.
///
/// Compressed content is inflated from the remaining bytes of the payload,
/// which the caller has already bounded to this chunk.
pub fn decode_cel(reader: &mut Reader<'_>, color_depth: ColorDepth) -> Result<Cel, DecodeError> {
    let layer_index = reader.read_u16("cel_layer_index")?;
    let x = reader.read_i16("cel_x")?;
    let y = reader.read_i16("cel_y")?;
    let opacity = reader.read_u8("cel_opacity")?;
    let cel_type = reader.read_u16("cel_type")?;
    let z_index = reader.read_i16("cel_z_index")?;
    reader.skip(5, "cel_reserved")?;

    let content = match cel_type {
        CEL_TYPE_RAW => {
            let width = reader.read_u16("cel_width")?;
            let height = reader.read_u16("cel_height")?;
            let len = pixel_len(width, height, color_depth).ok_or(
                DecodeError::UnsupportedColorDepth {
                    depth: color_depth.bpp(),
                },
            )?;
            let pixels = reader.read_bytes(len, "cel_raw_pixels")?.to_vec();
            CelContent::Raw {
                width,
                height,
                pixels,
            }
        }
        CEL_TYPE_LINKED => CelContent::Linked {
            frame: reader.read_u16("cel_linked_frame")?,
        },
        CEL_TYPE_COMPRESSED_IMAGE => {
            let width = reader.read_u16("cel_width")?;
            let height = reader.read_u16("cel_height")?;
            let expected = pixel_len(width, height, color_depth).ok_or(
                DecodeError::UnsupportedColorDepth {
                    depth: color_depth.bpp(),
                },
            )?;
            let compressed = reader.read_bytes(reader.remaining_len(), "cel_image")?;
            let pixels = inflate(compressed, Some(expected), "cel_image")?;
            CelContent::Image {
                width,
                height,
                pixels,
            }
        }
        CEL_TYPE_COMPRESSED_TILEMAP => {
            let width = reader.read_u16("tilemap_width")?;
            let height = reader.read_u16("tilemap_height")?;
            let bits_per_tile = reader.read_u16("tilemap_bits_per_tile")?;
            let tile_id_mask = reader.read_u32("tilemap_tile_id_mask")?;
            let x_flip_mask = reader.read_u32("tilemap_x_flip_mask")?;
            let y_flip_mask = reader.read_u32("tilemap_y_flip_mask")?;
            let diagonal_flip_mask = reader.read_u32("tilemap_diagonal_flip_mask")?;
            reader.skip(10, "tilemap_reserved")?;
            let compressed = reader.read_bytes(reader.remaining_len(), "tilemap_tiles")?;
            let tiles = inflate(
                compressed,
                tile_len(width, height, bits_per_tile),
                "tilemap_tiles",
            )?;
            CelContent::Tilemap(Tilemap {
                width,
                height,
                bits_per_tile,
                tile_id_mask,
                x_flip_mask,
                y_flip_mask,
                diagonal_flip_mask,
                tiles,
            })
        }
        other => {
            log::debug!("keeping {} bytes of unknown cel type {other}", reader.remaining_len());
            CelContent::Unknown {
                cel_type: other,
                data: reader.read_bytes(reader.remaining_len(), "cel_data")?.to_vec(),
            }
        }
    };

    Ok(Cel {
        layer_index,
        x,
        y,
        opacity,
        z_index,
        content,
        extra: None,
        user_data: None,
    })
}

pub fn decode_cel_extra(reader: &mut Reader<'_>) -> Result<CelExtra, DecodeError> {
    let flags = reader.read_u32("cel_extra_flags")?;
    let x = reader.read_fixed("cel_extra_x")?;
    let y = reader.read_fixed("cel_extra_y")?;
    let width = reader.read_fixed("cel_extra_width")?;
    let height = reader.read_fixed("cel_extra_height")?;
    reader.skip(16, "cel_extra_reserved")?;

    Ok(CelExtra {
        flags,
        x,
        y,
        width,
        height,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

fn expect_pixels(
    width: u16,
    height: u16,
    pixels: &[u8],
    color_depth: ColorDepth,
    context: &'static str,
) -> Result<(), EncodeError> {
    let expected = pixel_len(width, height, color_depth).ok_or(
        EncodeError::UnsupportedColorDepth {
            depth: color_depth.bpp(),
        },
    )?;
    if pixels.len() != expected {
        return Err(EncodeError::PixelBufferMismatch {
            context,
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encodes a cel payload, compressing image and tilemap content at `level`.
pub fn encode_cel(
    writer: &mut Writer,
    cel: &Cel,
    color_depth: ColorDepth,
    level: u32,
) -> Result<(), EncodeError> {
    writer.write_u16(cel.layer_index);
    writer.write_i16(cel.x);
    writer.write_i16(cel.y);
    writer.write_u8(cel.opacity);
    writer.write_u16(cel.content.cel_type());
    writer.write_i16(cel.z_index);
    writer.write_zeros(5);

    match &cel.content {
        CelContent::Raw {
            width,
            height,
            pixels,
        } => {
            expect_pixels(*width, *height, pixels, color_depth, "raw cel")?;
            writer.write_u16(*width);
            writer.write_u16(*height);
            writer.write_bytes(pixels);
        }
        CelContent::Linked { frame } => {
            writer.write_u16(*frame);
        }
        CelContent::Image {
            width,
            height,
            pixels,
        } => {
            expect_pixels(*width, *height, pixels, color_depth, "image cel")?;
            writer.write_u16(*width);
            writer.write_u16(*height);
            writer.write_bytes(&deflate(pixels, level)?);
        }
        CelContent::Tilemap(tilemap) => {
            if let Some(expected) = tile_len(tilemap.width, tilemap.height, tilemap.bits_per_tile)
            {
                if tilemap.tiles.len() != expected {
                    return Err(EncodeError::PixelBufferMismatch {
                        context: "tilemap cel",
                        expected,
                        actual: tilemap.tiles.len(),
                    });
                }
            }
            writer.write_u16(tilemap.width);
            writer.write_u16(tilemap.height);
            writer.write_u16(tilemap.bits_per_tile);
            writer.write_u32(tilemap.tile_id_mask);
            writer.write_u32(tilemap.x_flip_mask);
            writer.write_u32(tilemap.y_flip_mask);
            writer.write_u32(tilemap.diagonal_flip_mask);
            writer.write_zeros(10);
            writer.write_bytes(&deflate(&tilemap.tiles, level)?);
        }
        CelContent::Unknown { data, .. } => {
            writer.write_bytes(data);
        }
    }

    Ok(())
}

pub fn encode_cel_extra(writer: &mut Writer, extra: &CelExtra) {
    writer.write_u32(extra.flags);
    writer.write_fixed(extra.x);
    writer.write_fixed(extra.y);
    writer.write_fixed(extra.width);
    writer.write_fixed(extra.height);
    writer.write_zeros(16);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Fixed;

    fn raw_cel_bytes(width: u16, height: u16, pixels: &[u8]) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_u16(0);
        writer.write_i16(0);
        writer.write_i16(0);
        writer.write_u8(255);
        writer.write_u16(CEL_TYPE_RAW);
        writer.write_i16(0);
        writer.write_zeros(5);
        writer.write_u16(width);
        writer.write_u16(height);
        writer.write_bytes(pixels);
        writer.into_bytes()
    }

    #[test]
    fn test_raw_cel_length_follows_color_depth() {
        for (depth, bpp) in [
            (ColorDepth::Indexed, 1),
            (ColorDepth::Grayscale, 2),
            (ColorDepth::Rgba, 4),
        ] {
            let pixels: Vec<u8> = (0..(2 * 2 * bpp) as u8).collect();
            let bytes = raw_cel_bytes(2, 2, &pixels);
            let mut reader = Reader::new(&bytes);
            let cel = decode_cel(&mut reader, depth).unwrap();
            assert_eq!(cel.content.pixels().unwrap().len(), 4 * bpp);
            assert!(reader.is_empty(), "{depth:?}");
        }
    }

    #[test]
    fn test_raw_cel_short_buffer() {
        let bytes = raw_cel_bytes(2, 2, &[0; 15]);
        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            decode_cel(&mut reader, ColorDepth::Rgba),
            Err(DecodeError::UnexpectedEof {
                context: "cel_raw_pixels"
            })
        ));
    }

    #[test]
    fn test_raw_cel_needs_known_depth() {
        let bytes = raw_cel_bytes(1, 1, &[0; 4]);
        let mut reader = Reader::new(&bytes);
        assert_eq!(
            decode_cel(&mut reader, ColorDepth::Other(24)),
            Err(DecodeError::UnsupportedColorDepth { depth: 24 })
        );
    }

    #[test]
    fn test_image_cel_roundtrip() {
        let cel = Cel {
            layer_index: 2,
            x: -3,
            y: 4,
            opacity: 200,
            z_index: -1,
            content: CelContent::Image {
                width: 3,
                height: 2,
                pixels: (0..12).collect(),
            },
            extra: None,
            user_data: None,
        };
        let mut writer = Writer::new();
        encode_cel(&mut writer, &cel, ColorDepth::Grayscale, 6).unwrap();

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_cel(&mut reader, ColorDepth::Grayscale).unwrap(), cel);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_image_cel_size_mismatch() {
        let mut writer = Writer::new();
        writer.write_u16(0);
        writer.write_i16(0);
        writer.write_i16(0);
        writer.write_u8(255);
        writer.write_u16(CEL_TYPE_COMPRESSED_IMAGE);
        writer.write_i16(0);
        writer.write_zeros(5);
        writer.write_u16(2);
        writer.write_u16(2);
        writer.write_bytes(&deflate(&[0; 3], 6).unwrap());

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(
            decode_cel(&mut reader, ColorDepth::Indexed),
            Err(DecodeError::UncompressedSizeMismatch {
                context: "cel_image",
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_tilemap_cel_roundtrip() {
        let cel = Cel {
            layer_index: 0,
            x: 0,
            y: 0,
            opacity: 255,
            z_index: 0,
            content: CelContent::Tilemap(Tilemap {
                width: 2,
                height: 2,
                bits_per_tile: 32,
                tile_id_mask: 0x1fff_ffff,
                x_flip_mask: 0x2000_0000,
                y_flip_mask: 0x4000_0000,
                diagonal_flip_mask: 0x8000_0000,
                tiles: vec![1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0x20, 0, 0, 0, 0],
            }),
            extra: None,
            user_data: None,
        };
        let mut writer = Writer::new();
        // tiles do not depend on the color depth
        encode_cel(&mut writer, &cel, ColorDepth::Other(0), 9).unwrap();

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_cel(&mut reader, ColorDepth::Other(0)).unwrap(), cel);
    }

    #[test]
    fn test_linked_cel_ignores_trailing_bytes() {
        let mut writer = Writer::new();
        writer.write_u16(1);
        writer.write_i16(0);
        writer.write_i16(0);
        writer.write_u8(255);
        writer.write_u16(CEL_TYPE_LINKED);
        writer.write_i16(0);
        writer.write_zeros(5);
        writer.write_u16(4);
        writer.write_zeros(3);

        let mut reader = Reader::new(writer.as_bytes());
        let cel = decode_cel(&mut reader, ColorDepth::Rgba).unwrap();
        assert_eq!(cel.content, CelContent::Linked { frame: 4 });
    }

    #[test]
    fn test_unknown_cel_type_keeps_payload() {
        let cel = Cel {
            layer_index: 0,
            x: 0,
            y: 0,
            opacity: 255,
            z_index: 0,
            content: CelContent::Unknown {
                cel_type: 7,
                data: vec![9, 8, 7],
            },
            extra: None,
            user_data: None,
        };
        let mut writer = Writer::new();
        encode_cel(&mut writer, &cel, ColorDepth::Rgba, 6).unwrap();
        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_cel(&mut reader, ColorDepth::Rgba).unwrap(), cel);
    }

    #[test]
    fn test_encode_rejects_wrong_pixel_count() {
        let cel = Cel {
            layer_index: 0,
            x: 0,
            y: 0,
            opacity: 255,
            z_index: 0,
            content: CelContent::Raw {
                width: 2,
                height: 2,
                pixels: vec![0; 8],
            },
            extra: None,
            user_data: None,
        };
        let mut writer = Writer::new();
        assert_eq!(
            encode_cel(&mut writer, &cel, ColorDepth::Rgba, 6),
            Err(EncodeError::PixelBufferMismatch {
                context: "raw cel",
                expected: 16,
                actual: 8,
            })
        );
    }

    #[test]
    fn test_cel_extra_roundtrip() {
        let extra = CelExtra {
            flags: 1,
            x: Fixed::from_f64(1.5),
            y: Fixed::from_f64(-2.25),
            width: Fixed::from_f64(32.0),
            height: Fixed::from_f64(16.5),
        };
        let mut writer = Writer::new();
        encode_cel_extra(&mut writer, &extra);
        assert_eq!(writer.len(), 36);

        let mut reader = Reader::new(writer.as_bytes());
        let decoded = decode_cel_extra(&mut reader).unwrap();
        assert_eq!(decoded, extra);
        assert!(decoded.has_precise_bounds());
    }
}
