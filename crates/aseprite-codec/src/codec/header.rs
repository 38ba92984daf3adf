//! File header encoding/decoding.
//!
//! ```text
//! DWORD     file size
//! WORD      magic (0xA5E0)
//! WORD      frames
//! WORD      width, height
//! WORD      color depth (8/16/32)
//! DWORD     flags
//! WORD      speed (deprecated)
//! DWORD x2  zero
//! BYTE      transparent palette index
//! BYTE[3]   ignored
//! WORD      number of colors
//! BYTE x2   pixel width, pixel height
//! SHORT x2  grid x, grid y
//! WORD x2   grid width, grid height
//! BYTE[84]  reserved
//! ```

use crate::codec::primitives::{Reader, Writer};
use crate::error::DecodeError;
use crate::limits::{HEADER_MAGIC, HEADER_SIZE};
use crate::model::{ColorDepth, Header};

/// Decodes the 128-byte file header.
///
/// Only the magic is checked; every other field is taken as found.
pub fn decode_header(reader: &mut Reader<'_>) -> Result<Header, DecodeError> {
    let mut reader = reader.sub_reader(HEADER_SIZE, "header")?;

    let file_size = reader.read_u32("file_size")?;
    let magic = reader.read_u16("header_magic")?;
    if magic != HEADER_MAGIC {
        return Err(DecodeError::InvalidHeaderMagic { found: magic });
    }

    let frames = reader.read_u16("frames")?;
    let width = reader.read_u16("width")?;
    let height = reader.read_u16("height")?;
    let color_depth = ColorDepth::from_bpp(reader.read_u16("color_depth")?);
    let flags = reader.read_u32("header_flags")?;
    let speed = reader.read_u16("speed")?;
    reader.skip(8, "header_reserved")?;
    let transparent_index = reader.read_u8("transparent_index")?;
    reader.skip(3, "header_reserved")?;
    let color_count = reader.read_u16("color_count")?;
    let pixel_width = reader.read_u8("pixel_width")?;
    let pixel_height = reader.read_u8("pixel_height")?;
    let grid_x = reader.read_i16("grid_x")?;
    let grid_y = reader.read_i16("grid_y")?;
    let grid_width = reader.read_u16("grid_width")?;
    let grid_height = reader.read_u16("grid_height")?;
    // remaining 84 bytes are reserved

    Ok(Header {
        file_size,
        frames,
        width,
        height,
        color_depth,
        flags,
        speed,
        transparent_index,
        color_count,
        pixel_width,
        pixel_height,
        grid_x,
        grid_y,
        grid_width,
        grid_height,
    })
}

/// Encodes the file header as stored, with reserved regions zeroed.
pub fn encode_header(writer: &mut Writer, header: &Header) {
    let start = writer.len();

    writer.write_u32(header.file_size);
    writer.write_u16(HEADER_MAGIC);
    writer.write_u16(header.frames);
    writer.write_u16(header.width);
    writer.write_u16(header.height);
    writer.write_u16(header.color_depth.bpp());
    writer.write_u32(header.flags);
    writer.write_u16(header.speed);
    writer.write_zeros(8);
    writer.write_u8(header.transparent_index);
    writer.write_zeros(3);
    writer.write_u16(header.color_count);
    writer.write_u8(header.pixel_width);
    writer.write_u8(header.pixel_height);
    writer.write_i16(header.grid_x);
    writer.write_i16(header.grid_y);
    writer.write_u16(header.grid_width);
    writer.write_u16(header.grid_height);

    let written = writer.len() - start;
    writer.write_zeros(HEADER_SIZE - written);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_header() -> Header {
        Header {
            file_size: 1234,
            frames: 3,
            width: 32,
            height: 24,
            color_depth: ColorDepth::Indexed,
            flags: 1,
            speed: 100,
            transparent_index: 5,
            color_count: 16,
            pixel_width: 1,
            pixel_height: 2,
            grid_x: -4,
            grid_y: 8,
            grid_width: 16,
            grid_height: 16,
        }
    }

    #[test]
    fn test_header_roundtrip() {
        let header = sample_header();
        let mut writer = Writer::new();
        encode_header(&mut writer, &header);
        assert_eq!(writer.len(), HEADER_SIZE);
        assert_eq!(&writer.as_bytes()[4..6], &[0xE0, 0xA5]);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(decode_header(&mut reader).unwrap(), header);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_reserved_regions_are_zero() {
        let mut writer = Writer::new();
        encode_header(&mut writer, &sample_header());
        let bytes = writer.as_bytes();
        assert!(bytes[20..28].iter().all(|&b| b == 0));
        assert!(bytes[29..32].iter().all(|&b| b == 0));
        assert!(bytes[44..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reserved_bytes_ignored_on_decode() {
        let mut writer = Writer::new();
        encode_header(&mut writer, &sample_header());
        let mut bytes = writer.into_bytes();
        bytes[100] = 0xAB;
        bytes[30] = 0xCD;
        let mut reader = Reader::new(&bytes);
        assert_eq!(decode_header(&mut reader).unwrap(), sample_header());
    }

    #[test]
    fn test_truncated_header() {
        let mut writer = Writer::new();
        encode_header(&mut writer, &sample_header());
        let mut reader = Reader::new(&writer.as_bytes()[..100]);
        assert!(matches!(
            decode_header(&mut reader),
            Err(DecodeError::UnexpectedEof { context: "header" })
        ));
    }

    proptest! {
        #[test]
        fn prop_bad_magic_rejected(
            magic in any::<u16>().prop_filter("not the header magic", |m| *m != HEADER_MAGIC),
            fields in proptest::collection::vec(any::<u8>(), HEADER_SIZE),
        ) {
            let mut bytes = fields;
            bytes[4..6].copy_from_slice(&magic.to_le_bytes());
            let mut reader = Reader::new(&bytes);
            prop_assert_eq!(
                decode_header(&mut reader),
                Err(DecodeError::InvalidHeaderMagic { found: magic })
            );
        }
    }
}
