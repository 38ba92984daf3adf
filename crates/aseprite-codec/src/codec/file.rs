//! Whole-file encoding/decoding.
//!
//! A file is the 128-byte header followed by `header.frames` frames. Bytes
//! after the last frame are ignored.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::codec::frame::{decode_frame, decode_frame_chunks, decode_frame_preamble, encode_frame};
use crate::codec::header::{decode_header, encode_header};
use crate::codec::primitives::{checked_u16, checked_u32, Reader, Writer};
use crate::error::{DecodeError, EncodeError, Error};
use crate::limits::{DEFAULT_COMPRESSION_LEVEL, FRAME_HEADER_SIZE, HEADER_SIZE, MAX_FRAME_SIZE};
use crate::model::{AseFile, Header};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a file held in memory.
pub fn decode_file(bytes: &[u8]) -> Result<AseFile, DecodeError> {
    let mut reader = Reader::new(bytes);
    let header = decode_header(&mut reader)?;
    log_header(&header);
    if header.file_size as usize != bytes.len() {
        log::debug!(
            "header file size {} differs from {} bytes read",
            header.file_size,
            bytes.len()
        );
    }

    let capacity = (header.frames as usize).min(reader.remaining_len() / FRAME_HEADER_SIZE);
    let mut frames = Vec::with_capacity(capacity);
    for frame_index in 0..header.frames as usize {
        frames.push(decode_frame(&mut reader, frame_index, header.color_depth)?);
    }

    if !reader.is_empty() {
        log::debug!("{} bytes after the last frame ignored", reader.remaining_len());
    }

    Ok(AseFile { header, frames })
}

fn log_header(header: &Header) {
    log::debug!(
        "{}x{} sprite, {} bpp, {} frames",
        header.width,
        header.height,
        header.color_depth.bpp(),
        header.frames
    );
}

/// Turns a short read into the decode error the in-memory path would report.
fn read_exact_or_eof<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    context: &'static str,
) -> Result<(), Error> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::Decode(DecodeError::UnexpectedEof { context }),
        _ => Error::Io(e),
    })
}

/// Decodes a file from a byte stream, one frame at a time.
///
/// Each frame's preamble is read and checked before its body is buffered, and
/// frame sizes above [`MAX_FRAME_SIZE`] are rejected.
pub fn read_file<R: Read>(mut reader: R) -> Result<AseFile, Error> {
    let mut header_bytes = [0u8; HEADER_SIZE];
    read_exact_or_eof(&mut reader, &mut header_bytes, "header")?;
    let header = decode_header(&mut Reader::new(&header_bytes))?;
    log_header(&header);

    let mut frames = Vec::new();
    for frame_index in 0..header.frames as usize {
        let mut preamble_bytes = [0u8; FRAME_HEADER_SIZE];
        read_exact_or_eof(&mut reader, &mut preamble_bytes, "frame_size")?;
        let preamble = decode_frame_preamble(&mut Reader::new(&preamble_bytes), frame_index)?;

        let body_len = preamble.body_len();
        if preamble.size as usize > MAX_FRAME_SIZE {
            return Err(DecodeError::LengthExceedsLimit {
                field: "frame",
                len: preamble.size as usize,
                max: MAX_FRAME_SIZE,
            }
            .into());
        }

        let mut body = Vec::new();
        (&mut reader).take(body_len as u64).read_to_end(&mut body)?;
        if body.len() != body_len {
            return Err(DecodeError::UnexpectedEof {
                context: "frame_body",
            }
            .into());
        }

        let frame = decode_frame_chunks(
            &mut Reader::new(&body),
            &preamble,
            frame_index,
            header.color_depth,
        )?;
        frames.push(frame);
    }

    Ok(AseFile { header, frames })
}

/// Opens and decodes the file at `path`.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<AseFile, Error> {
    let path = path.as_ref();
    log::debug!("reading {}", path.display());
    read_file(BufReader::new(File::open(path)?))
}

// =============================================================================
// ENCODING
// =============================================================================

/// Options for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// zlib level (0-9) for cel images, tilemaps and tileset images. Values
    /// above 9 are clamped.
    pub compression_level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl EncodeOptions {
    /// Creates default encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the zlib level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }
}

/// Encodes a file with default options.
pub fn encode_file(file: &AseFile) -> Result<Vec<u8>, EncodeError> {
    encode_file_with_options(file, EncodeOptions::default())
}

/// Encodes a file.
///
/// The header's file size and frame count are written from the encoded
/// output and `file.frames`; their stored values are ignored. Every frame and
/// chunk size and every chunk count is recomputed.
pub fn encode_file_with_options(file: &AseFile, options: EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let header = Header {
        frames: checked_u16(file.frames.len(), "frames")?,
        ..file.header.clone()
    };

    let mut writer = Writer::with_capacity(HEADER_SIZE + file.frames.len() * 256);
    encode_header(&mut writer, &header);
    for frame in &file.frames {
        encode_frame(
            &mut writer,
            frame,
            header.color_depth,
            options.compression_level,
        )?;
    }

    let file_size = checked_u32(writer.len(), "file")?;
    writer.patch_u32(0, file_size);
    log::debug!("encoded {} frames into {file_size} bytes", file.frames.len());
    Ok(writer.into_bytes())
}

/// Encodes a file and writes it to `writer`.
pub fn write_file<W: Write>(file: &AseFile, mut writer: W) -> Result<(), Error> {
    let bytes = encode_file(file)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Encodes a file and saves it at `path`.
pub fn save_file<P: AsRef<Path>>(file: &AseFile, path: P) -> Result<(), Error> {
    let path = path.as_ref();
    log::debug!("writing {}", path.display());
    write_file(file, BufWriter::new(File::create(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::limits::{FRAME_MAGIC, HEADER_MAGIC};
    use crate::model::tileset::TILESET_FLAG_EMBEDDED;
    use crate::model::{
        Cel, CelContent, Chunk, ColorDepth, Frame, Layer, LayerKind, Palette, PaletteEntry,
        Rgba, Tilemap, Tileset, UserData,
    };
    use proptest::prelude::*;

    fn header(color_depth: ColorDepth) -> Header {
        Header {
            width: 4,
            height: 4,
            color_depth,
            color_count: 0,
            pixel_width: 1,
            pixel_height: 1,
            grid_width: 16,
            grid_height: 16,
            ..Default::default()
        }
    }

    fn sample_file() -> AseFile {
        let mut first = Frame::new(100);
        let mut background = Layer::new("Background");
        background.user_data = Some(UserData {
            text: Some("bg".to_string()),
            ..Default::default()
        });
        let mut tiles = Layer::new("Tiles");
        tiles.kind = LayerKind::Tilemap { tileset_index: 0 };
        first.chunks = vec![
            Chunk::Palette(Palette {
                size: 2,
                first: 0,
                entries: vec![
                    PaletteEntry {
                        color: Rgba::new(0, 0, 0, 255),
                        name: None,
                    },
                    PaletteEntry {
                        color: Rgba::new(255, 255, 255, 255),
                        name: Some("white".to_string()),
                    },
                ],
                user_data: None,
            }),
            Chunk::Tileset(Tileset {
                id: 0,
                flags: TILESET_FLAG_EMBEDDED,
                tile_count: 2,
                tile_width: 2,
                tile_height: 2,
                base_index: 1,
                name: "set".to_string(),
                external: None,
                image: Some(vec![0; 2 * 2 * 2 * 4]),
                user_data: None,
            }),
            Chunk::Layer(background),
            Chunk::Layer(tiles),
            Chunk::Cel(Cel {
                layer_index: 0,
                x: 0,
                y: 0,
                opacity: 255,
                z_index: 0,
                content: CelContent::Image {
                    width: 4,
                    height: 4,
                    pixels: (0..64).collect(),
                },
                extra: None,
                user_data: None,
            }),
            Chunk::Cel(Cel {
                layer_index: 1,
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
                    tiles: vec![1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
                }),
                extra: None,
                user_data: None,
            }),
        ];

        let mut second = Frame::new(120);
        second.chunks = vec![Chunk::Cel(Cel {
            layer_index: 0,
            x: 0,
            y: 0,
            opacity: 255,
            z_index: 0,
            content: CelContent::Linked { frame: 0 },
            extra: None,
            user_data: None,
        })];

        AseFile {
            header: header(ColorDepth::Rgba),
            frames: vec![first, second],
        }
    }

    /// The header fields encoding recomputes.
    fn normalized(mut file: AseFile, encoded_len: usize) -> AseFile {
        file.header.frames = file.frames.len() as u16;
        file.header.file_size = encoded_len as u32;
        file
    }

    #[test]
    fn test_file_roundtrip() {
        let file = sample_file();
        let bytes = encode_file(&file).unwrap();
        let decoded = decode_file(&bytes).unwrap();
        assert_eq!(decoded, normalized(file, bytes.len()));
        assert_eq!(decoded.duration_ms(), 220);
    }

    #[test]
    fn test_stream_and_memory_decoders_agree() {
        let bytes = encode_file(&sample_file()).unwrap();
        let from_stream = read_file(&bytes[..]).unwrap();
        assert_eq!(from_stream, decode_file(&bytes).unwrap());
    }

    #[test]
    fn test_write_file_matches_encode() {
        let file = sample_file();
        let mut out = Vec::new();
        write_file(&file, &mut out).unwrap();
        assert_eq!(out, encode_file(&file).unwrap());
    }

    #[test]
    fn test_compression_level_changes_nothing_decoded() {
        let file = sample_file();
        let fast = encode_file_with_options(&file, EncodeOptions::new().with_compression_level(0))
            .unwrap();
        let best = encode_file_with_options(&file, EncodeOptions::new().with_compression_level(9))
            .unwrap();
        assert_eq!(
            decode_file(&fast).unwrap().frames,
            decode_file(&best).unwrap().frames
        );
    }

    #[test]
    fn test_single_empty_frame() {
        let mut writer = Writer::new();
        let mut header = header(ColorDepth::Indexed);
        header.frames = 1;
        encode_header(&mut writer, &header);
        writer.write_u32(16);
        writer.write_u16(FRAME_MAGIC);
        writer.write_u16(0);
        writer.write_u16(100);
        writer.write_zeros(2);
        writer.write_u32(0);

        let file = decode_file(writer.as_bytes()).unwrap();
        assert_eq!(file.frames, vec![Frame::new(100)]);
        assert_eq!(file.header.effective_color_count(), 256);
    }

    #[test]
    fn test_bad_header_magic() {
        let mut bytes = encode_file(&sample_file()).unwrap();
        bytes[4] = 0;
        bytes[5] = 0;
        let err = decode_file(&bytes).unwrap_err();
        assert_eq!(err, DecodeError::InvalidHeaderMagic { found: 0 });
        assert_eq!(err.kind(), ErrorKind::BadHeaderMagic);

        match read_file(&bytes[..]) {
            Err(Error::Decode(DecodeError::InvalidHeaderMagic { found: 0 })) => {}
            other => panic!("expected header magic error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_magic_in_second_frame() {
        let bytes = encode_file(&sample_file()).unwrap();
        let first_len = u32::from_le_bytes([
            bytes[HEADER_SIZE],
            bytes[HEADER_SIZE + 1],
            bytes[HEADER_SIZE + 2],
            bytes[HEADER_SIZE + 3],
        ]) as usize;
        let mut bytes = bytes;
        bytes[HEADER_SIZE + first_len + 4] = 0xFF;

        assert!(matches!(
            decode_file(&bytes),
            Err(DecodeError::InvalidFrameMagic { frame: 1, .. })
        ));
        assert!(matches!(
            read_file(&bytes[..]),
            Err(Error::Decode(DecodeError::InvalidFrameMagic { frame: 1, .. }))
        ));
    }

    #[test]
    fn test_truncated_stream() {
        let bytes = encode_file(&sample_file()).unwrap();
        assert!(matches!(
            read_file(&bytes[..bytes.len() - 3]),
            Err(Error::Decode(DecodeError::UnexpectedEof {
                context: "frame_body"
            }))
        ));
        assert!(matches!(
            read_file(&bytes[..50]),
            Err(Error::Decode(DecodeError::UnexpectedEof { context: "header" }))
        ));
    }

    #[test]
    fn test_fewer_frames_than_declared() {
        let mut bytes = encode_file(&sample_file()).unwrap();
        bytes[6] = 3;
        assert!(matches!(
            decode_file(&bytes),
            Err(DecodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let file = sample_file();
        let mut bytes = encode_file(&file).unwrap();
        let len = bytes.len();
        bytes.extend_from_slice(&[0xEE; 10]);
        assert_eq!(decode_file(&bytes).unwrap(), normalized(file, len));
    }

    #[test]
    fn test_header_magic_written() {
        let bytes = encode_file(&AseFile::default()).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), HEADER_MAGIC);
    }

    fn arb_cel(color_depth: ColorDepth) -> impl Strategy<Value = Chunk> {
        let bpp = color_depth.bytes_per_pixel().unwrap_or(1);
        (0u16..4, 1u16..5, 1u16..5, any::<bool>(), any::<i16>()).prop_flat_map(
            move |(layer_index, width, height, compressed, x)| {
                let len = width as usize * height as usize * bpp;
                proptest::collection::vec(any::<u8>(), len).prop_map(move |pixels| {
                    let content = if compressed {
                        CelContent::Image {
                            width,
                            height,
                            pixels,
                        }
                    } else {
                        CelContent::Raw {
                            width,
                            height,
                            pixels,
                        }
                    };
                    Chunk::Cel(Cel {
                        layer_index,
                        x,
                        y: 0,
                        opacity: 255,
                        z_index: 0,
                        content,
                        extra: None,
                        user_data: None,
                    })
                })
            },
        )
    }

    fn arb_chunk(color_depth: ColorDepth) -> impl Strategy<Value = Chunk> {
        prop_oneof![
            ("[a-z]{0,12}", any::<u16>(), any::<bool>()).prop_map(|(name, level, note)| {
                let mut layer = Layer::new(name);
                layer.child_level = level % 3;
                if note {
                    layer.user_data = Some(UserData {
                        text: Some("note".to_string()),
                        ..Default::default()
                    });
                }
                Chunk::Layer(layer)
            }),
            arb_cel(color_depth),
            (0x3000u16..0x4000, proptest::collection::vec(any::<u8>(), 0..32))
                .prop_map(|(chunk_type, data)| Chunk::Unknown { chunk_type, data }),
        ]
    }

    fn arb_file() -> impl Strategy<Value = AseFile> {
        prop_oneof![
            Just(ColorDepth::Indexed),
            Just(ColorDepth::Grayscale),
            Just(ColorDepth::Rgba),
        ]
        .prop_flat_map(|color_depth| {
            let frame = (
                any::<u16>(),
                proptest::collection::vec(arb_chunk(color_depth), 0..6),
            )
                .prop_map(|(duration_ms, chunks)| Frame {
                    duration_ms,
                    chunks,
                });
            proptest::collection::vec(frame, 0..4).prop_map(move |frames| AseFile {
                header: header(color_depth),
                frames,
            })
        })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(file in arb_file()) {
            let bytes = encode_file(&file).unwrap();
            let decoded = decode_file(&bytes).unwrap();
            prop_assert_eq!(decoded, normalized(file, bytes.len()));
        }

        #[test]
        fn prop_truncation_never_panics(file in arb_file(), cut in any::<prop::sample::Index>()) {
            let bytes = encode_file(&file).unwrap();
            let cut = cut.index(bytes.len());
            let _ = decode_file(&bytes[..cut]);
        }
    }
}
