//! Chunk framing and dispatch.
//!
//! Every chunk starts with a 6-byte preamble:
//!
//! ```text
//! DWORD  chunk size, preamble included
//! WORD   chunk type
//! BYTE[] payload (size - 6 bytes)
//! ```
//!
//! The payload is carved out as its own [`Reader`] before the type-specific
//! decoder runs, so the stream always resumes exactly `size` bytes after the
//! chunk start whatever the decoder consumed.

use crate::codec::cel::{decode_cel, decode_cel_extra, encode_cel, encode_cel_extra};
use crate::codec::layer::{decode_layer, encode_layer};
use crate::codec::palette::{
    decode_legacy_palette, decode_palette, encode_legacy_palette, encode_palette,
};
use crate::codec::primitives::{checked_u32, Reader, Writer};
use crate::codec::record::{
    decode_color_profile, decode_external_files, decode_mask, decode_user_data,
    encode_color_profile, encode_external_files, encode_mask, encode_user_data,
};
use crate::codec::slice::{decode_slice, encode_slice};
use crate::codec::tags::{decode_tags, encode_tags};
use crate::codec::tileset::{decode_tileset, encode_tileset};
use crate::error::{DecodeError, EncodeError};
use crate::limits::CHUNK_HEADER_SIZE;
use crate::model::{CelExtra, Chunk, ChunkType, ColorDepth, UserData};

/// One decoded wire chunk.
///
/// UserData and CelExtra chunks come back on their own; the frame decoder
/// attaches them to the record they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedChunk {
    Chunk(Chunk),
    UserData(UserData),
    CelExtra(CelExtra),
}

/// Decodes one chunk, preamble included.
pub fn decode_chunk(
    reader: &mut Reader<'_>,
    color_depth: ColorDepth,
) -> Result<DecodedChunk, DecodeError> {
    let size = reader.read_u32("chunk_size")?;
    if (size as usize) < CHUNK_HEADER_SIZE {
        return Err(DecodeError::InvalidChunkSize { size });
    }
    let code = reader.read_u16("chunk_type")?;
    let mut payload = reader.sub_reader(size as usize - CHUNK_HEADER_SIZE, "chunk_payload")?;

    let chunk_type = ChunkType::from_u16(code);
    log::trace!("chunk {chunk_type:?} ({code:#06x}), {size} bytes");

    let decoded = match chunk_type {
        ChunkType::LegacyPalette => {
            DecodedChunk::Chunk(Chunk::LegacyPalette(decode_legacy_palette(&mut payload)?))
        }
        ChunkType::LegacyPalette6Bit => {
            DecodedChunk::Chunk(Chunk::LegacyPalette6Bit(decode_legacy_palette(&mut payload)?))
        }
        ChunkType::Layer => DecodedChunk::Chunk(Chunk::Layer(decode_layer(&mut payload)?)),
        ChunkType::Cel => DecodedChunk::Chunk(Chunk::Cel(decode_cel(&mut payload, color_depth)?)),
        ChunkType::CelExtra => DecodedChunk::CelExtra(decode_cel_extra(&mut payload)?),
        ChunkType::ColorProfile => {
            DecodedChunk::Chunk(Chunk::ColorProfile(decode_color_profile(&mut payload)?))
        }
        ChunkType::ExternalFiles => {
            DecodedChunk::Chunk(Chunk::ExternalFiles(decode_external_files(&mut payload)?))
        }
        ChunkType::Mask => DecodedChunk::Chunk(Chunk::Mask(decode_mask(&mut payload)?)),
        ChunkType::Tags => DecodedChunk::Chunk(Chunk::Tags(decode_tags(&mut payload)?)),
        ChunkType::Palette => DecodedChunk::Chunk(Chunk::Palette(decode_palette(&mut payload)?)),
        ChunkType::UserData => DecodedChunk::UserData(decode_user_data(&mut payload)?),
        ChunkType::Slice => DecodedChunk::Chunk(Chunk::Slice(decode_slice(&mut payload)?)),
        ChunkType::Tileset => {
            DecodedChunk::Chunk(Chunk::Tileset(decode_tileset(&mut payload, color_depth)?))
        }
        ChunkType::Unknown(chunk_type) => {
            log::debug!(
                "skipping unknown chunk type {chunk_type:#06x} ({} bytes)",
                payload.remaining_len()
            );
            DecodedChunk::Chunk(Chunk::Unknown {
                chunk_type,
                data: payload
                    .read_bytes(payload.remaining_len(), "chunk_data")?
                    .to_vec(),
            })
        }
    };

    if !payload.is_empty() {
        log::trace!(
            "{} trailing bytes ignored in chunk {code:#06x}",
            payload.remaining_len()
        );
    }

    Ok(decoded)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes a chunk preamble, lets `body` write the payload, then back-fills the
/// chunk size.
pub fn write_chunk<F>(writer: &mut Writer, chunk_type: ChunkType, body: F) -> Result<(), EncodeError>
where
    F: FnOnce(&mut Writer) -> Result<(), EncodeError>,
{
    let start = writer.len();
    writer.write_u32(0);
    writer.write_u16(chunk_type.to_u16());
    body(writer)?;
    let size = checked_u32(writer.len() - start, "chunk")?;
    writer.patch_u32(start, size);
    Ok(())
}

fn write_user_data(writer: &mut Writer, user_data: Option<&UserData>) -> Result<(), EncodeError> {
    match user_data {
        Some(user_data) => write_chunk(writer, ChunkType::UserData, |w| {
            encode_user_data(w, user_data)
        }),
        None => Ok(()),
    }
}

/// Encodes a chunk followed by the CelExtra and UserData chunks attached to
/// it.
///
/// Tag user data beyond the number of tags is dropped, as the decoder would
/// drop it.
pub fn encode_chunk(
    writer: &mut Writer,
    chunk: &Chunk,
    color_depth: ColorDepth,
    level: u32,
) -> Result<(), EncodeError> {
    let chunk_type = chunk.chunk_type();

    match chunk {
        Chunk::LegacyPalette(palette) | Chunk::LegacyPalette6Bit(palette) => {
            write_chunk(writer, chunk_type, |w| encode_legacy_palette(w, palette))?;
        }
        Chunk::Layer(layer) => {
            write_chunk(writer, chunk_type, |w| encode_layer(w, layer))?;
            write_user_data(writer, layer.user_data.as_ref())?;
        }
        Chunk::Cel(cel) => {
            write_chunk(writer, chunk_type, |w| encode_cel(w, cel, color_depth, level))?;
            if let Some(extra) = &cel.extra {
                write_chunk(writer, ChunkType::CelExtra, |w| {
                    encode_cel_extra(w, extra);
                    Ok(())
                })?;
            }
            write_user_data(writer, cel.user_data.as_ref())?;
        }
        Chunk::ColorProfile(profile) => {
            write_chunk(writer, chunk_type, |w| encode_color_profile(w, profile))?;
        }
        Chunk::ExternalFiles(files) => {
            write_chunk(writer, chunk_type, |w| encode_external_files(w, files))?;
        }
        Chunk::Mask(mask) => {
            write_chunk(writer, chunk_type, |w| encode_mask(w, mask))?;
        }
        Chunk::Tags(tags) => {
            write_chunk(writer, chunk_type, |w| encode_tags(w, tags))?;
            for user_data in tags.user_data.iter().take(tags.tags.len()) {
                write_user_data(writer, Some(user_data))?;
            }
        }
        Chunk::Palette(palette) => {
            write_chunk(writer, chunk_type, |w| encode_palette(w, palette))?;
            write_user_data(writer, palette.user_data.as_ref())?;
        }
        Chunk::Slice(slice) => {
            write_chunk(writer, chunk_type, |w| encode_slice(w, slice))?;
            write_user_data(writer, slice.user_data.as_ref())?;
        }
        Chunk::Tileset(tileset) => {
            write_chunk(writer, chunk_type, |w| {
                encode_tileset(w, tileset, color_depth, level)
            })?;
            write_user_data(writer, tileset.user_data.as_ref())?;
        }
        Chunk::Unknown { data, .. } => {
            write_chunk(writer, chunk_type, |w| {
                w.write_bytes(data);
                Ok(())
            })?;
        }
    }

    Ok(())
}
