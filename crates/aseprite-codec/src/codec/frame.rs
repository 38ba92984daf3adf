//! Frame encoding/decoding.
//!
//! ```text
//! DWORD  bytes in this frame, preamble included
//! WORD   magic (0xF1FA)
//! WORD   chunk count (legacy; 0xFFFF means "see below")
//! WORD   duration in milliseconds
//! BYTE[2] reserved
//! DWORD  chunk count (0 means "use the legacy field")
//! CHUNK[] chunks
//! ```
//!
//! UserData and CelExtra chunks are folded into the most recent record that
//! can hold them. Chunks that cannot hold them leave that record in place.
//! The holder never outlives its frame.

use crate::codec::chunk::{decode_chunk, encode_chunk, DecodedChunk};
use crate::codec::primitives::{checked_u32, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{FRAME_HEADER_SIZE, FRAME_MAGIC, LEGACY_CHUNK_COUNT_OVERFLOW};
use crate::model::{CelExtra, Chunk, ColorDepth, Frame, UserData};

/// The fixed 16-byte part of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePreamble {
    /// Bytes in the frame, preamble included.
    pub size: u32,
    /// Effective chunk count.
    pub chunk_count: usize,
    pub duration_ms: u16,
}

impl FramePreamble {
    /// Length of the chunk area following the preamble.
    pub fn body_len(&self) -> usize {
        self.size as usize - FRAME_HEADER_SIZE
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a frame preamble. The magic is checked before the size.
pub fn decode_frame_preamble(
    reader: &mut Reader<'_>,
    frame: usize,
) -> Result<FramePreamble, DecodeError> {
    let size = reader.read_u32("frame_size")?;
    let magic = reader.read_u16("frame_magic")?;
    if magic != FRAME_MAGIC {
        return Err(DecodeError::InvalidFrameMagic {
            frame,
            found: magic,
        });
    }
    if (size as usize) < FRAME_HEADER_SIZE {
        return Err(DecodeError::InvalidFrameSize { frame, size });
    }

    let legacy_count = reader.read_u16("frame_chunk_count")?;
    let duration_ms = reader.read_u16("frame_duration")?;
    reader.skip(2, "frame_reserved")?;
    let new_count = reader.read_u32("frame_chunk_count_new")?;

    let chunk_count = if new_count != 0 {
        new_count as usize
    } else {
        legacy_count as usize
    };

    Ok(FramePreamble {
        size,
        chunk_count,
        duration_ms,
    })
}

/// Receiver for UserData and CelExtra chunks: an index into `Frame::chunks`.
type Holder = Option<usize>;

fn can_hold_user_data(chunk: &Chunk) -> bool {
    matches!(
        chunk,
        Chunk::Layer(_)
            | Chunk::Cel(_)
            | Chunk::Tags(_)
            | Chunk::Palette(_)
            | Chunk::Slice(_)
            | Chunk::Tileset(_)
    )
}

fn attach_user_data(frame: &mut Frame, holder: Holder, user_data: UserData) {
    let Some(chunk) = holder.and_then(|index| frame.chunks.get_mut(index)) else {
        log::debug!("discarding user data with no preceding record");
        return;
    };

    let slot = match chunk {
        Chunk::Layer(layer) => &mut layer.user_data,
        Chunk::Cel(cel) => &mut cel.user_data,
        Chunk::Palette(palette) => &mut palette.user_data,
        Chunk::Slice(slice) => &mut slice.user_data,
        Chunk::Tileset(tileset) => &mut tileset.user_data,
        Chunk::Tags(tags) => {
            if tags.user_data.len() < tags.tags.len() {
                tags.user_data.push(user_data);
            } else {
                log::debug!("discarding user data past the last of {} tags", tags.tags.len());
            }
            return;
        }
        _ => return,
    };

    if slot.is_some() {
        log::debug!("replacing earlier user data for the same record");
    }
    *slot = Some(user_data);
}

fn attach_cel_extra(frame: &mut Frame, holder: Holder, extra: CelExtra) {
    match holder.and_then(|index| frame.chunks.get_mut(index)) {
        Some(Chunk::Cel(cel)) => {
            if cel.extra.is_some() {
                log::debug!("replacing earlier cel extra");
            }
            cel.extra = Some(extra);
        }
        _ => log::debug!("discarding cel extra with no preceding cel"),
    }
}

/// Decodes `preamble.chunk_count` chunks from a frame body.
///
/// `body` must be exactly the frame's chunk area; running out of it before
/// the declared count is reached is a [`DecodeError::ChunkCountMismatch`].
pub fn decode_frame_chunks(
    body: &mut Reader<'_>,
    preamble: &FramePreamble,
    frame_index: usize,
    color_depth: ColorDepth,
) -> Result<Frame, DecodeError> {
    log::trace!(
        "frame {frame_index}: {} chunks, {} bytes",
        preamble.chunk_count,
        preamble.size
    );
    let mut frame = Frame::new(preamble.duration_ms);
    let mut holder: Holder = None;

    for dispatched in 0..preamble.chunk_count {
        if body.is_empty() {
            return Err(DecodeError::ChunkCountMismatch {
                frame: frame_index,
                declared: preamble.chunk_count,
                dispatched,
            });
        }

        match decode_chunk(body, color_depth)? {
            DecodedChunk::Chunk(chunk) => {
                if can_hold_user_data(&chunk) {
                    holder = Some(frame.chunks.len());
                }
                frame.chunks.push(chunk);
            }
            DecodedChunk::UserData(user_data) => attach_user_data(&mut frame, holder, user_data),
            DecodedChunk::CelExtra(extra) => attach_cel_extra(&mut frame, holder, extra),
        }
    }

    if !body.is_empty() {
        log::debug!(
            "frame {frame_index}: {} bytes after the last chunk ignored",
            body.remaining_len()
        );
    }

    Ok(frame)
}

/// Decodes one frame, preamble included. The reader resumes exactly after
/// the frame's declared size.
pub fn decode_frame(
    reader: &mut Reader<'_>,
    frame_index: usize,
    color_depth: ColorDepth,
) -> Result<Frame, DecodeError> {
    let preamble = decode_frame_preamble(reader, frame_index)?;
    let mut body = reader.sub_reader(preamble.body_len(), "frame_body")?;
    decode_frame_chunks(&mut body, &preamble, frame_index, color_depth)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes one frame with recomputed size and chunk counts.
pub fn encode_frame(
    writer: &mut Writer,
    frame: &Frame,
    color_depth: ColorDepth,
    level: u32,
) -> Result<(), EncodeError> {
    let chunk_count = frame.wire_chunk_count();
    let new_count = checked_u32(chunk_count, "frame chunks")?;
    let legacy_count = chunk_count.min(LEGACY_CHUNK_COUNT_OVERFLOW as usize) as u16;

    let start = writer.len();
    writer.write_u32(0);
    writer.write_u16(FRAME_MAGIC);
    writer.write_u16(legacy_count);
    writer.write_u16(frame.duration_ms);
    writer.write_zeros(2);
    writer.write_u32(new_count);

    for chunk in &frame.chunks {
        encode_chunk(writer, chunk, color_depth, level)?;
    }

    let size = checked_u32(writer.len() - start, "frame")?;
    writer.patch_u32(start, size);
    Ok(())
}
