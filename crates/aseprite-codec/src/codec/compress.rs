//! zlib (RFC 1950) compression over explicit byte ranges.
//!
//! Decompression always receives the exact compressed range, never "the rest
//! of the stream", so it can never consume bytes of the next chunk.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_DECOMPRESSED_SIZE;

/// Decompresses a zlib stream.
///
/// When `expected` is given, the decompressed length must match it exactly.
pub fn inflate(
    compressed: &[u8],
    expected: Option<usize>,
    context: &'static str,
) -> Result<Vec<u8>, DecodeError> {
    if let Some(expected) = expected {
        if expected > MAX_DECOMPRESSED_SIZE {
            return Err(DecodeError::LengthExceedsLimit {
                field: context,
                len: expected,
                max: MAX_DECOMPRESSED_SIZE,
            });
        }
    }

    let limit = MAX_DECOMPRESSED_SIZE as u64 + 1;
    let mut decoder = ZlibDecoder::new(compressed).take(limit);
    let mut decompressed = Vec::with_capacity(expected.unwrap_or(compressed.len() * 4));
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| DecodeError::DecompressionFailed(format!("{context}: {e}")))?;

    if decompressed.len() > MAX_DECOMPRESSED_SIZE {
        return Err(DecodeError::LengthExceedsLimit {
            field: context,
            len: decompressed.len(),
            max: MAX_DECOMPRESSED_SIZE,
        });
    }

    if let Some(expected) = expected {
        if decompressed.len() != expected {
            return Err(DecodeError::UncompressedSizeMismatch {
                context,
                expected,
                actual: decompressed.len(),
            });
        }
    }

    Ok(decompressed)
}

/// Compresses a buffer into a zlib stream at the given level (0-9).
pub fn deflate(data: &[u8], level: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::new(level.min(9)));
    encoder
        .write_all(data)
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))
}
