//! Error types for decoding, encoding and validation.

use thiserror::Error;

/// Broad classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file header signature is wrong.
    BadHeaderMagic,
    /// A frame preamble signature is wrong.
    BadFrameMagic,
    /// A frame did not contain the number of chunks it declared.
    ChunkCountMismatch,
    /// A zlib stream was malformed, truncated or of the wrong size.
    CompressedStream,
    /// Any other structural problem (truncation, bad sizes, bad UTF-8).
    Malformed,
}

/// Error during binary decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("invalid header magic: expected 0xA5E0, found {found:#06X}")]
    InvalidHeaderMagic { found: u16 },

    #[error("invalid magic in frame {frame}: expected 0xF1FA, found {found:#06X}")]
    InvalidFrameMagic { frame: usize, found: u16 },

    #[error("frame {frame} declares {declared} chunks but {dispatched} were present")]
    ChunkCountMismatch {
        frame: usize,
        declared: usize,
        dispatched: usize,
    },

    #[error("zlib decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("decompressed size {actual} doesn't match expected {expected} in {context}")]
    UncompressedSizeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("chunk size {size} is smaller than the 6-byte chunk preamble")]
    InvalidChunkSize { size: u32 },

    #[error("frame {frame} size {size} is smaller than the 16-byte frame preamble")]
    InvalidFrameSize { frame: usize, size: u32 },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("color depth {depth} has no pixel size (expected 8, 16 or 32)")]
    UnsupportedColorDepth { depth: u16 },

    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("malformed encoding: {context}")]
    MalformedEncoding { context: &'static str },
}

impl DecodeError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::InvalidHeaderMagic { .. } => ErrorKind::BadHeaderMagic,
            DecodeError::InvalidFrameMagic { .. } => ErrorKind::BadFrameMagic,
            DecodeError::ChunkCountMismatch { .. } => ErrorKind::ChunkCountMismatch,
            DecodeError::DecompressionFailed(_) | DecodeError::UncompressedSizeMismatch { .. } => {
                ErrorKind::CompressedStream
            }
            _ => ErrorKind::Malformed,
        }
    }
}

/// Error during binary encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{context} pixel buffer has {actual} bytes, expected {expected}")]
    PixelBufferMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("color depth {depth} has no pixel size (expected 8, 16 or 32)")]
    UnsupportedColorDepth { depth: u16 },

    #[error("legacy palette packet has no colors")]
    EmptyPalettePacket,

    #[error("palette chunk has no entries")]
    EmptyPaletteRange,

    #[error("key {key} of slice {slice:?} disagrees with the slice flags")]
    SliceKeyMismatch { slice: String, key: usize },

    #[error("zlib compression failed: {0}")]
    CompressionFailed(String),
}

/// Error from the stream and path entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Error during cross-record validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("header declares {declared} frames but the file holds {actual}")]
    FrameCountMismatch { declared: u16, actual: usize },

    #[error("cel in frame {frame} targets layer {layer_index} but only {layer_count} layers exist")]
    LayerIndexOutOfBounds {
        frame: usize,
        layer_index: u16,
        layer_count: usize,
    },

    #[error("cel in frame {frame} links to missing frame {target}")]
    LinkedFrameOutOfBounds { frame: usize, target: u16 },

    #[error("tag {name:?} spans frames {from}..={to} but the file has {frame_count}")]
    TagRangeInvalid {
        name: String,
        from: u16,
        to: u16,
        frame_count: usize,
    },

    #[error("tilemap layer {layer:?} references missing tileset {tileset_index}")]
    MissingTileset { layer: String, tileset_index: u32 },

    #[error("tileset {tileset_id} references missing external file {file_id}")]
    MissingExternalFile { tileset_id: u32, file_id: u32 },

    #[error("layer {index} jumps from child level {previous} to {level}")]
    ChildLevelJump {
        index: usize,
        previous: u16,
        level: u16,
    },
}
