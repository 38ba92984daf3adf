//! Wire constants and decoder limits.
//!
//! Every allocation driven by a length read from untrusted input is checked
//! against one of the limits below before it happens.

/// Header signature.
pub const HEADER_MAGIC: u16 = 0xA5E0;

/// Per-frame signature.
pub const FRAME_MAGIC: u16 = 0xF1FA;

/// Size of the fixed file header in bytes.
pub const HEADER_SIZE: usize = 128;

/// Size of the frame preamble in bytes.
pub const FRAME_HEADER_SIZE: usize = 16;

/// Size of the chunk preamble (size + type code) in bytes.
pub const CHUNK_HEADER_SIZE: usize = 6;

/// Legacy chunk-count value meaning "see the 32-bit field".
pub const LEGACY_CHUNK_COUNT_OVERFLOW: u16 = 0xFFFF;

/// Maximum size of any decompressed buffer (256 MiB).
pub const MAX_DECOMPRESSED_SIZE: usize = 256 * 1024 * 1024;

/// Maximum declared size of a single frame when reading from a stream (1 GiB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024 * 1024;

/// Maximum byte length of a length-prefixed string.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Default zlib level used by the encoder.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
