//! Binary encoding/decoding for Aseprite files.
//!
//! All multi-byte values are little-endian. The file is a fixed header, then
//! frames, each holding a counted sequence of size-prefixed chunks.

pub mod cel;
pub mod chunk;
pub mod compress;
pub mod file;
pub mod frame;
pub mod header;
pub mod layer;
pub mod palette;
pub mod primitives;
pub mod record;
pub mod slice;
pub mod tags;
pub mod tileset;

pub use chunk::{decode_chunk, encode_chunk, DecodedChunk};
pub use file::{
    decode_file, encode_file, encode_file_with_options, open_file, read_file, save_file,
    write_file, EncodeOptions,
};
pub use frame::{decode_frame, decode_frame_preamble, encode_frame, FramePreamble};
pub use header::{decode_header, encode_header};
pub use primitives::{Reader, Writer};
