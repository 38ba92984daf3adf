//! Aseprite: binary container format for layered sprite animations.
//!
//! This crate provides decoding, encoding and validation for the `.ase` /
//! `.aseprite` file format.
//!
//! # Overview
//!
//! A file is a fixed 128-byte header followed by frames. Each frame holds a
//! counted sequence of size-prefixed chunks:
//! - **Structure**: layers, tilesets, palettes and color profiles, usually in
//!   the first frame
//! - **Content**: one cel per layer per frame, raw, compressed or linked
//! - **Annotations**: tags, slices and user data attached to the record they
//!   follow
//!
//! # Quick Start
//!
//! ```rust
//! use aseprite_codec::{decode_file, encode_file, AseFile, Cel, CelContent, Chunk, ColorDepth,
//!     Frame, Header, Layer};
//!
//! let mut frame = Frame::new(100);
//! frame.chunks.push(Chunk::Layer(Layer::new("Background")));
//! frame.chunks.push(Chunk::Cel(Cel {
//!     layer_index: 0,
//!     x: 0,
//!     y: 0,
//!     opacity: 255,
//!     z_index: 0,
//!     content: CelContent::Image {
//!         width: 2,
//!         height: 2,
//!         pixels: vec![0; 2 * 2 * 4],
//!     },
//!     extra: None,
//!     user_data: None,
//! }));
//!
//! let file = AseFile {
//!     header: Header {
//!         width: 2,
//!         height: 2,
//!         color_depth: ColorDepth::Rgba,
//!         ..Default::default()
//!     },
//!     frames: vec![frame],
//! };
//!
//! // Encode to binary
//! let bytes = encode_file(&file).unwrap();
//!
//! // Decode back
//! let decoded = decode_file(&bytes).unwrap();
//! assert_eq!(decoded.frames, file.frames);
//! assert_eq!(decoded.layers().count(), 1);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Data types (header, frames, chunk records)
//! - [`codec`]: Binary encoding/decoding with zlib support
//! - [`validate`]: Cross-record validation
//! - [`error`]: Error types
//! - [`limits`]: Wire constants and decoder limits
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Every chunk and frame is read through a reader bounded to its declared size
//! - Allocations driven by counts in the input are bounded by the bytes present
//! - Decompression is capped at [`limits::MAX_DECOMPRESSED_SIZE`]
//! - Invalid data is rejected with descriptive errors
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade: skipped and discarded chunks at
//! `debug`, per-frame and per-chunk dispatch at `trace`. It never installs a
//! logger.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    decode_file, encode_file, encode_file_with_options, open_file, read_file, save_file,
    write_file, EncodeOptions,
};
pub use error::{DecodeError, EncodeError, Error, ErrorKind, ValidationError};
pub use model::{
    AseFile, Cel, CelContent, CelExtra, Chunk, ChunkType, ColorDepth, ColorProfile,
    ColorProfileKind, ExternalFile, ExternalFiles, ExternalTileset, Fixed, Frame, Header, Layer,
    LayerKind, LegacyPalette, LoopDirection, Mask, Palette, PaletteEntry, PalettePacket, Rgb,
    Rgba, Slice, SliceCenter, SliceKey, SlicePivot, Tag, Tags, Tilemap, Tileset, UserData,
};
pub use validate::validate_file;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
