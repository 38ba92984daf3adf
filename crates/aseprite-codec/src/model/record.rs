//! Flat records with no cross-record dependencies: user data, color profile,
//! external files and the deprecated mask.

use crate::model::{Fixed, Rgba};

pub const USER_DATA_FLAG_TEXT: u32 = 0x1;
pub const USER_DATA_FLAG_COLOR: u32 = 0x2;
pub const USER_DATA_FLAG_PROPERTIES: u32 = 0x4;

/// Text and color attached to the record that precedes it in the stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserData {
    pub text: Option<String>,
    pub color: Option<Rgba>,
    /// Raw properties maps, kept verbatim.
    pub properties: Option<Vec<u8>>,
}

impl UserData {
    /// Flag bits implied by the fields that are present.
    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if self.text.is_some() {
            flags |= USER_DATA_FLAG_TEXT;
        }
        if self.color.is_some() {
            flags |= USER_DATA_FLAG_COLOR;
        }
        if self.properties.is_some() {
            flags |= USER_DATA_FLAG_PROPERTIES;
        }
        flags
    }
}

pub const COLOR_PROFILE_FLAG_FIXED_GAMMA: u16 = 0x1;

/// Color space of RGB and grayscale values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorProfileKind {
    /// No profile (type 0).
    None,
    /// sRGB (type 1).
    Srgb,
    /// Embedded ICC profile (type 2).
    Icc(Vec<u8>),
    Other(u16),
}

impl ColorProfileKind {
    pub fn type_code(&self) -> u16 {
        match self {
            ColorProfileKind::None => 0,
            ColorProfileKind::Srgb => 1,
            ColorProfileKind::Icc(_) => 2,
            ColorProfileKind::Other(code) => *code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorProfile {
    pub kind: ColorProfileKind,
    pub flags: u16,
    /// 1.0 is linear. Used only with the fixed-gamma flag.
    pub gamma: Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExternalFiles {
    pub entries: Vec<ExternalFile>,
}

/// An external file referenced by tilesets or palettes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFile {
    pub id: u32,
    /// 0 = palette, 1 = tileset, 2 = extension properties, 3 = extension tile management.
    pub file_type: u8,
    pub name: String,
}

/// Deprecated selection mask: one bit per pixel, leftmost pixel in the high bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub name: String,
    /// `height * ceil(width / 8)` bytes.
    pub bitmap: Vec<u8>,
}

impl Mask {
    /// Bitmap length implied by the mask dimensions.
    pub fn bitmap_len(width: u16, height: u16) -> usize {
        height as usize * (width as usize).div_ceil(8)
    }

    /// Returns whether the pixel at (x, y) is selected. Pixels past the end
    /// of a short bitmap are not.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let stride = (self.width as usize).div_ceil(8);
        self.bitmap
            .get(y as usize * stride + x as usize / 8)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }
}
