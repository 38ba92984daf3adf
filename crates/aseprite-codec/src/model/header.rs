//! The fixed-layout file header.

/// Pixel format of the sprite, from the header's bits-per-pixel field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorDepth {
    /// 8 bpp, one palette index per pixel.
    Indexed,
    /// 16 bpp, value + alpha.
    Grayscale,
    /// 32 bpp, red, green, blue, alpha.
    #[default]
    Rgba,
    /// Any other value found on the wire.
    Other(u16),
}

impl ColorDepth {
    /// Maps a bits-per-pixel value.
    pub fn from_bpp(bpp: u16) -> Self {
        match bpp {
            8 => ColorDepth::Indexed,
            16 => ColorDepth::Grayscale,
            32 => ColorDepth::Rgba,
            other => ColorDepth::Other(other),
        }
    }

    /// Returns the bits-per-pixel value written to the wire.
    pub fn bpp(self) -> u16 {
        match self {
            ColorDepth::Indexed => 8,
            ColorDepth::Grayscale => 16,
            ColorDepth::Rgba => 32,
            ColorDepth::Other(bpp) => bpp,
        }
    }

    /// Bytes per pixel, or `None` for a depth that has no pixel layout.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            ColorDepth::Indexed => Some(1),
            ColorDepth::Grayscale => Some(2),
            ColorDepth::Rgba => Some(4),
            ColorDepth::Other(_) => None,
        }
    }
}

/// Header flag: the layer opacity field holds a meaningful value.
pub const HEADER_FLAG_LAYER_OPACITY_VALID: u32 = 0x1;

/// Container metadata preceding all frames.
///
/// Read-only context for later decode steps; cels are sized from
/// [`color_depth`](Header::color_depth).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    /// Total file size in bytes. Recomputed on encode.
    pub file_size: u32,
    /// Number of frames. Written from the frame list on encode.
    pub frames: u16,
    pub width: u16,
    pub height: u16,
    pub color_depth: ColorDepth,
    pub flags: u32,
    /// Deprecated frame delay; frames carry their own duration.
    pub speed: u16,
    /// Palette index treated as transparent in non-background layers
    /// (indexed sprites only).
    pub transparent_index: u8,
    /// Number of colors; 0 means 256 in old files.
    pub color_count: u16,
    /// Pixel aspect ratio is `pixel_width / pixel_height`; 0 in either means 1:1.
    pub pixel_width: u8,
    pub pixel_height: u8,
    pub grid_x: i16,
    pub grid_y: i16,
    /// Zero if there is no grid.
    pub grid_width: u16,
    pub grid_height: u16,
}

impl Header {
    /// Returns true if layer opacity values are meaningful.
    pub fn layer_opacity_valid(&self) -> bool {
        self.flags & HEADER_FLAG_LAYER_OPACITY_VALID != 0
    }

    /// Color count with the legacy 0-means-256 rule applied.
    pub fn effective_color_count(&self) -> usize {
        if self.color_count == 0 {
            256
        } else {
            self.color_count as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(ColorDepth::from_bpp(8).bytes_per_pixel(), Some(1));
        assert_eq!(ColorDepth::from_bpp(16).bytes_per_pixel(), Some(2));
        assert_eq!(ColorDepth::from_bpp(32).bytes_per_pixel(), Some(4));
        assert_eq!(ColorDepth::from_bpp(24).bytes_per_pixel(), None);
        assert_eq!(ColorDepth::from_bpp(24).bpp(), 24);
    }

    #[test]
    fn test_header_flags() {
        let header = Header {
            flags: HEADER_FLAG_LAYER_OPACITY_VALID,
            ..Default::default()
        };
        assert!(header.layer_opacity_valid());
        assert_eq!(header.effective_color_count(), 256);
    }
}
