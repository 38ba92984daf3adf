//! Small value types shared by several records.

/// A 16.16 fixed-point number, stored as its raw 32-bit representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed(i32);

impl Fixed {
    /// 1.0 in 16.16.
    pub const ONE: Fixed = Fixed(1 << 16);

    /// Wraps raw 16.16 bits.
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the raw 16.16 bits.
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Converts to a float.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    /// Converts from a float, rounding to the nearest representable value.
    ///
    /// Values outside the 16.16 range saturate.
    pub fn from_f64(value: f64) -> Self {
        Self((value * 65536.0).round() as i32)
    }
}

/// An RGB triple (legacy palettes, deprecated tag colors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// An RGBA quadruple (new palettes, user data colors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}
