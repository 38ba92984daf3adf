//! Slices (chunk 0x2022).

use crate::model::UserData;

/// Slice flag: every key carries a 9-patch center rectangle.
pub const SLICE_FLAG_NINE_PATCH: u32 = 0x1;
/// Slice flag: every key carries a pivot point.
pub const SLICE_FLAG_PIVOT: u32 = 0x2;

/// A named region that can change over the animation.
///
/// `flags` decides for all keys at once whether they carry a center rectangle
/// and a pivot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub flags: u32,
    pub name: String,
    pub keys: Vec<SliceKey>,
    pub user_data: Option<UserData>,
}

impl Slice {
    pub fn has_nine_patch(&self) -> bool {
        self.flags & SLICE_FLAG_NINE_PATCH != 0
    }

    pub fn has_pivot(&self) -> bool {
        self.flags & SLICE_FLAG_PIVOT != 0
    }
}

/// Slice bounds valid from `frame` to the end of the animation (or the next key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceKey {
    pub frame: u32,
    pub x: i32,
    pub y: i32,
    /// 0 if the slice is hidden from this frame on.
    pub width: u32,
    pub height: u32,
    pub center: Option<SliceCenter>,
    pub pivot: Option<SlicePivot>,
}

/// 9-patch center rectangle, relative to the slice bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceCenter {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Pivot point, relative to the slice origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicePivot {
    pub x: i32,
    pub y: i32,
}
