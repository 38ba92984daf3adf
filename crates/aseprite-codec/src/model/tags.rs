//! Animation tags (chunk 0x2018).

use crate::model::{Rgb, UserData};

/// Playback direction of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopDirection {
    Forward,
    Reverse,
    PingPong,
    PingPongReverse,
    Other(u8),
}

impl LoopDirection {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LoopDirection::Forward,
            1 => LoopDirection::Reverse,
            2 => LoopDirection::PingPong,
            3 => LoopDirection::PingPongReverse,
            other => LoopDirection::Other(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            LoopDirection::Forward => 0,
            LoopDirection::Reverse => 1,
            LoopDirection::PingPong => 2,
            LoopDirection::PingPongReverse => 3,
            LoopDirection::Other(value) => value,
        }
    }
}

/// A named frame range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub from_frame: u16,
    pub to_frame: u16,
    pub direction: LoopDirection,
    /// Times to play the range; 0 means forever.
    pub repeat: u16,
    /// Deprecated; the tag color lives in the tag's user data.
    pub color: Rgb,
    pub name: String,
}

/// The tags record.
///
/// The Nth UserData chunk following the tags chunk belongs to the Nth tag, so
/// `user_data` is a parallel list never longer than `tags`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tags {
    pub tags: Vec<Tag>,
    pub user_data: Vec<UserData>,
}

impl Tags {
    /// Pairs every tag with its user data, if any arrived for it.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, Option<&UserData>)> + '_ {
        self.tags
            .iter()
            .enumerate()
            .map(|(i, tag)| (tag, self.user_data.get(i)))
    }
}
