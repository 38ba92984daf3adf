//! Layer records (chunk 0x2004).

use crate::model::UserData;

pub const LAYER_FLAG_VISIBLE: u16 = 0x01;
pub const LAYER_FLAG_EDITABLE: u16 = 0x02;
pub const LAYER_FLAG_LOCK_MOVEMENT: u16 = 0x04;
pub const LAYER_FLAG_BACKGROUND: u16 = 0x08;
pub const LAYER_FLAG_PREFER_LINKED_CELS: u16 = 0x10;
pub const LAYER_FLAG_COLLAPSED: u16 = 0x20;
pub const LAYER_FLAG_REFERENCE: u16 = 0x40;

/// What a layer holds. A tilemap layer names its tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Normal image layer (type 0).
    Normal,
    /// Layer group (type 1).
    Group,
    /// Tilemap layer (type 2) and the index of the tileset it draws from.
    Tilemap { tileset_index: u32 },
    /// A layer type this crate does not know.
    Other(u16),
}

impl LayerKind {
    /// Returns the wire type code.
    pub fn type_code(&self) -> u16 {
        match self {
            LayerKind::Normal => 0,
            LayerKind::Group => 1,
            LayerKind::Tilemap { .. } => 2,
            LayerKind::Other(code) => *code,
        }
    }
}

/// One entry of the flat layer list.
///
/// Hierarchy is expressed only by [`child_level`](Layer::child_level): a layer
/// is a child of the nearest preceding layer whose level is one less. See
/// [`AseFile::layer_parents`](crate::model::AseFile::layer_parents).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub flags: u16,
    pub kind: LayerKind,
    pub child_level: u16,
    /// Ignored by readers; kept for byte fidelity.
    pub default_width: u16,
    pub default_height: u16,
    /// Blend mode code (0 = normal). Not interpreted here.
    pub blend_mode: u16,
    /// Meaningful only when the header's layer-opacity flag is set.
    pub opacity: u8,
    pub name: String,
    pub user_data: Option<UserData>,
}

impl Layer {
    /// Creates a visible, editable normal layer with full opacity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            flags: LAYER_FLAG_VISIBLE | LAYER_FLAG_EDITABLE,
            kind: LayerKind::Normal,
            child_level: 0,
            default_width: 0,
            default_height: 0,
            blend_mode: 0,
            opacity: 255,
            name: name.into(),
            user_data: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.flags & LAYER_FLAG_VISIBLE != 0
    }

    pub fn is_group(&self) -> bool {
        self.kind == LayerKind::Group
    }
}
