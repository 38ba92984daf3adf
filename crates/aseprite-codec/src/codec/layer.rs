//! Layer chunk encoding/decoding (0x2004).

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Layer, LayerKind};

const LAYER_TYPE_NORMAL: u16 = 0;
const LAYER_TYPE_GROUP: u16 = 1;
const LAYER_TYPE_TILEMAP: u16 = 2;

pub fn decode_layer(reader: &mut Reader<'_>) -> Result<Layer, DecodeError> {
    let flags = reader.read_u16("layer_flags")?;
    let layer_type = reader.read_u16("layer_type")?;
    let child_level = reader.read_u16("layer_child_level")?;
    let default_width = reader.read_u16("layer_default_width")?;
    let default_height = reader.read_u16("layer_default_height")?;
    let blend_mode = reader.read_u16("layer_blend_mode")?;
    let opacity = reader.read_u8("layer_opacity")?;
    reader.skip(3, "layer_reserved")?;
    let name = reader.read_string("layer_name")?;

    let kind = match layer_type {
        LAYER_TYPE_NORMAL => LayerKind::Normal,
        LAYER_TYPE_GROUP => LayerKind::Group,
        LAYER_TYPE_TILEMAP => LayerKind::Tilemap {
            tileset_index: reader.read_u32("layer_tileset_index")?,
        },
        other => LayerKind::Other(other),
    };

    Ok(Layer {
        flags,
        kind,
        child_level,
        default_width,
        default_height,
        blend_mode,
        opacity,
        name,
        user_data: None,
    })
}

pub fn encode_layer(writer: &mut Writer, layer: &Layer) -> Result<(), EncodeError> {
    writer.write_u16(layer.flags);
    writer.write_u16(layer.kind.type_code());
    writer.write_u16(layer.child_level);
    writer.write_u16(layer.default_width);
    writer.write_u16(layer.default_height);
    writer.write_u16(layer.blend_mode);
    writer.write_u8(layer.opacity);
    writer.write_zeros(3);
    writer.write_string(&layer.name, "layer name")?;

    if let LayerKind::Tilemap { tileset_index } = layer.kind {
        writer.write_u32(tileset_index);
    }

    Ok(())
}
