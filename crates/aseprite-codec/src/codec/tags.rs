//! Tags chunk encoding/decoding (0x2018).

use crate::codec::primitives::{checked_u16, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::model::{LoopDirection, Rgb, Tag, Tags};

pub fn decode_tags(reader: &mut Reader<'_>) -> Result<Tags, DecodeError> {
    let count = reader.read_u16("tag_count")? as usize;
    reader.skip(8, "tags_reserved")?;

    // each tag is at least 19 bytes
    let mut tags = Vec::with_capacity(count.min(reader.remaining_len() / 19));
    for _ in 0..count {
        let from_frame = reader.read_u16("tag_from")?;
        let to_frame = reader.read_u16("tag_to")?;
        let direction = LoopDirection::from_u8(reader.read_u8("tag_direction")?);
        let repeat = reader.read_u16("tag_repeat")?;
        reader.skip(6, "tag_reserved")?;
        let rgb = reader.read_bytes(3, "tag_color")?;
        let color = Rgb::new(rgb[0], rgb[1], rgb[2]);
        reader.skip(1, "tag_reserved")?;
        let name = reader.read_string("tag_name")?;

        tags.push(Tag {
            from_frame,
            to_frame,
            direction,
            repeat,
            color,
            name,
        });
    }

    Ok(Tags {
        tags,
        user_data: Vec::new(),
    })
}

pub fn encode_tags(writer: &mut Writer, tags: &Tags) -> Result<(), EncodeError> {
    writer.write_u16(checked_u16(tags.tags.len(), "tags")?);
    writer.write_zeros(8);

    for tag in &tags.tags {
        writer.write_u16(tag.from_frame);
        writer.write_u16(tag.to_frame);
        writer.write_u8(tag.direction.to_u8());
        writer.write_u16(tag.repeat);
        writer.write_zeros(6);
        writer.write_bytes(&[tag.color.r, tag.color.g, tag.color.b]);
        writer.write_u8(0);
        writer.write_string(&tag.name, "tag name")?;
    }

    Ok(())
}
