//! Slice chunk encoding/decoding (0x2022).
//!
//! The slice flags decide for every key whether a center rectangle and a
//! pivot follow the bounds.

use crate::codec::primitives::{checked_u32, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::model::slice::{SLICE_FLAG_NINE_PATCH, SLICE_FLAG_PIVOT};
use crate::model::{Slice, SliceCenter, SliceKey, SlicePivot};

pub fn decode_slice(reader: &mut Reader<'_>) -> Result<Slice, DecodeError> {
    let key_count = reader.read_u32("slice_key_count")? as usize;
    let flags = reader.read_u32("slice_flags")?;
    reader.skip(4, "slice_reserved")?;
    let name = reader.read_string("slice_name")?;

    // each key is at least 20 bytes
    if key_count > reader.remaining_len() / 20 {
        return Err(DecodeError::UnexpectedEof {
            context: "slice_keys",
        });
    }

    let mut keys = Vec::with_capacity(key_count);
    for _ in 0..key_count {
        let frame = reader.read_u32("slice_key_frame")?;
        let x = reader.read_i32("slice_key_x")?;
        let y = reader.read_i32("slice_key_y")?;
        let width = reader.read_u32("slice_key_width")?;
        let height = reader.read_u32("slice_key_height")?;

        let center = if flags & SLICE_FLAG_NINE_PATCH != 0 {
            Some(SliceCenter {
                x: reader.read_i32("slice_center_x")?,
                y: reader.read_i32("slice_center_y")?,
                width: reader.read_u32("slice_center_width")?,
                height: reader.read_u32("slice_center_height")?,
            })
        } else {
            None
        };
        let pivot = if flags & SLICE_FLAG_PIVOT != 0 {
            Some(SlicePivot {
                x: reader.read_i32("slice_pivot_x")?,
                y: reader.read_i32("slice_pivot_y")?,
            })
        } else {
            None
        };

        keys.push(SliceKey {
            frame,
            x,
            y,
            width,
            height,
            center,
            pivot,
        });
    }

    Ok(Slice {
        flags,
        name,
        keys,
        user_data: None,
    })
}

/// Encodes a slice. Every key must carry exactly the optional parts its
/// slice's flags announce.
pub fn encode_slice(writer: &mut Writer, slice: &Slice) -> Result<(), EncodeError> {
    for (key_index, key) in slice.keys.iter().enumerate() {
        if key.center.is_some() != slice.has_nine_patch() || key.pivot.is_some() != slice.has_pivot()
        {
            return Err(EncodeError::SliceKeyMismatch {
                slice: slice.name.clone(),
                key: key_index,
            });
        }
    }

    writer.write_u32(checked_u32(slice.keys.len(), "slice keys")?);
    writer.write_u32(slice.flags);
    writer.write_u32(0);
    writer.write_string(&slice.name, "slice name")?;

    for key in &slice.keys {
        writer.write_u32(key.frame);
        writer.write_i32(key.x);
        writer.write_i32(key.y);
        writer.write_u32(key.width);
        writer.write_u32(key.height);
        if let Some(center) = &key.center {
            writer.write_i32(center.x);
            writer.write_i32(center.y);
            writer.write_u32(center.width);
            writer.write_u32(center.height);
        }
        if let Some(pivot) = &key.pivot {
            writer.write_i32(pivot.x);
            writer.write_i32(pivot.y);
        }
    }

    Ok(())
}
