//! User data (0x2020), color profile (0x2007), external files (0x2008) and
//! mask (0x2016) encoding/decoding.

use crate::codec::primitives::{checked_u32, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_DECOMPRESSED_SIZE;
use crate::model::record::{USER_DATA_FLAG_COLOR, USER_DATA_FLAG_PROPERTIES, USER_DATA_FLAG_TEXT};
use crate::model::{
    ColorProfile, ColorProfileKind, ExternalFile, ExternalFiles, Mask, Rgba, UserData,
};

const COLOR_PROFILE_NONE: u16 = 0;
const COLOR_PROFILE_SRGB: u16 = 1;
const COLOR_PROFILE_ICC: u16 = 2;

// =============================================================================
// USER DATA
// =============================================================================

/// Decodes a user data payload.
///
/// Properties maps are not interpreted; when announced they take the rest of
/// the payload verbatim.
pub fn decode_user_data(reader: &mut Reader<'_>) -> Result<UserData, DecodeError> {
    let flags = reader.read_u32("user_data_flags")?;

    let text = if flags & USER_DATA_FLAG_TEXT != 0 {
        Some(reader.read_string("user_data_text")?)
    } else {
        None
    };
    let color = if flags & USER_DATA_FLAG_COLOR != 0 {
        let rgba = reader.read_bytes(4, "user_data_color")?;
        Some(Rgba::new(rgba[0], rgba[1], rgba[2], rgba[3]))
    } else {
        None
    };
    let properties = if flags & USER_DATA_FLAG_PROPERTIES != 0 {
        Some(
            reader
                .read_bytes(reader.remaining_len(), "user_data_properties")?
                .to_vec(),
        )
    } else {
        None
    };

    Ok(UserData {
        text,
        color,
        properties,
    })
}

pub fn encode_user_data(writer: &mut Writer, user_data: &UserData) -> Result<(), EncodeError> {
    writer.write_u32(user_data.flags());
    if let Some(text) = &user_data.text {
        writer.write_string(text, "user data text")?;
    }
    if let Some(color) = &user_data.color {
        writer.write_bytes(&[color.r, color.g, color.b, color.a]);
    }
    if let Some(properties) = &user_data.properties {
        writer.write_bytes(properties);
    }
    Ok(())
}

// =============================================================================
// COLOR PROFILE
// =============================================================================

pub fn decode_color_profile(reader: &mut Reader<'_>) -> Result<ColorProfile, DecodeError> {
    let profile_type = reader.read_u16("color_profile_type")?;
    let flags = reader.read_u16("color_profile_flags")?;
    let gamma = reader.read_fixed("color_profile_gamma")?;
    reader.skip(8, "color_profile_reserved")?;

    let kind = match profile_type {
        COLOR_PROFILE_NONE => ColorProfileKind::None,
        COLOR_PROFILE_SRGB => ColorProfileKind::Srgb,
        COLOR_PROFILE_ICC => {
            ColorProfileKind::Icc(reader.read_bytes_prefixed(MAX_DECOMPRESSED_SIZE, "icc_profile")?)
        }
        other => ColorProfileKind::Other(other),
    };

    Ok(ColorProfile { kind, flags, gamma })
}

pub fn encode_color_profile(writer: &mut Writer, profile: &ColorProfile) -> Result<(), EncodeError> {
    writer.write_u16(profile.kind.type_code());
    writer.write_u16(profile.flags);
    writer.write_fixed(profile.gamma);
    writer.write_zeros(8);
    if let ColorProfileKind::Icc(icc) = &profile.kind {
        writer.write_bytes_prefixed(icc, "icc profile")?;
    }
    Ok(())
}

// =============================================================================
// EXTERNAL FILES
// =============================================================================

pub fn decode_external_files(reader: &mut Reader<'_>) -> Result<ExternalFiles, DecodeError> {
    let count = reader.read_u32("external_file_count")? as usize;
    reader.skip(8, "external_files_reserved")?;

    // each entry is at least 14 bytes
    if count > reader.remaining_len() / 14 {
        return Err(DecodeError::UnexpectedEof {
            context: "external_file_entries",
        });
    }

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let id = reader.read_u32("external_file_id")?;
        let file_type = reader.read_u8("external_file_type")?;
        reader.skip(7, "external_file_reserved")?;
        let name = reader.read_string("external_file_name")?;
        entries.push(ExternalFile {
            id,
            file_type,
            name,
        });
    }

    Ok(ExternalFiles { entries })
}

pub fn encode_external_files(writer: &mut Writer, files: &ExternalFiles) -> Result<(), EncodeError> {
    writer.write_u32(checked_u32(files.entries.len(), "external files")?);
    writer.write_zeros(8);
    for entry in &files.entries {
        writer.write_u32(entry.id);
        writer.write_u8(entry.file_type);
        writer.write_zeros(7);
        writer.write_string(&entry.name, "external file name")?;
    }
    Ok(())
}

// =============================================================================
// MASK
// =============================================================================

pub fn decode_mask(reader: &mut Reader<'_>) -> Result<Mask, DecodeError> {
    let x = reader.read_i16("mask_x")?;
    let y = reader.read_i16("mask_y")?;
    let width = reader.read_u16("mask_width")?;
    let height = reader.read_u16("mask_height")?;
    reader.skip(8, "mask_reserved")?;
    let name = reader.read_string("mask_name")?;
    let bitmap = reader
        .read_bytes(Mask::bitmap_len(width, height), "mask_bitmap")?
        .to_vec();

    Ok(Mask {
        x,
        y,
        width,
        height,
        name,
        bitmap,
    })
}

pub fn encode_mask(writer: &mut Writer, mask: &Mask) -> Result<(), EncodeError> {
    let expected = Mask::bitmap_len(mask.width, mask.height);
    if mask.bitmap.len() != expected {
        return Err(EncodeError::PixelBufferMismatch {
            context: "mask",
            expected,
            actual: mask.bitmap.len(),
        });
    }

    writer.write_i16(mask.x);
    writer.write_i16(mask.y);
    writer.write_u16(mask.width);
    writer.write_u16(mask.height);
    writer.write_zeros(8);
    writer.write_string(&mask.name, "mask name")?;
    writer.write_bytes(&mask.bitmap);
    Ok(())
}
