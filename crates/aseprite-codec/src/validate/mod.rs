//! Cross-record validation for decoded files.
//!
//! Decoding only checks what a single record needs to be read. References
//! between records (cel to layer, layer to tileset, tag to frame, ...) are
//! taken as found and can be checked here.

use rustc_hash::FxHashSet;

use crate::error::ValidationError;
use crate::model::{AseFile, CelContent, LayerKind};

/// Validates the references between records of a file.
///
/// Checks, in order:
/// - the header frame count matches the decoded frames
/// - layer child levels never jump by more than one
/// - every cel names an existing layer, and linked cels an existing frame
/// - every tag spans existing frames
/// - every tilemap layer names a decoded tileset
/// - every external tileset names a decoded external file entry
pub fn validate_file(file: &AseFile) -> Result<(), ValidationError> {
    let frame_count = file.frames.len();
    if file.header.frames as usize != frame_count {
        return Err(ValidationError::FrameCountMismatch {
            declared: file.header.frames,
            actual: frame_count,
        });
    }

    validate_layer_levels(file)?;
    validate_cels(file)?;

    for tags in file.tags() {
        for tag in &tags.tags {
            if tag.from_frame > tag.to_frame || tag.to_frame as usize >= frame_count {
                return Err(ValidationError::TagRangeInvalid {
                    name: tag.name.clone(),
                    from: tag.from_frame,
                    to: tag.to_frame,
                    frame_count,
                });
            }
        }
    }

    validate_tilesets(file)
}

fn validate_layer_levels(file: &AseFile) -> Result<(), ValidationError> {
    let mut previous: Option<u16> = None;
    for (index, layer) in file.layers().enumerate() {
        let max_level = previous.map_or(0, |level| level.saturating_add(1));
        if layer.child_level > max_level {
            return Err(ValidationError::ChildLevelJump {
                index,
                previous: previous.unwrap_or(0),
                level: layer.child_level,
            });
        }
        previous = Some(layer.child_level);
    }
    Ok(())
}

fn validate_cels(file: &AseFile) -> Result<(), ValidationError> {
    let layer_count = file.layers().count();
    let frame_count = file.frames.len();

    for (frame_index, frame) in file.frames.iter().enumerate() {
        for cel in frame.cels() {
            if cel.layer_index as usize >= layer_count {
                return Err(ValidationError::LayerIndexOutOfBounds {
                    frame: frame_index,
                    layer_index: cel.layer_index,
                    layer_count,
                });
            }
            if let CelContent::Linked { frame: target } = cel.content {
                if target as usize >= frame_count {
                    return Err(ValidationError::LinkedFrameOutOfBounds {
                        frame: frame_index,
                        target,
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_tilesets(file: &AseFile) -> Result<(), ValidationError> {
    let tileset_ids: FxHashSet<u32> = file.tilesets().map(|tileset| tileset.id).collect();
    for layer in file.layers() {
        if let LayerKind::Tilemap { tileset_index } = layer.kind {
            if !tileset_ids.contains(&tileset_index) {
                return Err(ValidationError::MissingTileset {
                    layer: layer.name.clone(),
                    tileset_index,
                });
            }
        }
    }

    let file_ids: FxHashSet<u32> = file
        .frames
        .iter()
        .flat_map(|frame| frame.external_files())
        .flat_map(|files| files.entries.iter().map(|entry| entry.id))
        .collect();
    for tileset in file.tilesets() {
        if let Some(external) = &tileset.external {
            if !file_ids.contains(&external.file_id) {
                return Err(ValidationError::MissingExternalFile {
                    tileset_id: tileset.id,
                    file_id: external.file_id,
                });
            }
        }
    }

    Ok(())
}
