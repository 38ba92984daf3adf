//! Simple decoder to inspect Aseprite files.

use aseprite_codec::{open_file, validate_file, AseFile, CelContent, Chunk, LayerKind};

fn describe_cel(content: &CelContent) -> String {
    match content {
        CelContent::Raw { width, height, .. } => format!("raw {}x{}", width, height),
        CelContent::Linked { frame } => format!("linked -> frame {}", frame),
        CelContent::Image { width, height, .. } => format!("image {}x{}", width, height),
        CelContent::Tilemap(tilemap) => format!(
            "tilemap {}x{} ({} bits/tile)",
            tilemap.width, tilemap.height, tilemap.bits_per_tile
        ),
        CelContent::Unknown { cel_type, data } => {
            format!("unknown type {} ({} bytes)", cel_type, data.len())
        }
    }
}

fn print_layers(file: &AseFile) {
    let layers: Vec<_> = file.layers().collect();
    println!("\n=== Layers ({}) ===", layers.len());
    for (index, layer) in layers.iter().enumerate() {
        let kind = match layer.kind {
            LayerKind::Normal => "image".to_string(),
            LayerKind::Group => "group".to_string(),
            LayerKind::Tilemap { tileset_index } => format!("tilemap (tileset {})", tileset_index),
            LayerKind::Other(code) => format!("type {}", code),
        };
        let indent = "  ".repeat(layer.child_level as usize);
        let hidden = if layer.is_visible() { "" } else { " [hidden]" };
        println!("  {:>3} {}{} - {}{}", index, indent, layer.name, kind, hidden);
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sprite.aseprite".to_string());

    println!("Reading: {}", path);

    let file = open_file(&path).expect("Failed to decode");
    let header = &file.header;

    println!("\n=== Sprite ===");
    println!("Size: {}x{}", header.width, header.height);
    println!("Color depth: {} bpp", header.color_depth.bpp());
    println!("Colors: {}", header.effective_color_count());
    println!("Frames: {} ({} ms total)", file.frames.len(), file.duration_ms());

    print_layers(&file);

    let mut palette_count = 0;
    let mut slice_count = 0;
    let mut unknown_count = 0;

    println!("\n=== Frames ===");
    for (index, frame) in file.frames.iter().enumerate() {
        println!(
            "Frame {} ({} ms, {} chunks)",
            index,
            frame.duration_ms,
            frame.wire_chunk_count()
        );
        for chunk in &frame.chunks {
            match chunk {
                Chunk::Cel(cel) => println!(
                    "  cel layer={} at ({}, {}): {}",
                    cel.layer_index,
                    cel.x,
                    cel.y,
                    describe_cel(&cel.content)
                ),
                Chunk::Palette(_) | Chunk::LegacyPalette(_) | Chunk::LegacyPalette6Bit(_) => {
                    palette_count += 1
                }
                Chunk::Slice(_) => slice_count += 1,
                Chunk::Unknown { .. } => unknown_count += 1,
                _ => {}
            }
        }
    }

    println!("\n=== Tags ===");
    for tags in file.tags() {
        for (tag, user_data) in tags.iter() {
            let note = user_data
                .and_then(|data| data.text.as_deref())
                .map(|text| format!(" \"{}\"", text))
                .unwrap_or_default();
            println!(
                "  {} [{}..={}] {:?}{}",
                tag.name, tag.from_frame, tag.to_frame, tag.direction, note
            );
        }
    }

    println!("\n=== Summary ===");
    println!("Palettes: {}", palette_count);
    println!("Slices: {}", slice_count);
    println!("Tilesets: {}", file.tilesets().count());
    println!("Unknown chunks: {}", unknown_count);

    match validate_file(&file) {
        Ok(()) => println!("Validation: ok"),
        Err(e) => println!("Validation: {}", e),
    }
}
