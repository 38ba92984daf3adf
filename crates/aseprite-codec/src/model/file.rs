//! The decoded file.

use crate::model::{Frame, Header, Layer, Tags, Tileset};

/// A header and its frames. After decode, `frames.len() == header.frames`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AseFile {
    pub header: Header,
    pub frames: Vec<Frame>,
}

impl AseFile {
    /// The flattened layer list across all frames, in file order.
    ///
    /// [`Cel::layer_index`](crate::model::Cel::layer_index) indexes this list.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.frames.iter().flat_map(|frame| frame.layers())
    }

    /// Every tileset in the file, in file order.
    pub fn tilesets(&self) -> impl Iterator<Item = &Tileset> + '_ {
        self.frames.iter().flat_map(|frame| frame.tilesets())
    }

    /// Every tags record in the file, in file order.
    pub fn tags(&self) -> impl Iterator<Item = &Tags> + '_ {
        self.frames.iter().flat_map(|frame| frame.tags())
    }

    /// Total duration of the animation in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.frames.iter().map(|frame| frame.duration_ms as u64).sum()
    }

    /// Parent index of every layer, reconstructed from child levels.
    ///
    /// A layer's parent is the nearest preceding layer one level up. Top-level
    /// layers (and layers whose level skips ahead with no such ancestor) have
    /// no parent.
    pub fn layer_parents(&self) -> Vec<Option<usize>> {
        // stack[level] = index of the last layer seen at that level
        let mut stack: Vec<usize> = Vec::new();
        let mut parents = Vec::new();

        for (index, layer) in self.layers().enumerate() {
            let level = layer.child_level as usize;
            stack.truncate(level);
            let parent = if level > 0 && stack.len() == level {
                stack.last().copied()
            } else {
                None
            };
            parents.push(parent);
            if stack.len() == level {
                stack.push(index);
            }
        }

        parents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chunk, LayerKind};

    fn layer(name: &str, level: u16, group: bool) -> Chunk {
        let mut layer = Layer::new(name);
        layer.child_level = level;
        if group {
            layer.kind = LayerKind::Group;
        }
        Chunk::Layer(layer)
    }

    #[test]
    fn test_layer_parents() {
        // - Background          0
        //   `- Layer1           1
        // - Foreground          0
        //   |- My set1          1
        //   |  `- Layer2        2
        //   `- Layer3           1
        let mut frame = Frame::new(100);
        frame.chunks = vec![
            layer("Background", 0, true),
            layer("Layer1", 1, false),
            layer("Foreground", 0, true),
            layer("My set1", 1, true),
            layer("Layer2", 2, false),
            layer("Layer3", 1, false),
        ];
        let file = AseFile {
            header: Header {
                frames: 1,
                ..Default::default()
            },
            frames: vec![frame],
        };

        assert_eq!(
            file.layer_parents(),
            vec![None, Some(0), None, Some(2), Some(3), Some(2)]
        );
        assert_eq!(file.layers().count(), 6);
    }

    #[test]
    fn test_orphan_level_has_no_parent() {
        let mut frame = Frame::new(100);
        frame.chunks = vec![layer("a", 0, false), layer("b", 2, false)];
        let file = AseFile {
            header: Header::default(),
            frames: vec![frame],
        };
        assert_eq!(file.layer_parents(), vec![None, None]);
    }
}
