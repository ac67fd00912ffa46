use log::debug;

use crate::{error::DatError, FrameGroupDimensions, SpriteCoord};

/// Sprite id grid of one animation group.
///
/// Ids are stored flat, outer to inner: frame, pattern z, pattern y, pattern x, layer,
/// tile y, tile x. The length always equals [`FrameGroupDimensions::sprite_count`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameGroup {
    dimensions: FrameGroupDimensions,
    sprite_ids: Vec<u32>,
}

impl FrameGroup {
    /// Every slot empty.
    pub fn new(dimensions: FrameGroupDimensions) -> Self {
        Self {
            dimensions,
            sprite_ids: vec![0; dimensions.sprite_count()],
        }
    }

    pub fn from_sprite_ids(
        dimensions: FrameGroupDimensions,
        sprite_ids: Vec<u32>,
    ) -> Result<Self, DatError> {
        let expect = dimensions.sprite_count();

        if sprite_ids.len() != expect {
            return Err(DatError::SpriteCountMismatch {
                expect,
                have: sprite_ids.len(),
            });
        }

        Ok(Self {
            dimensions,
            sprite_ids,
        })
    }

    pub fn dimensions(&self) -> FrameGroupDimensions {
        self.dimensions
    }

    pub fn sprite_ids(&self) -> &[u32] {
        &self.sprite_ids
    }

    /// `None` when any coordinate is outside of its dimension.
    pub fn sprite_index(&self, coord: &SpriteCoord) -> Option<usize> {
        let FrameGroupDimensions {
            width,
            height,
            layers,
            pattern_x,
            pattern_y,
            pattern_z,
            frames,
        } = self.dimensions;

        let (width, height, layers) = (width as usize, height as usize, layers as usize);
        let (pattern_x, pattern_y, pattern_z) =
            (pattern_x as usize, pattern_y as usize, pattern_z as usize);

        if coord.frame >= frames as usize
            || coord.pattern_z >= pattern_z
            || coord.pattern_y >= pattern_y
            || coord.pattern_x >= pattern_x
            || coord.layer >= layers
            || coord.y >= height
            || coord.x >= width
        {
            return None;
        }

        let index = coord.frame;
        let index = index * pattern_z + coord.pattern_z;
        let index = index * pattern_y + coord.pattern_y;
        let index = index * pattern_x + coord.pattern_x;
        let index = index * layers + coord.layer;
        let index = index * height + coord.y;
        let index = index * width + coord.x;

        Some(index)
    }

    /// Inverse of [`FrameGroup::sprite_index`].
    pub fn coord_of(&self, index: usize) -> Option<SpriteCoord> {
        if index >= self.sprite_ids.len() {
            return None;
        }

        let dims = self.dimensions;
        let mut rest = index;

        // peel from the innermost axis outwards
        let mut take = |size: u8| {
            let value = rest % size as usize;
            rest /= size as usize;
            value
        };

        let x = take(dims.width);
        let y = take(dims.height);
        let layer = take(dims.layers);
        let pattern_x = take(dims.pattern_x);
        let pattern_y = take(dims.pattern_y);
        let pattern_z = take(dims.pattern_z);
        let frame = rest;

        Some(SpriteCoord {
            frame,
            pattern_x,
            pattern_y,
            pattern_z,
            layer,
            x,
            y,
        })
    }

    /// 0 for coordinates outside of the grid. Stale coordinates after a resize are common.
    pub fn sprite_id(&self, coord: &SpriteCoord) -> u32 {
        self.sprite_index(coord)
            .and_then(|index| self.sprite_ids.get(index).copied())
            .unwrap_or(0)
    }

    pub fn set_sprite_id(&mut self, coord: &SpriteCoord, id: u32) -> Result<(), DatError> {
        let index = self
            .sprite_index(coord)
            .ok_or(DatError::IndexOutOfRange {
                coord: *coord,
                dimensions: self.dimensions,
            })?;

        self.sprite_ids[index] = id;

        Ok(())
    }

    /// Destructive: every slot is reset to 0, nothing is carried over. Read the ids you
    /// want to keep before calling this.
    pub fn resize(&mut self, dimensions: FrameGroupDimensions) {
        debug!("Resizing frame group from {} to {}", self.dimensions, dimensions);

        self.dimensions = dimensions;
        self.sprite_ids = vec![0; dimensions.sprite_count()];
    }

    /// Data tile of the visual tile `(x, y)`.
    ///
    /// Tiles are stored mirrored: visual `(0, 0)` is the top left corner but data `(0, 0)`
    /// is the bottom right one.
    pub fn data_tile(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        let (width, height) = (
            self.dimensions.width as usize,
            self.dimensions.height as usize,
        );

        if x >= width || y >= height {
            return None;
        }

        Some((width - 1 - x, height - 1 - y))
    }

    /// Visual tile of the data tile `(x, y)`. The mapping is its own inverse.
    pub fn visual_tile(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        self.data_tile(x, y)
    }
}
