use common::{ClientFeatureSet, SPRITE_SIZE};
use dat::{FrameGroup, FrameGroupKind, SpriteCoord, ThingType};
use rayon::prelude::*;
use spr::{PixelBuffer, SpriteStore};

use crate::utils::framebuffer::{Bitmap, FramebufferLock};

/// Draws objects out of their sprites.
///
/// Items show every `pattern_x * pattern_y` variant side by side. Outfits, effects and
/// missiles show the one pattern that was asked for.
pub struct Compositor<'a> {
    sprites: &'a SpriteStore,
    features: ClientFeatureSet,
}

/// One tile to draw: pixel position in the output and the sprite that goes there.
struct TileJob {
    x: usize,
    y: usize,
    sprite_id: u32,
}

impl<'a> Compositor<'a> {
    pub fn new(sprites: &'a SpriteStore, features: ClientFeatureSet) -> Self {
        Self { sprites, features }
    }

    /// A lone 32x32 sprite. Id 0 and unknown ids are transparent.
    pub fn sprite_bitmap(&self, id: u32) -> Bitmap {
        let mut bitmap = Bitmap::new(SPRITE_SIZE, SPRITE_SIZE);

        bitmap
            .lock()
            .blit_tile(0, 0, &self.sprites.decode_sprite(id, self.features));

        bitmap
    }

    /// Layer 0 of `frame` in `kind`.
    ///
    /// A fixed frame on the object wins over `frame`. Items ignore `pattern_x` and
    /// `pattern_y` since all of them are drawn. An object without `kind` gives an empty
    /// bitmap.
    pub fn composite(
        &self,
        thing: &ThingType,
        kind: FrameGroupKind,
        frame: usize,
        pattern_x: usize,
        pattern_y: usize,
        pattern_z: usize,
    ) -> Bitmap {
        let Some(group) = thing.frame_group(kind) else {
            return Bitmap::empty();
        };

        let frame = thing.fixed_frame.map_or(frame, usize::from);

        let dims = group.dimensions();
        let block_width = dims.width as usize * SPRITE_SIZE;
        let block_height = dims.height as usize * SPRITE_SIZE;

        // (block column, block row, pattern x, pattern y)
        let blocks = if thing.category.is_directional() {
            vec![(0, 0, pattern_x, pattern_y)]
        } else {
            (0..dims.pattern_y as usize)
                .flat_map(|py| (0..dims.pattern_x as usize).map(move |px| (px, py, px, py)))
                .collect()
        };

        let columns = blocks.iter().map(|block| block.0 + 1).max().unwrap_or(0);
        let rows = blocks.iter().map(|block| block.1 + 1).max().unwrap_or(0);

        let jobs = blocks
            .into_iter()
            .flat_map(|(column, row, px, py)| {
                let coord = SpriteCoord::new(frame, px, py, pattern_z);

                tile_jobs(group, coord, column * block_width, row * block_height)
            })
            .collect::<Vec<TileJob>>();

        let mut bitmap = Bitmap::new(columns * block_width, rows * block_height);

        self.draw(&mut bitmap.lock(), &jobs);

        bitmap
    }

    /// Tiles are decoded in parallel, written one after another.
    fn draw(&self, lock: &mut FramebufferLock<'_>, jobs: &[TileJob]) {
        let tiles = jobs
            .par_iter()
            .map(|job| self.sprites.decode_sprite(job.sprite_id, self.features))
            .collect::<Vec<PixelBuffer>>();

        jobs.iter().zip(tiles.iter()).for_each(|(job, tile)| {
            lock.blit_tile(job.x, job.y, tile);
        });
    }
}

/// Non-empty tiles of one pattern, in visual order, offset by the block origin in pixels.
fn tile_jobs(
    group: &FrameGroup,
    coord: SpriteCoord,
    origin_x: usize,
    origin_y: usize,
) -> Vec<TileJob> {
    let dims = group.dimensions();

    (0..dims.height as usize)
        .flat_map(|y| (0..dims.width as usize).map(move |x| (x, y)))
        .filter_map(|(x, y)| {
            let (data_x, data_y) = group.data_tile(x, y)?;
            let sprite_id = group.sprite_id(&coord.tile(data_x, data_y));

            // the buffer starts out transparent
            (sprite_id != 0).then_some(TileJob {
                x: origin_x + x * SPRITE_SIZE,
                y: origin_y + y * SPRITE_SIZE,
                sprite_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use common::ClientFeatureSet;
    use dat::{FrameGroup, FrameGroupDimensions, FrameGroupKind, ThingCategory, ThingType};
    use spr::{encode, PixelBuffer, SpriteStore};

    use super::Compositor;

    fn features() -> ClientFeatureSet {
        ClientFeatureSet::resolve(1098)
    }

    /// Sprites 1..=count, each filled with `[id, id, id, 255]`.
    fn store(count: u32) -> SpriteStore {
        let mut store = SpriteStore::new(features());

        (1..=count).for_each(|id| {
            let pixels = PixelBuffer::filled([id as u8, id as u8, id as u8, 255]);
            store.insert(id, encode(&pixels, features())).unwrap();
        });

        store
    }

    fn thing(category: ThingCategory, dims: FrameGroupDimensions, ids: Vec<u32>) -> ThingType {
        let mut thing = ThingType::new(category.first_id(), category);
        let group = FrameGroup::from_sprite_ids(dims, ids).unwrap();

        thing
            .set_frame_group(FrameGroupKind::Default, group, features())
            .unwrap();

        thing
    }

    fn color(id: u8) -> Option<[u8; 4]> {
        Some([id, id, id, 255])
    }

    #[test]
    fn item_patterns_side_by_side() {
        let store = store(4);
        let dims = FrameGroupDimensions {
            width: 2,
            pattern_x: 2,
            ..Default::default()
        };
        // pattern 0 holds sprites 1 and 2, pattern 1 holds 3 and 4, data order
        let item = thing(ThingCategory::Item, dims, vec![1, 2, 3, 4]);

        let bitmap = Compositor::new(&store, features()).composite(
            &item,
            FrameGroupKind::Default,
            0,
            0,
            0,
            0,
        );

        assert_eq!((bitmap.width(), bitmap.height()), (128, 32));

        // visual tile 0 is data tile 1
        assert_eq!(bitmap.pixel_at(0, 0), color(2));
        assert_eq!(bitmap.pixel_at(31, 31), color(2));
        assert_eq!(bitmap.pixel_at(32, 0), color(1));
        assert_eq!(bitmap.pixel_at(64, 0), color(4));
        assert_eq!(bitmap.pixel_at(127, 31), color(3));
    }

    #[test]
    fn item_pattern_rows() {
        let store = store(4);
        let dims = FrameGroupDimensions {
            pattern_x: 2,
            pattern_y: 2,
            ..Default::default()
        };
        let item = thing(ThingCategory::Item, dims, vec![1, 2, 3, 4]);

        let bitmap = Compositor::new(&store, features()).composite(
            &item,
            FrameGroupKind::Default,
            0,
            1,
            1,
            0,
        );

        assert_eq!((bitmap.width(), bitmap.height()), (64, 64));
        assert_eq!(bitmap.pixel_at(0, 0), color(1));
        assert_eq!(bitmap.pixel_at(32, 0), color(2));
        assert_eq!(bitmap.pixel_at(0, 32), color(3));
        assert_eq!(bitmap.pixel_at(32, 32), color(4));
    }

    #[test]
    fn outfit_one_direction() {
        let store = store(8);
        let dims = FrameGroupDimensions {
            height: 2,
            pattern_x: 4,
            ..Default::default()
        };
        let outfit = thing(ThingCategory::Outfit, dims, (1..=8).collect());

        let bitmap = Compositor::new(&store, features()).composite(
            &outfit,
            FrameGroupKind::Default,
            0,
            2,
            0,
            0,
        );

        assert_eq!((bitmap.width(), bitmap.height()), (32, 64));
        // direction 2 holds sprites 5 (bottom in data) and 6
        assert_eq!(bitmap.pixel_at(0, 0), color(6));
        assert_eq!(bitmap.pixel_at(0, 32), color(5));
    }

    #[test]
    fn empty_slots_are_transparent() {
        let store = store(1);
        let dims = FrameGroupDimensions {
            width: 2,
            ..Default::default()
        };
        let effect = thing(ThingCategory::Effect, dims, vec![0, 1]);

        let bitmap = Compositor::new(&store, features()).composite(
            &effect,
            FrameGroupKind::Default,
            0,
            0,
            0,
            0,
        );

        assert_eq!(bitmap.pixel_at(0, 0), color(1));
        assert_eq!(bitmap.pixel_at(32, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn fixed_frame_wins() {
        let store = store(3);
        let dims = FrameGroupDimensions {
            frames: 3,
            ..Default::default()
        };
        let mut missile = thing(ThingCategory::Missile, dims, vec![1, 2, 3]);
        let compositor = Compositor::new(&store, features());

        let bitmap = compositor.composite(&missile, FrameGroupKind::Default, 2, 0, 0, 0);
        assert_eq!(bitmap.pixel_at(0, 0), color(3));

        missile.fixed_frame = Some(1);

        let bitmap = compositor.composite(&missile, FrameGroupKind::Default, 2, 0, 0, 0);
        assert_eq!(bitmap.pixel_at(0, 0), color(2));
    }

    #[test]
    fn missing_group_is_empty() {
        let store = store(1);
        let outfit = ThingType::new(1, ThingCategory::Outfit);

        let bitmap = Compositor::new(&store, features()).composite(
            &outfit,
            FrameGroupKind::Walking,
            0,
            0,
            0,
            0,
        );

        assert!(bitmap.is_empty());
        assert_eq!((bitmap.width(), bitmap.height()), (0, 0));
    }

    #[test]
    fn out_of_range_pattern_is_transparent() {
        let store = store(1);
        let outfit = thing(ThingCategory::Outfit, FrameGroupDimensions::default(), vec![1]);

        let bitmap = Compositor::new(&store, features()).composite(
            &outfit,
            FrameGroupKind::Default,
            0,
            3,
            0,
            0,
        );

        assert_eq!((bitmap.width(), bitmap.height()), (32, 32));
        assert!(bitmap.as_bytes().iter().all(|byte| *byte == 0));
    }

    #[test]
    fn single_sprite() {
        let store = store(2);
        let compositor = Compositor::new(&store, features());

        assert_eq!(compositor.sprite_bitmap(2).pixel_at(5, 5), color(2));
        assert_eq!(compositor.sprite_bitmap(0).pixel_at(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(compositor.sprite_bitmap(99).width(), 32);
    }
}
