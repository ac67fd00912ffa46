use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use common::SPRITE_SIZE;
use dat::{FrameGroup, FrameGroupDimensions, FrameGroupKind, ThingCategory};
use eyre::eyre;
use image::RgbaImage;
use log::{debug, info};
use rayon::prelude::*;
use spr::encode;

use super::project::Project;
use crate::utils::img_stuffs::crop_tile;

/// Builds a new object out of a sprite sheet.
///
/// The sheet is a grid of object sized blocks, `width * 32` by `height * 32` pixels each.
/// Block columns run over pattern z, pattern x and layer, block rows over frame and
/// pattern y. A single frame, single layer item sheet looks exactly like its composite.
#[derive(Debug, Clone)]
pub struct ImportSheet {
    category: ThingCategory,
    dimensions: FrameGroupDimensions,
    cancel: Arc<AtomicBool>,
}

/// Sprite index in the frame group and pixel position of its tile on the sheet.
struct SheetTile {
    index: usize,
    x: u32,
    y: u32,
}

impl ImportSheet {
    pub fn new(category: ThingCategory) -> Self {
        Self {
            category,
            dimensions: FrameGroupDimensions::default(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dimensions(&mut self, dimensions: FrameGroupDimensions) -> &mut Self {
        self.dimensions = dimensions;
        self
    }

    /// Setting the flag stops the import before the next tile. Nothing is written to the
    /// project once cancelled.
    pub fn cancel_flag(&mut self, cancel: Arc<AtomicBool>) -> &mut Self {
        self.cancel = cancel;
        self
    }

    pub fn expected_size(&self) -> (u32, u32) {
        let FrameGroupDimensions {
            width,
            height,
            layers,
            pattern_x,
            pattern_y,
            pattern_z,
            frames,
        } = self.dimensions;
        let size = SPRITE_SIZE as u32;

        (
            pattern_z as u32 * pattern_x as u32 * layers as u32 * width as u32 * size,
            frames as u32 * pattern_y as u32 * height as u32 * size,
        )
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    fn sheet_tiles(&self, group: &FrameGroup) -> eyre::Result<Vec<SheetTile>> {
        let dims = self.dimensions;
        let size = SPRITE_SIZE as u32;

        (0..dims.sprite_count())
            .map(|index| {
                let coord = group
                    .coord_of(index)
                    .ok_or(eyre!("Sprite index {index} is outside of {dims}"))?;
                let (visual_x, visual_y) = group
                    .visual_tile(coord.x, coord.y)
                    .ok_or(eyre!("Tile {coord} is outside of {dims}"))?;

                let column = (coord.pattern_z * dims.pattern_x as usize + coord.pattern_x)
                    * dims.layers as usize
                    + coord.layer;
                let row = coord.frame * dims.pattern_y as usize + coord.pattern_y;

                let tile_x = column * dims.width as usize + visual_x;
                let tile_y = row * dims.height as usize + visual_y;

                Ok(SheetTile {
                    index,
                    x: tile_x as u32 * size,
                    y: tile_y as u32 * size,
                })
            })
            .collect()
    }

    /// Returns the id of the new object.
    ///
    /// Tiles are cut and encoded in parallel. New sprites get ascending ids in frame group
    /// order, fully transparent tiles are left empty.
    pub fn run(&self, project: &mut Project, sheet: &RgbaImage) -> eyre::Result<u32> {
        let dims = self.dimensions;

        if dims.sprite_count() == 0 {
            return Err(eyre!("Cannot import a zero sized object: {dims}"));
        }

        let expected = self.expected_size();

        if sheet.dimensions() != expected {
            return Err(eyre!(
                "Sprite sheet is {}x{}, {} needs {}x{}",
                sheet.width(),
                sheet.height(),
                dims,
                expected.0,
                expected.1
            ));
        }

        let mut group = FrameGroup::new(dims);
        let tiles = self.sheet_tiles(&group)?;
        let features = project.features();

        let encoded = tiles
            .par_iter()
            .map(|tile| {
                if self.is_cancelled() {
                    return Err(eyre!("Import cancelled"));
                }

                let pixels = crop_tile(sheet, tile.x, tile.y)?;

                if pixels.is_transparent() {
                    return Ok((tile.index, None));
                }

                Ok((tile.index, Some(encode(&pixels, features))))
            })
            .collect::<eyre::Result<Vec<(usize, Option<Vec<u8>>)>>>()?;

        if self.is_cancelled() {
            return Err(eyre!("Import cancelled"));
        }

        // collect keeps the order of the tiles, which is frame group order
        let new_sprites = encoded
            .into_iter()
            .filter_map(|(index, bytes)| bytes.map(|bytes| (index, bytes)))
            .collect::<Vec<(usize, Vec<u8>)>>();

        let max_id = project.sprites().max_id();
        let first_id = match new_sprites.len() {
            0 => 0,
            _ => project.sprites().next_id()?,
        };

        if (max_id - first_id) as u64 + 1 < new_sprites.len() as u64 {
            return Err(eyre!(
                "Sprite store cannot hold {} more sprites, last id is {max_id}",
                new_sprites.len()
            ));
        }

        // fail before anything is written
        project.things().next_id(self.category)?;

        debug!(
            "Allocating sprites {first_id} and up for {} tiles",
            tiles.len()
        );

        let mut batch = Vec::with_capacity(new_sprites.len());

        // ids stay within max_id, checked above
        for (id, (index, bytes)) in (first_id..=max_id).zip(new_sprites) {
            let coord = group
                .coord_of(index)
                .ok_or(eyre!("Sprite index {index} is outside of {dims}"))?;

            group.set_sprite_id(&coord, id)?;
            batch.push((id, bytes));
        }

        let new_sprites = batch.len();

        project.sprites_mut().apply(batch)?;

        let thing = project.things_mut().create(self.category)?;
        thing.set_frame_group(FrameGroupKind::Default, group, features)?;

        let id = thing.id;

        info!(
            "Imported {} {} with {} new sprites",
            self.category, id, new_sprites
        );

        Ok(id)
    }
}

#[cfg(test)]
mod test {
    use std::sync::{atomic::AtomicBool, Arc};

    use common::ClientFeatureSet;
    use dat::{FrameGroupDimensions, FrameGroupKind, ThingCategory};
    use image::{Rgba, RgbaImage};

    use super::ImportSheet;
    use crate::modules::project::{Project, ThingRef};

    fn fill_tile(img: &mut RgbaImage, tile_x: u32, tile_y: u32, color: [u8; 4]) {
        (0..32).for_each(|y| {
            (0..32).for_each(|x| img.put_pixel(tile_x * 32 + x, tile_y * 32 + y, Rgba(color)));
        });
    }

    fn project() -> Project {
        Project::new(ClientFeatureSet::resolve(1098))
    }

    #[test]
    fn sheet_matches_composite() {
        let mut project = project();
        let dims = FrameGroupDimensions {
            width: 2,
            pattern_x: 2,
            ..Default::default()
        };

        let mut sheet = RgbaImage::new(128, 32);
        fill_tile(&mut sheet, 0, 0, [10, 0, 0, 255]);
        fill_tile(&mut sheet, 1, 0, [20, 0, 0, 255]);
        fill_tile(&mut sheet, 3, 0, [40, 0, 0, 255]);

        let id = ImportSheet::new(ThingCategory::Item)
            .dimensions(dims)
            .run(&mut project, &sheet)
            .unwrap();

        assert_eq!(id, 100);

        let item = ThingRef::new(ThingCategory::Item, id);
        let preview = project.composite(item, 0, 0, 0, 0).unwrap();

        assert_eq!(preview.to_rgba8().unwrap(), sheet);
    }

    #[test]
    fn ids_follow_slot_order() {
        let mut project = project();
        let dims = FrameGroupDimensions {
            width: 2,
            ..Default::default()
        };

        let mut sheet = RgbaImage::new(64, 32);
        fill_tile(&mut sheet, 0, 0, [1, 0, 0, 255]);
        fill_tile(&mut sheet, 1, 0, [2, 0, 0, 255]);

        let id = ImportSheet::new(ThingCategory::Effect)
            .dimensions(dims)
            .run(&mut project, &sheet)
            .unwrap();

        let group = project
            .thing(ThingCategory::Effect, id)
            .unwrap()
            .frame_group(FrameGroupKind::Default)
            .unwrap()
            .clone();

        // data tile 0 is the right visual tile
        assert_eq!(group.sprite_ids(), &[1, 2]);

        let right = project.compositor().sprite_bitmap(1);
        assert_eq!(right.pixel_at(0, 0), Some([0, 0, 2, 255]));
    }

    #[test]
    fn transparent_tiles_stay_empty() {
        let mut project = project();
        let dims = FrameGroupDimensions {
            frames: 3,
            ..Default::default()
        };

        let mut sheet = RgbaImage::new(32, 96);
        fill_tile(&mut sheet, 0, 2, [1, 2, 3, 255]);

        let id = ImportSheet::new(ThingCategory::Missile)
            .dimensions(dims)
            .run(&mut project, &sheet)
            .unwrap();

        let thing = project.thing(ThingCategory::Missile, id).unwrap();

        assert_eq!(thing.sprite_ids(), vec![1]);
        assert_eq!(project.sprites().len(), 1);
    }

    #[test]
    fn wrong_sheet_size() {
        let mut project = project();
        let dims = FrameGroupDimensions {
            layers: 2,
            frames: 2,
            ..Default::default()
        };

        let mut import = ImportSheet::new(ThingCategory::Outfit);
        import.dimensions(dims);

        assert_eq!(import.expected_size(), (64, 64));
        assert!(import.run(&mut project, &RgbaImage::new(32, 64)).is_err());
        assert!(project.things().is_empty());
    }

    #[test]
    fn cancelled_import_writes_nothing() {
        let mut project = project();
        let cancel = Arc::new(AtomicBool::new(true));

        let mut sheet = RgbaImage::new(32, 32);
        fill_tile(&mut sheet, 0, 0, [1, 2, 3, 255]);

        let res = ImportSheet::new(ThingCategory::Item)
            .cancel_flag(cancel)
            .run(&mut project, &sheet);

        assert!(res.is_err());
        assert!(project.sprites().is_empty());
        assert!(project.things().is_empty());
    }

    #[test]
    fn store_full() {
        let mut project = Project::new(ClientFeatureSet::resolve(860));
        project.sprites_mut().insert(0xFFFF, vec![]).unwrap();

        let mut sheet = RgbaImage::new(32, 32);
        fill_tile(&mut sheet, 0, 0, [1, 2, 3, 255]);

        let res = ImportSheet::new(ThingCategory::Item).run(&mut project, &sheet);

        assert!(res.is_err());
        assert!(project.things().is_empty());
    }

    #[test]
    fn last_sprite_id() {
        let mut project = project();
        project.sprites_mut().insert(u32::MAX - 1, vec![]).unwrap();

        let mut sheet = RgbaImage::new(32, 32);
        fill_tile(&mut sheet, 0, 0, [1, 2, 3, 255]);

        let id = ImportSheet::new(ThingCategory::Item)
            .run(&mut project, &sheet)
            .unwrap();

        let thing = project.thing(ThingCategory::Item, id).unwrap();
        assert_eq!(thing.sprite_ids(), vec![u32::MAX]);
        assert!(project.sprites().contains(u32::MAX));

        // nothing left for a second import
        assert!(ImportSheet::new(ThingCategory::Item)
            .run(&mut project, &sheet)
            .is_err());
        assert_eq!(project.things().len(ThingCategory::Item), 1);
    }

    #[test]
    fn thing_ids_exhausted() {
        let mut project = project();
        project
            .things_mut()
            .insert(dat::ThingType::new(u32::MAX, ThingCategory::Effect));

        let mut sheet = RgbaImage::new(32, 32);
        fill_tile(&mut sheet, 0, 0, [1, 2, 3, 255]);

        let res = ImportSheet::new(ThingCategory::Effect).run(&mut project, &sheet);

        assert!(res.is_err());
        assert!(project.sprites().is_empty());
    }
}
