use common::ClientFeatureSet;
use dat::{
    error::DatError, FrameGroupDimensions, FrameGroupKind, SpriteCoord, ThingCategory, ThingList,
    ThingType,
};
use eyre::eyre;
use log::{debug, warn};
use spr::{encode, PixelBuffer, SpriteStore};

use super::compositor::Compositor;
use crate::utils::framebuffer::Bitmap;

/// One editable tile of a pattern as the user sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSlot {
    /// Visual tile
    pub x: usize,
    /// Visual tile
    pub y: usize,
    pub sprite_id: u32,
}

/// Which pattern of which object an editing operation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThingRef {
    pub category: ThingCategory,
    pub id: u32,
    pub kind: FrameGroupKind,
}

impl ThingRef {
    pub fn new(category: ThingCategory, id: u32) -> Self {
        Self {
            category,
            id,
            kind: FrameGroupKind::Default,
        }
    }

    pub fn kind(mut self, kind: FrameGroupKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A loaded pair of sprite and object files.
///
/// Every edit goes through here, one at a time.
#[derive(Debug, Clone)]
pub struct Project {
    features: ClientFeatureSet,
    sprites: SpriteStore,
    things: ThingList,
}

impl Project {
    pub fn new(features: ClientFeatureSet) -> Self {
        Self {
            features,
            sprites: SpriteStore::new(features),
            things: ThingList::new(),
        }
    }

    pub fn features(&self) -> ClientFeatureSet {
        self.features
    }

    pub fn sprites(&self) -> &SpriteStore {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteStore {
        &mut self.sprites
    }

    pub fn things(&self) -> &ThingList {
        &self.things
    }

    pub fn things_mut(&mut self) -> &mut ThingList {
        &mut self.things
    }

    pub fn thing(&self, category: ThingCategory, id: u32) -> eyre::Result<&ThingType> {
        self.things
            .get(category, id)
            .ok_or(eyre!("Cannot find {category} {id}"))
    }

    pub fn compositor(&self) -> Compositor<'_> {
        Compositor::new(&self.sprites, self.features)
    }

    pub fn composite(
        &self,
        thing: ThingRef,
        frame: usize,
        pattern_x: usize,
        pattern_y: usize,
        pattern_z: usize,
    ) -> eyre::Result<Bitmap> {
        let object = self.thing(thing.category, thing.id)?;

        Ok(self
            .compositor()
            .composite(object, thing.kind, frame, pattern_x, pattern_y, pattern_z))
    }

    /// Encodes `pixels` and stores them under a fresh id.
    pub fn add_sprite(&mut self, pixels: &PixelBuffer) -> eyre::Result<u32> {
        let id = self.sprites.allocate(encode(pixels, self.features))?;

        debug!("Added sprite {id}");

        Ok(id)
    }

    pub fn replace_sprite(&mut self, id: u32, pixels: &PixelBuffer) -> eyre::Result<()> {
        if !self.sprites.contains(id) {
            return Err(eyre!("Cannot find sprite {id}"));
        }

        self.sprites.replace_pixels(id, pixels, self.features)?;

        Ok(())
    }

    /// Slots of one pattern in visual order, row by row.
    pub fn slots(
        &self,
        thing: ThingRef,
        frame: usize,
        pattern_x: usize,
        pattern_y: usize,
        pattern_z: usize,
        layer: usize,
    ) -> eyre::Result<Vec<SpriteSlot>> {
        let object = self.thing(thing.category, thing.id)?;
        let group = object
            .frame_group(thing.kind)
            .ok_or(DatError::MissingFrameGroup { kind: thing.kind })?;

        let dims = group.dimensions();
        let coord = SpriteCoord::new(frame, pattern_x, pattern_y, pattern_z).layer(layer);

        let slots = (0..dims.height as usize)
            .flat_map(|y| (0..dims.width as usize).map(move |x| (x, y)))
            .filter_map(|(x, y)| {
                let (data_x, data_y) = group.data_tile(x, y)?;

                Some(SpriteSlot {
                    x,
                    y,
                    sprite_id: group.sprite_id(&coord.tile(data_x, data_y)),
                })
            })
            .collect();

        Ok(slots)
    }

    /// Puts `sprite_id` into the visual slot `(slot_x, slot_y)` of the pattern at `coord`.
    /// The tile part of `coord` is ignored.
    ///
    /// Id 0 empties the slot. Any other id must already be in the sprite store.
    pub fn update_sprite_slot(
        &mut self,
        thing: ThingRef,
        coord: SpriteCoord,
        slot_x: usize,
        slot_y: usize,
        sprite_id: u32,
    ) -> eyre::Result<()> {
        if sprite_id != 0 && !self.sprites.contains(sprite_id) {
            warn!(
                "Rejected unknown sprite {sprite_id} for {} {}",
                thing.category, thing.id
            );
            return Err(eyre!("Cannot find sprite {sprite_id}"));
        }

        let group = self
            .things
            .try_get_mut(thing.category, thing.id)?
            .try_frame_group_mut(thing.kind)?;

        let (data_x, data_y) = group
            .data_tile(slot_x, slot_y)
            .ok_or(DatError::TileOutOfRange {
                x: slot_x,
                y: slot_y,
                dimensions: group.dimensions(),
            })?;

        group.set_sprite_id(&coord.tile(data_x, data_y), sprite_id)?;

        Ok(())
    }

    /// Every slot of the frame group is emptied, sprites stay in the store.
    pub fn resize_object(
        &mut self,
        thing: ThingRef,
        dimensions: FrameGroupDimensions,
    ) -> eyre::Result<()> {
        if dimensions.sprite_count() == 0 {
            return Err(eyre!("Cannot resize to zero sized {dimensions}"));
        }

        self.things
            .try_get_mut(thing.category, thing.id)?
            .try_frame_group_mut(thing.kind)?
            .resize(dimensions);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use common::ClientFeatureSet;
    use dat::{error::DatError, FrameGroupDimensions, FrameGroupKind, SpriteCoord, ThingCategory};
    use spr::PixelBuffer;

    use super::{Project, SpriteSlot, ThingRef};

    fn project() -> (Project, ThingRef) {
        let mut project = Project::new(ClientFeatureSet::resolve(1098));
        let id = project.things_mut().create(ThingCategory::Item).unwrap().id;

        (project, ThingRef::new(ThingCategory::Item, id))
    }

    fn wide() -> FrameGroupDimensions {
        FrameGroupDimensions {
            width: 2,
            height: 2,
            ..Default::default()
        }
    }

    #[test]
    fn slot_goes_to_mirrored_data_tile() {
        let (mut project, item) = project();
        let sprite = project.add_sprite(&PixelBuffer::filled([1, 1, 1, 255])).unwrap();

        project.resize_object(item, wide()).unwrap();
        project
            .update_sprite_slot(item, SpriteCoord::default(), 0, 0, sprite)
            .unwrap();

        let group = project
            .thing(item.category, item.id)
            .unwrap()
            .frame_group(FrameGroupKind::Default)
            .unwrap();

        // visual top left is the last data tile
        assert_eq!(group.sprite_ids(), &[0, 0, 0, sprite]);

        let slots = project.slots(item, 0, 0, 0, 0, 0).unwrap();
        assert_eq!(slots.len(), 4);
        assert_eq!(
            slots[0],
            SpriteSlot {
                x: 0,
                y: 0,
                sprite_id: sprite
            }
        );
        assert!(slots[1..].iter().all(|slot| slot.sprite_id == 0));
    }

    #[test]
    fn slot_shows_in_composite() {
        let (mut project, item) = project();
        let sprite = project.add_sprite(&PixelBuffer::filled([7, 8, 9, 255])).unwrap();

        project.resize_object(item, wide()).unwrap();
        project
            .update_sprite_slot(item, SpriteCoord::default(), 1, 0, sprite)
            .unwrap();

        let bitmap = project.composite(item, 0, 0, 0, 0).unwrap();

        assert_eq!(bitmap.pixel_at(32, 0), Some([7, 8, 9, 255]));
        assert_eq!(bitmap.pixel_at(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn unknown_sprite_is_rejected() {
        let (mut project, item) = project();

        assert!(project
            .update_sprite_slot(item, SpriteCoord::default(), 0, 0, 42)
            .is_err());
        assert!(project
            .update_sprite_slot(item, SpriteCoord::default(), 0, 0, 0)
            .is_ok());
    }

    #[test]
    fn slot_outside_is_rejected() {
        let (mut project, item) = project();
        let sprite = project.add_sprite(&PixelBuffer::filled([1, 1, 1, 255])).unwrap();

        let err = project
            .update_sprite_slot(item, SpriteCoord::default(), 1, 0, sprite)
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<DatError>(),
            Some(&DatError::TileOutOfRange {
                x: 1,
                y: 0,
                dimensions: FrameGroupDimensions::default()
            })
        );

        assert!(project
            .update_sprite_slot(item, SpriteCoord::new(1, 0, 0, 0), 0, 0, sprite)
            .is_err());
    }

    #[test]
    fn resize_discards_ids() {
        let (mut project, item) = project();
        let sprite = project.add_sprite(&PixelBuffer::filled([1, 1, 1, 255])).unwrap();

        project
            .update_sprite_slot(item, SpriteCoord::default(), 0, 0, sprite)
            .unwrap();
        project.resize_object(item, wide()).unwrap();

        let slots = project.slots(item, 0, 0, 0, 0, 0).unwrap();
        assert!(slots.iter().all(|slot| slot.sprite_id == 0));
        assert!(project.sprites().contains(sprite));

        let zero = FrameGroupDimensions {
            frames: 0,
            ..Default::default()
        };
        assert!(project.resize_object(item, zero).is_err());
    }

    #[test]
    fn missing_thing_or_group() {
        let (mut project, item) = project();

        let walking = item.kind(FrameGroupKind::Walking);
        assert!(project.slots(walking, 0, 0, 0, 0, 0).is_err());
        assert!(project.resize_object(walking, wide()).is_err());

        let ghost = ThingRef::new(ThingCategory::Outfit, 9);
        assert!(project.composite(ghost, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn replace_sprite() {
        let (mut project, _) = project();
        let sprite = project.add_sprite(&PixelBuffer::filled([1, 1, 1, 255])).unwrap();

        let pixels = PixelBuffer::filled([5, 5, 5, 255]);
        project.replace_sprite(sprite, &pixels).unwrap();

        assert_eq!(
            project
                .sprites()
                .decode_sprite(sprite, project.features()),
            pixels
        );
        assert!(project.replace_sprite(sprite + 1, &pixels).is_err());
    }
}
