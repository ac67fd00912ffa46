use std::collections::BTreeMap;

use common::ClientFeatureSet;
use log::debug;

use crate::{decode, encode, error::SprError, PixelBuffer};

/// Sprite id to compressed bytes.
///
/// The store is the only owner of sprite data; frame groups only hold ids. It is mutated by
/// one owner at a time, bulk producers hand it finished batches through [`SpriteStore::apply`].
#[derive(Debug, Clone)]
pub struct SpriteStore {
    sprites: BTreeMap<u32, Vec<u8>>,
    max_id: u32,
}

impl SpriteStore {
    /// The id width of `features` bounds which ids can be stored.
    pub fn new(features: ClientFeatureSet) -> Self {
        Self {
            sprites: BTreeMap::new(),
            max_id: features.max_sprite_id(),
        }
    }

    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.sprites.contains_key(&id)
    }

    pub fn get(&self, id: u32) -> Option<&[u8]> {
        self.sprites.get(&id).map(|bytes| bytes.as_slice())
    }

    fn check_id(&self, id: u32) -> Result<(), SprError> {
        if id == 0 {
            return Err(SprError::ReservedId);
        }

        if id > self.max_id {
            return Err(SprError::IdOutOfRange {
                id,
                max: self.max_id,
            });
        }

        Ok(())
    }

    /// Returns the bytes previously stored under `id`.
    pub fn insert(&mut self, id: u32, bytes: Vec<u8>) -> Result<Option<Vec<u8>>, SprError> {
        self.check_id(id)?;

        Ok(self.sprites.insert(id, bytes))
    }

    pub fn remove(&mut self, id: u32) -> Result<Vec<u8>, SprError> {
        self.sprites
            .remove(&id)
            .ok_or(SprError::UnknownSprite { id })
    }

    /// Sprites are appended, the next id is one past the highest stored id.
    pub fn next_id(&self) -> Result<u32, SprError> {
        let last = self.sprites.keys().next_back().copied().unwrap_or(0);

        if last >= self.max_id {
            return Err(SprError::StoreFull { max: self.max_id });
        }

        Ok(last + 1)
    }

    pub fn allocate(&mut self, bytes: Vec<u8>) -> Result<u32, SprError> {
        let id = self.next_id()?;

        self.sprites.insert(id, bytes);

        Ok(id)
    }

    /// Id 0 and unknown ids decode to a transparent tile.
    pub fn decode_sprite(&self, id: u32, features: ClientFeatureSet) -> PixelBuffer {
        match self.get(id) {
            Some(bytes) if id != 0 => decode(bytes, features),
            _ => PixelBuffer::new(),
        }
    }

    pub fn replace_pixels(
        &mut self,
        id: u32,
        pixels: &PixelBuffer,
        features: ClientFeatureSet,
    ) -> Result<(), SprError> {
        self.check_id(id)?;

        self.sprites.insert(id, encode(pixels, features));

        Ok(())
    }

    /// Writes a batch in ascending id order. The whole batch is validated first so a bad
    /// id leaves the store untouched.
    pub fn apply(&mut self, mut batch: Vec<(u32, Vec<u8>)>) -> Result<(), SprError> {
        batch.iter().try_for_each(|(id, _)| self.check_id(*id))?;

        batch.sort_by_key(|(id, _)| *id);

        debug!("Applying {} sprites", batch.len());

        batch.into_iter().for_each(|(id, bytes)| {
            self.sprites.insert(id, bytes);
        });

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.sprites
            .iter()
            .map(|(id, bytes)| (*id, bytes.as_slice()))
    }
}
