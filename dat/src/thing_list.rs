use std::collections::BTreeMap;

use log::debug;

use crate::{error::DatError, ThingCategory, ThingType};

/// Every object of a loaded dat file, by category and id.
#[derive(Debug, Clone, Default)]
pub struct ThingList {
    things: BTreeMap<ThingCategory, BTreeMap<u32, ThingType>>,
}

impl ThingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, category: ThingCategory) -> usize {
        self.things.get(&category).map_or(0, |things| things.len())
    }

    pub fn is_empty(&self) -> bool {
        self.things.values().all(|things| things.is_empty())
    }

    pub fn get(&self, category: ThingCategory, id: u32) -> Option<&ThingType> {
        self.things.get(&category)?.get(&id)
    }

    pub fn get_mut(&mut self, category: ThingCategory, id: u32) -> Option<&mut ThingType> {
        self.things.get_mut(&category)?.get_mut(&id)
    }

    pub fn try_get_mut(
        &mut self,
        category: ThingCategory,
        id: u32,
    ) -> Result<&mut ThingType, DatError> {
        self.get_mut(category, id)
            .ok_or(DatError::UnknownThing { category, id })
    }

    /// Id the next created object of `category` receives.
    pub fn next_id(&self, category: ThingCategory) -> Result<u32, DatError> {
        match self
            .things
            .get(&category)
            .and_then(|things| things.keys().next_back())
        {
            Some(last) => last
                .checked_add(1)
                .ok_or(DatError::ThingIdsExhausted { category }),
            None => Ok(category.first_id()),
        }
    }

    /// Adds a blank 1x1 object at the end of the category.
    pub fn create(&mut self, category: ThingCategory) -> Result<&mut ThingType, DatError> {
        let id = self.next_id(category)?;

        debug!("Creating {} {}", category, id);

        Ok(self
            .things
            .entry(category)
            .or_default()
            .entry(id)
            .or_insert_with(|| ThingType::new(id, category)))
    }

    /// Returns the object previously stored under the same category and id.
    pub fn insert(&mut self, thing: ThingType) -> Option<ThingType> {
        self.things
            .entry(thing.category)
            .or_default()
            .insert(thing.id, thing)
    }

    pub fn remove(&mut self, category: ThingCategory, id: u32) -> Result<ThingType, DatError> {
        self.things
            .get_mut(&category)
            .and_then(|things| things.remove(&id))
            .ok_or(DatError::UnknownThing { category, id })
    }

    /// Objects of `category` in ascending id order.
    pub fn iter(&self, category: ThingCategory) -> impl Iterator<Item = &ThingType> {
        self.things
            .get(&category)
            .into_iter()
            .flat_map(|things| things.values())
    }
}
