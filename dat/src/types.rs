use std::{collections::BTreeMap, fmt};

use common::ClientFeatureSet;

use crate::{error::DatError, FrameGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThingCategory {
    Item,
    Outfit,
    Effect,
    Missile,
}

impl ThingCategory {
    pub const ALL: [ThingCategory; 4] = [
        ThingCategory::Item,
        ThingCategory::Outfit,
        ThingCategory::Effect,
        ThingCategory::Missile,
    ];

    /// Items are laid out as every pattern side by side, the rest show one direction at a
    /// time.
    pub fn is_directional(&self) -> bool {
        !matches!(self, ThingCategory::Item)
    }

    /// Item ids start at 100 in every client, other categories at 1.
    pub fn first_id(&self) -> u32 {
        match self {
            ThingCategory::Item => 100,
            _ => 1,
        }
    }
}

impl TryFrom<u8> for ThingCategory {
    type Error = DatError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(DatError::UnknownCategory { index })
    }
}

impl fmt::Display for ThingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThingCategory::Item => "item",
            ThingCategory::Outfit => "outfit",
            ThingCategory::Effect => "effect",
            ThingCategory::Missile => "missile",
        };

        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FrameGroupKind {
    #[default]
    Default,
    /// Only outfits on clients with frame group support.
    Walking,
}

impl fmt::Display for FrameGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameGroupKind::Default => f.write_str("default"),
            FrameGroupKind::Walking => f.write_str("walking"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameGroupDimensions {
    /// In tiles
    pub width: u8,
    /// In tiles
    pub height: u8,
    pub layers: u8,
    pub pattern_x: u8,
    pub pattern_y: u8,
    pub pattern_z: u8,
    pub frames: u8,
}

impl Default for FrameGroupDimensions {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            layers: 1,
            pattern_x: 1,
            pattern_y: 1,
            pattern_z: 1,
            frames: 1,
        }
    }
}

impl FrameGroupDimensions {
    pub fn sprite_count(&self) -> usize {
        self.frames as usize
            * self.pattern_z as usize
            * self.pattern_y as usize
            * self.pattern_x as usize
            * self.layers as usize
            * self.height as usize
            * self.width as usize
    }
}

impl fmt::Display for FrameGroupDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} tiles, {} layers, patterns {}x{}x{}, {} frames",
            self.width,
            self.height,
            self.layers,
            self.pattern_x,
            self.pattern_y,
            self.pattern_z,
            self.frames
        )
    }
}

/// Logical position of one sprite inside a frame group. `x` and `y` are data tiles, not
/// visual tiles, see [`FrameGroup::data_tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpriteCoord {
    pub frame: usize,
    pub pattern_x: usize,
    pub pattern_y: usize,
    pub pattern_z: usize,
    pub layer: usize,
    pub x: usize,
    pub y: usize,
}

impl SpriteCoord {
    /// Tile `(0, 0)` of the given animation slot.
    pub fn new(frame: usize, pattern_x: usize, pattern_y: usize, pattern_z: usize) -> Self {
        Self {
            frame,
            pattern_x,
            pattern_y,
            pattern_z,
            ..Default::default()
        }
    }

    pub fn layer(mut self, layer: usize) -> Self {
        self.layer = layer;
        self
    }

    pub fn tile(mut self, x: usize, y: usize) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

impl fmt::Display for SpriteCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(frame {}, pattern {}/{}/{}, layer {}, tile {},{})",
            self.frame, self.pattern_x, self.pattern_y, self.pattern_z, self.layer, self.x, self.y
        )
    }
}

/// One object of the dat file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingType {
    pub id: u32,
    pub category: ThingCategory,
    /// Some objects always show the same animation frame.
    pub fixed_frame: Option<u8>,
    frame_groups: BTreeMap<FrameGroupKind, FrameGroup>,
}

impl ThingType {
    /// New object with a single 1x1 default frame group.
    pub fn new(id: u32, category: ThingCategory) -> Self {
        let mut frame_groups = BTreeMap::new();
        frame_groups.insert(
            FrameGroupKind::Default,
            FrameGroup::new(FrameGroupDimensions::default()),
        );

        Self {
            id,
            category,
            fixed_frame: None,
            frame_groups,
        }
    }

    pub fn frame_group(&self, kind: FrameGroupKind) -> Option<&FrameGroup> {
        self.frame_groups.get(&kind)
    }

    pub fn frame_group_mut(&mut self, kind: FrameGroupKind) -> Option<&mut FrameGroup> {
        self.frame_groups.get_mut(&kind)
    }

    /// Like [`ThingType::frame_group_mut`] but reports the missing kind.
    pub fn try_frame_group_mut(
        &mut self,
        kind: FrameGroupKind,
    ) -> Result<&mut FrameGroup, DatError> {
        self.frame_groups
            .get_mut(&kind)
            .ok_or(DatError::MissingFrameGroup { kind })
    }

    /// Returns the group previously stored under `kind`.
    ///
    /// A walking group needs an outfit on a client with frame group support.
    pub fn set_frame_group(
        &mut self,
        kind: FrameGroupKind,
        group: FrameGroup,
        features: ClientFeatureSet,
    ) -> Result<Option<FrameGroup>, DatError> {
        if kind != FrameGroupKind::Default
            && (!features.supports_frame_groups || self.category != ThingCategory::Outfit)
        {
            return Err(DatError::FrameGroupUnsupported {
                kind,
                category: self.category,
            });
        }

        Ok(self.frame_groups.insert(kind, group))
    }

    pub fn frame_groups(&self) -> impl Iterator<Item = (FrameGroupKind, &FrameGroup)> {
        self.frame_groups.iter().map(|(kind, group)| (*kind, group))
    }

    /// Every non-empty sprite id referenced by any frame group, sorted and deduplicated.
    pub fn sprite_ids(&self) -> Vec<u32> {
        let mut ids = self
            .frame_groups
            .values()
            .flat_map(|group| group.sprite_ids().iter().copied())
            .filter(|id| *id != 0)
            .collect::<Vec<u32>>();

        ids.sort_unstable();
        ids.dedup();

        ids
    }
}
