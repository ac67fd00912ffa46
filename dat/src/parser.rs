use common::ClientFeatureSet;
use nom::{
    combinator::map,
    multi::count,
    number::complete::{le_u16, le_u32},
    IResult as _IResult, Parser,
};

use crate::{error::DatError, FrameGroup, FrameGroupDimensions};

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

/// Sprite ids are `u16` on old clients and `u32` once extended ids are in.
pub fn parse_sprite_ids(
    i: &'_ [u8],
    sprite_count: usize,
    features: ClientFeatureSet,
) -> IResult<'_, Vec<u32>> {
    if features.uses_extended_ids {
        count(le_u32, sprite_count).parse(i)
    } else {
        count(map(le_u16, u32::from), sprite_count).parse(i)
    }
}

impl FrameGroup {
    /// Reads the id grid of a frame group whose dimensions are already known. Returns the
    /// group and the bytes left over.
    pub fn from_bytes(
        dimensions: FrameGroupDimensions,
        bytes: &[u8],
        features: ClientFeatureSet,
    ) -> Result<(Self, &[u8]), DatError> {
        let (rest, sprite_ids) = parse_sprite_ids(bytes, dimensions.sprite_count(), features)
            .map_err(|_| DatError::ParseSpriteIds)?;

        Ok((Self::from_sprite_ids(dimensions, sprite_ids)?, rest))
    }
}
