use crate::{FrameGroupDimensions, FrameGroupKind, SpriteCoord, ThingCategory};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DatError {
    #[error("Sprite coordinate {coord} is outside of {dimensions}")]
    IndexOutOfRange {
        coord: SpriteCoord,
        dimensions: FrameGroupDimensions,
    },
    #[error("Visual tile ({x}, {y}) is outside of {dimensions}")]
    TileOutOfRange {
        x: usize,
        y: usize,
        dimensions: FrameGroupDimensions,
    },
    #[error("Object has no {kind} frame group")]
    MissingFrameGroup { kind: FrameGroupKind },
    #[error("{kind} frame group is not supported for {category} with this client")]
    FrameGroupUnsupported {
        kind: FrameGroupKind,
        category: ThingCategory,
    },
    #[error("Mismatched sprite count. Expect ({expect}). Have ({have})")]
    SpriteCountMismatch { expect: usize, have: usize },
    #[error("Sprite id {id} does not fit, maximum is {max}")]
    SpriteIdOverflow { id: u32, max: u32 },
    #[error("Failed to parse sprite ids")]
    ParseSpriteIds,
    #[error("No {category} id left after {}", u32::MAX)]
    ThingIdsExhausted { category: ThingCategory },
    #[error("Unknown {category} id: {id}")]
    UnknownThing { category: ThingCategory, id: u32 },
    #[error("Unknown category index: {index}")]
    UnknownCategory { index: u8 },
}
