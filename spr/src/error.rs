#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SprError {
    #[error("Sprite id 0 is reserved for the empty sprite")]
    ReservedId,
    #[error("Sprite id {id} exceeds the maximum of {max}")]
    IdOutOfRange { id: u32, max: u32 },
    #[error("No sprite id left. Maximum is {max}")]
    StoreFull { max: u32 },
    #[error("Unknown sprite id: {id}")]
    UnknownSprite { id: u32 },
    #[error("Pixel buffer must be {expect} bytes. Have ({have})")]
    BufferSize { expect: usize, have: usize },
    #[error("Sprite image must be 32x32. Have ({width}x{height})")]
    ImageSize { width: u32, height: u32 },
}
