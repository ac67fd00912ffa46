//! Things shared by every crate in the workspace: client version handling, the feature
//! policy derived from it, and the tile geometry of the sprite format.
mod features;
mod version;

pub use features::ClientFeatureSet;
pub use version::{ClientVersion, VersionError, KNOWN_VERSIONS};

/// Width and height of one sprite tile in pixels.
pub const SPRITE_SIZE: usize = 32;
pub const SPRITE_PIXEL_COUNT: usize = SPRITE_SIZE * SPRITE_SIZE;
/// Decoded tiles are always BGRA.
pub const SPRITE_BYTE_COUNT: usize = SPRITE_PIXEL_COUNT * 4;
