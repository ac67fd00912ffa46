//! Sprite codec and sprite store.
//!
//! A sprite is a 32x32 tile stored as a list of records:
//!
//! ```text
//! transparent: u16 LE
//! colored:     u16 LE
//! colors:      colored * (B G R) or colored * (B G R A)
//! ```
//!
//! Whether pixels carry alpha depends on the client version, see [`common::ClientFeatureSet`].
pub mod error;
mod parser;
mod store;
mod types;
mod utils;
mod writer;

pub use parser::{decode, COLOR_KEY, COLOR_KEY_LENGTH};
pub use store::SpriteStore;
pub use types::*;
pub use writer::{encode, encode_with_color_key, MAX_RUN};
