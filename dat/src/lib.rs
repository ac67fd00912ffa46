//! Object metadata of the dat file: things, their frame groups, and the addressing of the
//! sprite id grid inside a frame group.
pub mod error;
mod frame_group;
mod parser;
mod thing_list;
mod types;
mod writer;

pub use frame_group::FrameGroup;
pub use parser::parse_sprite_ids;
pub use thing_list::ThingList;
pub use types::*;
