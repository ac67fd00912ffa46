//! Editing core for legacy client assets: sprite compositing, per slot editing and sprite
//! sheet import on top of the `spr` and `dat` formats.
pub mod config;
pub mod modules;
pub mod utils;
