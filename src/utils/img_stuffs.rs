use std::path::Path;

use common::SPRITE_SIZE;
use eyre::eyre;
use image::{imageops, RgbaImage};
use spr::PixelBuffer;

use super::framebuffer::Bitmap;

impl Bitmap {
    pub fn to_rgba8(&self) -> eyre::Result<RgbaImage> {
        let buf = self
            .as_bytes()
            .chunks_exact(4)
            .flat_map(|p| [p[2], p[1], p[0], p[3]])
            .collect::<Vec<u8>>();

        RgbaImage::from_raw(self.width() as u32, self.height() as u32, buf)
            .ok_or(eyre!("Cannot convert bitmap to Rgba"))
    }
}

/// Cuts the 32x32 tile whose top left corner is at pixel `(x, y)`.
pub fn crop_tile(img: &RgbaImage, x: u32, y: u32) -> eyre::Result<PixelBuffer> {
    let size = SPRITE_SIZE as u32;
    let (width, height) = img.dimensions();

    if x + size > width || y + size > height {
        return Err(eyre!(
            "Tile at ({x}, {y}) is outside of a {width}x{height} image"
        ));
    }

    let tile = imageops::crop_imm(img, x, y, size, size).to_image();

    Ok(PixelBuffer::from_rgba8(&tile)?)
}

pub fn open_rgba8(path: impl AsRef<Path>) -> eyre::Result<RgbaImage> {
    let path = path.as_ref();

    let img = image::open(path)
        .map_err(|err| eyre!("Cannot open image {}: {err}", path.display()))?
        .into_rgba8();

    Ok(img)
}
