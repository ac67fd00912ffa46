use common::SPRITE_SIZE;
use image::RgbaImage;

use crate::{error::SprError, PixelBuffer};

impl PixelBuffer {
    /// Swaps the stored BGRA into RGBA.
    pub fn to_rgba8(&self) -> RgbaImage {
        let buf = self
            .pixels()
            .flat_map(|[b, g, r, a]| [r, g, b, a])
            .collect::<Vec<u8>>();

        RgbaImage::from_raw(SPRITE_SIZE as u32, SPRITE_SIZE as u32, buf)
            .unwrap_or_else(|| RgbaImage::new(SPRITE_SIZE as u32, SPRITE_SIZE as u32))
    }

    pub fn from_rgba8(img: &RgbaImage) -> Result<Self, SprError> {
        let (width, height) = img.dimensions();

        if width as usize != SPRITE_SIZE || height as usize != SPRITE_SIZE {
            return Err(SprError::ImageSize { width, height });
        }

        let buf = img
            .pixels()
            .flat_map(|p| {
                let [r, g, b, a] = p.0;

                // transparent pixels carry no color once encoded
                if a == 0 {
                    [0, 0, 0, 0]
                } else {
                    [b, g, r, a]
                }
            })
            .collect::<Vec<u8>>();

        Self::from_bytes(buf)
    }
}
