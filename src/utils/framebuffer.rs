use common::SPRITE_SIZE;
use spr::PixelBuffer;

/// BGRA pixels, rows top to bottom, no padding between rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Fully transparent.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// 0x0, what asking for a frame group the object does not have gives you.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width * 4
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let offset = y * self.stride() + x * 4;

        self.pixels[offset..offset + 4].try_into().ok()
    }

    /// Exclusive write access. Nothing written through the lock outlives it.
    pub fn lock(&mut self) -> FramebufferLock<'_> {
        FramebufferLock {
            width: self.width,
            height: self.height,
            data: &mut self.pixels,
        }
    }
}

pub struct FramebufferLock<'a> {
    width: usize,
    height: usize,
    data: &'a mut [u8],
}

impl FramebufferLock<'_> {
    fn stride(&self) -> usize {
        self.width * 4
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Copies a 32x32 tile with its top left corner at pixel `(x, y)`, row by row.
    ///
    /// Pixels are overwritten, not blended. Whatever falls outside of the buffer is clipped.
    /// Returns the number of rows written.
    pub fn blit_tile(&mut self, x: usize, y: usize, tile: &PixelBuffer) -> usize {
        if x >= self.width || y >= self.height {
            return 0;
        }

        let columns = SPRITE_SIZE.min(self.width - x);
        let rows = SPRITE_SIZE.min(self.height - y);
        let stride = self.stride();

        (0..rows).for_each(|row| {
            let src = &tile.row(row)[..columns * 4];
            let offset = (y + row) * stride + x * 4;

            self.data[offset..offset + columns * 4].copy_from_slice(src);
        });

        rows
    }
}
