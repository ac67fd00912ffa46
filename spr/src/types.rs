use common::{SPRITE_BYTE_COUNT, SPRITE_PIXEL_COUNT, SPRITE_SIZE};

use crate::error::SprError;

/// One decoded 32x32 tile, BGRA, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer(Vec<u8>);

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let opaque = self.0.chunks_exact(4).filter(|p| p[3] != 0).count();

        f.debug_struct("PixelBuffer")
            .field("visible_pixels", &opaque)
            .finish()
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelBuffer {
    /// Fully transparent tile.
    pub fn new() -> Self {
        Self(vec![0u8; SPRITE_BYTE_COUNT])
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, SprError> {
        let bytes = bytes.into();

        if bytes.len() != SPRITE_BYTE_COUNT {
            return Err(SprError::BufferSize {
                expect: SPRITE_BYTE_COUNT,
                have: bytes.len(),
            });
        }

        Ok(Self(bytes))
    }

    /// Every pixel set to the same BGRA color.
    pub fn filled(bgra: [u8; 4]) -> Self {
        Self(bgra.repeat(SPRITE_PIXEL_COUNT))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// `None` past the last pixel.
    pub fn pixel(&self, index: usize) -> Option<[u8; 4]> {
        self.0
            .get(index * 4..index * 4 + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Writes past the last pixel are dropped. Returns whether the pixel was written.
    pub fn set_pixel(&mut self, index: usize, bgra: [u8; 4]) -> bool {
        match self.0.get_mut(index * 4..index * 4 + 4) {
            Some(dst) => {
                dst.copy_from_slice(&bgra);
                true
            }
            None => false,
        }
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= SPRITE_SIZE || y >= SPRITE_SIZE {
            return None;
        }

        self.pixel(y * SPRITE_SIZE + x)
    }

    /// One row of 32 pixels, 128 bytes.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = SPRITE_SIZE * 4;

        &self.0[y * stride..(y + 1) * stride]
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.0.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    pub fn is_transparent(&self) -> bool {
        self.0.chunks_exact(4).all(|p| p[3] == 0)
    }
}
