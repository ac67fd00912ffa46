//! Little-endian byte sink shared by the sprite and dat encoders.

#[derive(Default)]
pub struct ByteWriter {
    pub data: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Sprite records rarely exceed a few kilobytes, so callers usually know a good bound.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn append_u16(&mut self, i: u16) {
        self.data.extend(i.to_le_bytes());
    }

    pub fn append_u32(&mut self, i: u32) {
        self.data.extend(i.to_le_bytes());
    }

    pub fn append_u8_slice(&mut self, i: &[u8]) {
        self.data.extend_from_slice(i);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn appends_in_order() {
        let mut writer = ByteWriter::new();

        writer.append_u16(3);
        writer.append_u8_slice(&[1, 2, 3]);

        assert_eq!(writer.into_bytes(), vec![3, 0, 1, 2, 3]);
    }

    #[test]
    fn little_endian() {
        let mut writer = ByteWriter::with_capacity(6);

        writer.append_u16(0x0102);
        writer.append_u32(0x0A0B0C0D);

        assert_eq!(writer.data, vec![0x02, 0x01, 0x0D, 0x0C, 0x0B, 0x0A]);
    }
}
