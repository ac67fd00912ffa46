use byte_writer::ByteWriter;
use common::ClientFeatureSet;

use crate::{
    parser::{COLOR_KEY, COLOR_KEY_LENGTH},
    PixelBuffer,
};

/// Longest run a record header can describe.
pub const MAX_RUN: usize = u16::MAX as usize;

/// Run-length encodes a tile.
///
/// Pixels with alpha 0 are transparent and carry no color. Trailing transparent pixels are
/// not written, so an empty tile encodes to nothing.
pub fn encode(pixels: &PixelBuffer, features: ClientFeatureSet) -> Vec<u8> {
    let pixels = pixels.pixels().collect::<Vec<[u8; 4]>>();

    encode_pixels(&pixels, features)
}

/// Same as [`encode`] with the color key prefix some containers expect.
pub fn encode_with_color_key(pixels: &PixelBuffer, features: ClientFeatureSet) -> Vec<u8> {
    let payload = encode(pixels, features);
    let mut writer = ByteWriter::with_capacity(payload.len() + COLOR_KEY_LENGTH);

    writer.append_u8_slice(&COLOR_KEY);
    writer.append_u16(payload.len() as u16);
    writer.append_u8_slice(&payload);

    writer.into_bytes()
}

pub(crate) fn encode_pixels(pixels: &[[u8; 4]], features: ClientFeatureSet) -> Vec<u8> {
    let pixel_width = features.pixel_width();
    let mut writer = ByteWriter::new();
    let mut index = 0;

    while index < pixels.len() {
        let transparent = pixels[index..].iter().take_while(|p| p[3] == 0).count();
        index += transparent;

        if index >= pixels.len() {
            break;
        }

        let colored = pixels[index..].iter().take_while(|p| p[3] != 0).count();

        write_record(
            &mut writer,
            transparent,
            &pixels[index..index + colored],
            pixel_width,
        );

        index += colored;
    }

    writer.into_bytes()
}

/// Splits runs that do not fit into a `u16`. Extra transparent records carry no color, and
/// extra colored records have no transparent prefix.
fn write_record(
    writer: &mut ByteWriter,
    mut transparent: usize,
    colors: &[[u8; 4]],
    pixel_width: usize,
) {
    while transparent > MAX_RUN {
        writer.append_u16(MAX_RUN as u16);
        writer.append_u16(0);
        transparent -= MAX_RUN;
    }

    let mut chunks = colors.chunks(MAX_RUN);
    let first = chunks.next().unwrap_or(&[]);

    write_single_record(writer, transparent as u16, first, pixel_width);

    chunks.for_each(|chunk| write_single_record(writer, 0, chunk, pixel_width));
}

fn write_single_record(
    writer: &mut ByteWriter,
    transparent: u16,
    colors: &[[u8; 4]],
    pixel_width: usize,
) {
    writer.append_u16(transparent);
    writer.append_u16(colors.len() as u16);

    colors
        .iter()
        .for_each(|color| writer.append_u8_slice(&color[..pixel_width]));
}
