use common::ClientFeatureSet;
use log::warn;
use nom::{
    bytes::complete::tag, number::complete::le_u16, sequence::preceded, IResult as _IResult,
    Parser,
};

use crate::PixelBuffer;

pub type IResult<'a, T> = _IResult<&'a [u8], T>;

/// Magenta color key some containers put in front of each sprite, followed by the size.
pub const COLOR_KEY: [u8; 3] = [0xFF, 0x00, 0xFF];
pub const COLOR_KEY_LENGTH: usize = COLOR_KEY.len() + 2;

fn parse_color_key(i: &'_ [u8]) -> IResult<'_, u16> {
    preceded(tag(COLOR_KEY.as_slice()), le_u16).parse(i)
}

/// Drops the color key prefix when it is present and its size matches the payload.
fn skip_color_key(i: &[u8]) -> &[u8] {
    match parse_color_key(i) {
        Ok((rest, size)) if size as usize == rest.len() => rest,
        _ => i,
    }
}

/// `(transparent pixels, colored pixels)`
fn parse_record_header(i: &'_ [u8]) -> IResult<'_, (u16, u16)> {
    (le_u16, le_u16).parse(i)
}

/// Decodes one compressed sprite into a BGRA tile.
///
/// Malformed input never fails: a truncated record keeps every complete pixel read so far,
/// and pixels past the end of the tile are dropped.
pub fn decode(bytes: &[u8], features: ClientFeatureSet) -> PixelBuffer {
    let mut pixels = PixelBuffer::new();

    if bytes.is_empty() {
        return pixels;
    }

    let pixel_width = features.pixel_width();
    let mut i = skip_color_key(bytes);
    let mut index = 0usize;
    let mut dropped = 0usize;

    while !i.is_empty() {
        let Ok((rest, (transparent, colored))) = parse_record_header(i) else {
            warn!(
                "Sprite stream ends inside a record header ({} trailing bytes)",
                i.len()
            );
            break;
        };

        index += transparent as usize;

        let wanted = colored as usize * pixel_width;
        let (colors, rest) = rest.split_at(wanted.min(rest.len()));

        for color in colors.chunks_exact(pixel_width) {
            let alpha = if pixel_width == 4 { color[3] } else { 0xFF };

            if !pixels.set_pixel(index, [color[0], color[1], color[2], alpha]) {
                dropped += 1;
            }

            index += 1;
        }

        if colors.len() < wanted {
            warn!(
                "Sprite stream truncated: record declares {} pixels, {} complete",
                colored,
                colors.len() / pixel_width
            );
            break;
        }

        i = rest;
    }

    if dropped > 0 {
        warn!("Sprite stream overflows the tile, dropped {} pixels", dropped);
    }

    pixels
}
