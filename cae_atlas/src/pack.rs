// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shelf packing of glyph bitmaps into a single atlas.
//!
//! Glyphs are placed left to right in character-code order, starting a new shelf
//! whenever the next glyph would overflow the atlas width. Every glyph keeps
//! [`GLYPH_PADDING`] pixels of empty space on each side, so sampling with linear
//! filtering never bleeds a neighbour into view.

use crate::{CHAR_COUNT, CharMapData, GlyphBitmap, Metadata, Metrics, UvLocation};

/// Padding in pixels added to each side of a glyph to prevent texture bleeding.
pub const GLYPH_PADDING: u32 = 1;

/// Packs `glyphs` (indexed by character code) into one atlas.
///
/// Tables in the result always cover at least [`CHAR_COUNT`] codes; codes past the
/// end of `glyphs` get empty entries.
pub fn pack_glyphs(glyphs: &[GlyphBitmap], space_width: i32) -> CharMapData {
    let width = atlas_width(glyphs);

    // First pass: assign positions so the final height is known before normalizing.
    let mut positions = Vec::with_capacity(glyphs.len());
    let (mut x, mut y, mut shelf_height) = (0_u32, 0_u32, 0_u32);
    for glyph in glyphs {
        if glyph.is_empty() {
            positions.push((x, y));
            continue;
        }
        let (padded_w, padded_h) = padded_size(glyph);
        if x + padded_w > width && x > 0 {
            y += shelf_height;
            x = 0;
            shelf_height = 0;
        }
        positions.push((x + GLYPH_PADDING, y + GLYPH_PADDING));
        x += padded_w;
        shelf_height = shelf_height.max(padded_h);
    }
    let height = (y + shelf_height).max(1);

    let mut pixels = vec![0_u8; width as usize * height as usize];
    let table_len = glyphs.len().max(CHAR_COUNT);
    let mut char_to_uv_locations = Vec::with_capacity(table_len);
    let mut char_to_metrics = Vec::with_capacity(table_len);
    for (glyph, &(gx, gy)) in glyphs.iter().zip(&positions) {
        if !glyph.is_empty() {
            blit(&mut pixels, width, glyph, gx, gy);
        }
        char_to_uv_locations.push(UvLocation {
            u: gx as f32 / width as f32,
            v: gy as f32 / height as f32,
        });
        char_to_metrics.push(glyph.metrics());
    }
    char_to_uv_locations.resize(table_len, UvLocation::default());
    char_to_metrics.resize(table_len, Metrics::default());

    CharMapData {
        metadata: Metadata {
            image_width: width as i32,
            image_height: height as i32,
            space_width,
        },
        pixels,
        char_to_uv_locations,
        char_to_metrics,
    }
}

fn padded_size(glyph: &GlyphBitmap) -> (u32, u32) {
    (
        glyph.width + GLYPH_PADDING * 2,
        glyph.height + GLYPH_PADDING * 2,
    )
}

/// Smallest power of two that fits the widest glyph and a roughly square layout.
fn atlas_width(glyphs: &[GlyphBitmap]) -> u32 {
    let mut widest = 1_u32;
    let mut area = 0_u64;
    for glyph in glyphs.iter().filter(|glyph| !glyph.is_empty()) {
        let (w, h) = padded_size(glyph);
        widest = widest.max(w);
        area += u64::from(w) * u64::from(h);
    }
    let mut side = area.isqrt();
    if side * side < area {
        side += 1;
    }
    let side = u32::try_from(side).unwrap_or(u32::MAX);
    widest.max(side).next_power_of_two()
}

fn blit(atlas: &mut [u8], atlas_width: u32, glyph: &GlyphBitmap, x: u32, y: u32) {
    let row_len = glyph.width as usize;
    for (row, src) in glyph.pixels.chunks_exact(row_len).enumerate() {
        let start = (y as usize + row) * atlas_width as usize + x as usize;
        atlas[start..start + row_len].copy_from_slice(src);
    }
}

/// Synthetic glyphs for tests: a filled `w`x`h` box per printable code.
#[cfg(test)]
pub(crate) fn synthetic_glyphs() -> Vec<GlyphBitmap> {
    (0..CHAR_COUNT)
        .map(|code| {
            let ch = char::from(u8::try_from(code).unwrap());
            if ch.is_control() || ch == ' ' {
                return GlyphBitmap::placeholder(if ch == ' ' { 5 } else { 0 });
            }
            let width = 3 + (code % 5) as u32;
            let height = 6 + (code % 7) as u32;
            let fill = u8::try_from(code).unwrap();
            GlyphBitmap {
                width,
                height,
                offset_x: (code % 2) as i32,
                offset_y: height as i32 - 2,
                advance: width as i32 + 1,
                pixels: vec![fill; (width * height) as usize],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Rect {
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
    }

    fn pixel_rect(data: &CharMapData, code: usize) -> Rect {
        let uv = data.char_to_uv_locations[code];
        let metrics = data.char_to_metrics[code];
        let x0 = (uv.u * data.metadata.image_width as f32).round() as i64;
        let y0 = (uv.v * data.metadata.image_height as f32).round() as i64;
        Rect {
            x0,
            y0,
            x1: x0 + i64::from(metrics.width),
            y1: y0 + i64::from(metrics.height),
        }
    }

    #[test]
    fn tables_cover_every_code() {
        let data = pack_glyphs(&synthetic_glyphs(), 5);
        assert_eq!(data.char_to_metrics.len(), CHAR_COUNT);
        assert_eq!(data.char_to_uv_locations.len(), CHAR_COUNT);
        assert_eq!(data.validate(), Ok(()));
        assert_eq!(data.metadata.space_width, 5);
    }

    #[test]
    fn short_input_is_padded_to_full_tables() {
        let glyphs = synthetic_glyphs();
        let data = pack_glyphs(&glyphs[..100], 5);
        assert_eq!(data.char_to_metrics.len(), CHAR_COUNT);
        assert_eq!(data.char_to_metrics[200], Metrics::default());
        assert_eq!(data.validate(), Ok(()));
    }

    #[test]
    fn glyphs_do_not_overlap() {
        let data = pack_glyphs(&synthetic_glyphs(), 5);
        let pad = i64::from(GLYPH_PADDING);
        let rects: Vec<_> = (0..CHAR_COUNT)
            .filter(|&code| !data.char_to_metrics[code].is_empty())
            .map(|code| pixel_rect(&data, code))
            .collect();
        for (i, a) in rects.iter().enumerate() {
            assert!(a.x0 >= pad && a.y0 >= pad, "glyph {i} starts inside padding");
            assert!(
                a.x1 + pad <= i64::from(data.metadata.image_width)
                    && a.y1 + pad <= i64::from(data.metadata.image_height),
                "glyph {i} exceeds the atlas"
            );
            for b in &rects[i + 1..] {
                let separated = a.x1 + pad <= b.x0 - pad
                    || b.x1 + pad <= a.x0 - pad
                    || a.y1 + pad <= b.y0 - pad
                    || b.y1 + pad <= a.y0 - pad;
                assert!(separated, "padded glyph rects overlap");
            }
        }
    }

    #[test]
    fn placement_is_row_major_by_code() {
        let data = pack_glyphs(&synthetic_glyphs(), 5);
        let mut previous: Option<Rect> = None;
        for code in 0..CHAR_COUNT {
            if data.char_to_metrics[code].is_empty() {
                continue;
            }
            let rect = pixel_rect(&data, code);
            if let Some(prev) = previous {
                assert!(
                    rect.y0 > prev.y0 || (rect.y0 == prev.y0 && rect.x0 > prev.x0),
                    "code {code} is placed before its predecessor"
                );
            }
            previous = Some(rect);
        }
    }

    #[test]
    fn pixels_are_copied_into_place() {
        let glyphs = synthetic_glyphs();
        let data = pack_glyphs(&glyphs, 5);
        let width = data.metadata.image_width as usize;
        for code in [b'A', b'g', 0xE9] {
            let rect = pixel_rect(&data, usize::from(code));
            for y in rect.y0..rect.y1 {
                for x in rect.x0..rect.x1 {
                    assert_eq!(data.pixels[y as usize * width + x as usize], code);
                }
            }
            // The padding column to the left stays empty.
            assert_eq!(data.pixels[rect.y0 as usize * width + rect.x0 as usize - 1], 0);
        }
    }

    #[test]
    fn atlas_width_is_power_of_two() {
        let data = pack_glyphs(&synthetic_glyphs(), 5);
        let width = data.metadata.image_width as u32;
        assert!(width.is_power_of_two());
    }

    #[test]
    fn empty_input_yields_minimal_atlas() {
        let data = pack_glyphs(&[], 0);
        assert_eq!(data.metadata.image_width, 1);
        assert_eq!(data.metadata.image_height, 1);
        assert_eq!(data.pixels, vec![0]);
        assert_eq!(data.validate(), Ok(()));
    }
}
