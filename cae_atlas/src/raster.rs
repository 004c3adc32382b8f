// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterization of single-byte character codes with Swash.

use log::{info, warn};
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Scaler, Source};
use swash::zeno::Format;
use swash::{FontRef, GlyphId};

use crate::{AtlasError, CHAR_COUNT, CharMapData, FontSource, Metrics, pack_glyphs};

/// The coverage bitmap and placement of one rendered character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Horizontal bearing from the pen position to the left edge.
    pub offset_x: i32,
    /// Vertical bearing from the baseline up to the top edge.
    pub offset_y: i32,
    /// Horizontal pen movement.
    pub advance: i32,
    /// Single-channel coverage, `width * height` bytes, row-major.
    pub pixels: Vec<u8>,
}

impl GlyphBitmap {
    /// A glyph with no pixels that still advances the pen.
    pub fn placeholder(advance: i32) -> Self {
        Self {
            advance,
            ..Self::default()
        }
    }

    /// Returns `true` if the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The metrics record for this glyph.
    pub fn metrics(&self) -> Metrics {
        Metrics {
            width: self.width as i32,
            height: self.height as i32,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            advance: self.advance,
        }
    }
}

/// Renders every byte-valued character of a font into a packed atlas.
///
/// Byte values are interpreted as Latin-1 code points. The rasterizer owns a Swash
/// [`ScaleContext`], so keeping one around amortizes its scratch allocations.
pub struct FontRasterizer {
    context: ScaleContext,
}

impl FontRasterizer {
    /// Creates a new rasterizer.
    pub fn new() -> Self {
        Self {
            context: ScaleContext::new(),
        }
    }

    /// Rasterizes character codes `0..=255` of `font` at `px_size` pixels per em.
    ///
    /// Control characters get empty entries. A character that fails to render is
    /// logged and replaced by an empty glyph that keeps its advance.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "advances are rounded pixel values far inside the i32 range"
    )]
    pub fn rasterize(
        &mut self,
        font: &FontSource,
        px_size: u32,
    ) -> Result<CharMapData, AtlasError> {
        let font_ref = FontRef::from_index(font.data(), font.index() as usize).ok_or_else(|| {
            AtlasError::FontUnavailable {
                candidates: vec![font.identity()],
            }
        })?;
        let size = px_size as f32;
        let charmap = font_ref.charmap();
        let glyph_metrics = font_ref.glyph_metrics(&[]).scale(size);
        let mut scaler = self.context.builder(font_ref).size(size).hint(true).build();

        let mut glyphs = Vec::with_capacity(CHAR_COUNT);
        for code in 0..=u8::MAX {
            let ch = char::from(code);
            if ch.is_control() {
                glyphs.push(GlyphBitmap::default());
                continue;
            }
            let glyph_id = charmap.map(ch);
            let advance = glyph_metrics.advance_width(glyph_id).round() as i32;
            let glyph = render_glyph(&mut scaler, code, glyph_id, advance).unwrap_or_else(|err| {
                warn!("{err}; substituting an empty glyph");
                GlyphBitmap::placeholder(advance)
            });
            glyphs.push(glyph);
        }

        let space_width = glyphs[usize::from(b' ')].advance;
        let data = pack_glyphs(&glyphs, space_width);
        info!(
            "rasterized {} at {px_size}px into a {}x{} atlas",
            font.identity(),
            data.metadata.image_width,
            data.metadata.image_height
        );
        Ok(data)
    }
}

impl Default for FontRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontRasterizer").finish_non_exhaustive()
    }
}

fn render_glyph(
    scaler: &mut Scaler<'_>,
    code: u8,
    glyph_id: GlyphId,
    advance: i32,
) -> Result<GlyphBitmap, AtlasError> {
    let image = Render::new(&[Source::Outline])
        .format(Format::Alpha)
        .render(scaler, glyph_id)
        .ok_or(AtlasError::GlyphRaster { code })?;
    let placement = image.placement;
    let expected = placement.width as usize * placement.height as usize;
    if !matches!(image.content, Content::Mask) || image.data.len() != expected {
        return Err(AtlasError::GlyphRaster { code });
    }
    Ok(GlyphBitmap {
        width: placement.width,
        height: placement.height,
        offset_x: placement.left,
        offset_y: placement.top,
        advance,
        pixels: image.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AtlasCache, CacheKey, resolve_font};

    #[test]
    fn garbage_font_data_is_unavailable() {
        let font = FontSource::from_bytes("Garbage", 0, b"not a font".to_vec());
        let mut rasterizer = FontRasterizer::new();
        assert!(matches!(
            rasterizer.rasterize(&font, 16),
            Err(AtlasError::FontUnavailable { .. })
        ));
    }

    #[test]
    fn placeholder_keeps_advance() {
        let glyph = GlyphBitmap::placeholder(7);
        assert!(glyph.is_empty());
        assert_eq!(
            glyph.metrics(),
            Metrics {
                advance: 7,
                ..Metrics::default()
            }
        );
    }

    #[test]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "atlas coordinates are small whole pixel values"
    )]
    fn rasterizes_a_system_monospace_face() {
        let Ok(font) = resolve_font(&["monospace", "DejaVu Sans Mono"]) else {
            return;
        };
        let data = FontRasterizer::new().rasterize(&font, 16).unwrap();
        data.validate().unwrap();

        assert!(data.metadata.space_width > 0);
        assert_eq!(
            data.metadata.space_width,
            data.char_to_metrics[usize::from(b' ')].advance
        );
        for code in (0x00..=0x1F).chain(0x7F..=0x9F) {
            assert_eq!(
                data.char_to_metrics[code],
                Metrics::default(),
                "control code {code:#04x} has an entry"
            );
        }

        let glyph = data.char_to_metrics[usize::from(b'A')];
        assert!(glyph.width > 0 && glyph.height > 0, "`A` rendered empty");
        let uv = data.char_to_uv_locations[usize::from(b'A')];
        let atlas_width = data.metadata.image_width as usize;
        let x0 = (uv.u * data.metadata.image_width as f32).round() as usize;
        let y0 = (uv.v * data.metadata.image_height as f32).round() as usize;
        let covered = (y0..y0 + glyph.height as usize).any(|y| {
            let row = y * atlas_width + x0;
            data.pixels[row..row + glyph.width as usize]
                .iter()
                .any(|&coverage| coverage > 0)
        });
        assert!(covered, "no coverage under the `A` rectangle");

        let dir = tempfile::tempdir().unwrap();
        let cache = AtlasCache::new(dir.path());
        let key = CacheKey::for_font(&font, 16);
        cache.store(&key, &data).unwrap();
        assert_eq!(cache.load(&key).unwrap(), Some(data));
    }
}
