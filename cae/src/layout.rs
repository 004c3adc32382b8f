// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement of single-byte text, one quad per glyph.
//!
//! Layout is a plain cursor walk over the bytes of the text. The cursor starts one
//! line down so the first baseline sits inside the viewport:
//!
//! - a space advances the cursor by the space width,
//! - a tab advances it by `tab_size` space widths,
//! - a newline returns it to the left edge and moves it down one line,
//! - any other byte places the glyph for that byte and advances by its advance.
//!
//! A line is `line_height * 1.2` pixels, truncated. There is no shaping, kerning or
//! wrapping.

use cae_atlas::Metrics;
use cae_gl::glam::{Mat4, Vec3};
use cae_gl::{Device, DrawInfo, Program, ScalarUniform, TransformUniform, Uniform};
use log::trace;
use thiserror::Error;

/// Name of the per-glyph transform uniform.
pub const TRANSFORM_UNIFORM: &str = "transform";
/// Name of the per-glyph character code uniform.
pub const CHAR_CODE_UNIFORM: &str = "char_code";

/// Errors from laying out text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The text contains a byte the metrics table has no entry for.
    #[error("no glyph metrics for character code {code} (table has {table_len} entries)")]
    InvalidGlyphIndex {
        /// The offending byte.
        code: u8,
        /// Length of the metrics table.
        table_len: usize,
    },
}

/// The font-level values layout depends on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayoutParams {
    /// Advance of a space in pixels.
    pub space_width: i32,
    /// Width of a tab in spaces.
    pub tab_size: u32,
    /// Nominal line height in pixels.
    pub line_height: u32,
}

impl LayoutParams {
    /// Vertical distance between baselines: `line_height * 1.2`, truncated.
    pub fn line_advance(&self) -> i32 {
        let advance = u64::from(self.line_height) * 6 / 5;
        i32::try_from(advance).unwrap_or(i32::MAX)
    }

    fn tab_advance(&self) -> i32 {
        let tab_size = i32::try_from(self.tab_size).unwrap_or(i32::MAX);
        self.space_width.saturating_mul(tab_size)
    }
}

/// A glyph quad in pixel coordinates, y pointing down.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlacedGlyph {
    /// The character code.
    pub code: u8,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width of the glyph bitmap.
    pub width: i32,
    /// Height of the glyph bitmap.
    pub height: i32,
}

impl PlacedGlyph {
    /// Maps the unit quad onto this glyph's rectangle.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.x as f32, self.y as f32, 0.0))
            * Mat4::from_scale(Vec3::new(self.width as f32, self.height as f32, 1.0))
    }
}

/// An iterator over the glyphs of a text, in order.
///
/// Yields an error for the first byte without metrics and stops there.
#[derive(Clone, Debug)]
pub struct GlyphLayout<'a> {
    text: &'a [u8],
    metrics: &'a [Metrics],
    params: LayoutParams,
    cursor_x: i32,
    cursor_y: i32,
    failed: bool,
}

impl<'a> GlyphLayout<'a> {
    /// Starts laying out `text` with a fresh cursor.
    pub fn new(text: &'a [u8], metrics: &'a [Metrics], params: LayoutParams) -> Self {
        Self {
            text,
            metrics,
            params,
            cursor_x: 0,
            cursor_y: params.line_advance(),
            failed: false,
        }
    }

    /// The current cursor position.
    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor_x, self.cursor_y)
    }
}

impl Iterator for GlyphLayout<'_> {
    type Item = Result<PlacedGlyph, LayoutError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some((&code, rest)) = self.text.split_first() {
            self.text = rest;
            match code {
                b' ' => self.cursor_x = self.cursor_x.saturating_add(self.params.space_width),
                b'\t' => self.cursor_x = self.cursor_x.saturating_add(self.params.tab_advance()),
                b'\n' => {
                    self.cursor_x = 0;
                    self.cursor_y = self.cursor_y.saturating_add(self.params.line_advance());
                }
                _ => {
                    let Some(metrics) = self.metrics.get(usize::from(code)) else {
                        self.failed = true;
                        return Some(Err(LayoutError::InvalidGlyphIndex {
                            code,
                            table_len: self.metrics.len(),
                        }));
                    };
                    let glyph = PlacedGlyph {
                        code,
                        x: self.cursor_x.saturating_add(metrics.offset_x),
                        y: self.cursor_y.saturating_sub(metrics.offset_y),
                        width: metrics.width,
                        height: metrics.height,
                    };
                    self.cursor_x = self.cursor_x.saturating_add(metrics.advance);
                    return Some(Ok(glyph));
                }
            }
        }
        None
    }
}

/// Draws `text` with one indexed draw of `glyph_quad` per glyph.
///
/// Before each draw, `shared` is applied, then the glyph's `transform` and
/// `char_code` uniforms. The whole text is laid out first, so a byte without
/// metrics fails the call before anything is drawn.
///
/// Returns the number of draws issued.
pub fn draw_text<D, U>(
    text: &[u8],
    params: LayoutParams,
    metrics: &[Metrics],
    program: &Program<D>,
    glyph_quad: &DrawInfo<D>,
    shared: &U,
) -> Result<usize, LayoutError>
where
    D: Device,
    U: Uniform<D> + ?Sized,
{
    let glyphs = GlyphLayout::new(text, metrics, params).collect::<Result<Vec<_>, _>>()?;
    for glyph in &glyphs {
        trace!("glyph {} at ({}, {})", glyph.code, glyph.x, glyph.y);
        let per_glyph = (
            shared,
            TransformUniform::new(TRANSFORM_UNIFORM, glyph.transform()),
            ScalarUniform::new(CHAR_CODE_UNIFORM, u32::from(glyph.code)),
        );
        glyph_quad.draw_with_uniforms(program, &per_glyph);
    }
    Ok(glyphs.len())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use cae_atlas::CHAR_COUNT;
    use cae_gl::glam::Vec4;
    use cae_gl::{HeadlessDevice, PositionVertex, ProgramId, UniformValue};

    use super::*;

    const PARAMS: LayoutParams = LayoutParams {
        space_width: 10,
        tab_size: 2,
        line_height: 18,
    };

    fn metrics() -> Vec<Metrics> {
        let mut table = vec![Metrics::default(); CHAR_COUNT];
        table[usize::from(b'A')] = Metrics {
            width: 8,
            height: 12,
            offset_x: 1,
            offset_y: 12,
            advance: 9,
        };
        table[usize::from(b'B')] = Metrics {
            width: 7,
            height: 12,
            offset_x: 2,
            offset_y: 11,
            advance: 9,
        };
        table
    }

    fn layout(text: &str) -> Vec<PlacedGlyph> {
        let table = metrics();
        GlyphLayout::new(text.as_bytes(), &table, PARAMS)
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn line_advance_truncates() {
        assert_eq!(PARAMS.line_advance(), 21);
        let params = LayoutParams {
            line_height: 16,
            ..PARAMS
        };
        assert_eq!(params.line_advance(), 19);
    }

    #[test]
    fn single_glyph() {
        let glyphs = layout("A");
        assert_eq!(
            glyphs,
            [PlacedGlyph {
                code: b'A',
                x: 1,
                y: 21 - 12,
                width: 8,
                height: 12,
            }]
        );
    }

    #[test]
    fn tab_advances_by_tab_size_spaces() {
        let glyphs = layout("A\tB");
        assert_eq!(glyphs.len(), 2);
        // 'A' advances 9, the tab 20, then 'B' is offset by 2.
        assert_eq!(glyphs[1].x, 9 + 20 + 2);
        assert_eq!(glyphs[1].y, 21 - 11);
    }

    #[test]
    fn space_advances_without_placing() {
        let glyphs = layout("A B");
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[1].x, 9 + 10 + 2);
    }

    #[test]
    fn newline_resets_x_and_moves_down() {
        let glyphs = layout("A\nB");
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].y + 12, 21);
        assert_eq!(glyphs[1].x, 2);
        assert_eq!(glyphs[1].y + 11, 42);
    }

    #[test]
    fn whitespace_only_places_nothing() {
        let table = metrics();
        let mut layout = GlyphLayout::new(b" \t\n ", &table, PARAMS);
        assert_eq!(layout.next(), None);
        assert_eq!(layout.cursor(), (10, 42));
    }

    #[test]
    fn short_table_is_an_error() {
        let table = metrics()[..usize::from(b'B')].to_vec();
        let mut layout = GlyphLayout::new(b"AB", &table, PARAMS);
        assert!(matches!(layout.next(), Some(Ok(_))));
        assert_eq!(
            layout.next(),
            Some(Err(LayoutError::InvalidGlyphIndex {
                code: b'B',
                table_len: usize::from(b'B'),
            }))
        );
        assert_eq!(layout.next(), None);
    }

    #[test]
    fn transform_maps_unit_quad_to_glyph_rect() {
        let glyph = PlacedGlyph {
            code: b'A',
            x: 5,
            y: 7,
            width: 8,
            height: 12,
        };
        let corner = glyph.transform() * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert_eq!(corner, Vec4::new(13.0, 19.0, 0.0, 1.0));
    }

    fn glyph_quad(
        device: &Rc<HeadlessDevice>,
    ) -> (Program<HeadlessDevice>, DrawInfo<HeadlessDevice>) {
        let program = Program::from_raw(device.clone(), ProgramId(1));
        let quad = DrawInfo::make(
            device.clone(),
            &[PositionVertex::default(); 4],
            &[0, 1, 2, 2, 3, 0],
        );
        (program, quad)
    }

    #[test]
    fn draw_text_issues_one_draw_per_glyph() {
        let device = Rc::new(HeadlessDevice::new());
        let (program, quad) = glyph_quad(&device);
        let table = metrics();
        let shared = ScalarUniform::new("fg_color", [1.0_f32; 4]);

        let count = draw_text(b"A B\nA", PARAMS, &table, &program, &quad, &shared).unwrap();
        assert_eq!(count, 3);

        let draws = device.draws();
        assert_eq!(draws.len(), 3);
        let codes = draws
            .iter()
            .map(|draw| draw.uniform(CHAR_CODE_UNIFORM))
            .collect::<Vec<_>>();
        assert_eq!(
            codes,
            [65, 66, 65].map(|code| Some(UniformValue::UInt(code)))
        );
        let expected = PlacedGlyph {
            code: b'A',
            x: 1,
            y: 42 - 12,
            width: 8,
            height: 12,
        };
        assert_eq!(
            draws[2].uniform(TRANSFORM_UNIFORM),
            Some(UniformValue::Mat4(expected.transform()))
        );
        assert!(draws
            .iter()
            .all(|draw| draw.uniform("fg_color") == Some(UniformValue::Vec4([1.0; 4]))));
    }

    #[test]
    fn draw_text_draws_nothing_on_error() {
        let device = Rc::new(HeadlessDevice::new());
        let (program, quad) = glyph_quad(&device);
        let table = metrics()[..usize::from(b'B')].to_vec();

        let result = draw_text(b"AAB", PARAMS, &table, &program, &quad, &());
        assert!(matches!(
            result,
            Err(LayoutError::InvalidGlyphIndex { code: b'B', .. })
        ));
        assert_eq!(device.draw_count(), 0);
    }
}
