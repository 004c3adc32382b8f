// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use cae_atlas::CharMapData;
use cae_gl::{Device, GlobalDrawing, Program};
use log::debug;

use crate::{Config, GlyphResources, LayoutError, LayoutParams, draw_text};

/// The viewport changed size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResizeEvent {
    /// New width in pixels.
    pub width: u32,
    /// New height in pixels.
    pub height: u32,
}

/// Events gathered by the host since the previous frame.
///
/// The first frame must carry a resize with the initial viewport size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// The latest viewport size, if it changed.
    pub resize: Option<ResizeEvent>,
}

/// Renders text frames with one glyph program and one atlas.
#[derive(Debug)]
pub struct TextRenderer<D: Device> {
    device: Rc<D>,
    program: Program<D>,
    glyphs: GlyphResources<D>,
    global: GlobalDrawing,
    params: LayoutParams,
    foreground: [f32; 4],
    background: [f32; 4],
}

impl<D: Device> TextRenderer<D> {
    /// Uploads `atlas` and prepares to draw with `program`.
    pub fn new(device: Rc<D>, program: Program<D>, atlas: &CharMapData, config: &Config) -> Self {
        let glyphs = GlyphResources::new(device.clone(), atlas);
        let params = LayoutParams {
            space_width: glyphs.space_width(),
            tab_size: config.tab_size,
            line_height: config.font_size,
        };
        Self {
            device,
            program,
            glyphs,
            global: GlobalDrawing::new(1, 1),
            params,
            foreground: config.foreground.to_rgba(),
            background: config.background.to_rgba(),
        }
    }

    /// Applies `input`, clears to the background color and draws `text`.
    ///
    /// Returns the number of glyphs drawn.
    pub fn render_frame(&mut self, input: FrameInput, text: &[u8]) -> Result<usize, LayoutError> {
        if let Some(ResizeEvent { width, height }) = input.resize {
            debug!("viewport resized to {width}x{height}");
            self.global.regen_projection(width, height);
        }
        self.device.clear(self.background);
        let shared = self.glyphs.shared_uniforms(self.global, self.foreground);
        draw_text(
            text,
            self.params,
            self.glyphs.metrics(),
            &self.program,
            self.glyphs.quad(),
            &shared,
        )
    }

    /// The current transforms.
    pub fn global(&self) -> &GlobalDrawing {
        &self.global
    }

    /// The layout parameters in use.
    pub fn params(&self) -> LayoutParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use cae_atlas::{CHAR_COUNT, Metadata, Metrics, UvLocation};
    use cae_gl::{Command, HeadlessDevice, ProgramId, UniformValue};

    use super::*;
    use crate::RgbColor;

    fn renderer(device: &Rc<HeadlessDevice>) -> TextRenderer<HeadlessDevice> {
        let mut metrics = vec![Metrics::default(); CHAR_COUNT];
        metrics[usize::from(b'x')] = Metrics {
            width: 1,
            height: 1,
            offset_x: 0,
            offset_y: 1,
            advance: 2,
        };
        let atlas = CharMapData {
            metadata: Metadata {
                image_width: 1,
                image_height: 1,
                space_width: 2,
            },
            pixels: vec![255],
            char_to_uv_locations: vec![UvLocation::default(); CHAR_COUNT],
            char_to_metrics: metrics,
        };
        let config = Config {
            background: RgbColor(0, 0, 0),
            ..Config::default()
        };
        let program = Program::from_raw(device.clone(), ProgramId(3));
        TextRenderer::new(device.clone(), program, &atlas, &config)
    }

    #[test]
    fn params_come_from_atlas_and_config() {
        let device = Rc::new(HeadlessDevice::new());
        let renderer = renderer(&device);
        assert_eq!(
            renderer.params(),
            LayoutParams {
                space_width: 2,
                tab_size: 2,
                line_height: 16,
            }
        );
    }

    #[test]
    fn resize_is_consumed_before_drawing() {
        let device = Rc::new(HeadlessDevice::new());
        let mut renderer = renderer(&device);
        let input = FrameInput {
            resize: Some(ResizeEvent {
                width: 640,
                height: 480,
            }),
        };

        let drawn = renderer.render_frame(input, b"x x").unwrap();
        assert_eq!(drawn, 2);
        let expected = GlobalDrawing::new(640, 480).projection();
        assert_eq!(renderer.global().projection(), expected);
        for draw in device.draws() {
            assert_eq!(
                draw.uniform(GlobalDrawing::PROJECTION),
                Some(UniformValue::Mat4(expected))
            );
        }
    }

    #[test]
    fn frame_without_resize_keeps_projection() {
        let device = Rc::new(HeadlessDevice::new());
        let mut renderer = renderer(&device);
        let first = FrameInput {
            resize: Some(ResizeEvent {
                width: 100,
                height: 50,
            }),
        };
        renderer.render_frame(first, b"x").unwrap();
        let before = renderer.global().projection();

        device.clear_log();
        renderer.render_frame(FrameInput::default(), b"x").unwrap();
        assert_eq!(renderer.global().projection(), before);
        assert_eq!(device.commands()[0], Command::Clear([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(device.draw_count(), 1);
    }
}
