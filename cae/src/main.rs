// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builds (or loads) the glyph atlas for the configured font and renders one
//! headless frame of sample text.
//!
//! There is no window: the single headless frame takes the place of the window
//! loop, and finishing it counts as a normal close with exit status zero. Any
//! error exits with a failure status.
//!
//! Logging is controlled with `RUST_LOG` and defaults to `info`.

use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Context;
use cae::{Config, FrameInput, ResizeEvent, TextRenderer};
use cae_atlas::{AtlasCache, CacheKey, FontRasterizer, resolve_font};
use cae_gl::{HeadlessDevice, Program, ProgramId};
use log::{error, info};

const VIEWPORT: ResizeEvent = ResizeEvent {
    width: 800,
    height: 600,
};

const SAMPLE_TEXT: &[u8] = b"The quick brown fox\n\tjumps over the lazy dog.\n0123456789 !?#$%&*()[]{}";

fn run() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load the config")?;
    let font = resolve_font(&config.fonts).context("failed to find a usable font")?;
    info!("using font {}", font.identity());

    let cache = AtlasCache::in_user_data_dir().context("failed to open the atlas cache")?;
    let key = CacheKey::for_font(&font, config.font_size);
    let atlas = cache
        .load_or_build(&key, || {
            FontRasterizer::new().rasterize(&font, config.font_size)
        })
        .with_context(|| format!("failed to build the glyph atlas for {}", font.name()))?;

    // Headless mode has no shader compiler, so the glyph program is only a name.
    let device = Rc::new(HeadlessDevice::new());
    let program = Program::from_raw(device.clone(), ProgramId(1));
    let mut renderer = TextRenderer::new(device.clone(), program, &atlas, &config);
    let input = FrameInput {
        resize: Some(VIEWPORT),
    };
    let drawn = renderer
        .render_frame(input, SAMPLE_TEXT)
        .context("failed to render the frame")?;
    info!(
        "rendered {drawn} glyphs in {} draw calls",
        device.draw_count()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
