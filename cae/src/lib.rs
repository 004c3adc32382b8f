// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cae draws single-byte text through a cached glyph atlas.
//!
//! A [`TextRenderer`] owns the device-side copy of an atlas built by [`cae_atlas`]
//! and, each frame, lays out a byte string and issues one indexed draw of a unit
//! quad per visible glyph through [`cae_gl`]. Text is never shaped: every byte
//! maps to exactly one glyph with a fixed advance.
//!
//! ## Example
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use cae::{Config, FrameInput, ResizeEvent, TextRenderer};
//! use cae_atlas::{AtlasCache, CacheKey, FontRasterizer, resolve_font};
//! use cae_gl::{HeadlessDevice, Program, ProgramId};
//!
//! let config = Config::default();
//! let font = resolve_font(&config.fonts).unwrap();
//! let cache = AtlasCache::in_user_data_dir().unwrap();
//! let atlas = cache
//!     .load_or_build(&CacheKey::for_font(&font, config.font_size), || {
//!         FontRasterizer::new().rasterize(&font, config.font_size)
//!     })
//!     .unwrap();
//!
//! let device = Rc::new(HeadlessDevice::new());
//! let program = Program::from_raw(device.clone(), ProgramId(1));
//! let mut renderer = TextRenderer::new(device, program, &atlas, &config);
//! let input = FrameInput {
//!     resize: Some(ResizeEvent { width: 800, height: 600 }),
//! };
//! renderer.render_frame(input, b"Hello, world!").unwrap();
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

// Only the binary uses these.
use anyhow as _;
use env_logger as _;

mod config;
mod frame;
mod glyphs;
mod layout;
mod primitives;
pub mod shaders;

pub use config::{Config, ConfigError, RgbColor};
pub use frame::{FrameInput, ResizeEvent, TextRenderer};
pub use glyphs::{
    ATLAS_UNIFORM, ATLAS_UNIT, FG_COLOR_UNIFORM, GLYPH_UVS_UNIFORM, GLYPH_UVS_UNIT, GlyphResources,
};
pub use layout::{
    CHAR_CODE_UNIFORM, GlyphLayout, LayoutError, LayoutParams, PlacedGlyph, TRANSFORM_UNIFORM,
    draw_text,
};
pub use primitives::{QUAD_INDICES, UNIT_QUAD, color_quad, unit_quad};
