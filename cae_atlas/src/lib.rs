// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cae Atlas turns a font into a reusable, single-channel glyph atlas.
//!
//! The pipeline has three stages:
//! - [`resolve_font`] picks the first usable font from an ordered list of candidates.
//! - [`FontRasterizer`] renders every single-byte character code into one packed
//!   atlas bitmap and records per-character [`Metrics`] and [`UvLocation`]s.
//! - [`AtlasCache`] persists the resulting [`CharMapData`] as four artifacts keyed by
//!   font identity and pixel size, so later runs skip rasterization entirely.
//!
//! Every table in a [`CharMapData`] is indexed by raw byte value and covers at least
//! [`CHAR_COUNT`] entries.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

mod cache;
mod data;
mod error;
mod font;
mod impl_bytemuck;
mod pack;
mod raster;

pub use cache::{
    ATLAS_IMAGE_FILE, AtlasCache, CacheKey, METADATA_FILE, METRICS_FILE, UV_FILE,
};
pub use data::{CHAR_COUNT, CharMapData, Metadata, Metrics, UvLocation};
pub use error::AtlasError;
pub use font::{FontSource, resolve_font};
pub use pack::{GLYPH_PADDING, pack_glyphs};
pub use raster::{FontRasterizer, GlyphBitmap};
