// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character map records shared by the rasterizer, the cache and the renderer.

/// Number of character codes every table covers: one entry per byte value.
pub const CHAR_COUNT: usize = 256;

/// Pixel metrics of one rasterized character.
///
/// The layout is fixed (`repr(C)`, five native-endian `i32`s) because tables of
/// these records are written to disk verbatim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Metrics {
    /// Width of the glyph bitmap.
    pub width: i32,
    /// Height of the glyph bitmap.
    pub height: i32,
    /// Horizontal bearing from the pen position to the bitmap's left edge.
    pub offset_x: i32,
    /// Vertical bearing from the baseline up to the bitmap's top edge.
    pub offset_y: i32,
    /// Horizontal pen movement after drawing this character.
    pub advance: i32,
}

impl Metrics {
    /// Returns `true` if the glyph has no drawable pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Normalized atlas coordinates of a glyph's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct UvLocation {
    /// Horizontal coordinate in `[0, 1]`.
    pub u: f32,
    /// Vertical coordinate in `[0, 1]`.
    pub v: f32,
}

/// Atlas-wide values stored next to the tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Metadata {
    /// Atlas width in pixels.
    pub image_width: i32,
    /// Atlas height in pixels.
    pub image_height: i32,
    /// Advance of the space character.
    pub space_width: i32,
}

/// A rasterized font: the atlas pixels plus per-character lookup tables.
#[derive(Clone, Debug, PartialEq)]
pub struct CharMapData {
    /// Atlas dimensions and the space advance.
    pub metadata: Metadata,
    /// Single-channel coverage, row-major, `image_width * image_height` bytes.
    pub pixels: Vec<u8>,
    /// Glyph origin in the atlas, indexed by character code.
    pub char_to_uv_locations: Vec<UvLocation>,
    /// Glyph metrics, indexed by character code.
    pub char_to_metrics: Vec<Metrics>,
}

impl CharMapData {
    /// Returns the metrics for a character code.
    pub fn metrics(&self, code: u8) -> Option<&Metrics> {
        self.char_to_metrics.get(usize::from(code))
    }

    /// Returns the atlas origin for a character code.
    pub fn uv_location(&self, code: u8) -> Option<&UvLocation> {
        self.char_to_uv_locations.get(usize::from(code))
    }

    /// Returns the normalized atlas rectangle `[u0, v0, u1, v1]` of every character.
    ///
    /// The extent of each rectangle comes from the paired [`Metrics`] entry scaled
    /// by the atlas dimensions.
    pub fn uv_rects(&self) -> Vec<[f32; 4]> {
        let width = self.metadata.image_width.max(1) as f32;
        let height = self.metadata.image_height.max(1) as f32;
        self.char_to_uv_locations
            .iter()
            .zip(&self.char_to_metrics)
            .map(|(uv, metrics)| {
                [
                    uv.u,
                    uv.v,
                    uv.u + metrics.width.max(0) as f32 / width,
                    uv.v + metrics.height.max(0) as f32 / height,
                ]
            })
            .collect()
    }

    /// Checks the structural invariants of the character map.
    ///
    /// On failure, returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        let Metadata {
            image_width,
            image_height,
            ..
        } = self.metadata;
        if image_width <= 0 || image_height <= 0 {
            return Err(format!(
                "atlas dimensions {image_width}x{image_height} are not positive"
            ));
        }
        let expected = usize::try_from(image_width)
            .ok()
            .zip(usize::try_from(image_height).ok())
            .and_then(|(w, h)| w.checked_mul(h));
        if expected != Some(self.pixels.len()) {
            return Err(format!(
                "atlas holds {} pixels, expected {image_width}x{image_height}",
                self.pixels.len()
            ));
        }
        if self.char_to_uv_locations.len() != self.char_to_metrics.len() {
            return Err(format!(
                "uv table has {} entries but metrics table has {}",
                self.char_to_uv_locations.len(),
                self.char_to_metrics.len()
            ));
        }
        if self.char_to_metrics.len() < CHAR_COUNT {
            return Err(format!(
                "tables cover {} character codes, expected at least {CHAR_COUNT}",
                self.char_to_metrics.len()
            ));
        }
        Ok(())
    }
}
