// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device-side copies of a glyph atlas.

use std::rc::Rc;

use cae_atlas::{CharMapData, Metrics};
use cae_gl::{
    BufferTexture, BufferTextureUniform, Device, DrawInfo, GlobalDrawing, InternalFormat,
    ScalarUniform, Texture, TextureDesc, TextureUniform, Uniform,
};
use log::debug;

use crate::primitives::unit_quad;

/// Name of the atlas sampler uniform.
pub const ATLAS_UNIFORM: &str = "atlas";
/// Name of the glyph rectangle buffer texture uniform.
pub const GLYPH_UVS_UNIFORM: &str = "glyph_uvs";
/// Name of the text color uniform.
pub const FG_COLOR_UNIFORM: &str = "fg_color";

/// Texture unit the atlas is bound to.
pub const ATLAS_UNIT: u32 = 0;
/// Texture unit the glyph rectangles are bound to.
pub const GLYPH_UVS_UNIT: u32 = 1;

/// Everything the glyph program samples, plus the quad every glyph is drawn with.
#[derive(Debug)]
pub struct GlyphResources<D: Device> {
    atlas: Texture<D>,
    glyph_uvs: BufferTexture<D>,
    quad: DrawInfo<D>,
    metrics: Vec<Metrics>,
    space_width: i32,
}

impl<D: Device> GlyphResources<D> {
    /// Uploads the atlas bitmap and the per-character atlas rectangles of `data`.
    ///
    /// The atlas becomes an 8-bit single-channel texture. Rectangles are stored as
    /// one `[u0, v0, u1, v1]` float texel per character code, so the vertex shader
    /// can fetch them by `char_code`.
    pub fn new(device: Rc<D>, data: &CharMapData) -> Self {
        let width = u32::try_from(data.metadata.image_width).unwrap_or_default();
        let height = u32::try_from(data.metadata.image_height).unwrap_or_default();
        let atlas = Texture::new(
            device.clone(),
            TextureDesc::single_channel(width, height),
            &data.pixels,
        );
        let glyph_uvs = BufferTexture::new(device.clone(), InternalFormat::Rgba32F, &data.uv_rects());
        let quad = unit_quad(device);
        debug!(
            "uploaded a {width}x{height} atlas with {} glyph rectangles",
            glyph_uvs.len()
        );
        Self {
            atlas,
            glyph_uvs,
            quad,
            metrics: data.char_to_metrics.clone(),
            space_width: data.metadata.space_width,
        }
    }

    /// The uniforms every glyph draw shares: transforms, both textures and the
    /// text color.
    pub fn shared_uniforms(
        &self,
        global: GlobalDrawing,
        foreground: [f32; 4],
    ) -> impl Uniform<D> + '_ {
        (
            global,
            TextureUniform::new(ATLAS_UNIFORM, &self.atlas, ATLAS_UNIT),
            BufferTextureUniform::new(GLYPH_UVS_UNIFORM, &self.glyph_uvs, GLYPH_UVS_UNIT),
            ScalarUniform::new(FG_COLOR_UNIFORM, foreground),
        )
    }

    /// The unit quad glyphs are drawn with.
    pub fn quad(&self) -> &DrawInfo<D> {
        &self.quad
    }

    /// Per-character metrics, indexed by character code.
    pub fn metrics(&self) -> &[Metrics] {
        &self.metrics
    }

    /// Advance of a space in pixels.
    pub fn space_width(&self) -> i32 {
        self.space_width
    }

    /// The atlas texture.
    pub fn atlas(&self) -> &Texture<D> {
        &self.atlas
    }

    /// The glyph rectangle buffer texture.
    pub fn glyph_uvs(&self) -> &BufferTexture<D> {
        &self.glyph_uvs
    }
}
