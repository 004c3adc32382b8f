// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GLSL sources of the glyph program.
//!
//! The host compiles and links these; the uniform names they declare are the ones
//! [`draw_text`](crate::draw_text) and [`GlyphResources`](crate::GlyphResources)
//! write.

/// Places the unit quad for one glyph and looks up its atlas rectangle.
pub const GLYPH_VERTEX: &str = r#"#version 330 core

layout (location = 0) in vec3 position;

uniform mat4 projection;
uniform mat4 world;
uniform mat4 transform;
uniform uint char_code;
uniform samplerBuffer glyph_uvs;

out vec2 uv;

void main() {
    vec4 rect = texelFetch(glyph_uvs, int(char_code));
    uv = mix(rect.xy, rect.zw, position.xy);
    gl_Position = projection * world * transform * vec4(position, 1.0);
}
"#;

/// Tints atlas coverage with the text color.
pub const GLYPH_FRAGMENT: &str = r#"#version 330 core

in vec2 uv;

uniform sampler2D atlas;
uniform vec4 fg_color;

out vec4 color;

void main() {
    color = vec4(fg_color.rgb, fg_color.a * texture(atlas, uv).r);
}
"#;

#[cfg(test)]
mod tests {
    use cae_gl::GlobalDrawing;

    use super::*;
    use crate::glyphs::{ATLAS_UNIFORM, FG_COLOR_UNIFORM, GLYPH_UVS_UNIFORM};
    use crate::layout::{CHAR_CODE_UNIFORM, TRANSFORM_UNIFORM};

    fn declares(source: &str, name: &str) -> bool {
        source
            .lines()
            .any(|line| line.starts_with("uniform ") && line.trim_end_matches(';').ends_with(name))
    }

    #[test]
    fn sources_declare_every_written_uniform() {
        for name in [
            GlobalDrawing::PROJECTION,
            GlobalDrawing::WORLD,
            TRANSFORM_UNIFORM,
            CHAR_CODE_UNIFORM,
            GLYPH_UVS_UNIFORM,
        ] {
            assert!(declares(GLYPH_VERTEX, name), "vertex shader lacks {name}");
        }
        for name in [ATLAS_UNIFORM, FG_COLOR_UNIFORM] {
            assert!(declares(GLYPH_FRAGMENT, name), "fragment shader lacks {name}");
        }
    }
}
