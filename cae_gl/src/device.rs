// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graphics device capability set.

use glam::Mat4;

use crate::{TextureDesc, VertexAttribute};

/// A device-assigned object name.
///
/// Zero is never a valid name; devices hand out ids starting at one.
pub type RawId = u32;

/// A linked shader program owned by the host.
///
/// Compiling and linking shaders is outside this crate, so programs are only ever
/// referred to by the id the host gives us.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(pub RawId);

/// Where a buffer is bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Triangle indices; captured by the bound vertex array.
    ElementArray,
    /// Storage behind a buffer texture.
    Texture,
}

/// Where a texture is bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// A regular two-dimensional image.
    Texture2D,
    /// A one-dimensional view of a buffer, addressed by integer index.
    Buffer,
}

/// Storage format of texture texels on the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InternalFormat {
    /// One normalized 8-bit channel.
    R8,
    /// Four normalized 8-bit channels.
    Rgba8,
    /// Two 32-bit float channels.
    Rg32F,
    /// Four 32-bit float channels.
    Rgba32F,
}

impl InternalFormat {
    /// Size of one texel in bytes.
    pub const fn texel_size(self) -> usize {
        match self {
            Self::R8 => 1,
            Self::Rgba8 => 4,
            Self::Rg32F => 8,
            Self::Rgba32F => 16,
        }
    }
}

/// Channel layout of uploaded pixel data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// One channel.
    Red,
    /// Two channels.
    Rg,
    /// Four channels.
    Rgba,
}

impl SourceFormat {
    /// Number of channels per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Red => 1,
            Self::Rg => 2,
            Self::Rgba => 4,
        }
    }
}

/// Component type of uploaded pixel data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelType {
    /// Unsigned bytes.
    U8,
    /// 32-bit floats.
    F32,
}

impl PixelType {
    /// Size of one component in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::F32 => 4,
        }
    }
}

/// Texture coordinate wrapping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Clamp to the edge texel.
    #[default]
    ClampToEdge,
    /// Tile the texture.
    Repeat,
    /// Tile the texture, mirroring every other repetition.
    MirroredRepeat,
}

/// Texture sampling filter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Linear,
}

/// A value that can be written to a named uniform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    /// A signed integer, also used for sampler units.
    Int(i32),
    /// An unsigned integer.
    UInt(u32),
    /// A float.
    Float(f32),
    /// A two-component float vector.
    Vec2([f32; 2]),
    /// A four-component float vector.
    Vec4([f32; 4]),
    /// A column-major 4×4 matrix.
    Mat4(Mat4),
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for UniformValue {
    fn from(value: u32) -> Self {
        Self::UInt(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(value: [f32; 2]) -> Self {
        Self::Vec2(value)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(value: [f32; 4]) -> Self {
        Self::Vec4(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        Self::Mat4(value)
    }
}

/// The operations a graphics backend must provide.
///
/// Methods take `&self`: a device wraps a context that is current on the calling
/// thread, and the resource wrappers share it through an `Rc`. Implementations are
/// expected to use interior mutability for any bookkeeping they do.
pub trait Device {
    /// Fills `ids` with freshly allocated vertex array names.
    fn create_vertex_arrays(&self, ids: &mut [RawId]);
    /// Deletes vertex arrays.
    fn delete_vertex_arrays(&self, ids: &[RawId]);
    /// Fills `ids` with freshly allocated buffer names.
    fn create_buffers(&self, ids: &mut [RawId]);
    /// Deletes buffers.
    fn delete_buffers(&self, ids: &[RawId]);
    /// Fills `ids` with freshly allocated texture names.
    fn create_textures(&self, ids: &mut [RawId]);
    /// Deletes textures.
    fn delete_textures(&self, ids: &[RawId]);

    /// Binds a vertex array, or unbinds with `None`.
    fn bind_vertex_array(&self, id: Option<RawId>);
    /// Binds a buffer to `target`, or unbinds with `None`.
    fn bind_buffer(&self, target: BufferTarget, id: Option<RawId>);
    /// Replaces the contents of the buffer bound to `target` with immutable data.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    /// Enables attribute `location` of the bound vertex array and describes how
    /// it is read from the bound array buffer.
    fn enable_vertex_attribute(&self, location: u32, attribute: &VertexAttribute, stride: usize);

    /// Selects the texture unit subsequent texture binds apply to.
    fn active_texture_unit(&self, unit: u32);
    /// Binds a texture to `target` on the active unit, or unbinds with `None`.
    fn bind_texture(&self, target: TextureTarget, id: Option<RawId>);
    /// Sets wrapping and filtering of the bound 2D texture.
    fn texture_sampling(&self, wrap: WrapMode, min_filter: Filter, mag_filter: Filter);
    /// Uploads pixels to the bound 2D texture.
    fn texture_image_2d(&self, desc: &TextureDesc, pixels: &[u8]);
    /// Generates mipmaps for the bound 2D texture.
    fn generate_mipmaps(&self);
    /// Attaches `buffer` as the storage of the bound buffer texture.
    fn texture_buffer(&self, format: InternalFormat, buffer: RawId);

    /// Makes a program current, or clears the current program with `None`.
    fn use_program(&self, program: Option<ProgramId>);
    /// Writes a named uniform of `program`.
    fn set_uniform(&self, program: ProgramId, name: &str, value: UniformValue);

    /// Clears the color target.
    fn clear(&self, color: [f32; 4]);
    /// Draws `count` indices of the bound vertex array as triangles.
    fn draw_indexed_triangles(&self, count: usize);
}
