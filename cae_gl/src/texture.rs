// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use bytemuck::Pod;
use log::debug;

use crate::{
    BufferTarget, Device, Filter, GpuResource, InternalFormat, PixelType, RawId, SourceFormat,
    TextureTarget, WrapMode,
};

/// Shape, format and sampling state of a 2D texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Storage format on the device.
    pub internal_format: InternalFormat,
    /// Channel layout of the uploaded pixels.
    pub source_format: SourceFormat,
    /// Component type of the uploaded pixels.
    pub pixel_type: PixelType,
    /// Coordinate wrapping on both axes.
    pub wrap_mode: WrapMode,
    /// Minification filter.
    pub min_filter: Filter,
    /// Magnification filter.
    pub mag_filter: Filter,
    /// Whether to build the mipmap chain after upload.
    pub generate_mipmaps: bool,
}

impl TextureDesc {
    /// An 8-bit single-channel texture, clamped, linearly filtered, without mipmaps.
    pub fn single_channel(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            internal_format: InternalFormat::R8,
            source_format: SourceFormat::Red,
            pixel_type: PixelType::U8,
            wrap_mode: WrapMode::ClampToEdge,
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            generate_mipmaps: false,
        }
    }

    /// Number of bytes of pixel data this description expects.
    pub fn byte_len(&self) -> usize {
        self.width as usize
            * self.height as usize
            * self.source_format.channels()
            * self.pixel_type.size()
    }
}

/// An owned 2D texture.
#[derive(Debug)]
pub struct Texture<D: Device> {
    resource: GpuResource<D>,
    desc: TextureDesc,
}

impl<D: Device> Texture<D> {
    /// Creates a texture and uploads `pixels`, which must be
    /// [`desc.byte_len()`](TextureDesc::byte_len) bytes long.
    ///
    /// The texture is bound on the active unit while it is set up and unbound after.
    pub fn new(device: Rc<D>, desc: TextureDesc, pixels: &[u8]) -> Self {
        debug_assert_eq!(
            pixels.len(),
            desc.byte_len(),
            "pixel data does not match the texture description"
        );
        let resource = GpuResource::new(device, D::create_textures, D::delete_textures);
        let device = resource.device();
        device.bind_texture(TextureTarget::Texture2D, Some(resource.id()));
        device.texture_sampling(desc.wrap_mode, desc.min_filter, desc.mag_filter);
        device.texture_image_2d(&desc, pixels);
        if desc.generate_mipmaps {
            device.generate_mipmaps();
        }
        device.bind_texture(TextureTarget::Texture2D, None);
        debug!(
            "created {}x{} {:?} texture {}",
            desc.width,
            desc.height,
            desc.internal_format,
            resource.id()
        );
        Self { resource, desc }
    }

    /// Binds the texture to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        let device = self.resource.device();
        device.active_texture_unit(unit);
        device.bind_texture(TextureTarget::Texture2D, Some(self.resource.id()));
    }

    /// The device id.
    pub fn id(&self) -> RawId {
        self.resource.id()
    }

    /// The description the texture was created with.
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }
}

/// A texture whose texels live in a flat buffer, fetched by integer index.
#[derive(Debug)]
pub struct BufferTexture<D: Device> {
    // Declared first so the view is deleted before its storage.
    texture: GpuResource<D>,
    buffer: GpuResource<D>,
    format: InternalFormat,
    len: usize,
}

impl<D: Device> BufferTexture<D> {
    /// Uploads `values` into a new buffer and exposes it as texels of `format`.
    ///
    /// The byte size of `values` should be a multiple of the texel size of
    /// `format`; trailing bytes are not addressable.
    pub fn new<T: Pod>(device: Rc<D>, format: InternalFormat, values: &[T]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(values);
        let buffer = GpuResource::new(device.clone(), D::create_buffers, D::delete_buffers);
        device.bind_buffer(BufferTarget::Texture, Some(buffer.id()));
        device.buffer_data(BufferTarget::Texture, bytes);
        device.bind_buffer(BufferTarget::Texture, None);

        let texture = GpuResource::new(device.clone(), D::create_textures, D::delete_textures);
        device.bind_texture(TextureTarget::Buffer, Some(texture.id()));
        device.texture_buffer(format, buffer.id());
        device.bind_texture(TextureTarget::Buffer, None);

        let len = bytes.len() / format.texel_size();
        debug!(
            "created {format:?} buffer texture {} with {len} texels",
            texture.id()
        );
        Self {
            texture,
            buffer,
            format,
            len,
        }
    }

    /// Binds the texture to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        let device = self.texture.device();
        device.active_texture_unit(unit);
        device.bind_texture(TextureTarget::Buffer, Some(self.texture.id()));
    }

    /// The texture id.
    pub fn id(&self) -> RawId {
        self.texture.id()
    }

    /// The id of the backing buffer.
    pub fn buffer_id(&self) -> RawId {
        self.buffer.id()
    }

    /// The texel format.
    pub fn format(&self) -> InternalFormat {
        self.format
    }

    /// Number of addressable texels.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no texels.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, HeadlessDevice, ResourceKind};

    #[test]
    fn texture_uploads_and_unbinds() {
        let device = Rc::new(HeadlessDevice::new());
        let desc = TextureDesc::single_channel(3, 2);
        assert_eq!(desc.byte_len(), 6);
        let texture = Texture::new(device.clone(), desc, &[1, 2, 3, 4, 5, 6]);

        assert_eq!(
            device.texture_contents(texture.id()),
            Some(vec![1, 2, 3, 4, 5, 6])
        );
        let commands = device.commands();
        assert_eq!(
            commands.last(),
            Some(&Command::BindTexture(TextureTarget::Texture2D, None))
        );
        assert!(!commands.contains(&Command::GenerateMipmaps));

        drop(texture);
        assert_eq!(device.live_count(ResourceKind::Texture), 0);
    }

    #[test]
    fn mipmaps_on_request() {
        let device = Rc::new(HeadlessDevice::new());
        let desc = TextureDesc {
            generate_mipmaps: true,
            ..TextureDesc::single_channel(1, 1)
        };
        let _texture = Texture::new(device.clone(), desc, &[0]);
        assert!(device.commands().contains(&Command::GenerateMipmaps));
    }

    #[test]
    fn bind_selects_unit() {
        let device = Rc::new(HeadlessDevice::new());
        let texture = Texture::new(device.clone(), TextureDesc::single_channel(1, 1), &[0]);
        device.clear_log();
        texture.bind(3);
        assert_eq!(
            device.commands(),
            vec![
                Command::ActiveTextureUnit(3),
                Command::BindTexture(TextureTarget::Texture2D, Some(texture.id())),
            ]
        );
    }

    #[test]
    fn buffer_texture_counts_texels() {
        let device = Rc::new(HeadlessDevice::new());
        let rects = [[0.0_f32, 0.0, 0.5, 0.5], [0.5, 0.5, 1.0, 1.0]];
        let texture = BufferTexture::new(device.clone(), InternalFormat::Rgba32F, &rects);
        assert_eq!(texture.len(), 2);
        assert_eq!(
            device.buffer_contents(texture.buffer_id()).map(|bytes| bytes.len()),
            Some(32)
        );
        assert!(device.commands().contains(&Command::TextureBuffer {
            texture: Some(texture.id()),
            format: InternalFormat::Rgba32F,
            buffer: texture.buffer_id(),
        }));

        drop(texture);
        assert_eq!(device.live_count(ResourceKind::Texture), 0);
        assert_eq!(device.live_count(ResourceKind::Buffer), 0);
        assert_eq!(device.invalid_deletes(), 0);
    }
}
