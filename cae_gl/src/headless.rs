// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory device that records what it is asked to do.

use core::cell::RefCell;

use hashbrown::HashMap;
use log::trace;

use crate::{
    BufferTarget, Device, Filter, InternalFormat, ProgramId, RawId, TextureDesc, TextureTarget,
    UniformValue, VertexAttribute, WrapMode,
};

/// The kinds of objects a device allocates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Vertex array state.
    VertexArray,
    /// Buffer storage.
    Buffer,
    /// Texture storage.
    Texture,
}

/// One call made on a [`HeadlessDevice`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// An id was allocated.
    Create(ResourceKind, RawId),
    /// An id was freed.
    Delete(ResourceKind, RawId),
    /// A vertex array was bound or unbound.
    BindVertexArray(Option<RawId>),
    /// A buffer was bound or unbound.
    BindBuffer(BufferTarget, Option<RawId>),
    /// Data was uploaded to the bound buffer.
    BufferData {
        /// The bind point written through.
        target: BufferTarget,
        /// The buffer that received the data.
        buffer: Option<RawId>,
        /// Number of bytes uploaded.
        len: usize,
    },
    /// A vertex attribute was enabled.
    EnableVertexAttribute {
        /// Shader location.
        location: u32,
        /// Layout inside the record.
        attribute: VertexAttribute,
        /// Record stride in bytes.
        stride: usize,
    },
    /// A texture unit was selected.
    ActiveTextureUnit(u32),
    /// A texture was bound or unbound.
    BindTexture(TextureTarget, Option<RawId>),
    /// Sampling state of the bound texture was set.
    TextureSampling(WrapMode, Filter, Filter),
    /// Pixels were uploaded to the bound texture.
    TextureImage2D {
        /// The texture that received the pixels.
        texture: Option<RawId>,
        /// Texture description.
        desc: TextureDesc,
        /// Number of bytes uploaded.
        len: usize,
    },
    /// Mipmaps were generated.
    GenerateMipmaps,
    /// A buffer was attached to the bound buffer texture.
    TextureBuffer {
        /// The buffer texture.
        texture: Option<RawId>,
        /// Texel format.
        format: InternalFormat,
        /// The attached buffer.
        buffer: RawId,
    },
    /// A program was made current or cleared.
    UseProgram(Option<ProgramId>),
    /// A uniform was written.
    SetUniform(ProgramId, String, UniformValue),
    /// The color target was cleared.
    Clear([f32; 4]),
    /// An indexed triangle draw.
    DrawIndexedTriangles(usize),
}

/// The state observed by one draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    /// The current program.
    pub program: Option<ProgramId>,
    /// The bound vertex array.
    pub vertex_array: Option<RawId>,
    /// The element buffer captured by that vertex array.
    pub index_buffer: Option<RawId>,
    /// Number of indices drawn.
    pub index_count: usize,
    /// Uniform values of the current program at the time of the draw.
    pub uniforms: HashMap<String, UniformValue>,
}

impl DrawRecord {
    /// The value a uniform had during this draw.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

#[derive(Debug, Default)]
struct State {
    next_id: RawId,
    live: HashMap<RawId, ResourceKind>,
    allocated: HashMap<ResourceKind, usize>,
    freed: HashMap<ResourceKind, usize>,
    invalid_deletes: usize,

    vertex_array: Option<RawId>,
    // Element array bindings are vertex array state.
    element_buffers: HashMap<RawId, RawId>,
    buffers: HashMap<BufferTarget, RawId>,
    buffer_data: HashMap<RawId, Vec<u8>>,
    texture_unit: u32,
    textures: HashMap<(u32, TextureTarget), RawId>,
    texture_data: HashMap<RawId, Vec<u8>>,
    program: Option<ProgramId>,
    uniforms: HashMap<ProgramId, HashMap<String, UniformValue>>,

    commands: Vec<Command>,
    draws: Vec<DrawRecord>,
}

impl State {
    fn create(&mut self, kind: ResourceKind, ids: &mut [RawId]) {
        for id in ids {
            self.next_id += 1;
            *id = self.next_id;
            self.live.insert(*id, kind);
            *self.allocated.entry(kind).or_default() += 1;
            self.commands.push(Command::Create(kind, *id));
        }
    }

    fn delete(&mut self, kind: ResourceKind, ids: &[RawId]) {
        for &id in ids {
            // Deleting name zero is a no-op.
            if id == 0 {
                continue;
            }
            if self.live.get(&id) != Some(&kind) {
                self.invalid_deletes += 1;
                continue;
            }
            self.live.remove(&id);
            *self.freed.entry(kind).or_default() += 1;
            match kind {
                ResourceKind::VertexArray => {
                    self.element_buffers.remove(&id);
                    if self.vertex_array == Some(id) {
                        self.vertex_array = None;
                    }
                }
                ResourceKind::Buffer => {
                    self.buffer_data.remove(&id);
                    self.buffers.retain(|_, bound| *bound != id);
                    self.element_buffers.retain(|_, bound| *bound != id);
                }
                ResourceKind::Texture => {
                    self.texture_data.remove(&id);
                    self.textures.retain(|_, bound| *bound != id);
                }
            }
            self.commands.push(Command::Delete(kind, id));
        }
    }

    fn bound_texture(&self, target: TextureTarget) -> Option<RawId> {
        self.textures.get(&(self.texture_unit, target)).copied()
    }
}

/// A [`Device`] that runs entirely in memory.
///
/// It hands out ids, tracks which are live, keeps uploaded buffer and texture bytes,
/// stores uniform values per program, and appends every call to a command log.
/// Each draw captures the bindings and uniforms it saw as a [`DrawRecord`].
///
/// The log is never trimmed on its own and every draw copies the current
/// program's uniforms, so a host that renders many frames should call
/// [`HeadlessDevice::clear_log`] between them.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    state: RefCell<State>,
}

impl HeadlessDevice {
    /// Creates a device with nothing allocated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live ids of `kind`.
    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.state
            .borrow()
            .live
            .values()
            .filter(|live| **live == kind)
            .count()
    }

    /// Whether `id` is a live object of `kind`.
    pub fn is_live(&self, kind: ResourceKind, id: RawId) -> bool {
        self.state.borrow().live.get(&id) == Some(&kind)
    }

    /// Total ids of `kind` ever allocated.
    pub fn allocated(&self, kind: ResourceKind) -> usize {
        self.state
            .borrow()
            .allocated
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// Total ids of `kind` freed.
    pub fn freed(&self, kind: ResourceKind) -> usize {
        self.state.borrow().freed.get(&kind).copied().unwrap_or(0)
    }

    /// Number of deletes of ids that were not live, including double frees.
    pub fn invalid_deletes(&self) -> usize {
        self.state.borrow().invalid_deletes
    }

    /// A copy of the command log.
    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    /// A copy of every draw issued so far.
    pub fn draws(&self) -> Vec<DrawRecord> {
        self.state.borrow().draws.clone()
    }

    /// Number of draws issued so far.
    pub fn draw_count(&self) -> usize {
        self.state.borrow().draws.len()
    }

    /// Forgets recorded commands and draws, keeping all object state.
    pub fn clear_log(&self) {
        let mut state = self.state.borrow_mut();
        state.commands.clear();
        state.draws.clear();
    }

    /// The current value of a uniform of `program`.
    pub fn uniform(&self, program: ProgramId, name: &str) -> Option<UniformValue> {
        self.state
            .borrow()
            .uniforms
            .get(&program)
            .and_then(|uniforms| uniforms.get(name))
            .copied()
    }

    /// The bytes last uploaded to a buffer.
    pub fn buffer_contents(&self, buffer: RawId) -> Option<Vec<u8>> {
        self.state.borrow().buffer_data.get(&buffer).cloned()
    }

    /// The bytes last uploaded to a 2D texture.
    pub fn texture_contents(&self, texture: RawId) -> Option<Vec<u8>> {
        self.state.borrow().texture_data.get(&texture).cloned()
    }

    /// The element buffer captured by a vertex array.
    pub fn element_buffer(&self, vertex_array: RawId) -> Option<RawId> {
        self.state
            .borrow()
            .element_buffers
            .get(&vertex_array)
            .copied()
    }

    /// The currently bound vertex array.
    pub fn bound_vertex_array(&self) -> Option<RawId> {
        self.state.borrow().vertex_array
    }
}

impl Device for HeadlessDevice {
    fn create_vertex_arrays(&self, ids: &mut [RawId]) {
        self.state
            .borrow_mut()
            .create(ResourceKind::VertexArray, ids);
    }

    fn delete_vertex_arrays(&self, ids: &[RawId]) {
        self.state
            .borrow_mut()
            .delete(ResourceKind::VertexArray, ids);
    }

    fn create_buffers(&self, ids: &mut [RawId]) {
        self.state.borrow_mut().create(ResourceKind::Buffer, ids);
    }

    fn delete_buffers(&self, ids: &[RawId]) {
        self.state.borrow_mut().delete(ResourceKind::Buffer, ids);
    }

    fn create_textures(&self, ids: &mut [RawId]) {
        self.state.borrow_mut().create(ResourceKind::Texture, ids);
    }

    fn delete_textures(&self, ids: &[RawId]) {
        self.state.borrow_mut().delete(ResourceKind::Texture, ids);
    }

    fn bind_vertex_array(&self, id: Option<RawId>) {
        let mut state = self.state.borrow_mut();
        state.vertex_array = id;
        state.commands.push(Command::BindVertexArray(id));
    }

    fn bind_buffer(&self, target: BufferTarget, id: Option<RawId>) {
        let mut state = self.state.borrow_mut();
        match id {
            Some(id) => {
                state.buffers.insert(target, id);
                if target == BufferTarget::ElementArray {
                    if let Some(vertex_array) = state.vertex_array {
                        state.element_buffers.insert(vertex_array, id);
                    }
                }
            }
            None => {
                state.buffers.remove(&target);
            }
        }
        state.commands.push(Command::BindBuffer(target, id));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let buffer = state.buffers.get(&target).copied();
        if let Some(buffer) = buffer {
            state.buffer_data.insert(buffer, data.to_vec());
        }
        state.commands.push(Command::BufferData {
            target,
            buffer,
            len: data.len(),
        });
    }

    fn enable_vertex_attribute(&self, location: u32, attribute: &VertexAttribute, stride: usize) {
        self.state
            .borrow_mut()
            .commands
            .push(Command::EnableVertexAttribute {
                location,
                attribute: *attribute,
                stride,
            });
    }

    fn active_texture_unit(&self, unit: u32) {
        let mut state = self.state.borrow_mut();
        state.texture_unit = unit;
        state.commands.push(Command::ActiveTextureUnit(unit));
    }

    fn bind_texture(&self, target: TextureTarget, id: Option<RawId>) {
        let mut state = self.state.borrow_mut();
        let slot = (state.texture_unit, target);
        match id {
            Some(id) => {
                state.textures.insert(slot, id);
            }
            None => {
                state.textures.remove(&slot);
            }
        }
        state.commands.push(Command::BindTexture(target, id));
    }

    fn texture_sampling(&self, wrap: WrapMode, min_filter: Filter, mag_filter: Filter) {
        self.state
            .borrow_mut()
            .commands
            .push(Command::TextureSampling(wrap, min_filter, mag_filter));
    }

    fn texture_image_2d(&self, desc: &TextureDesc, pixels: &[u8]) {
        let mut state = self.state.borrow_mut();
        let texture = state.bound_texture(TextureTarget::Texture2D);
        if let Some(texture) = texture {
            state.texture_data.insert(texture, pixels.to_vec());
        }
        state.commands.push(Command::TextureImage2D {
            texture,
            desc: *desc,
            len: pixels.len(),
        });
    }

    fn generate_mipmaps(&self) {
        self.state
            .borrow_mut()
            .commands
            .push(Command::GenerateMipmaps);
    }

    fn texture_buffer(&self, format: InternalFormat, buffer: RawId) {
        let mut state = self.state.borrow_mut();
        let texture = state.bound_texture(TextureTarget::Buffer);
        state.commands.push(Command::TextureBuffer {
            texture,
            format,
            buffer,
        });
    }

    fn use_program(&self, program: Option<ProgramId>) {
        let mut state = self.state.borrow_mut();
        state.program = program;
        state.commands.push(Command::UseProgram(program));
    }

    fn set_uniform(&self, program: ProgramId, name: &str, value: UniformValue) {
        let mut state = self.state.borrow_mut();
        state
            .uniforms
            .entry(program)
            .or_default()
            .insert(name.to_owned(), value);
        state
            .commands
            .push(Command::SetUniform(program, name.to_owned(), value));
    }

    fn clear(&self, color: [f32; 4]) {
        self.state.borrow_mut().commands.push(Command::Clear(color));
    }

    fn draw_indexed_triangles(&self, count: usize) {
        let mut state = self.state.borrow_mut();
        let program = state.program;
        let vertex_array = state.vertex_array;
        let index_buffer = vertex_array.and_then(|id| state.element_buffers.get(&id).copied());
        let uniforms = program
            .and_then(|program| state.uniforms.get(&program).cloned())
            .unwrap_or_default();
        trace!("draw {count} indices with {program:?} on {vertex_array:?}");
        state.draws.push(DrawRecord {
            program,
            vertex_array,
            index_buffer,
            index_count: count,
            uniforms,
        });
        state.commands.push(Command::DrawIndexedTriangles(count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_nonzero() {
        let device = HeadlessDevice::new();
        let mut buffers = [0; 3];
        let mut textures = [0; 2];
        device.create_buffers(&mut buffers);
        device.create_textures(&mut textures);
        let mut all = buffers.into_iter().chain(textures).collect::<Vec<_>>();
        assert!(all.iter().all(|id| *id != 0));
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 5);
        assert_eq!(device.live_count(ResourceKind::Buffer), 3);
        assert_eq!(device.live_count(ResourceKind::Texture), 2);
    }

    #[test]
    fn double_and_mismatched_deletes_are_counted() {
        let device = HeadlessDevice::new();
        let mut ids = [0];
        device.create_buffers(&mut ids);
        device.delete_textures(&ids);
        assert_eq!(device.invalid_deletes(), 1);
        device.delete_buffers(&ids);
        device.delete_buffers(&ids);
        assert_eq!(device.invalid_deletes(), 2);
        assert_eq!(device.freed(ResourceKind::Buffer), 1);
        device.delete_buffers(&[0]);
        assert_eq!(device.invalid_deletes(), 2);
    }

    #[test]
    fn element_binding_belongs_to_vertex_array() {
        let device = HeadlessDevice::new();
        let mut vertex_arrays = [0; 2];
        let mut buffers = [0];
        device.create_vertex_arrays(&mut vertex_arrays);
        device.create_buffers(&mut buffers);

        device.bind_vertex_array(Some(vertex_arrays[0]));
        device.bind_buffer(BufferTarget::ElementArray, Some(buffers[0]));
        device.bind_vertex_array(Some(vertex_arrays[1]));
        device.draw_indexed_triangles(6);
        device.bind_vertex_array(Some(vertex_arrays[0]));
        device.draw_indexed_triangles(6);

        let draws = device.draws();
        assert_eq!(draws[0].index_buffer, None);
        assert_eq!(draws[1].index_buffer, Some(buffers[0]));
        assert_eq!(device.element_buffer(vertex_arrays[0]), Some(buffers[0]));
    }

    #[test]
    fn draws_snapshot_uniforms() {
        let device = HeadlessDevice::new();
        let program = ProgramId(7);
        device.use_program(Some(program));
        device.set_uniform(program, "char_code", UniformValue::UInt(65));
        device.draw_indexed_triangles(6);
        device.set_uniform(program, "char_code", UniformValue::UInt(66));
        device.draw_indexed_triangles(6);

        let draws = device.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].uniform("char_code"), Some(UniformValue::UInt(65)));
        assert_eq!(draws[1].uniform("char_code"), Some(UniformValue::UInt(66)));
        assert_eq!(
            device.uniform(program, "char_code"),
            Some(UniformValue::UInt(66))
        );
    }

    #[test]
    fn uploads_land_in_the_bound_object() {
        let device = HeadlessDevice::new();
        let mut buffers = [0];
        device.create_buffers(&mut buffers);
        device.bind_buffer(BufferTarget::Array, Some(buffers[0]));
        device.buffer_data(BufferTarget::Array, &[1, 2, 3]);
        assert_eq!(device.buffer_contents(buffers[0]), Some(vec![1, 2, 3]));

        device.delete_buffers(&buffers);
        assert_eq!(device.buffer_contents(buffers[0]), None);
    }

    #[test]
    fn clear_log_keeps_objects() {
        let device = HeadlessDevice::new();
        let mut ids = [0];
        device.create_vertex_arrays(&mut ids);
        device.draw_indexed_triangles(3);
        device.clear_log();
        assert!(device.commands().is_empty());
        assert_eq!(device.draw_count(), 0);
        assert!(device.is_live(ResourceKind::VertexArray, ids[0]));
    }
}
