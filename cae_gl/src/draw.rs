// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use log::debug;

use crate::vertex::setup_attributes;
use crate::{Device, IndexBuffer, Program, RawId, Uniform, Vertex, VertexArray, VertexBuffer};

/// A vertex array ready to be drawn as indexed triangles, together with the
/// buffers it reads from.
///
/// The vertex buffer is owned. The index buffer is reference counted so several
/// `DrawInfo`s can share one; it is freed with the last of them.
#[derive(Debug)]
pub struct DrawInfo<D: Device> {
    vertex_array: VertexArray<D>,
    vertex_buffer: VertexBuffer<D>,
    index_buffer: Rc<IndexBuffer<D>>,
}

impl<D: Device> DrawInfo<D> {
    /// Uploads `vertices` and `indices` and records the attribute layout of `V`.
    pub fn make<V: Vertex>(device: Rc<D>, vertices: &[V], indices: &[u32]) -> Self {
        let vertex_array = VertexArray::new(device.clone());
        vertex_array.activate();
        let vertex_buffer = VertexBuffer::new(device.clone(), vertices);
        setup_attributes::<V, D>(&device);
        let index_buffer = IndexBuffer::new(device, indices);
        vertex_array.deactivate();
        vertex_buffer.deactivate();
        let draw_info = Self {
            vertex_array,
            vertex_buffer,
            index_buffer: Rc::new(index_buffer),
        };
        draw_info.log_upload();
        draw_info
    }

    /// Uploads `vertices` and draws them through an existing index buffer.
    pub fn make_shared<V: Vertex>(
        device: Rc<D>,
        vertices: &[V],
        index_buffer: Rc<IndexBuffer<D>>,
    ) -> Self {
        let vertex_array = VertexArray::new(device.clone());
        vertex_array.activate();
        let vertex_buffer = VertexBuffer::new(device.clone(), vertices);
        setup_attributes::<V, D>(&device);
        index_buffer.activate();
        vertex_array.deactivate();
        vertex_buffer.deactivate();
        let draw_info = Self {
            vertex_array,
            vertex_buffer,
            index_buffer,
        };
        draw_info.log_upload();
        draw_info
    }

    fn log_upload(&self) {
        debug!(
            "vertex array {} has {} vertices and {} indices",
            self.vertex_array.id(),
            self.vertex_buffer.len(),
            self.index_count()
        );
    }

    /// Draws with whatever program is current.
    pub fn draw(&self) {
        let device = self.vertex_array.device();
        self.vertex_array
            .with_bound(|| device.draw_indexed_triangles(self.index_count()));
    }

    /// Makes `program` current, then draws.
    pub fn draw_with(&self, program: &Program<D>) {
        program.activate();
        self.draw();
    }

    /// Makes `program` current, applies `uniforms` in order, then draws.
    pub fn draw_with_uniforms<U: Uniform<D> + ?Sized>(&self, program: &Program<D>, uniforms: &U) {
        program.activate();
        uniforms.activate(program);
        self.draw();
    }

    /// Number of indices drawn.
    pub fn index_count(&self) -> usize {
        self.index_buffer.count()
    }

    /// The vertex array id.
    pub fn vertex_array_id(&self) -> RawId {
        self.vertex_array.id()
    }

    /// The vertex storage.
    pub fn vertex_buffer(&self) -> &VertexBuffer<D> {
        &self.vertex_buffer
    }

    /// The index storage, for sharing with [`DrawInfo::make_shared`].
    pub fn index_buffer(&self) -> &Rc<IndexBuffer<D>> {
        &self.index_buffer
    }
}
