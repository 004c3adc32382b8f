// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use crate::{BufferTarget, Device, GpuResource, RawId, Vertex};

/// Owned vertex array state: attribute layout plus the element buffer binding.
#[derive(Debug)]
pub struct VertexArray<D: Device> {
    resource: GpuResource<D>,
}

impl<D: Device> VertexArray<D> {
    /// Allocates a vertex array.
    pub fn new(device: Rc<D>) -> Self {
        Self {
            resource: GpuResource::new(device, D::create_vertex_arrays, D::delete_vertex_arrays),
        }
    }

    /// Binds the vertex array.
    pub fn activate(&self) {
        self.resource.device().bind_vertex_array(Some(self.resource.id()));
    }

    /// Unbinds whatever vertex array is bound.
    pub fn deactivate(&self) {
        self.resource.device().bind_vertex_array(None);
    }

    /// Runs `body` with the vertex array bound.
    ///
    /// The vertex array is unbound afterwards, also when `body` panics.
    pub fn with_bound<R>(&self, body: impl FnOnce() -> R) -> R {
        struct Unbind<'a, D: Device>(&'a VertexArray<D>);

        impl<D: Device> Drop for Unbind<'_, D> {
            fn drop(&mut self) {
                self.0.deactivate();
            }
        }

        self.activate();
        let _unbind = Unbind(self);
        body()
    }

    /// The device id.
    pub fn id(&self) -> RawId {
        self.resource.id()
    }

    pub(crate) fn device(&self) -> &Rc<D> {
        self.resource.device()
    }
}

/// An owned buffer of vertex records, uploaded once.
#[derive(Debug)]
pub struct VertexBuffer<D: Device> {
    resource: GpuResource<D>,
    len: usize,
}

impl<D: Device> VertexBuffer<D> {
    /// Creates a buffer holding `vertices`.
    ///
    /// The buffer is left bound to the array target.
    pub fn new<V: Vertex>(device: Rc<D>, vertices: &[V]) -> Self {
        let resource = GpuResource::new(device, D::create_buffers, D::delete_buffers);
        let device = resource.device();
        device.bind_buffer(BufferTarget::Array, Some(resource.id()));
        device.buffer_data(BufferTarget::Array, bytemuck::cast_slice(vertices));
        Self {
            resource,
            len: vertices.len(),
        }
    }

    /// Binds the buffer to the array target.
    pub fn activate(&self) {
        self.resource
            .device()
            .bind_buffer(BufferTarget::Array, Some(self.resource.id()));
    }

    /// Unbinds the array target.
    pub fn deactivate(&self) {
        self.resource.device().bind_buffer(BufferTarget::Array, None);
    }

    /// The device id.
    pub fn id(&self) -> RawId {
        self.resource.id()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An owned buffer of triangle indices.
#[derive(Debug)]
pub struct IndexBuffer<D: Device> {
    resource: GpuResource<D>,
    count: usize,
}

impl<D: Device> IndexBuffer<D> {
    /// Creates a buffer holding `indices`.
    ///
    /// The buffer is left bound to the element target, so a vertex array bound at
    /// the time captures it.
    pub fn new(device: Rc<D>, indices: &[u32]) -> Self {
        let resource = GpuResource::new(device, D::create_buffers, D::delete_buffers);
        let device = resource.device();
        device.bind_buffer(BufferTarget::ElementArray, Some(resource.id()));
        device.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(indices));
        Self {
            resource,
            count: indices.len(),
        }
    }

    /// Binds the buffer to the element target.
    pub fn activate(&self) {
        self.resource
            .device()
            .bind_buffer(BufferTarget::ElementArray, Some(self.resource.id()));
    }

    /// The device id.
    pub fn id(&self) -> RawId {
        self.resource.id()
    }

    /// Number of indices.
    pub fn count(&self) -> usize {
        self.count
    }
}
