// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex record schemas.

use core::mem::{offset_of, size_of};

use bytemuck::Pod;

use crate::Device;

/// Component type of a vertex attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// 32-bit float.
    F32,
    /// 32-bit unsigned integer, read as an integer attribute.
    U32,
}

impl ComponentType {
    /// Size of one component in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::F32 | Self::U32 => 4,
        }
    }
}

/// How one attribute is laid out inside a vertex record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Number of components, 1 to 4.
    pub components: u8,
    /// Type of each component.
    pub component_type: ComponentType,
}

impl VertexAttribute {
    /// Creates an attribute description.
    pub const fn new(offset: usize, components: u8, component_type: ComponentType) -> Self {
        Self {
            offset,
            components,
            component_type,
        }
    }

    /// Size of the attribute in bytes.
    pub const fn size(&self) -> usize {
        self.components as usize * self.component_type.size()
    }
}

/// A plain vertex record with a declared attribute layout.
///
/// Attribute `i` of [`ATTRIBUTES`](Self::ATTRIBUTES) is bound to shader location
/// `i`, read with a stride of `size_of::<Self>()`.
pub trait Vertex: Pod {
    /// Attribute layout in shader location order.
    const ATTRIBUTES: &'static [VertexAttribute];

    /// Distance in bytes between consecutive records.
    fn stride() -> usize {
        size_of::<Self>()
    }
}

/// Enables and describes the attributes of `V` on the bound vertex array.
pub(crate) fn setup_attributes<V: Vertex, D: Device>(device: &D) {
    for (location, attribute) in (0_u32..).zip(V::ATTRIBUTES) {
        device.enable_vertex_attribute(location, attribute, V::stride());
    }
}

/// A vertex with only a position.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
pub struct PositionVertex {
    /// Object-space position.
    pub position: [f32; 3],
}

impl PositionVertex {
    /// Creates a vertex at `(x, y, z)`.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }
}

impl Vertex for PositionVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[VertexAttribute::new(
        offset_of!(Self, position),
        3,
        ComponentType::F32,
    )];
}

/// A vertex with a position and an RGB color.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
pub struct ColorVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
}

impl Vertex for ColorVertex {
    const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute::new(offset_of!(Self, position), 3, ComponentType::F32),
        VertexAttribute::new(offset_of!(Self, color), 3, ComponentType::F32),
    ];
}

#[allow(unsafe_code, reason = "Marker trait impls for plain vertex records")]
mod impl_bytemuck {
    use super::{ColorVertex, PositionVertex};

    // Safety: `PositionVertex` is `repr(C)` over `[f32; 3]`, has no padding, and all
    // bit patterns are valid.
    unsafe impl bytemuck::Zeroable for PositionVertex {}
    // Safety: As above.
    unsafe impl bytemuck::Pod for PositionVertex {}

    // Safety: `ColorVertex` is `repr(C)` over two `[f32; 3]`, has no padding, and all
    // bit patterns are valid.
    unsafe impl bytemuck::Zeroable for ColorVertex {}
    // Safety: As above.
    unsafe impl bytemuck::Pod for ColorVertex {}
}
