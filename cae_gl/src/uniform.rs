// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values pushed into a program before each draw.
//!
//! A [`Uniform`] writes one or more named uniforms of a [`Program`]. Uniforms
//! compose: a tuple, slice or `Vec` of uniforms is itself a uniform that applies
//! its members in order, so a draw can take a whole heterogeneous set at once.

use glam::Mat4;

use crate::{BufferTexture, Device, Program, Texture, UniformValue};

/// Something that can write itself into a program.
pub trait Uniform<D: Device> {
    /// Pushes the value into `program`.
    fn activate(&self, program: &Program<D>);
}

/// A named 4×4 matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformUniform {
    name: &'static str,
    matrix: Mat4,
}

impl TransformUniform {
    /// Creates a binder for `name`.
    pub fn new(name: &'static str, matrix: Mat4) -> Self {
        Self { name, matrix }
    }

    /// The current matrix.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Replaces the matrix.
    pub fn set(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }
}

impl<D: Device> Uniform<D> for TransformUniform {
    fn activate(&self, program: &Program<D>) {
        program.set(self.name, self.matrix);
    }
}

/// A named scalar or small vector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScalarUniform<T> {
    name: &'static str,
    value: T,
}

impl<T: Copy + Into<UniformValue>> ScalarUniform<T> {
    /// Creates a binder for `name`.
    pub fn new(name: &'static str, value: T) -> Self {
        Self { name, value }
    }

    /// The current value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Replaces the value.
    pub fn set(&mut self, value: T) {
        self.value = value;
    }
}

impl<D: Device, T: Copy + Into<UniformValue>> Uniform<D> for ScalarUniform<T> {
    fn activate(&self, program: &Program<D>) {
        program.set(self.name, self.value);
    }
}

/// Binds a texture to a unit and points a named sampler at that unit.
#[derive(Debug)]
pub struct TextureUniform<'a, D: Device> {
    name: &'static str,
    texture: &'a Texture<D>,
    unit: u32,
}

impl<'a, D: Device> TextureUniform<'a, D> {
    /// Creates a binder for `name`.
    pub fn new(name: &'static str, texture: &'a Texture<D>, unit: u32) -> Self {
        Self {
            name,
            texture,
            unit,
        }
    }
}

impl<D: Device> Uniform<D> for TextureUniform<'_, D> {
    fn activate(&self, program: &Program<D>) {
        self.texture.bind(self.unit);
        program.set(self.name, sampler_unit(self.unit));
    }
}

/// Binds a buffer texture to a unit and points a named sampler at that unit.
#[derive(Debug)]
pub struct BufferTextureUniform<'a, D: Device> {
    name: &'static str,
    texture: &'a BufferTexture<D>,
    unit: u32,
}

impl<'a, D: Device> BufferTextureUniform<'a, D> {
    /// Creates a binder for `name`.
    pub fn new(name: &'static str, texture: &'a BufferTexture<D>, unit: u32) -> Self {
        Self {
            name,
            texture,
            unit,
        }
    }
}

impl<D: Device> Uniform<D> for BufferTextureUniform<'_, D> {
    fn activate(&self, program: &Program<D>) {
        self.texture.bind(self.unit);
        program.set(self.name, sampler_unit(self.unit));
    }
}

// Sampler uniforms are signed; units never get anywhere near `i32::MAX`.
fn sampler_unit(unit: u32) -> i32 {
    i32::try_from(unit).unwrap_or(i32::MAX)
}

/// The per-frame `projection` and `world` transforms.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlobalDrawing {
    projection: Mat4,
    world: Mat4,
}

impl GlobalDrawing {
    /// Name of the projection uniform.
    pub const PROJECTION: &'static str = "projection";
    /// Name of the world uniform.
    pub const WORLD: &'static str = "world";

    /// Creates transforms for a `width` by `height` pixel viewport.
    pub fn new(width: u32, height: u32) -> Self {
        let mut global = Self {
            projection: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
        };
        global.regen_projection(width, height);
        global
    }

    /// Recomputes the projection for a new viewport size.
    ///
    /// The projection is orthographic with the origin at the top-left corner and y
    /// pointing down, so pixel coordinates map straight to clip space. Zero sizes
    /// are treated as one pixel.
    pub fn regen_projection(&mut self, width: u32, height: u32) {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        self.projection = Mat4::orthographic_rh_gl(0.0, width, height, 0.0, -1.0, 1.0);
    }

    /// The projection matrix.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// The world matrix.
    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Replaces the world matrix.
    pub fn set_world(&mut self, world: Mat4) {
        self.world = world;
    }
}

impl<D: Device> Uniform<D> for GlobalDrawing {
    fn activate(&self, program: &Program<D>) {
        program.set(Self::PROJECTION, self.projection);
        program.set(Self::WORLD, self.world);
    }
}

impl<D: Device> Uniform<D> for () {
    fn activate(&self, _: &Program<D>) {}
}

impl<D: Device, U: Uniform<D> + ?Sized> Uniform<D> for &U {
    fn activate(&self, program: &Program<D>) {
        (**self).activate(program);
    }
}

impl<D: Device, U: Uniform<D> + ?Sized> Uniform<D> for Box<U> {
    fn activate(&self, program: &Program<D>) {
        (**self).activate(program);
    }
}

impl<D: Device, U: Uniform<D>> Uniform<D> for [U] {
    fn activate(&self, program: &Program<D>) {
        for uniform in self {
            uniform.activate(program);
        }
    }
}

impl<D: Device, U: Uniform<D>> Uniform<D> for Vec<U> {
    fn activate(&self, program: &Program<D>) {
        self.as_slice().activate(program);
    }
}

macro_rules! impl_uniform_tuple {
    ($($member:ident),+) => {
        impl<D: Device, $($member: Uniform<D>),+> Uniform<D> for ($($member,)+) {
            #[allow(non_snake_case, reason = "bindings reuse the type parameter names")]
            fn activate(&self, program: &Program<D>) {
                let ($($member,)+) = self;
                $($member.activate(program);)+
            }
        }
    };
}

impl_uniform_tuple!(A);
impl_uniform_tuple!(A, B);
impl_uniform_tuple!(A, B, C);
impl_uniform_tuple!(A, B, C, E);
impl_uniform_tuple!(A, B, C, E, F);
impl_uniform_tuple!(A, B, C, E, F, G);
impl_uniform_tuple!(A, B, C, E, F, G, H);
impl_uniform_tuple!(A, B, C, E, F, G, H, I);
