// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cae GL wraps a minimal graphics device in owned, move-only resources.
//!
//! The [`Device`] trait is the whole surface the renderer needs from a graphics
//! backend: allocate and delete object ids, upload buffer and texture data, bind
//! things, set named uniforms, and issue indexed triangle draws. Everything else in
//! this crate is built on top of it:
//!
//! - [`GpuResource`] pairs a device id with its deleter and frees it exactly once.
//! - [`VertexArray`], [`VertexBuffer`], [`IndexBuffer`], [`Texture`] and
//!   [`BufferTexture`] are the typed resources.
//! - [`Vertex`] describes the attribute layout of a vertex record, so
//!   [`DrawInfo::make`] can set up any vertex shape generically.
//! - [`Uniform`] implementations push values into a [`Program`] before a draw;
//!   tuples and slices of them are applied in order.
//!
//! [`HeadlessDevice`] implements [`Device`] entirely in memory and records every
//! command, which makes it useful both for tests and for running without a window.
//!
//! All of this is single-threaded: resources hold an `Rc` to their device, and the
//! device is expected to be current on the calling thread.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

mod buffer;
mod device;
mod draw;
mod headless;
mod program;
mod resource;
mod texture;
mod uniform;
mod vertex;

pub use glam;

pub use buffer::{IndexBuffer, VertexArray, VertexBuffer};
pub use device::{
    BufferTarget, Device, Filter, InternalFormat, PixelType, ProgramId, RawId, SourceFormat,
    TextureTarget, UniformValue, WrapMode,
};
pub use draw::DrawInfo;
pub use headless::{Command, DrawRecord, HeadlessDevice, ResourceKind};
pub use program::Program;
pub use resource::{CreateFn, DestroyFn, GpuResource};
pub use texture::{BufferTexture, Texture, TextureDesc};
pub use uniform::{
    BufferTextureUniform, GlobalDrawing, ScalarUniform, TextureUniform, TransformUniform, Uniform,
};
pub use vertex::{ColorVertex, ComponentType, PositionVertex, Vertex, VertexAttribute};
