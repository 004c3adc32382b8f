// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use crate::{Device, ProgramId, UniformValue};

/// A handle to a shader program linked by the host.
///
/// The program is not owned: dropping the handle leaves the program alive.
#[derive(Debug)]
pub struct Program<D: Device> {
    device: Rc<D>,
    id: ProgramId,
}

impl<D: Device> Program<D> {
    /// Wraps a program id handed out by the host.
    pub fn from_raw(device: Rc<D>, id: ProgramId) -> Self {
        Self { device, id }
    }

    /// Makes the program current.
    pub fn activate(&self) {
        self.device.use_program(Some(self.id));
    }

    /// Writes a named uniform.
    pub fn set(&self, name: &str, value: impl Into<UniformValue>) {
        self.device.set_uniform(self.id, name, value.into());
    }

    /// The program id.
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// The device the program lives on.
    pub fn device(&self) -> &Rc<D> {
        &self.device
    }
}
