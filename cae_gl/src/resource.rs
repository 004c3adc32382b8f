// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::rc::Rc;

use crate::{Device, RawId};

/// Allocates device ids, one per slot.
pub type CreateFn<D> = fn(&D, &mut [RawId]);

/// Frees device ids.
pub type DestroyFn<D> = fn(&D, &[RawId]);

/// A device id together with the operation that frees it.
///
/// The id is released exactly once, when the owner is dropped. Moving a
/// `GpuResource` moves ownership; it cannot be cloned.
pub struct GpuResource<D: Device> {
    device: Rc<D>,
    id: RawId,
    destroy: Option<DestroyFn<D>>,
}

impl<D: Device> GpuResource<D> {
    /// Allocates one id with `create` and arranges for `destroy` to free it.
    pub fn new(device: Rc<D>, create: CreateFn<D>, destroy: DestroyFn<D>) -> Self {
        let mut ids = [0];
        create(&device, &mut ids);
        let [id] = ids;
        Self {
            device,
            id,
            destroy: Some(destroy),
        }
    }

    /// Allocates `count` ids with a single call to `create`. Each returned
    /// resource frees its own id.
    pub fn new_batch(
        device: Rc<D>,
        count: usize,
        create: CreateFn<D>,
        destroy: DestroyFn<D>,
    ) -> Vec<Self> {
        let mut ids = vec![0; count];
        create(&device, &mut ids);
        ids.into_iter()
            .map(|id| Self {
                device: device.clone(),
                id,
                destroy: Some(destroy),
            })
            .collect()
    }

    /// The device-assigned id.
    pub fn id(&self) -> RawId {
        self.id
    }

    /// The device this resource lives on.
    pub fn device(&self) -> &Rc<D> {
        &self.device
    }

    /// Gives up ownership without freeing the id.
    pub fn into_raw(mut self) -> RawId {
        self.destroy = None;
        self.id
    }
}

impl<D: Device> Drop for GpuResource<D> {
    fn drop(&mut self) {
        if let Some(destroy) = self.destroy.take() {
            destroy(&self.device, &[self.id]);
        }
    }
}

impl<D: Device> fmt::Debug for GpuResource<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuResource")
            .field("id", &self.id)
            .field("owned", &self.destroy.is_some())
            .finish_non_exhaustive()
    }
}
