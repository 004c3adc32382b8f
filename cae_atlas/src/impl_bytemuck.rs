// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `bytemuck` trait impls for the on-disk records.

#![allow(
    unsafe_code,
    reason = "The `bytemuck` marker traits are `unsafe` and require `unsafe impl`."
)]

use crate::{Metadata, Metrics, UvLocation};
use bytemuck::{Pod, Zeroable};

// Safety: `repr(C)` with five `i32` fields, so there is no padding and all-zero is valid.
unsafe impl Zeroable for Metrics {}
// Safety: as above; every bit pattern is a valid `i32`.
unsafe impl Pod for Metrics {}

// Safety: `repr(C)` with two `f32` fields, so there is no padding and all-zero is valid.
unsafe impl Zeroable for UvLocation {}
// Safety: as above; every bit pattern is a valid `f32`.
unsafe impl Pod for UvLocation {}

// Safety: `repr(C)` with three `i32` fields, so there is no padding and all-zero is valid.
unsafe impl Zeroable for Metadata {}
// Safety: as above; every bit pattern is a valid `i32`.
unsafe impl Pod for Metadata {}
