// Copyright 2026 the Cae Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry shared by every draw.

use std::rc::Rc;

use cae_gl::{ColorVertex, Device, DrawInfo, PositionVertex};

/// Two counter-clockwise triangles over the quad's four corners.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// The unit square `[0, 1] × [0, 1]`, top-left corner first, y pointing down.
pub const UNIT_QUAD: [PositionVertex; 4] = [
    PositionVertex::new(0.0, 0.0, 0.0),
    PositionVertex::new(0.0, 1.0, 0.0),
    PositionVertex::new(1.0, 1.0, 0.0),
    PositionVertex::new(1.0, 0.0, 0.0),
];

/// Uploads the unit quad; glyphs are drawn by scaling and translating it.
pub fn unit_quad<D: Device>(device: Rc<D>) -> DrawInfo<D> {
    DrawInfo::make(device, &UNIT_QUAD, &QUAD_INDICES)
}

/// Uploads a unit quad whose corners carry their own colors, in [`UNIT_QUAD`]
/// order.
pub fn color_quad<D: Device>(device: Rc<D>, corner_colors: [[f32; 3]; 4]) -> DrawInfo<D> {
    let vertices = UNIT_QUAD
        .iter()
        .zip(corner_colors)
        .map(|(corner, color)| ColorVertex {
            position: corner.position,
            color,
        })
        .collect::<Vec<_>>();
    DrawInfo::make(device, &vertices, &QUAD_INDICES)
}
