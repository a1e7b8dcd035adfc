// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Clip-to-screen transform
//!
//! Maps vertex stage output from homogeneous clip space to pixel coordinates
//! in two steps:
//!
//! 1. [`perspective_divide`]: `x /= w`, `y /= w`. Z and W pass through
//!    untouched, so the rasterizer can still derive depth as `z / w`.
//! 2. [`viewport_transform`]: `x' = x * (width / 2) + width / 2`, with the
//!    half-extent computed in integer arithmetic. Odd dimensions therefore
//!    lose half a pixel of offset.
//!
//! No clipping is performed. Positions with `w <= 0` are not guarded here;
//! the draw loop drops triangles touching them.

/// Divide X and Y by W, leaving Z and W unchanged
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::perspective_divide;
///
/// assert_eq!(perspective_divide([2.0, -4.0, 3.0, 2.0]), [1.0, -2.0, 3.0, 2.0]);
/// ```
pub fn perspective_divide(position: [f32; 4]) -> [f32; 4] {
    let [x, y, z, w] = position;
    [x / w, y / w, z, w]
}

/// Map normalized X/Y in `[-1, 1]` to pixel coordinates of a `width`x`height` frame
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::viewport_transform;
///
/// assert_eq!(viewport_transform([-1.0, -1.0, 0.5, 1.0], 640, 480), [0.0, 0.0, 0.5, 1.0]);
/// assert_eq!(viewport_transform([1.0, 1.0, 0.5, 1.0], 640, 480), [640.0, 480.0, 0.5, 1.0]);
/// ```
pub fn viewport_transform(position: [f32; 4], width: u32, height: u32) -> [f32; 4] {
    let half_w = (width / 2) as f32;
    let half_h = (height / 2) as f32;
    let [x, y, z, w] = position;
    [x * half_w + half_w, y * half_h + half_h, z, w]
}

/// Perspective divide followed by viewport transform
pub fn clip_to_screen(position: [f32; 4], width: u32, height: u32) -> [f32; 4] {
    viewport_transform(perspective_divide(position), width, height)
}

/// Whether a clip-space position can be safely projected
///
/// Requires `w > 0` and finite components.
pub fn is_projectable(position: [f32; 4]) -> bool {
    position[3] > 0.0 && position.iter().all(|c| c.is_finite())
}
