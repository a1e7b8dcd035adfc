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

//! Incremental edge functions
//!
//! Each directed triangle edge `(x_i, y_i) -> (x_j, y_j)` defines
//!
//! ```text
//! E_i(x, y) = (y - y_i) * (x_j - x_i) - (x - x_i) * (y_j - y_i)
//! ```
//!
//! Moving one pixel in X changes `E_i` by `-(y_j - y_i)`, moving one row in Y
//! changes it by `+(x_j - x_i)`. [`EdgeWalker`] keeps the three values for the
//! current pixel and updates them in O(1) while the rasterizer walks its
//! bounding box in serpentine order: left-to-right on even rows,
//! right-to-left on odd rows, one row step between them.
//!
//! Values are exact integers computed from vertex positions truncated to the
//! pixel grid. The walker normalizes orientation so that the interior is
//! always positive, which lets both windings rasterize.

use crate::core::config::FillRule;

/// Horizontal direction of the current row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    LeftToRight,
    RightToLeft,
}

/// Evaluate the edge function of `a -> b` at `(x, y)`
#[inline]
pub fn edge_value(a: [i64; 2], b: [i64; 2], x: i64, y: i64) -> i64 {
    (y - a[1]) * (b[0] - a[0]) - (x - a[0]) * (b[1] - a[1])
}

/// Incremental edge-function state for one triangle
///
/// # Examples
///
/// ```
/// use softpipe::core::config::FillRule;
/// use softpipe::core::gpu::render::EdgeWalker;
///
/// let verts = [[0, 0], [4, 0], [0, 4]];
/// let mut walker = EdgeWalker::new(verts, 1, 1, FillRule::Inclusive).unwrap();
/// assert!(walker.covers()); // (1, 1)
///
/// walker.step_pixel(); // (2, 1)
/// walker.step_pixel(); // (3, 1)
/// walker.step_row(); //   (3, 2)
/// assert!(!walker.covers());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeWalker {
    values: [i64; 3],
    dx: [i64; 3],
    dy: [i64; 3],
    bias: [i64; 3],
    area: i64,
    direction: ScanDirection,
}

impl EdgeWalker {
    /// Set up the edges of `vertices`, evaluated at `(x, y)`, scanning left-to-right
    ///
    /// Returns `None` for a zero-area triangle.
    pub fn new(vertices: [[i64; 2]; 3], x: i64, y: i64, fill_rule: FillRule) -> Option<Self> {
        let area = edge_value(vertices[0], vertices[1], vertices[2][0], vertices[2][1]);
        if area == 0 {
            return None;
        }
        let sign = area.signum();

        let mut values = [0; 3];
        let mut dx = [0; 3];
        let mut dy = [0; 3];
        let mut bias = [0; 3];

        for i in 0..3 {
            let a = vertices[i];
            let b = vertices[(i + 1) % 3];
            values[i] = sign * edge_value(a, b, x, y);
            dx[i] = sign * (b[0] - a[0]);
            dy[i] = sign * (b[1] - a[1]);

            let top_left = (dy[i] == 0 && dx[i] > 0) || dy[i] < 0;
            if fill_rule == FillRule::TopLeft && !top_left {
                bias[i] = -1;
            }
        }

        Some(Self {
            values,
            dx,
            dy,
            bias,
            area: area.abs(),
            direction: ScanDirection::LeftToRight,
        })
    }

    /// Whether the current pixel is inside the triangle under the fill rule
    #[inline]
    pub fn covers(&self) -> bool {
        (0..3).all(|i| self.values[i] + self.bias[i] >= 0)
    }

    /// Advance one pixel along the current row direction
    #[inline]
    pub fn step_pixel(&mut self) {
        match self.direction {
            ScanDirection::LeftToRight => {
                for i in 0..3 {
                    self.values[i] -= self.dy[i];
                }
            }
            ScanDirection::RightToLeft => {
                for i in 0..3 {
                    self.values[i] += self.dy[i];
                }
            }
        }
    }

    /// Advance one row down and reverse the scan direction
    #[inline]
    pub fn step_row(&mut self) {
        for i in 0..3 {
            self.values[i] += self.dx[i];
        }
        self.direction = match self.direction {
            ScanDirection::LeftToRight => ScanDirection::RightToLeft,
            ScanDirection::RightToLeft => ScanDirection::LeftToRight,
        };
    }

    /// Orientation-normalized edge values at the current pixel
    pub fn values(&self) -> [i64; 3] {
        self.values
    }

    pub fn direction(&self) -> ScanDirection {
        self.direction
    }

    /// Twice the triangle area
    pub fn area(&self) -> i64 {
        self.area
    }

    /// Barycentric weights of the three vertices at the current pixel
    ///
    /// Edge `i` is opposite vertex `i + 2`, so vertex 0 is weighted by edge 1,
    /// vertex 1 by edge 2 and vertex 2 by edge 0.
    pub fn barycentric(&self) -> [f32; 3] {
        let area = self.area as f32;
        [
            self.values[1] as f32 / area,
            self.values[2] as f32 / area,
            self.values[0] as f32 / area,
        ]
    }
}
