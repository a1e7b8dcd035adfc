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

//! Triangle assembly
//!
//! Groups consecutive shaded vertices into independent triangles. Every third
//! vertex completes a triangle; a trailing one or two vertices never form one.

use super::primitives::{OutVertex, Triangle};

/// Accumulates vertices into independent triangles
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::{OutVertex, TriangleAssembler};
///
/// let mut assembler = TriangleAssembler::new();
/// assert!(assembler.push(OutVertex::default()).is_none());
/// assert!(assembler.push(OutVertex::default()).is_none());
/// assert!(assembler.push(OutVertex::default()).is_some());
/// assert_eq!(assembler.pending(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TriangleAssembler {
    vertices: [OutVertex; 3],
    count: usize,
}

impl TriangleAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex, returning the triangle it completes
    pub fn push(&mut self, vertex: OutVertex) -> Option<Triangle> {
        self.vertices[self.count] = vertex;
        self.count += 1;

        if self.count == 3 {
            self.count = 0;
            Some(Triangle {
                vertices: self.vertices,
            })
        } else {
            None
        }
    }

    /// Number of vertices waiting for a triangle to complete
    pub fn pending(&self) -> usize {
        self.count
    }
}
