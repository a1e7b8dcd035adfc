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

//! Software GPU pipeline
//!
//! This module implements the draw and clear entry points of an in-process
//! rendering pipeline. A draw call:
//!
//! 1. Resolves each vertex ordinal to a vertex id (through the optional index buffer)
//! 2. Fetches the bound attributes into an [`InVertex`]
//! 3. Runs the program's vertex stage
//! 4. Transforms the clip-space position to screen space
//! 5. Assembles every three vertices into an independent [`Triangle`]
//! 6. Rasterizes each triangle, running the fragment stage per covered pixel
//!
//! # Coordinate System
//!
//! Normalized `(-1, -1)` maps to pixel `(0, 0)` and `(1, 1)` to
//! `(width, height)`. Pixel `(x, y)` lives at index `y * width + x` of the
//! frame storage.
//!
//! # Failure Model
//!
//! Before any vertex is shaded, [`validate_draw`] resolves every index and
//! checks every attribute read against its buffer. A failure there (index or
//! attribute read out of range) aborts the call with the frame unchanged.
//! Triangles are then streamed through steps 1-6 one at a time. A triangle
//! whose vertices disagree on an attribute slot's type is dropped and counted
//! like an unprojectable one. Rasterization itself cannot fail.
//!
//! # Clipping
//!
//! No frustum clipping is performed. Triangles with a vertex at `w <= 0`, a
//! non-finite coordinate, or a screen coordinate beyond
//! [`render::MAX_SCREEN_COORD`] are dropped whole and counted in
//! [`DrawStats::dropped_triangles`].

use serde::Serialize;

use crate::core::config::PipelineConfig;
use crate::core::error::Result;

// Module declarations
mod assembler;
mod fetch;
mod framebuffer;
mod primitives;
mod program;
pub mod render;
mod transform;
mod vertex_array;
#[cfg(test)]
mod tests;

// Public re-exports
pub use assembler::TriangleAssembler;
pub use fetch::{assemble_vertex, fetch_attribute, resolve_vertex_id, validate_draw};
pub use framebuffer::{to_unorm8, Frame, FrameBuffer};
pub use primitives::*;
pub use program::{FragmentStage, Program, VertexStage};
pub use render::{Rasterizer, Texture};
pub use transform::{clip_to_screen, is_projectable, perspective_divide, viewport_transform};
pub use vertex_array::{AttributeDescriptor, IndexBuffer, IndexType, VertexArray};

/// Counters reported by a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DrawStats {
    /// Vertices fetched and shaded
    pub vertices: u32,
    /// Complete triangles assembled
    pub triangles: u32,
    /// Triangles dropped for `w <= 0`, non-finite or out-of-range coordinates
    pub dropped_triangles: u32,
    /// Fragment stage invocations
    pub fragments_shaded: u64,
    /// Fragments that passed the depth test and were written
    pub fragments_written: u64,
}

/// Pipeline state for draw and clear calls
///
/// Holds the bound vertex array, the render target and the pipeline
/// configuration. The program is supplied per draw call.
///
/// # Examples
///
/// ```
/// use softpipe::core::config::PipelineConfig;
/// use softpipe::core::gpu::{FrameBuffer, GpuContext, VertexArray};
///
/// let mut fb = FrameBuffer::new(2, 2);
/// let mut ctx = GpuContext::new(VertexArray::new(), fb.as_frame(), PipelineConfig::default());
/// ctx.clear(1.0, 0.0, 0.0, 1.0);
///
/// assert_eq!(fb.pixel(1, 1), Some([255, 0, 0, 255]));
/// ```
#[derive(Debug)]
pub struct GpuContext<'a> {
    /// Attribute streams and index buffer consumed by draw calls
    pub vertex_array: VertexArray<'a>,

    /// Render target
    pub frame: Frame<'a>,

    /// Fill rule, depth test, write mask and clear depth
    pub config: PipelineConfig,
}

impl<'a> GpuContext<'a> {
    pub fn new(vertex_array: VertexArray<'a>, frame: Frame<'a>, config: PipelineConfig) -> Self {
        Self {
            vertex_array,
            frame,
            config,
        }
    }

    /// Draw `vertex_count` vertices as independent triangles
    ///
    /// `vertex_count` should be a multiple of 3; trailing vertices are shaded
    /// but never rasterized. Each triangle is rasterized as soon as its third
    /// vertex is shaded, so memory use does not depend on `vertex_count`.
    ///
    /// Fragments only pass the depth test against a smaller stored depth;
    /// [`FrameBuffer::new`] starts at [`DEFAULT_CLEAR_DEPTH`], caller storage
    /// wrapped with [`Frame::new`] should be cleared first.
    ///
    /// # Errors
    ///
    /// Returns the first index or attribute fetch error. Fetches are checked
    /// for the whole call before any vertex is shaded, so the frame is not
    /// modified when an error is returned.
    ///
    /// [`DEFAULT_CLEAR_DEPTH`]: crate::core::config::DEFAULT_CLEAR_DEPTH
    pub fn draw<V, F, U>(&mut self, program: &Program<V, F, U>, vertex_count: u32) -> Result<DrawStats>
    where
        V: VertexStage<U>,
        F: FragmentStage<U>,
    {
        let mut stats = DrawStats {
            vertices: vertex_count,
            ..DrawStats::default()
        };

        if vertex_count % 3 != 0 {
            log::warn!(
                "Vertex count {} is not a multiple of 3, ignoring {} trailing vertices",
                vertex_count,
                vertex_count % 3
            );
        }

        validate_draw(&self.vertex_array, vertex_count)?;

        let (width, height) = (self.frame.width(), self.frame.height());
        let rasterizer = Rasterizer::new(&self.config);
        let mut assembler = TriangleAssembler::new();
        let mut projectable = true;

        for ordinal in 0..vertex_count {
            let input = assemble_vertex(&self.vertex_array, ordinal)?;
            let mut vertex = program.shade_vertex(&input);

            projectable &= is_projectable(vertex.position);
            vertex.position = clip_to_screen(vertex.position, width, height);

            let Some(triangle) = assembler.push(vertex) else {
                continue;
            };
            stats.triangles += 1;

            if !std::mem::replace(&mut projectable, true) {
                log::warn!("Dropping triangle {} with a vertex at w <= 0", stats.triangles - 1);
                stats.dropped_triangles += 1;
                continue;
            }
            if let Err(err) = triangle.validate() {
                log::warn!("Dropping triangle {}: {}", stats.triangles - 1, err);
                stats.dropped_triangles += 1;
                continue;
            }
            if !rasterizer.draw_triangle(&mut self.frame, &triangle, program, &mut stats) {
                log::warn!(
                    "Dropping triangle {} with out-of-range screen coordinates",
                    stats.triangles - 1
                );
                stats.dropped_triangles += 1;
            }
        }

        log::debug!(
            "Draw: {} vertices, {} triangles ({} dropped), {} fragments shaded, {} written",
            stats.vertices,
            stats.triangles,
            stats.dropped_triangles,
            stats.fragments_shaded,
            stats.fragments_written
        );

        Ok(stats)
    }

    /// Reset the frame's color to `(r, g, b, a)` and depth to the clear depth
    ///
    /// Each channel is scaled by 255 and clamped to `[0, 255]`.
    pub fn clear(&mut self, r: f32, g: f32, b: f32, a: f32) {
        log::debug!(
            "Clear {}x{} to ({}, {}, {}, {}), depth {}",
            self.frame.width(),
            self.frame.height(),
            r,
            g,
            b,
            a,
            self.config.clear_depth
        );
        self.frame.clear([r, g, b, a], self.config.clear_depth);
    }
}
