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

//! Software Rasterizer
//!
//! This module converts screen-space triangles into fragments. Covered pixels
//! are found with three incrementally updated edge functions and handed to the
//! program's fragment stage.
//!
//! # Algorithm
//!
//! 1. Truncate vertex X/Y to the integer pixel grid
//! 2. Compute the triangle's bounding box and clamp it to the frame
//! 3. Evaluate the three edge functions once at the box's first corner
//! 4. Walk the box in serpentine order, updating the edge values by a fixed
//!    delta per pixel and per row (see [`EdgeWalker`])
//! 5. For every covered pixel:
//!    - Interpolate attributes and depth with screen-space barycentric weights
//!    - Run the fragment stage
//!    - Depth test (LESS) against the stored depth
//!    - Write color and depth through the configured write mask
//!
//! Interpolation is linear in screen space, not perspective-correct.
//!
//! # References
//!
//! - [Pineda: A Parallel Algorithm for Polygon Rasterization](https://dl.acm.org/doi/10.1145/54852.378457)
//! - [Scratchapixel: Rasterization](https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation)

use crate::core::config::{FillRule, PipelineConfig, WriteMask};

use super::super::framebuffer::{to_unorm8, Frame};
use super::super::primitives::{AttributeValue, InFragment, Triangle, MAX_ATTRIBUTES};
use super::super::program::{FragmentStage, Program, VertexStage};
use super::super::DrawStats;
use super::edge::{EdgeWalker, ScanDirection};

/// Largest screen coordinate magnitude the rasterizer accepts
///
/// Keeps every edge-function product well inside `i64`.
pub const MAX_SCREEN_COORD: f32 = (1 << 24) as f32;

/// Inclusive pixel rectangle `[min_x, max_x] x [min_y, max_y]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BoundingBox {
    /// Bounding box of three grid points clamped to a `width`x`height` frame
    ///
    /// Returns `None` when the clamped box is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use softpipe::core::gpu::render::BoundingBox;
    ///
    /// let bbox = BoundingBox::clamped([[-5, 2], [3, 9], [12, 4]], 10, 8).unwrap();
    /// assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (0, 2, 9, 7));
    ///
    /// assert!(BoundingBox::clamped([[20, 20], [30, 20], [20, 30]], 10, 8).is_none());
    /// ```
    pub fn clamped(points: [[i64; 2]; 3], width: u32, height: u32) -> Option<Self> {
        let min_x = points.iter().map(|p| p[0]).min()?.max(0);
        let min_y = points.iter().map(|p| p[1]).min()?.max(0);
        let max_x = points.iter().map(|p| p[0]).max()?.min(width as i64 - 1);
        let max_y = points.iter().map(|p| p[1]).max()?.min(height as i64 - 1);

        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn width(&self) -> i64 {
        self.max_x - self.min_x + 1
    }
}

/// Triangle rasterizer using incremental edge functions
///
/// # Examples
///
/// ```
/// use softpipe::core::config::PipelineConfig;
/// use softpipe::core::gpu::render::Rasterizer;
/// use softpipe::core::gpu::{
///     DrawStats, FrameBuffer, InFragment, InVertex, OutFragment, OutVertex, Program, Triangle,
/// };
///
/// let mut fb = FrameBuffer::new(8, 8);
/// let program = Program::new(
///     |_: &InVertex, _: &()| OutVertex::default(),
///     |_: &InFragment, _: &()| OutFragment::color([0.0, 1.0, 0.0, 1.0]),
///     (),
/// );
/// let triangle = Triangle {
///     vertices: [
///         OutVertex::at([0.0, 0.0, 0.0, 1.0]),
///         OutVertex::at([4.0, 0.0, 0.0, 1.0]),
///         OutVertex::at([0.0, 4.0, 0.0, 1.0]),
///     ],
/// };
///
/// let mut frame = fb.as_frame();
/// frame.clear([0.0, 0.0, 0.0, 1.0], 10e10);
///
/// let mut stats = DrawStats::default();
/// Rasterizer::new(&PipelineConfig::default()).draw_triangle(&mut frame, &triangle, &program, &mut stats);
/// assert_eq!(fb.pixel(1, 1), Some([0, 255, 0, 255]));
/// assert_eq!(fb.pixel(3, 3), Some([0, 0, 0, 255]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rasterizer {
    fill_rule: FillRule,
    depth_test: bool,
    write_mask: WriteMask,
}

impl Rasterizer {
    /// Create a rasterizer from the pipeline configuration
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            fill_rule: config.fill_rule,
            depth_test: config.depth_test,
            write_mask: config.write_mask,
        }
    }

    /// Truncate a screen-space position to the pixel grid
    ///
    /// Returns `None` when either coordinate exceeds [`MAX_SCREEN_COORD`].
    fn snap(position: [f32; 4]) -> Option<[i64; 2]> {
        let [x, y, _, _] = position;
        if x.abs() > MAX_SCREEN_COORD || y.abs() > MAX_SCREEN_COORD {
            return None;
        }
        Some([x as i64, y as i64])
    }

    /// Rasterize one screen-space triangle
    ///
    /// The triangle's positions must already be transformed to screen space
    /// with `w > 0`, and its attribute slots must pass [`Triangle::validate`].
    /// Returns `false` when the triangle was rejected for exceeding
    /// [`MAX_SCREEN_COORD`].
    pub fn draw_triangle<V, F, U>(
        &self,
        frame: &mut Frame<'_>,
        triangle: &Triangle,
        program: &Program<V, F, U>,
        stats: &mut DrawStats,
    ) -> bool
    where
        V: VertexStage<U>,
        F: FragmentStage<U>,
    {
        let [a, b, c] = &triangle.vertices;
        let (Some(p0), Some(p1), Some(p2)) =
            (Self::snap(a.position), Self::snap(b.position), Self::snap(c.position))
        else {
            return false;
        };
        let points = [p0, p1, p2];

        let Some(bbox) = BoundingBox::clamped(points, frame.width(), frame.height()) else {
            return true;
        };
        let Some(mut walker) = EdgeWalker::new(points, bbox.min_x, bbox.min_y, self.fill_rule) else {
            log::trace!("Skipping zero-area triangle {:?}", points);
            return true;
        };

        log::trace!(
            "Rasterizing triangle ({},{}),({},{}),({},{}) bbox x={}..={} y={}..={}",
            p0[0], p0[1], p1[0], p1[1], p2[0], p2[1],
            bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y
        );

        let depths = triangle.vertices.map(|v| v.position[2] / v.position[3]);
        let active_slots = a.attributes.map(|value| value != AttributeValue::Empty);

        let row_len = bbox.width();
        for y in bbox.min_y..=bbox.max_y {
            for step in 0..row_len {
                let x = match walker.direction() {
                    ScanDirection::LeftToRight => bbox.min_x + step,
                    ScanDirection::RightToLeft => bbox.max_x - step,
                };

                if walker.covers() {
                    self.shade_pixel(frame, triangle, program, &walker, &depths, &active_slots, x, y, stats);
                }

                if step + 1 < row_len {
                    walker.step_pixel();
                }
            }
            walker.step_row();
        }

        true
    }

    /// Interpolate, shade, depth test and write back one covered pixel
    #[allow(clippy::too_many_arguments)]
    fn shade_pixel<V, F, U>(
        &self,
        frame: &mut Frame<'_>,
        triangle: &Triangle,
        program: &Program<V, F, U>,
        walker: &EdgeWalker,
        depths: &[f32; 3],
        active_slots: &[bool; MAX_ATTRIBUTES],
        x: i64,
        y: i64,
        stats: &mut DrawStats,
    ) where
        V: VertexStage<U>,
        F: FragmentStage<U>,
    {
        let weights = walker.barycentric();
        let depth = weights[0] * depths[0] + weights[1] * depths[1] + weights[2] * depths[2];

        let mut fragment = InFragment {
            frag_coord: [x as f32, y as f32, depth, 1.0],
            attributes: [AttributeValue::Empty; MAX_ATTRIBUTES],
        };
        let [a, b, c] = &triangle.vertices;
        for slot in (0..MAX_ATTRIBUTES).filter(|&slot| active_slots[slot]) {
            fragment.attributes[slot] = AttributeValue::interpolate(
                [&a.attributes[slot], &b.attributes[slot], &c.attributes[slot]],
                weights,
            )
            .unwrap_or_default();
        }

        stats.fragments_shaded += 1;
        let out = program.shade_fragment(&fragment);
        let depth = out.depth.unwrap_or(depth);

        // Bounding box is clamped to the frame, so both coordinates are in range
        let index = frame.index(x as u32, y as u32);
        let passes = depth < *frame.depth_mut(index);
        if self.depth_test && !passes {
            return;
        }
        if self.write_mask.is_empty() {
            return;
        }

        if self.write_mask.intersects(WriteMask::COLOR) {
            let channels = [WriteMask::RED, WriteMask::GREEN, WriteMask::BLUE, WriteMask::ALPHA];
            let pixel = frame.color_mut(index);
            for (i, channel) in channels.into_iter().enumerate() {
                if self.write_mask.contains(channel) {
                    pixel[i] = to_unorm8(out.color[i]);
                }
            }
        }
        if self.write_mask.contains(WriteMask::DEPTH) {
            *frame.depth_mut(index) = depth;
        }
        stats.fragments_written += 1;
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gpu::framebuffer::FrameBuffer;
    use crate::core::gpu::primitives::{InVertex, OutFragment, OutVertex};
    use std::cell::RefCell;

    fn screen_triangle(points: [[f32; 2]; 3], z: f32) -> Triangle {
        Triangle {
            vertices: points.map(|[x, y]| OutVertex::at([x, y, z, 1.0])),
        }
    }

    type VertexFn = fn(&InVertex, &()) -> OutVertex;

    fn passthrough(_: &InVertex, _: &()) -> OutVertex {
        OutVertex::default()
    }

    fn solid(color: [f32; 4]) -> Program<VertexFn, impl Fn(&InFragment, &()) -> OutFragment, ()> {
        Program::new(
            passthrough as VertexFn,
            move |_: &InFragment, _: &()| OutFragment::color(color),
            (),
        )
    }

    fn cleared(width: u32, height: u32) -> FrameBuffer {
        let mut fb = FrameBuffer::new(width, height);
        fb.as_frame().clear([0.0, 0.0, 0.0, 0.0], 10e10);
        fb
    }

    #[test]
    fn test_bounding_box_clamps() {
        let bbox = BoundingBox::clamped([[-3, -3], [100, 2], [4, 50]], 16, 16).unwrap();
        assert_eq!(bbox, BoundingBox { min_x: 0, min_y: 0, max_x: 15, max_y: 15 });
        assert_eq!(bbox.width(), 16);
    }

    #[test]
    fn test_bounding_box_empty_frame() {
        assert!(BoundingBox::clamped([[0, 0], [1, 0], [0, 1]], 0, 0).is_none());
    }

    #[test]
    fn test_fragment_invoked_once_per_covered_pixel() {
        let visited = RefCell::new(Vec::new());
        let program = Program::new(
            |_: &InVertex, _: &()| OutVertex::default(),
            |f: &InFragment, _: &()| {
                visited.borrow_mut().push((f.frag_coord[0] as i64, f.frag_coord[1] as i64));
                OutFragment::default()
            },
            (),
        );

        let verts = [[1i64, 1], [9, 2], [3, 8]];
        let triangle = screen_triangle(verts.map(|[x, y]| [x as f32, y as f32]), 0.0);
        let mut fb = cleared(12, 12);
        let mut stats = DrawStats::default();
        Rasterizer::default().draw_triangle(&mut fb.as_frame(), &triangle, &program, &mut stats);

        drop(program);
        let mut visited = visited.into_inner();
        visited.sort();
        let before_dedup = visited.len();
        visited.dedup();
        assert_eq!(before_dedup, visited.len(), "a pixel was shaded twice");

        let mut expected = Vec::new();
        for y in 0..12 {
            for x in 0..12 {
                let w = EdgeWalker::new(verts, x, y, FillRule::Inclusive).unwrap();
                if w.covers() {
                    expected.push((x, y));
                }
            }
        }
        expected.sort();
        assert_eq!(visited, expected);
        assert_eq!(stats.fragments_shaded as usize, expected.len());
    }

    #[test]
    fn test_writes_color_and_depth() {
        let mut fb = cleared(8, 8);
        let triangle = screen_triangle([[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]], 0.5);
        let mut stats = DrawStats::default();
        Rasterizer::default().draw_triangle(&mut fb.as_frame(), &triangle, &solid([1.0, 0.0, 1.0, 1.0]), &mut stats);

        assert_eq!(fb.pixel(1, 1), Some([255, 0, 255, 255]));
        assert_eq!(fb.depth(1, 1), Some(0.5));
        assert_eq!(fb.pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(fb.depth(3, 3), Some(10e10));
        assert_eq!(stats.fragments_written, stats.fragments_shaded);
    }

    #[test]
    fn test_depth_test_rejects_farther() {
        let mut fb = cleared(8, 8);
        let rasterizer = Rasterizer::default();
        let mut stats = DrawStats::default();

        let near = screen_triangle([[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]], 0.2);
        let far = screen_triangle([[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]], 0.8);
        rasterizer.draw_triangle(&mut fb.as_frame(), &near, &solid([1.0, 0.0, 0.0, 1.0]), &mut stats);
        rasterizer.draw_triangle(&mut fb.as_frame(), &far, &solid([0.0, 0.0, 1.0, 1.0]), &mut stats);

        assert_eq!(fb.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(stats.fragments_written * 2, stats.fragments_shaded);
    }

    #[test]
    fn test_depth_test_disabled_last_write_wins() {
        let mut fb = cleared(8, 8);
        let config = PipelineConfig {
            depth_test: false,
            ..PipelineConfig::default()
        };
        let rasterizer = Rasterizer::new(&config);
        let mut stats = DrawStats::default();

        let near = screen_triangle([[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]], 0.2);
        let far = screen_triangle([[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]], 0.8);
        rasterizer.draw_triangle(&mut fb.as_frame(), &near, &solid([1.0, 0.0, 0.0, 1.0]), &mut stats);
        rasterizer.draw_triangle(&mut fb.as_frame(), &far, &solid([0.0, 0.0, 1.0, 1.0]), &mut stats);

        assert_eq!(fb.pixel(1, 1), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_empty_write_mask_leaves_frame() {
        let mut fb = cleared(8, 8);
        let before = fb.clone();
        let rasterizer = Rasterizer::new(&PipelineConfig::shade_only());
        let mut stats = DrawStats::default();

        let triangle = screen_triangle([[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]], 0.2);
        rasterizer.draw_triangle(&mut fb.as_frame(), &triangle, &solid([1.0, 1.0, 1.0, 1.0]), &mut stats);

        assert!(stats.fragments_shaded > 0);
        assert_eq!(stats.fragments_written, 0);
        assert_eq!(fb, before);
    }

    #[test]
    fn test_partial_write_mask() {
        let mut fb = cleared(8, 8);
        let config = PipelineConfig {
            write_mask: WriteMask::GREEN,
            ..PipelineConfig::default()
        };
        let mut stats = DrawStats::default();

        let triangle = screen_triangle([[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]], 0.2);
        Rasterizer::new(&config).draw_triangle(&mut fb.as_frame(), &triangle, &solid([1.0, 1.0, 1.0, 1.0]), &mut stats);

        assert_eq!(fb.pixel(1, 1), Some([0, 255, 0, 0]));
        assert_eq!(fb.depth(1, 1), Some(10e10));
    }

    #[test]
    fn test_attribute_interpolation() {
        let program = Program::new(
            |_: &InVertex, _: &()| OutVertex::default(),
            |f: &InFragment, _: &()| {
                let c = f.attributes[1].as_vec3();
                OutFragment::color([c[0], c[1], c[2], 1.0])
            },
            (),
        );

        let mut triangle = screen_triangle([[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]], 0.0);
        triangle.vertices[0].attributes[1] = AttributeValue::Vec3([1.0, 0.0, 0.0]);
        triangle.vertices[1].attributes[1] = AttributeValue::Vec3([0.0, 1.0, 0.0]);
        triangle.vertices[2].attributes[1] = AttributeValue::Vec3([0.0, 0.0, 1.0]);

        let mut fb = cleared(8, 8);
        let mut stats = DrawStats::default();
        Rasterizer::default().draw_triangle(&mut fb.as_frame(), &triangle, &program, &mut stats);

        assert_eq!(fb.pixel(0, 0), Some([255, 0, 0, 255]));
        // (4, 0): halfway along the first edge
        assert_eq!(fb.pixel(4, 0), Some([127, 127, 0, 255]));
        // (0, 4): halfway along the third edge
        assert_eq!(fb.pixel(0, 4), Some([127, 0, 127, 255]));
    }

    #[test]
    fn test_only_written_slots_interpolated() {
        let slots = RefCell::new(Vec::new());
        let program = Program::new(
            |_: &InVertex, _: &()| OutVertex::default(),
            |f: &InFragment, _: &()| {
                slots.borrow_mut().push(f.attributes);
                OutFragment::default()
            },
            (),
        );

        let last = MAX_ATTRIBUTES - 1;
        let mut triangle = screen_triangle([[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]], 0.0);
        for vertex in &mut triangle.vertices {
            vertex.attributes[0] = AttributeValue::Float(2.0);
            vertex.attributes[last] = AttributeValue::Vec2([1.0, -1.0]);
        }

        let mut fb = cleared(8, 8);
        let mut stats = DrawStats::default();
        Rasterizer::default().draw_triangle(&mut fb.as_frame(), &triangle, &program, &mut stats);
        drop(program);

        let slots = slots.into_inner();
        assert_eq!(slots.len() as u64, stats.fragments_shaded);
        for attributes in slots {
            assert_eq!(attributes[0], AttributeValue::Float(2.0));
            assert_eq!(attributes[last], AttributeValue::Vec2([1.0, -1.0]));
            assert!(attributes[1..last].iter().all(|v| *v == AttributeValue::Empty));
        }
    }

    #[test]
    fn test_fragment_depth_override() {
        let program = Program::new(
            |_: &InVertex, _: &()| OutVertex::default(),
            |_: &InFragment, _: &()| OutFragment {
                color: [1.0; 4],
                depth: Some(-3.0),
            },
            (),
        );
        let triangle = screen_triangle([[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]], 0.5);
        let mut fb = cleared(8, 8);
        let mut stats = DrawStats::default();
        Rasterizer::default().draw_triangle(&mut fb.as_frame(), &triangle, &program, &mut stats);

        assert_eq!(fb.depth(1, 1), Some(-3.0));
    }

    #[test]
    fn test_offscreen_triangle_no_fragments() {
        let triangle = screen_triangle([[-20.0, -20.0], [-10.0, -20.0], [-20.0, -10.0]], 0.0);
        let mut fb = cleared(8, 8);
        let mut stats = DrawStats::default();
        let drawn = Rasterizer::default().draw_triangle(&mut fb.as_frame(), &triangle, &solid([1.0; 4]), &mut stats);

        assert!(drawn);
        assert_eq!(stats.fragments_shaded, 0);
    }

    #[test]
    fn test_huge_coordinates_rejected() {
        let triangle = screen_triangle([[0.0, 0.0], [1e30, 0.0], [0.0, 4.0]], 0.0);
        let mut fb = cleared(8, 8);
        let mut stats = DrawStats::default();
        let drawn = Rasterizer::default().draw_triangle(&mut fb.as_frame(), &triangle, &solid([1.0; 4]), &mut stats);

        assert!(!drawn);
        assert_eq!(stats.fragments_shaded, 0);
    }
}
