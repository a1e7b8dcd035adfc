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

//! Framebuffer storage
//!
//! A [`Frame`] borrows caller-owned color and depth storage for the duration
//! of a draw or clear; the pipeline mutates it but never reallocates it.
//! [`FrameBuffer`] is an owned convenience container that lends out a
//! [`Frame`] and adds PPM export and binary snapshots.
//!
//! # Layout
//!
//! Pixels are stored row-major starting at `(0, 0)`. Color uses 4 bytes per
//! pixel (RGBA, 0-255), depth one `f32` per pixel.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::DEFAULT_CLEAR_DEPTH;
use crate::core::error::{PipelineError, Result};

/// Convert a normalized channel to a byte: `clamp(c * 255, 0, 255)`, truncated
#[inline]
pub fn to_unorm8(channel: f32) -> u8 {
    (channel * 255.0).clamp(0.0, 255.0) as u8
}

/// Borrowed color and depth storage of a render target
#[derive(Debug)]
pub struct Frame<'a> {
    width: u32,
    height: u32,
    color: &'a mut [u8],
    depth: &'a mut [f32],
}

impl<'a> Frame<'a> {
    /// Wrap caller-owned storage for a `width`x`height` target
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::FrameSizeMismatch`] unless `color` holds
    /// exactly `width * height * 4` bytes and `depth` exactly `width * height`
    /// values.
    pub fn new(width: u32, height: u32, color: &'a mut [u8], depth: &'a mut [f32]) -> Result<Self> {
        let pixels = width as usize * height as usize;
        if color.len() != pixels * 4 || depth.len() != pixels {
            return Err(PipelineError::FrameSizeMismatch {
                width,
                height,
                expected_color: pixels * 4,
                expected_depth: pixels,
                color: color.len(),
                depth: depth.len(),
            });
        }

        Ok(Self {
            width,
            height,
            color,
            depth,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to the given color and every depth value to `depth`
    ///
    /// Channels are scaled by 255 and clamped to `[0, 255]`.
    pub fn clear(&mut self, rgba: [f32; 4], depth: f32) {
        let bytes = rgba.map(to_unorm8);
        for pixel in self.color.chunks_exact_mut(4) {
            pixel.copy_from_slice(&bytes);
        }
        self.depth.fill(depth);
    }

    /// Linear pixel index of `(x, y)`; caller guarantees it is in bounds
    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Color bytes at `(x, y)`, `None` outside the frame
    pub fn color_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.color[i..i + 4]);
        Some(out)
    }

    /// Depth value at `(x, y)`, `None` outside the frame
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth[self.index(x, y)])
    }

    #[inline]
    pub(crate) fn depth_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.depth[index]
    }

    #[inline]
    pub(crate) fn color_mut(&mut self, index: usize) -> &mut [u8] {
        &mut self.color[index * 4..index * 4 + 4]
    }
}

/// Owned color and depth storage
///
/// Color starts transparent black and depth at [`DEFAULT_CLEAR_DEPTH`].
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::FrameBuffer;
///
/// let mut fb = FrameBuffer::new(4, 2);
/// fb.as_frame().clear([1.0, 0.0, 0.0, 1.0], 10e10);
/// assert_eq!(fb.pixel(3, 1), Some([255, 0, 0, 255]));
/// assert_eq!(fb.depth(3, 1), Some(10e10));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    color: Vec<u8>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    /// Allocate a `width`x`height` framebuffer
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![0; pixels * 4],
            depth: vec![DEFAULT_CLEAR_DEPTH; pixels],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the storage as a render target
    pub fn as_frame(&mut self) -> Frame<'_> {
        Frame {
            width: self.width,
            height: self.height,
            color: &mut self.color,
            depth: &mut self.depth,
        }
    }

    /// RGBA bytes of every pixel, row-major
    pub fn color(&self) -> &[u8] {
        &self.color
    }

    /// Depth of every pixel, row-major
    pub fn depth_values(&self) -> &[f32] {
        &self.depth
    }

    /// Color bytes at `(x, y)`, `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.color[i..i + 4]);
        Some(out)
    }

    /// Depth value at `(x, y)`, `None` outside the frame
    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth[y as usize * self.width as usize + x as usize])
    }

    /// Write the color buffer as a binary PPM (P6) image, dropping alpha
    ///
    /// Rows are emitted from the highest `y` down, so normalized `+y` ends up
    /// at the top of the image.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;

        let row_bytes = self.width as usize * 4;
        if row_bytes > 0 {
            for row in self.color.chunks_exact(row_bytes).rev() {
                for pixel in row.chunks_exact(4) {
                    writer.write_all(&pixel[..3])?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Save color and depth to a binary snapshot file
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        std::fs::write(path, bytes)?;
        log::debug!("Saved {}x{} frame snapshot", self.width, self.height);
        Ok(())
    }

    /// Load a snapshot written by [`FrameBuffer::save_snapshot`]
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidSnapshot`] when the stored buffers do
    /// not match the stored dimensions.
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let (fb, _): (FrameBuffer, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;

        let pixels = fb.width as usize * fb.height as usize;
        if fb.color.len() != pixels * 4 || fb.depth.len() != pixels {
            return Err(PipelineError::InvalidSnapshot(format!(
                "{}x{} frame with {} color bytes and {} depth values",
                fb.width,
                fb.height,
                fb.color.len(),
                fb.depth.len()
            )));
        }
        Ok(fb)
    }
}
