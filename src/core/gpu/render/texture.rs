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

//! Texture sampling
//!
//! Nearest-neighbor, repeat-addressed texture lookup for fragment stages.
//! The pipeline itself never samples; fragment stages capture a [`Texture`]
//! in their uniform block and call [`Texture::sample`].
//!
//! # Addressing
//!
//! Each UV component is wrapped to `[0, 1)` by taking its fractional part,
//! then mapped to a texel with `uv * (size - 1) + 0.5`, truncated.

use crate::core::error::{PipelineError, Result};

/// Color returned when sampling a texture without data: opaque black
pub const UNBOUND_TEXTURE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Borrowed 8-bit texture with 1 to 4 interleaved channels
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::render::Texture;
///
/// // 2x1 RGB texture: red, green
/// let data = [255, 0, 0, 0, 255, 0];
/// let texture = Texture::new(2, 1, 3, &data).unwrap();
///
/// assert_eq!(texture.sample([0.0, 0.0]), [1.0, 0.0, 0.0, 1.0]);
/// assert_eq!(texture.sample([0.75, 0.0]), [0.0, 1.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture<'a> {
    width: u32,
    height: u32,
    channels: u32,
    data: Option<&'a [u8]>,
}

impl<'a> Texture<'a> {
    /// Wrap row-major texel data
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidTexture`] when a dimension is zero,
    /// `channels` is outside 1..=4, or `data` is shorter than
    /// `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u32, data: &'a [u8]) -> Result<Self> {
        let invalid = |reason: String| PipelineError::InvalidTexture {
            width,
            height,
            channels,
            reason,
        };

        if width == 0 || height == 0 {
            return Err(invalid("zero-sized texture".to_string()));
        }
        if !(1..=4).contains(&channels) {
            return Err(invalid("channel count must be 1 to 4".to_string()));
        }
        let required = width as usize * height as usize * channels as usize;
        if data.len() < required {
            return Err(invalid(format!(
                "{} bytes of data, {} required",
                data.len(),
                required
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            data: Some(data),
        })
    }

    /// Texture with no data bound
    pub fn unbound() -> Self {
        Self {
            width: 0,
            height: 0,
            channels: 0,
            data: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// Sample the nearest texel at `uv` with repeat addressing
    ///
    /// Channels the texture does not store read as 0, except alpha which
    /// reads as 1. An unbound texture returns [`UNBOUND_TEXTURE_COLOR`].
    pub fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        let Some(data) = self.data else {
            return UNBOUND_TEXTURE_COLOR;
        };

        let x = Self::texel(uv[0], self.width);
        let y = Self::texel(uv[1], self.height);
        let base = (y as usize * self.width as usize + x as usize) * self.channels as usize;

        let mut color = [0.0, 0.0, 0.0, 1.0];
        for (c, out) in color.iter_mut().take(self.channels as usize).enumerate() {
            *out = data[base + c] as f32 / 255.0;
        }
        color
    }

    /// Wrap one coordinate and map it to a texel index in `0..size`
    #[inline]
    fn texel(coord: f32, size: u32) -> u32 {
        let wrapped = coord - coord.floor();
        let texel = (wrapped * (size - 1) as f32 + 0.5) as u32;
        texel.min(size - 1)
    }
}

impl Default for Texture<'_> {
    fn default() -> Self {
        Self::unbound()
    }
}
