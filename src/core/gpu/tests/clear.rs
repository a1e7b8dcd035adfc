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

use proptest::prelude::*;

use crate::core::config::PipelineConfig;
use crate::core::gpu::{FrameBuffer, GpuContext, VertexArray};

#[test]
fn test_clear_sets_every_pixel() {
    let mut fb = FrameBuffer::new(5, 3);
    {
        let mut ctx = GpuContext::new(VertexArray::new(), fb.as_frame(), PipelineConfig::default());
        ctx.clear(1.0, 0.0, 0.0, 1.0);
    }

    for y in 0..3 {
        for x in 0..5 {
            assert_eq!(fb.pixel(x, y), Some([255, 0, 0, 255]));
            assert_eq!(fb.depth(x, y), Some(10e10));
        }
    }
}

#[test]
fn test_clear_uses_configured_depth() {
    let config = PipelineConfig {
        clear_depth: 1.0,
        ..PipelineConfig::default()
    };
    let mut fb = FrameBuffer::new(2, 2);
    GpuContext::new(VertexArray::new(), fb.as_frame(), config).clear(0.0, 0.0, 0.0, 0.0);

    assert!(fb.depth_values().iter().all(|&d| d == 1.0));
}

#[test]
fn test_clear_empty_frame() {
    let mut fb = FrameBuffer::new(0, 0);
    GpuContext::new(VertexArray::new(), fb.as_frame(), PipelineConfig::default()).clear(1.0, 1.0, 1.0, 1.0);
    assert!(fb.color().is_empty());
}

proptest! {
    #[test]
    fn prop_clear_is_idempotent(
        r in -1.0f32..2.0,
        g in -1.0f32..2.0,
        b in -1.0f32..2.0,
        a in -1.0f32..2.0,
        width in 1u32..16,
        height in 1u32..16,
    ) {
        let mut once = FrameBuffer::new(width, height);
        GpuContext::new(VertexArray::new(), once.as_frame(), PipelineConfig::default()).clear(r, g, b, a);

        let mut twice = FrameBuffer::new(width, height);
        {
            let mut ctx = GpuContext::new(VertexArray::new(), twice.as_frame(), PipelineConfig::default());
            ctx.clear(r, g, b, a);
            ctx.clear(r, g, b, a);
        }

        prop_assert_eq!(once, twice);
    }
}
