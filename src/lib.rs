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

//! softpipe: an in-process software rendering pipeline
//!
//! This crate fetches vertex attributes from caller-owned buffers, runs a
//! caller-supplied vertex stage, assembles independent triangles, rasterizes
//! them with an incremental edge-function scan and runs a caller-supplied
//! fragment stage for every covered pixel.
//!
//! # Architecture
//!
//! The pipeline is organized into the following modules:
//!
//! - [`core`]: Pipeline components (attribute fetch, transforms, rasterizer,
//!   framebuffer, texture sampling)
//!
//! # Example
//!
//! ```
//! use softpipe::core::gpu::{
//!     AttributeDescriptor, AttributeType, FrameBuffer, GpuContext, OutFragment, OutVertex,
//!     Program, VertexArray,
//! };
//! use softpipe::core::config::PipelineConfig;
//!
//! let positions: [f32; 6] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0];
//! let bytes: &[u8] = bytemuck::cast_slice(&positions);
//!
//! let mut vao = VertexArray::new();
//! vao.set_attribute(0, AttributeDescriptor::new(AttributeType::Vec2, bytes, 0, 8))?;
//!
//! let mut fb = FrameBuffer::new(8, 8);
//! let mut ctx = GpuContext::new(vao, fb.as_frame(), PipelineConfig::default());
//!
//! let program = Program::new(
//!     |v: &softpipe::core::gpu::InVertex, _: &()| {
//!         let p = v.attributes[0].as_vec4();
//!         OutVertex::at([p[0], p[1], 0.0, 1.0])
//!     },
//!     |_: &softpipe::core::gpu::InFragment, _: &()| OutFragment::color([1.0, 1.0, 1.0, 1.0]),
//!     (),
//! );
//!
//! ctx.clear(0.0, 0.0, 0.0, 1.0);
//! let stats = ctx.draw(&program, 3)?;
//! assert_eq!(stats.triangles, 1);
//! # Ok::<(), softpipe::core::error::PipelineError>(())
//! ```
//!
//! # Modules
//!
//! - [`core::gpu`]: Draw/clear entry points and pipeline stages
//! - [`core::config`]: Pipeline configuration loaded from TOML
//! - [`core::error`]: Error type shared by every fallible operation
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an alias for
//! `Result<T, PipelineError>`.

pub mod core;

// Re-export commonly used types
pub use core::error::{PipelineError, Result};
