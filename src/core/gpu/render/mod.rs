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

//! Rendering stages that operate on screen-space triangles
//!
//! - [`edge`]: Incremental edge-function state for serpentine traversal
//! - [`rasterizer`]: Bounding box, coverage, interpolation and write-back
//! - [`texture`]: Texture sampling helper for fragment stages

pub mod edge;
pub mod rasterizer;
pub mod texture;

pub use edge::{edge_value, EdgeWalker, ScanDirection};
pub use rasterizer::{BoundingBox, Rasterizer, MAX_SCREEN_COORD};
pub use texture::{Texture, UNBOUND_TEXTURE_COLOR};
