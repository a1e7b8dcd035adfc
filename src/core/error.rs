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

//! Error types for the rendering pipeline
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Failures are
//! terminal to the current draw call and never leave the framebuffer
//! partially written.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Index buffer is shorter than the requested ordinal
    #[error("index {ordinal} out of range for index buffer of {len} elements")]
    IndexOutOfRange { ordinal: u32, len: usize },

    /// Attribute read would run past the end of its backing buffer
    #[error("attribute slot {slot}: read of bytes {start}..{end} overruns buffer of {len} bytes")]
    BufferOverrun {
        slot: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Attribute component count is not 1, 2, 3 or 4
    #[error("unsupported attribute type with {components} components")]
    UnsupportedAttributeType { components: usize },

    /// Attribute slot index exceeds the vertex array capacity
    #[error("attribute slot {slot} out of range (max {max})")]
    AttributeSlotOutOfRange { slot: usize, max: usize },

    /// Triangle vertices disagree on the type stored in an attribute slot
    #[error("attribute slot {slot} has mismatched types across triangle vertices")]
    MismatchedAttribute { slot: usize },

    /// Color or depth storage does not match the frame dimensions
    #[error("frame {width}x{height} expects {expected_color} color bytes and {expected_depth} depth values, got {color} and {depth}")]
    FrameSizeMismatch {
        width: u32,
        height: u32,
        expected_color: usize,
        expected_depth: usize,
        color: usize,
        depth: usize,
    },

    /// Texture description is inconsistent with its data
    #[error("invalid texture {width}x{height}x{channels}: {reason}")]
    InvalidTexture {
        width: u32,
        height: u32,
        channels: u32,
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Frame snapshot could not be encoded
    #[error("failed to encode snapshot: {0}")]
    SnapshotEncode(#[from] bincode::error::EncodeError),

    /// Frame snapshot could not be decoded
    #[error("failed to decode snapshot: {0}")]
    SnapshotDecode(#[from] bincode::error::DecodeError),

    /// Snapshot contents are inconsistent
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
