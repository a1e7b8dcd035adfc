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

//! Attribute fetch
//!
//! Resolves draw ordinals to vertex ids through the optional index buffer and
//! reads attribute elements out of their backing buffers into an
//! [`InVertex`]. Every read is bounds-checked against the borrowed buffer.

use crate::core::error::{PipelineError, Result};

use super::primitives::{AttributeType, AttributeValue, InVertex};
use super::vertex_array::{AttributeDescriptor, IndexType, VertexArray};

/// Resolve the vertex id for the `ordinal`-th vertex of a draw call
///
/// With an index buffer bound, the `ordinal`-th index is read at the buffer's
/// element width and widened to `u32`. Without one, the ordinal is returned
/// unchanged.
///
/// # Errors
///
/// Returns [`PipelineError::IndexOutOfRange`] when the index buffer holds
/// fewer than `ordinal + 1` elements.
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::{resolve_vertex_id, IndexBuffer, VertexArray};
///
/// let mut vao = VertexArray::new();
/// assert_eq!(resolve_vertex_id(&vao, 5).unwrap(), 5);
///
/// let indices: [u8; 3] = [9, 4, 2];
/// vao.set_index_buffer(Some(IndexBuffer::from_u8(&indices)));
/// assert_eq!(resolve_vertex_id(&vao, 1).unwrap(), 4);
/// ```
pub fn resolve_vertex_id(vertex_array: &VertexArray<'_>, ordinal: u32) -> Result<u32> {
    let Some(indices) = vertex_array.index_buffer() else {
        return Ok(ordinal);
    };

    let ty = indices.index_type();
    let size = ty.byte_size();
    let bytes = indices.bytes();
    let out_of_range = PipelineError::IndexOutOfRange {
        ordinal,
        len: indices.len(),
    };
    let start = (ordinal as usize).checked_mul(size);
    let element = start
        .and_then(|start| bytes.get(start..start.checked_add(size)?))
        .ok_or(out_of_range)?;

    let id = match ty {
        IndexType::U8 => element[0] as u32,
        IndexType::U16 => bytemuck::pod_read_unaligned::<u16>(element) as u32,
        IndexType::U32 => bytemuck::pod_read_unaligned::<u32>(element),
    };
    Ok(id)
}

/// Byte range of the element `vertex_id` reads through `descriptor`
///
/// Returns `None` for a disabled descriptor.
fn element<'a>(
    descriptor: &AttributeDescriptor<'a>,
    slot: usize,
    vertex_id: u32,
) -> Result<Option<&'a [u8]>> {
    let Some(data) = descriptor.data else {
        return Ok(None);
    };

    let size = descriptor.ty.byte_size();
    let overrun = |start: usize, end: usize| PipelineError::BufferOverrun {
        slot,
        start,
        end,
        len: data.len(),
    };

    let start = descriptor
        .stride
        .checked_mul(vertex_id as usize)
        .and_then(|s| s.checked_add(descriptor.offset))
        .ok_or_else(|| overrun(usize::MAX, usize::MAX))?;
    let end = start
        .checked_add(size)
        .ok_or_else(|| overrun(start, usize::MAX))?;
    let bytes = data.get(start..end).ok_or_else(|| overrun(start, end))?;
    Ok(Some(bytes))
}

/// Read one attribute element for `vertex_id` into `slot` of `vertex`
///
/// A disabled descriptor (no backing storage) leaves the slot untouched.
/// Otherwise the element at `offset + stride * vertex_id` is reinterpreted as
/// the descriptor's component type.
///
/// # Errors
///
/// Returns [`PipelineError::BufferOverrun`] when the element does not lie
/// entirely within the backing buffer (including address overflow).
pub fn fetch_attribute(
    descriptor: &AttributeDescriptor<'_>,
    slot: usize,
    vertex_id: u32,
    vertex: &mut InVertex,
) -> Result<()> {
    let Some(bytes) = element(descriptor, slot, vertex_id)? else {
        return Ok(());
    };

    let value = match descriptor.ty {
        AttributeType::Float => AttributeValue::Float(bytemuck::pod_read_unaligned(bytes)),
        AttributeType::Vec2 => AttributeValue::Vec2(bytemuck::pod_read_unaligned(bytes)),
        AttributeType::Vec3 => AttributeValue::Vec3(bytemuck::pod_read_unaligned(bytes)),
        AttributeType::Vec4 => AttributeValue::Vec4(bytemuck::pod_read_unaligned(bytes)),
    };

    if let Some(s) = vertex.attributes.get_mut(slot) {
        *s = value;
    }
    Ok(())
}

/// Check that every vertex of a `vertex_count` draw call can be fetched
///
/// Resolves every index once but reads no attribute data and allocates
/// nothing. An element's end offset grows with the vertex id, so attribute
/// extents are checked at the largest resolved id only.
///
/// # Errors
///
/// Returns the same [`PipelineError::IndexOutOfRange`] or
/// [`PipelineError::BufferOverrun`] the draw itself would hit.
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::{validate_draw, AttributeDescriptor, AttributeType, VertexArray};
///
/// let positions = [0u8; 24];
/// let mut vao = VertexArray::new();
/// vao.set_attribute(0, AttributeDescriptor::new(AttributeType::Vec2, &positions, 0, 8))?;
///
/// assert!(validate_draw(&vao, 3).is_ok());
/// assert!(validate_draw(&vao, 4).is_err());
/// # Ok::<(), softpipe::core::error::PipelineError>(())
/// ```
pub fn validate_draw(vertex_array: &VertexArray<'_>, vertex_count: u32) -> Result<()> {
    let Some(last) = vertex_count.checked_sub(1) else {
        return Ok(());
    };

    let max_id = if vertex_array.index_buffer().is_some() {
        let mut max_id = 0;
        for ordinal in 0..vertex_count {
            max_id = max_id.max(resolve_vertex_id(vertex_array, ordinal)?);
        }
        max_id
    } else {
        last
    };

    for (slot, descriptor) in vertex_array.attributes() {
        element(descriptor, slot, max_id)?;
    }
    Ok(())
}

/// Build the vertex stage input for the `ordinal`-th vertex of a draw call
///
/// Resolves the vertex id and fetches every bound attribute.
pub fn assemble_vertex(vertex_array: &VertexArray<'_>, ordinal: u32) -> Result<InVertex> {
    let vertex_id = resolve_vertex_id(vertex_array, ordinal)?;
    let mut vertex = InVertex::new(vertex_id);

    for (slot, descriptor) in vertex_array.attributes() {
        fetch_attribute(descriptor, slot, vertex_id, &mut vertex)?;
    }

    Ok(vertex)
}
