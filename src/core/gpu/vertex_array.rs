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

//! Vertex array description
//!
//! A [`VertexArray`] binds up to [`MAX_ATTRIBUTES`] attribute descriptors and
//! an optional index buffer. All storage is borrowed from the caller for the
//! lifetime `'a`; the pipeline never allocates or frees it.
//!
//! # Attribute Layout
//!
//! The element for vertex id `i` of an attribute starts at byte
//! `offset + stride * i` of its backing buffer and spans
//! `AttributeType::byte_size()` bytes of native-endian `f32` components.

use crate::core::error::{PipelineError, Result};

use super::primitives::{AttributeType, MAX_ATTRIBUTES};

/// Description of one vertex attribute stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeDescriptor<'a> {
    /// Component layout of each element
    pub ty: AttributeType,
    /// Backing storage, `None` disables the attribute
    pub data: Option<&'a [u8]>,
    /// Byte offset of the first element
    pub offset: usize,
    /// Byte distance between consecutive elements
    pub stride: usize,
}

impl<'a> AttributeDescriptor<'a> {
    /// Create an enabled attribute backed by `data`
    pub fn new(ty: AttributeType, data: &'a [u8], offset: usize, stride: usize) -> Self {
        Self {
            ty,
            data: Some(data),
            offset,
            stride,
        }
    }

    /// Create an attribute from a raw component count
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedAttributeType`] when `components`
    /// is not 1, 2, 3 or 4.
    pub fn with_components(
        components: usize,
        data: &'a [u8],
        offset: usize,
        stride: usize,
    ) -> Result<Self> {
        let ty = AttributeType::from_components(components)?;
        Ok(Self::new(ty, data, offset, stride))
    }

    /// Create a disabled attribute; fetch leaves its slot untouched
    pub fn disabled(ty: AttributeType) -> Self {
        Self {
            ty,
            data: None,
            offset: 0,
            stride: 0,
        }
    }

    /// Whether the attribute has backing storage
    pub fn is_enabled(&self) -> bool {
        self.data.is_some()
    }
}

/// Width of index buffer elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 8-bit indices
    U8,
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index
    pub fn byte_size(self) -> usize {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Borrowed index buffer with a fixed element width
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::{IndexBuffer, IndexType};
///
/// let indices: [u16; 3] = [2, 1, 0];
/// let buffer = IndexBuffer::from_u16(&indices);
/// assert_eq!(buffer.index_type(), IndexType::U16);
/// assert_eq!(buffer.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBuffer<'a> {
    data: &'a [u8],
    ty: IndexType,
}

impl<'a> IndexBuffer<'a> {
    /// Wrap raw bytes holding native-endian indices of width `ty`
    ///
    /// Trailing bytes that do not form a whole index are ignored.
    pub fn from_bytes(data: &'a [u8], ty: IndexType) -> Self {
        Self { data, ty }
    }

    /// Wrap a slice of 8-bit indices
    pub fn from_u8(indices: &'a [u8]) -> Self {
        Self::from_bytes(indices, IndexType::U8)
    }

    /// Wrap a slice of 16-bit indices
    pub fn from_u16(indices: &'a [u16]) -> Self {
        Self::from_bytes(bytemuck::cast_slice(indices), IndexType::U16)
    }

    /// Wrap a slice of 32-bit indices
    pub fn from_u32(indices: &'a [u32]) -> Self {
        Self::from_bytes(bytemuck::cast_slice(indices), IndexType::U32)
    }

    /// Element width
    pub fn index_type(&self) -> IndexType {
        self.ty
    }

    /// Number of whole indices in the buffer
    pub fn len(&self) -> usize {
        self.data.len() / self.ty.byte_size()
    }

    /// Whether the buffer holds no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes of the buffer
    pub(crate) fn bytes(&self) -> &'a [u8] {
        self.data
    }
}

/// Attribute streams and optional index buffer for a draw call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexArray<'a> {
    attributes: [Option<AttributeDescriptor<'a>>; MAX_ATTRIBUTES],
    index_buffer: Option<IndexBuffer<'a>>,
}

impl<'a> VertexArray<'a> {
    /// Create a vertex array with no attributes and no index buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an attribute descriptor to a slot
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AttributeSlotOutOfRange`] when `slot >= MAX_ATTRIBUTES`.
    pub fn set_attribute(&mut self, slot: usize, descriptor: AttributeDescriptor<'a>) -> Result<()> {
        let entry = self
            .attributes
            .get_mut(slot)
            .ok_or(PipelineError::AttributeSlotOutOfRange {
                slot,
                max: MAX_ATTRIBUTES,
            })?;
        *entry = Some(descriptor);
        Ok(())
    }

    /// Unbind the attribute in a slot
    pub fn clear_attribute(&mut self, slot: usize) {
        if let Some(entry) = self.attributes.get_mut(slot) {
            *entry = None;
        }
    }

    /// Descriptor bound to a slot, if any
    pub fn attribute(&self, slot: usize) -> Option<&AttributeDescriptor<'a>> {
        self.attributes.get(slot).and_then(Option::as_ref)
    }

    /// Iterate over `(slot, descriptor)` pairs of bound attributes
    pub fn attributes(&self) -> impl Iterator<Item = (usize, &AttributeDescriptor<'a>)> {
        self.attributes
            .iter()
            .enumerate()
            .filter_map(|(slot, d)| d.as_ref().map(|d| (slot, d)))
    }

    /// Bind or unbind the index buffer
    pub fn set_index_buffer(&mut self, index_buffer: Option<IndexBuffer<'a>>) {
        self.index_buffer = index_buffer;
    }

    /// Bound index buffer, if any
    pub fn index_buffer(&self) -> Option<&IndexBuffer<'a>> {
        self.index_buffer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_out_of_range() {
        let data = [0u8; 16];
        let mut vao = VertexArray::new();
        let result = vao.set_attribute(
            MAX_ATTRIBUTES,
            AttributeDescriptor::new(AttributeType::Float, &data, 0, 4),
        );
        assert!(matches!(
            result,
            Err(PipelineError::AttributeSlotOutOfRange { slot: 16, max: 16 })
        ));
    }

    #[test]
    fn test_bound_attributes_iteration() {
        let data = [0u8; 16];
        let mut vao = VertexArray::new();
        vao.set_attribute(3, AttributeDescriptor::new(AttributeType::Vec2, &data, 0, 8))
            .unwrap();
        vao.set_attribute(7, AttributeDescriptor::disabled(AttributeType::Vec4))
            .unwrap();

        let slots: Vec<usize> = vao.attributes().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![3, 7]);
        assert!(vao.attribute(3).unwrap().is_enabled());
        assert!(!vao.attribute(7).unwrap().is_enabled());

        vao.clear_attribute(3);
        assert!(vao.attribute(3).is_none());
    }

    #[test]
    fn test_with_components() {
        let data = [0u8; 16];
        let d = AttributeDescriptor::with_components(3, &data, 4, 12).unwrap();
        assert_eq!(d.ty, AttributeType::Vec3);
        assert!(AttributeDescriptor::with_components(7, &data, 0, 0).is_err());
    }

    #[test]
    fn test_index_buffer_len() {
        let bytes = [0u8; 7];
        assert_eq!(IndexBuffer::from_bytes(&bytes, IndexType::U8).len(), 7);
        assert_eq!(IndexBuffer::from_bytes(&bytes, IndexType::U16).len(), 3);
        assert_eq!(IndexBuffer::from_bytes(&bytes, IndexType::U32).len(), 1);

        let none: [u32; 0] = [];
        assert!(IndexBuffer::from_u32(&none).is_empty());
    }
}
