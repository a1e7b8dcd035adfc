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

//! Pipeline primitive type definitions
//!
//! This module contains the records that flow between pipeline stages:
//! typed attribute values, vertex stage input/output, fragment stage
//! input/output, and assembled triangles.

use crate::core::error::{PipelineError, Result};

/// Number of attribute slots carried by every vertex and fragment record
pub const MAX_ATTRIBUTES: usize = 16;

/// Component layout of a vertex attribute
///
/// Every component is a 32-bit float, so the byte size of an attribute is
/// `4 * components`.
///
/// # Examples
///
/// ```
/// use softpipe::core::gpu::AttributeType;
///
/// assert_eq!(AttributeType::Vec3.components(), 3);
/// assert_eq!(AttributeType::Vec3.byte_size(), 12);
/// assert_eq!(AttributeType::from_components(2).unwrap(), AttributeType::Vec2);
/// assert!(AttributeType::from_components(5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// Single float
    Float,
    /// Two floats
    Vec2,
    /// Three floats
    Vec3,
    /// Four floats
    Vec4,
}

impl AttributeType {
    /// Number of float components
    pub fn components(self) -> usize {
        match self {
            AttributeType::Float => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
        }
    }

    /// Size in bytes of one attribute element
    pub fn byte_size(self) -> usize {
        self.components() * std::mem::size_of::<f32>()
    }

    /// Look up the attribute type with the given component count
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedAttributeType`] for counts outside 1..=4.
    pub fn from_components(components: usize) -> Result<Self> {
        match components {
            1 => Ok(AttributeType::Float),
            2 => Ok(AttributeType::Vec2),
            3 => Ok(AttributeType::Vec3),
            4 => Ok(AttributeType::Vec4),
            _ => Err(PipelineError::UnsupportedAttributeType { components }),
        }
    }
}

/// A typed attribute value held in a vertex or fragment slot
///
/// Slots that were never written hold [`AttributeValue::Empty`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AttributeValue {
    /// Slot not populated
    #[default]
    Empty,
    /// Scalar value
    Float(f32),
    /// Two-component vector
    Vec2([f32; 2]),
    /// Three-component vector
    Vec3([f32; 3]),
    /// Four-component vector
    Vec4([f32; 4]),
}

impl AttributeValue {
    /// Attribute type of the stored value, `None` for an empty slot
    pub fn attribute_type(&self) -> Option<AttributeType> {
        match self {
            AttributeValue::Empty => None,
            AttributeValue::Float(_) => Some(AttributeType::Float),
            AttributeValue::Vec2(_) => Some(AttributeType::Vec2),
            AttributeValue::Vec3(_) => Some(AttributeType::Vec3),
            AttributeValue::Vec4(_) => Some(AttributeType::Vec4),
        }
    }

    /// Build a value of the given type from its components
    ///
    /// `components` must hold at least `ty.components()` floats.
    pub(crate) fn from_slice(ty: AttributeType, components: &[f32]) -> Self {
        match ty {
            AttributeType::Float => AttributeValue::Float(components[0]),
            AttributeType::Vec2 => AttributeValue::Vec2([components[0], components[1]]),
            AttributeType::Vec3 => {
                AttributeValue::Vec3([components[0], components[1], components[2]])
            }
            AttributeType::Vec4 => AttributeValue::Vec4([
                components[0],
                components[1],
                components[2],
                components[3],
            ]),
        }
    }

    /// Widen the value to four components
    ///
    /// Missing components are filled with `(0, 0, 0, 1)`, so a `Vec3` position
    /// widens to a homogeneous point with `w = 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use softpipe::core::gpu::AttributeValue;
    ///
    /// assert_eq!(AttributeValue::Vec2([2.0, 3.0]).as_vec4(), [2.0, 3.0, 0.0, 1.0]);
    /// assert_eq!(AttributeValue::Empty.as_vec4(), [0.0, 0.0, 0.0, 1.0]);
    /// ```
    pub fn as_vec4(&self) -> [f32; 4] {
        match *self {
            AttributeValue::Empty => [0.0, 0.0, 0.0, 1.0],
            AttributeValue::Float(x) => [x, 0.0, 0.0, 1.0],
            AttributeValue::Vec2([x, y]) => [x, y, 0.0, 1.0],
            AttributeValue::Vec3([x, y, z]) => [x, y, z, 1.0],
            AttributeValue::Vec4(v) => v,
        }
    }

    /// First two components, zero-filled
    pub fn as_vec2(&self) -> [f32; 2] {
        let v = self.as_vec4();
        match self {
            AttributeValue::Empty => [0.0, 0.0],
            _ => [v[0], v[1]],
        }
    }

    /// First three components, zero-filled
    pub fn as_vec3(&self) -> [f32; 3] {
        let v = self.as_vec4();
        match self {
            AttributeValue::Empty => [0.0, 0.0, 0.0],
            _ => [v[0], v[1], v[2]],
        }
    }

    /// First component, zero for an empty slot
    pub fn as_float(&self) -> f32 {
        match self {
            AttributeValue::Empty => 0.0,
            _ => self.as_vec4()[0],
        }
    }

    /// Weighted sum of three values of the same type
    ///
    /// Returns `None` when the values do not share a single type.
    pub fn interpolate(values: [&AttributeValue; 3], weights: [f32; 3]) -> Option<Self> {
        let ty = values[0].attribute_type();
        if values[1].attribute_type() != ty || values[2].attribute_type() != ty {
            return None;
        }

        let Some(ty) = ty else {
            return Some(AttributeValue::Empty);
        };

        let mut out = [0.0f32; 4];
        for (value, weight) in values.iter().zip(weights) {
            let v = value.as_vec4();
            for (o, c) in out.iter_mut().zip(v) {
                *o += c * weight;
            }
        }
        Some(AttributeValue::from_slice(ty, &out))
    }
}

/// Input record of the vertex stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InVertex {
    /// Resolved vertex id (after index buffer lookup)
    pub vertex_id: u32,
    /// Fetched attributes, one slot per attribute descriptor
    pub attributes: [AttributeValue; MAX_ATTRIBUTES],
}

impl InVertex {
    /// Create an input record with all slots empty
    pub fn new(vertex_id: u32) -> Self {
        Self {
            vertex_id,
            attributes: [AttributeValue::Empty; MAX_ATTRIBUTES],
        }
    }
}

/// Output record of the vertex stage
///
/// After the clip-to-screen transform `position` holds screen-space X/Y with
/// the clip-space Z and W passed through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutVertex {
    /// Homogeneous clip-space position
    pub position: [f32; 4],
    /// Attributes forwarded to the fragment stage
    pub attributes: [AttributeValue; MAX_ATTRIBUTES],
}

impl OutVertex {
    /// Create an output vertex at the given clip-space position with empty slots
    pub fn at(position: [f32; 4]) -> Self {
        Self {
            position,
            attributes: [AttributeValue::Empty; MAX_ATTRIBUTES],
        }
    }

    /// Set an attribute slot, returning the vertex for chaining
    ///
    /// Slots past [`MAX_ATTRIBUTES`] are ignored.
    pub fn with_attribute(mut self, slot: usize, value: AttributeValue) -> Self {
        if let Some(s) = self.attributes.get_mut(slot) {
            *s = value;
        }
        self
    }
}

impl Default for OutVertex {
    fn default() -> Self {
        Self::at([0.0, 0.0, 0.0, 1.0])
    }
}

/// Input record of the fragment stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InFragment {
    /// Pixel position `(x, y)`, interpolated depth and `1.0`
    pub frag_coord: [f32; 4],
    /// Interpolated attributes
    pub attributes: [AttributeValue; MAX_ATTRIBUTES],
}

/// Output record of the fragment stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutFragment {
    /// RGBA color, each channel nominally in `[0, 1]`
    pub color: [f32; 4],
    /// Depth override; the interpolated depth is used when `None`
    pub depth: Option<f32>,
}

impl OutFragment {
    /// Fragment with the given color and interpolated depth
    pub fn color(color: [f32; 4]) -> Self {
        Self { color, depth: None }
    }
}

impl Default for OutFragment {
    fn default() -> Self {
        Self::color([0.0, 0.0, 0.0, 1.0])
    }
}

/// Three shaded vertices in draw order
///
/// Winding is not interpreted; both orientations are rasterized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [OutVertex; 3],
}

impl Triangle {
    /// Check that every attribute slot holds the same type on all three vertices
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MismatchedAttribute`] naming the first offending slot.
    pub fn validate(&self) -> Result<()> {
        let [a, b, c] = &self.vertices;
        for slot in 0..MAX_ATTRIBUTES {
            let ty = a.attributes[slot].attribute_type();
            if b.attributes[slot].attribute_type() != ty || c.attributes[slot].attribute_type() != ty {
                return Err(PipelineError::MismatchedAttribute { slot });
            }
        }
        Ok(())
    }
}
