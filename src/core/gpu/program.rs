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

//! Shader program interface
//!
//! The vertex and fragment stages are opaque to the pipeline. They are
//! modelled as two capability traits, each exposing `invoke(input, uniforms)`.
//! Any `Fn` closure with the matching signature implements the trait, so
//! programs can be assembled from plain closures:
//!
//! ```
//! use softpipe::core::gpu::{InFragment, InVertex, OutFragment, OutVertex, Program};
//!
//! struct Uniforms {
//!     scale: f32,
//! }
//!
//! let program = Program::new(
//!     |v: &InVertex, u: &Uniforms| {
//!         let p = v.attributes[0].as_vec4();
//!         OutVertex::at([p[0] * u.scale, p[1] * u.scale, p[2], 1.0])
//!     },
//!     |_: &InFragment, _: &Uniforms| OutFragment::color([1.0, 0.0, 0.0, 1.0]),
//!     Uniforms { scale: 0.5 },
//! );
//! # let _ = program;
//! ```

use super::primitives::{InFragment, InVertex, OutFragment, OutVertex};

/// Vertex stage: maps a fetched vertex to a clip-space vertex
///
/// Implementations must populate `position` and any attribute slots the
/// fragment stage reads.
pub trait VertexStage<U: ?Sized> {
    fn invoke(&self, input: &InVertex, uniforms: &U) -> OutVertex;
}

/// Fragment stage: maps an interpolated fragment to an output color
pub trait FragmentStage<U: ?Sized> {
    fn invoke(&self, input: &InFragment, uniforms: &U) -> OutFragment;
}

impl<U: ?Sized, F> VertexStage<U> for F
where
    F: Fn(&InVertex, &U) -> OutVertex,
{
    fn invoke(&self, input: &InVertex, uniforms: &U) -> OutVertex {
        self(input, uniforms)
    }
}

impl<U: ?Sized, F> FragmentStage<U> for F
where
    F: Fn(&InFragment, &U) -> OutFragment,
{
    fn invoke(&self, input: &InFragment, uniforms: &U) -> OutFragment {
        self(input, uniforms)
    }
}

/// Vertex stage, fragment stage and the uniform block they share
#[derive(Debug, Clone)]
pub struct Program<V, F, U> {
    pub vertex: V,
    pub fragment: F,
    pub uniforms: U,
}

impl<V, F, U> Program<V, F, U>
where
    V: VertexStage<U>,
    F: FragmentStage<U>,
{
    pub fn new(vertex: V, fragment: F, uniforms: U) -> Self {
        Self {
            vertex,
            fragment,
            uniforms,
        }
    }

    /// Run the vertex stage with this program's uniforms
    pub fn shade_vertex(&self, input: &InVertex) -> OutVertex {
        self.vertex.invoke(input, &self.uniforms)
    }

    /// Run the fragment stage with this program's uniforms
    pub fn shade_fragment(&self, input: &InFragment) -> OutFragment {
        self.fragment.invoke(input, &self.uniforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gpu::primitives::{AttributeValue, MAX_ATTRIBUTES};

    struct Offset(f32);

    impl VertexStage<f32> for Offset {
        fn invoke(&self, input: &InVertex, uniforms: &f32) -> OutVertex {
            OutVertex::at([input.vertex_id as f32 + self.0, *uniforms, 0.0, 1.0])
        }
    }

    #[test]
    fn test_struct_and_closure_stages() {
        let program = Program::new(
            Offset(0.5),
            |f: &InFragment, u: &f32| OutFragment::color([f.frag_coord[0], *u, 0.0, 1.0]),
            2.0f32,
        );

        let out = program.shade_vertex(&InVertex::new(3));
        assert_eq!(out.position, [3.5, 2.0, 0.0, 1.0]);

        let frag = InFragment {
            frag_coord: [0.25, 0.0, 0.0, 1.0],
            attributes: [AttributeValue::Empty; MAX_ATTRIBUTES],
        };
        assert_eq!(program.shade_fragment(&frag).color, [0.25, 2.0, 0.0, 1.0]);
    }
}
