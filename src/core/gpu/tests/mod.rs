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

//! Pipeline-level tests exercising draw and clear through [`GpuContext`]

mod clear;

use super::*;

/// Pass-through vertex stage: slot 0 holds an NDC position
pub(super) fn ndc_vertex<U>(input: &InVertex, _: &U) -> OutVertex {
    let p = input.attributes[0].as_vec4();
    let mut out = OutVertex::at(p);
    out.attributes[1..].copy_from_slice(&input.attributes[1..]);
    out
}

/// Fragment stage writing slot 1 as RGB
pub(super) fn attribute_color<U>(input: &InFragment, _: &U) -> OutFragment {
    let c = input.attributes[1].as_vec3();
    OutFragment::color([c[0], c[1], c[2], 1.0])
}

pub(super) fn float_bytes(values: &[f32]) -> Vec<u8> {
    bytemuck::cast_slice(values).to_vec()
}
