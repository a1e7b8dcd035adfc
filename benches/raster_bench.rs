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

//! Benchmarks for clear and triangle rasterization

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use softpipe::core::config::{FillRule, PipelineConfig};
use softpipe::core::gpu::{
    AttributeDescriptor, AttributeType, FrameBuffer, GpuContext, InFragment, InVertex,
    OutFragment, OutVertex, Program, VertexArray,
};

fn ndc_vertex(input: &InVertex, _: &()) -> OutVertex {
    OutVertex::at(input.attributes[0].as_vec4()).with_attribute(1, input.attributes[1])
}

fn attribute_color(input: &InFragment, _: &()) -> OutFragment {
    let c = input.attributes[1].as_vec3();
    OutFragment::color([c[0], c[1], c[2], 1.0])
}

/// A grid of `cells * cells` quads covering the whole frame
fn quad_grid(cells: u32) -> Vec<f32> {
    let step = 2.0 / cells as f32;
    let mut data = Vec::with_capacity((cells * cells * 6 * 6) as usize);
    for j in 0..cells {
        for i in 0..cells {
            let x0 = -1.0 + i as f32 * step;
            let y0 = -1.0 + j as f32 * step;
            let (x1, y1) = (x0 + step, y0 + step);
            let shade = (i + j) as f32 / (2 * cells) as f32;
            for [x, y] in [[x0, y0], [x1, y0], [x0, y1], [x1, y0], [x1, y1], [x0, y1]] {
                data.extend_from_slice(&[x, y, shade, 1.0 - shade]);
            }
        }
    }
    data
}

fn bench_clear(c: &mut Criterion) {
    let mut group = c.benchmark_group("clear");

    for size in [64u32, 256, 1024] {
        group.throughput(Throughput::Elements(u64::from(size * size)));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut fb = FrameBuffer::new(size, size);
            b.iter(|| {
                let mut ctx = GpuContext::new(VertexArray::new(), fb.as_frame(), PipelineConfig::default());
                ctx.clear(black_box(0.2), 0.4, 0.6, 1.0);
            });
        });
    }

    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_quad_grid");
    let program = Program::new(ndc_vertex, attribute_color, ());

    for cells in [1u32, 8, 32] {
        let vertices = quad_grid(cells);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let vertex_count = cells * cells * 6;

        for (name, fill_rule) in [("inclusive", FillRule::Inclusive), ("top_left", FillRule::TopLeft)] {
            let config = PipelineConfig {
                fill_rule,
                ..PipelineConfig::default()
            };
            let mut fb = FrameBuffer::new(256, 256);

            group.throughput(Throughput::Elements(u64::from(vertex_count / 3)));
            group.bench_with_input(BenchmarkId::new(name, cells), &vertex_count, |b, &count| {
                b.iter(|| {
                    let mut vao = VertexArray::new();
                    vao.set_attribute(0, AttributeDescriptor::new(AttributeType::Vec2, bytes, 0, 16))
                        .unwrap();
                    vao.set_attribute(1, AttributeDescriptor::new(AttributeType::Vec2, bytes, 8, 16))
                        .unwrap();
                    let mut ctx = GpuContext::new(vao, fb.as_frame(), config);
                    ctx.clear(0.0, 0.0, 0.0, 1.0);
                    black_box(ctx.draw(&program, count).unwrap())
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_clear, bench_draw);
criterion_main!(benches);
