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

//! softpipe demo entry point
//!
//! Renders a textured, vertex-colored quad and an overlapping triangle into
//! an offscreen frame and writes it out as a PPM image.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use softpipe::core::config::PipelineConfig;
use softpipe::core::gpu::render::Texture;
use softpipe::core::gpu::{
    AttributeDescriptor, AttributeType, DrawStats, FrameBuffer, GpuContext, IndexBuffer,
    InFragment, InVertex, OutFragment, OutVertex, Program, VertexArray,
};

/// Size of one interleaved vertex: position (vec3), color (vec3), uv (vec2)
const VERTEX_STRIDE: usize = 8 * 4;

#[rustfmt::skip]
const QUAD_VERTICES: [f32; 32] = [
    // x     y     z     r    g    b    u    v
    -0.8, -0.8, 0.5,  1.0, 0.2, 0.2,  0.0, 0.0,
     0.6, -0.8, 0.5,  0.2, 1.0, 0.2,  1.0, 0.0,
     0.6,  0.6, 0.5,  0.2, 0.2, 1.0,  1.0, 1.0,
    -0.8,  0.6, 0.5,  1.0, 1.0, 0.2,  0.0, 1.0,
];
const QUAD_INDICES: [u16; 6] = [0, 1, 3, 1, 2, 3];

#[rustfmt::skip]
const TRIANGLE_VERTICES: [f32; 24] = [
    -0.2, -0.4, 0.25,  1.0, 0.5, 0.0,  0.0, 0.0,
     0.9, -0.1, 0.25,  1.0, 0.5, 0.0,  0.0, 0.0,
     0.1,  0.9, 0.75,  0.0, 0.5, 1.0,  0.0, 0.0,
];

const CHECKER_SIZE: u32 = 8;

#[derive(Parser, Debug)]
#[command(name = "softpipe-demo", version, about = "Render a demo scene with the software pipeline")]
struct Args {
    /// Frame width in pixels
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Output PPM path
    #[arg(short, long, default_value = "softpipe.ppm")]
    output: PathBuf,

    /// Pipeline configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also save a binary snapshot of the frame
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print draw statistics as JSON
    #[arg(long)]
    stats_json: bool,
}

#[derive(Serialize)]
struct Report {
    quad: DrawStats,
    triangle: DrawStats,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    log::info!("Starting softpipe demo ({}x{})", args.width, args.height);

    let config = match &args.config {
        Some(path) => {
            log::info!("Loading pipeline config from {}", path.display());
            PipelineConfig::load(path)?
        }
        None => PipelineConfig::default(),
    };

    let checker = checker_texels(CHECKER_SIZE);
    let texture = Texture::new(CHECKER_SIZE, CHECKER_SIZE, 4, &checker)?;

    let quad_bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
    let triangle_bytes: &[u8] = bytemuck::cast_slice(&TRIANGLE_VERTICES);

    let mut fb = FrameBuffer::new(args.width, args.height);
    let mut ctx = GpuContext::new(interleaved(quad_bytes)?, fb.as_frame(), config);
    ctx.clear(0.1, 0.1, 0.12, 1.0);

    ctx.vertex_array
        .set_index_buffer(Some(IndexBuffer::from_u16(&QUAD_INDICES)));
    let quad = ctx.draw(
        &Program::new(transform, textured, texture),
        QUAD_INDICES.len() as u32,
    )?;

    ctx.vertex_array = interleaved(triangle_bytes)?;
    let triangle = ctx.draw(&Program::new(transform, vertex_colored, ()), 3)?;

    let report = Report { quad, triangle };
    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        log::info!(
            "Shaded {} fragments, wrote {}",
            report.quad.fragments_shaded + report.triangle.fragments_shaded,
            report.quad.fragments_written + report.triangle.fragments_written
        );
    }

    fb.write_ppm(BufWriter::new(File::create(&args.output)?))?;
    log::info!("Wrote {}", args.output.display());

    if let Some(path) = &args.snapshot {
        fb.save_snapshot(path)?;
        log::info!("Saved snapshot to {}", path.display());
    }

    Ok(())
}

/// Bind position, color and uv streams from one interleaved buffer
fn interleaved(bytes: &[u8]) -> softpipe::Result<VertexArray<'_>> {
    let mut vao = VertexArray::new();
    vao.set_attribute(0, AttributeDescriptor::new(AttributeType::Vec3, bytes, 0, VERTEX_STRIDE))?;
    vao.set_attribute(1, AttributeDescriptor::new(AttributeType::Vec3, bytes, 12, VERTEX_STRIDE))?;
    vao.set_attribute(2, AttributeDescriptor::new(AttributeType::Vec2, bytes, 24, VERTEX_STRIDE))?;
    Ok(vao)
}

fn checker_texels(size: u32) -> Vec<u8> {
    (0..size * size)
        .flat_map(|i| {
            let (x, y) = (i % size, i / size);
            let v = if (x + y) % 2 == 0 { 255 } else { 64 };
            [v, v, v, 255]
        })
        .collect()
}

fn transform<U>(input: &InVertex, _: &U) -> OutVertex {
    OutVertex::at(input.attributes[0].as_vec4())
        .with_attribute(1, input.attributes[1])
        .with_attribute(2, input.attributes[2])
}

fn textured(input: &InFragment, texture: &Texture<'_>) -> OutFragment {
    let texel = texture.sample(input.attributes[2].as_vec2());
    let tint = input.attributes[1].as_vec3();
    OutFragment::color([texel[0] * tint[0], texel[1] * tint[1], texel[2] * tint[2], texel[3]])
}

fn vertex_colored(input: &InFragment, _: &()) -> OutFragment {
    let c = input.attributes[1].as_vec3();
    OutFragment::color([c[0], c[1], c[2], 1.0])
}
