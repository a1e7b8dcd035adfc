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

//! Pipeline configuration
//!
//! Controls the behavior that the rasterizer leaves open: the fill convention
//! for pixels lying exactly on an edge, whether covered pixels are depth
//! tested and written back, and the depth value used by clear.
//!
//! Configuration can be loaded from and saved to TOML files:
//!
//! ```toml
//! fill_rule = "top_left"
//! depth_test = true
//! write_mask = "RED | GREEN | BLUE | ALPHA | DEPTH"
//! clear_depth = 1e11
//! ```

use std::path::Path;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::error::Result;

/// Depth value written by clear, farther than any depth a draw produces
pub const DEFAULT_CLEAR_DEPTH: f32 = 10e10;

/// Rule resolving coverage for pixels exactly on a triangle edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// A pixel is covered when all three edge values are >= 0
    ///
    /// Pixels on an edge shared by two triangles are shaded by both.
    #[default]
    Inclusive,

    /// Pixels on an edge are covered only when the edge is a top or left edge
    ///
    /// Adjacent triangles sharing an edge shade each pixel exactly once.
    TopLeft,
}

bitflags! {
    /// Framebuffer channels written for fragments that pass the depth test
    ///
    /// An empty mask turns covered-pixel processing into a pure fragment
    /// invocation with no effect on the framebuffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WriteMask: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const DEPTH = 1 << 4;
        const COLOR = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

impl Default for WriteMask {
    fn default() -> Self {
        Self::all()
    }
}

/// Pipeline configuration that can be saved/loaded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Edge tie-breaking rule
    pub fill_rule: FillRule,

    /// Discard fragments whose depth is not less than the stored depth
    pub depth_test: bool,

    /// Channels written back for passing fragments
    pub write_mask: WriteMask,

    /// Depth value written by clear
    pub clear_depth: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fill_rule: FillRule::default(),
            depth_test: true,
            write_mask: WriteMask::default(),
            clear_depth: DEFAULT_CLEAR_DEPTH,
        }
    }
}

impl PipelineConfig {
    /// Configuration that shades covered pixels without touching the framebuffer
    ///
    /// Fragments are still invoked for every covered pixel, but no depth test
    /// is performed and neither color nor depth is written.
    pub fn shade_only() -> Self {
        Self {
            depth_test: false,
            write_mask: WriteMask::empty(),
            ..Self::default()
        }
    }

    /// Load configuration from TOML file
    ///
    /// Missing keys fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.fill_rule, FillRule::Inclusive);
        assert!(config.depth_test);
        assert_eq!(config.write_mask, WriteMask::all());
        assert_eq!(config.clear_depth, 10e10);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PipelineConfig::from_toml("fill_rule = \"top_left\"\n").unwrap();
        assert_eq!(config.fill_rule, FillRule::TopLeft);
        assert!(config.depth_test);
        assert_eq!(config.write_mask, WriteMask::all());
    }

    #[test]
    fn test_write_mask_from_toml() {
        let config = PipelineConfig::from_toml("write_mask = \"RED | DEPTH\"\n").unwrap();
        assert_eq!(config.write_mask, WriteMask::RED | WriteMask::DEPTH);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result = PipelineConfig::from_toml("fill_rule = \"diagonal\"\n");
        assert!(matches!(result, Err(crate::PipelineError::ConfigParse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");

        let config = PipelineConfig {
            fill_rule: FillRule::TopLeft,
            depth_test: false,
            write_mask: WriteMask::COLOR,
            clear_depth: 1.0,
        };
        config.save(&path).unwrap();

        let loaded = PipelineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = PipelineConfig::load("/nonexistent/softpipe.toml");
        assert!(matches!(result, Err(crate::PipelineError::Io(_))));
    }

    #[test]
    fn test_shade_only() {
        let config = PipelineConfig::shade_only();
        assert!(!config.depth_test);
        assert!(config.write_mask.is_empty());
    }
}
