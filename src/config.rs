use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default side length of the elevation grid.
pub const GRID_SIZE: usize = 128;

/// Inputs to a full regeneration. Two values compare equal when both
/// fields match, which is what lets the engine skip redundant work.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub seed: u64,
    /// Strength of the center-high, edge-low bowl. Zero disables island
    /// shaping, negative values invert it.
    pub islandness: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 187,
            islandness: 0.5,
        }
    }
}

/// The elevation a brush pushes cells toward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrushTool {
    pub target_elevation: f32,
}

/// Brush footprint in grid cells. `rate` is effect per second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrushSize {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub rate: f32,
}

/// Brush presets offered by the editor, keyed by name.
pub const BRUSH_SIZES: [(&str, BrushSize); 3] = [
    ("small", BrushSize { inner_radius: 2.0, outer_radius: 6.0, rate: 8.0 }),
    ("medium", BrushSize { inner_radius: 5.0, outer_radius: 10.0, rate: 5.0 }),
    ("large", BrushSize { inner_radius: 10.0, outer_radius: 16.0, rate: 3.0 }),
];

/// Tool presets offered by the editor, keyed by name.
pub const TOOLS: [(&str, BrushTool); 4] = [
    ("ocean", BrushTool { target_elevation: -0.25 }),
    ("shallow", BrushTool { target_elevation: -0.05 }),
    ("valley", BrushTool { target_elevation: 0.05 }),
    ("mountain", BrushTool { target_elevation: 1.0 }),
];

pub fn brush_size(name: &str) -> Result<BrushSize> {
    BRUSH_SIZES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, s)| *s)
        .ok_or_else(|| Error::UnknownBrushSize(name.to_string()))
}

pub fn tool(name: &str) -> Result<BrushTool> {
    TOOLS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, t)| *t)
        .ok_or_else(|| Error::UnknownTool(name.to_string()))
}

/// Startup settings for the binaries. Missing fields fall back to defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub size: usize,
    pub seed: u64,
    pub islandness: f64,
}

impl Default for Settings {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            size: GRID_SIZE,
            seed: params.seed,
            islandness: params.islandness,
        }
    }
}

impl Settings {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            seed: self.seed,
            islandness: self.islandness,
        }
    }
}
