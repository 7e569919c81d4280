//! Puzzle content: watermarks, target and captured frame

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Row-major cell index: `row * cols + col`
pub type CellIndex = usize;

/// Watermark shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Triangle,
    Square,
    Circle,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Triangle, Shape::Square, Shape::Circle];

    /// Single glyph for terminal grids
    pub fn glyph(&self) -> &'static str {
        match self {
            Shape::Triangle => "▲",
            Shape::Square => "■",
            Shape::Circle => "●",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Shape::Triangle => "triangle",
            Shape::Square => "square",
            Shape::Circle => "circle",
        };
        write!(f, "{}", name)
    }
}

/// Watermark colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        };
        write!(f, "{}", name)
    }
}

/// A shape/color marker on one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    pub idx: CellIndex,
    pub shape: Shape,
    pub color: Color,
}

impl Watermark {
    pub fn matches(&self, target: &Target) -> bool {
        self.shape == target.shape && self.color == target.color
    }
}

/// The shape/color pair the user must find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub shape: Shape,
    pub color: Color,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.shape)
    }
}

/// One generated puzzle. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleData {
    pub rows: usize,
    pub cols: usize,
    pub watermarks: Vec<Watermark>,
    pub target: Target,
}

impl PuzzleData {
    pub fn new(rows: usize, cols: usize, watermarks: Vec<Watermark>, target: Target) -> Self {
        Self {
            rows,
            cols,
            watermarks,
            target,
        }
    }

    /// Total cells on the grid
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains_cell(&self, cell: CellIndex) -> bool {
        cell < self.cell_count()
    }

    /// Watermark on a given cell, if any
    pub fn watermark_at(&self, cell: CellIndex) -> Option<&Watermark> {
        self.watermarks.iter().find(|w| w.idx == cell)
    }

    /// Cells whose watermark matches the target exactly
    pub fn correct_set(&self) -> BTreeSet<CellIndex> {
        self.watermarks
            .iter()
            .filter(|w| w.matches(&self.target))
            .map(|w| w.idx)
            .collect()
    }
}

/// Region of interest inside a captured frame (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Frame delivered by the camera layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    /// Encoded image bytes; the engine never decodes them
    pub image: Vec<u8>,
    pub region: Option<Region>,
}

impl CapturedFrame {
    pub fn new(width: u32, height: u32, image: Vec<u8>, region: Option<Region>) -> Self {
        Self {
            width,
            height,
            image,
            region,
        }
    }

    /// Placeholder frame covering the whole image, for hosts without a camera
    pub fn placeholder(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            image: vec![0u8; 1],
            region: Some(Region {
                x: 0,
                y: 0,
                width,
                height,
            }),
        }
    }

    /// Image present and region present, non-empty and inside the frame
    pub fn is_well_formed(&self) -> bool {
        if self.image.is_empty() {
            return false;
        }
        match self.region {
            Some(r) => {
                r.width > 0
                    && r.height > 0
                    && u64::from(r.x) + u64::from(r.width) <= u64::from(self.width)
                    && u64::from(r.y) + u64::from(r.height) <= u64::from(self.height)
            }
            None => false,
        }
    }
}
