//! Core types shared across the engine
//!
//! This module contains pure data types plus the board configuration
//! consumed from an external source (row/column counts, kind alphabet,
//! optional spawn weights, RNG seed).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum length of a matching run
pub const MIN_RUN: usize = 3;

/// Safety limit on board dimensions
pub const MAX_GRID_DIMENSION: usize = 256;

/// Default board dimensions and alphabet
pub const DEFAULT_ROWS: usize = 8;
pub const DEFAULT_COLS: usize = 8;
pub const DEFAULT_KINDS: u8 = 5;

/// Tile kind - an opaque comparable value from a finite, configurable alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKind(pub u8);

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

/// Stable tile identity, allocated by the board and never reused within
/// one board's lifetime. Survives swaps and falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Grid coordinate. Row 0 is the top edge, column 0 the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 4-directional adjacency: positions differ by exactly 1 in row
    /// XOR exactly 1 in column. Diagonals are not neighbours.
    pub fn is_neighbour(&self, other: &GridPos) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        (dr == 1 && dc == 0) || (dr == 0 && dc == 1)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Why a tile changed fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCause {
    Swap,
    Fall,
}

/// Board configuration consumed from an external source.
///
/// `weights` biases tile spawning per kind; `None` means uniform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
    /// Number of distinct tile kinds (the alphabet is `0..kinds`)
    pub kinds: u8,
    /// Optional per-kind spawn weights, one entry per kind
    #[serde(default)]
    pub weights: Option<Vec<u32>>,
    /// RNG seed for tile spawning (deterministic replay)
    #[serde(default = "default_seed")]
    pub seed: u32,
}

fn default_seed() -> u32 {
    1
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            kinds: DEFAULT_KINDS,
            weights: None,
            seed: default_seed(),
        }
    }
}

impl BoardConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when dimensions are out of range, the
    /// weight table does not line up with the kind alphabet, or the
    /// alphabet is too small for the board ever to settle match-free.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::ZeroDimension { axis: "rows" });
        }
        if self.cols == 0 {
            return Err(ConfigError::ZeroDimension { axis: "cols" });
        }
        if self.rows > MAX_GRID_DIMENSION {
            return Err(ConfigError::DimensionTooLarge {
                axis: "rows",
                value: self.rows,
            });
        }
        if self.cols > MAX_GRID_DIMENSION {
            return Err(ConfigError::DimensionTooLarge {
                axis: "cols",
                value: self.cols,
            });
        }
        if self.kinds == 0 {
            return Err(ConfigError::EmptyAlphabet);
        }

        let spawnable = match &self.weights {
            Some(weights) => {
                if weights.len() != self.kinds as usize {
                    return Err(ConfigError::WeightCountMismatch {
                        expected: self.kinds as usize,
                        got: weights.len(),
                    });
                }
                if weights.iter().all(|&w| w == 0) {
                    return Err(ConfigError::ZeroWeightSum);
                }
                weights.iter().filter(|&&w| w > 0).count()
            }
            None => self.kinds as usize,
        };

        // A run of 3 fits on this board, so the initial scrub must be able
        // to converge to a match-free state. Fewer than 3 spawnable kinds
        // makes that (practically) impossible.
        if (self.rows >= MIN_RUN || self.cols >= MIN_RUN) && spawnable < MIN_RUN {
            return Err(ConfigError::AlphabetTooSmall {
                required: MIN_RUN,
                got: spawnable,
            });
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A board dimension is zero
    ZeroDimension { axis: &'static str },
    /// A board dimension exceeds [`MAX_GRID_DIMENSION`]
    DimensionTooLarge { axis: &'static str, value: usize },
    /// The kind alphabet is empty
    EmptyAlphabet,
    /// Too few spawnable kinds for the board to ever settle match-free
    AlphabetTooSmall { required: usize, got: usize },
    /// The weight table length does not match the kind count
    WeightCountMismatch { expected: usize, got: usize },
    /// Every spawn weight is zero
    ZeroWeightSum,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { axis } => write!(f, "board {axis} must be at least 1"),
            Self::DimensionTooLarge { axis, value } => {
                write!(f, "board {axis} = {value} exceeds limit {MAX_GRID_DIMENSION}")
            }
            Self::EmptyAlphabet => write!(f, "tile kind alphabet is empty"),
            Self::AlphabetTooSmall { required, got } => {
                write!(
                    f,
                    "need at least {required} spawnable tile kinds for a matchable board, got {got}"
                )
            }
            Self::WeightCountMismatch { expected, got } => {
                write!(f, "expected {expected} spawn weights, got {got}")
            }
            Self::ZeroWeightSum => write!(f, "spawn weights sum to zero"),
        }
    }
}

impl std::error::Error for ConfigError {}
