//! Core module - pure board logic with no external collaborators
//!
//! Board ownership, match detection, and tile sampling. No rendering,
//! animation, or input concerns live here.

pub mod board;
pub mod matches;
pub mod rng;

// Re-export commonly used types
pub use board::{Board, Field, Tile};
pub use matches::{find_matches, matched_tiles, Axis, MatchGroup};
pub use rng::{KindSampler, SimpleRng};
