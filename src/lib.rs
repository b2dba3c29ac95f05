//! Match-3 puzzle engine core.
//!
//! The board/match/resolution logic lives here; rendering, animation,
//! and input capture are external collaborators that consume
//! [`events::BoardEvent`]s and report visual completion back through the
//! engine's callbacks.

pub mod core;
pub mod engine;
pub mod events;
pub mod types;

pub use crate::core::{Board, Field, Tile};
pub use crate::engine::{Activation, Phase, ResolutionEngine};
pub use crate::events::BoardEvent;
pub use crate::types::{BoardConfig, ConfigError, GridPos, MoveCause, TileId, TileKind};
