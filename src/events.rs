//! Events emitted by the engine for the rendering/animation collaborator
//!
//! The engine pushes events onto an internal queue; the collaborator
//! drains it after driving the engine, performs the corresponding visual
//! work, and reports completion through the engine's callbacks. The
//! surface is renderer-agnostic; nothing here knows how tiles are drawn.

use serde::{Deserialize, Serialize};

use crate::core::Tile;
use crate::types::{GridPos, MoveCause};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A fresh tile was created at `at`. `drop_height` is the spawn-origin
    /// hint: how many rows above the top edge the visual drop should start.
    TileSpawned {
        tile: Tile,
        at: GridPos,
        drop_height: usize,
    },
    /// A matched tile was cleared
    TileRemoved { tile: Tile, at: GridPos },
    /// A tile changed fields, by player swap or by gravity
    TileMoved {
        tile: Tile,
        from: GridPos,
        to: GridPos,
        cause: MoveCause,
    },
    /// End of a full resolve/cascade round; the board is stable again.
    /// `cascades` counts the resolve passes in the round (0 for a swap
    /// that produced no match).
    BoardSettled { cascades: u32 },
}
