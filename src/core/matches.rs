//! Match detection - pure queries over board state
//!
//! A match is a maximal straight run of 3+ same-kind tiles along one row
//! or one column. Runs on different axes are reported as separate groups
//! even when they share a tile (straight-run semantics, no merged L/T
//! shapes); removal dedups via `matched_tiles`.
//!
//! Groups are computed fresh on every query and never persisted.

use std::collections::HashSet;

use crate::core::board::Board;
use crate::types::{GridPos, TileId, TileKind, MIN_RUN};

/// Scan axis of a matching run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A straight run of same-kind tiles, length >= [`MIN_RUN`]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchGroup {
    pub axis: Axis,
    pub kind: TileKind,
    /// Tiles in scan order (left-to-right or top-to-bottom)
    pub tiles: Vec<(TileId, GridPos)>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Find all matching groups on the board.
///
/// One pass per axis tracking the current run, O(rows * cols). Output is
/// deterministic for a fixed board: horizontal groups first (top-to-bottom),
/// then vertical groups (left-to-right).
pub fn find_matches(board: &Board) -> Vec<MatchGroup> {
    let mut groups = Vec::new();

    for row in 0..board.rows() {
        scan_line(
            board,
            (0..board.cols()).map(|col| GridPos::new(row, col)),
            Axis::Horizontal,
            &mut groups,
        );
    }
    for col in 0..board.cols() {
        scan_line(
            board,
            (0..board.rows()).map(|row| GridPos::new(row, col)),
            Axis::Vertical,
            &mut groups,
        );
    }

    groups
}

/// Scan one row or column, emitting every maximal run of length >= MIN_RUN
fn scan_line(
    board: &Board,
    line: impl Iterator<Item = GridPos>,
    axis: Axis,
    groups: &mut Vec<MatchGroup>,
) {
    let mut run: Vec<(TileId, GridPos)> = Vec::new();
    let mut run_kind: Option<TileKind> = None;

    let mut flush = |run: &mut Vec<(TileId, GridPos)>, kind: Option<TileKind>| {
        if run.len() >= MIN_RUN {
            if let Some(kind) = kind {
                groups.push(MatchGroup {
                    axis,
                    kind,
                    tiles: std::mem::take(run),
                });
                return;
            }
        }
        run.clear();
    };

    for pos in line {
        match board.tile_at(pos) {
            Some(tile) if run_kind == Some(tile.kind) => {
                run.push((tile.id, pos));
            }
            Some(tile) => {
                flush(&mut run, run_kind);
                run_kind = Some(tile.kind);
                run.push((tile.id, pos));
            }
            None => {
                // Empty field breaks the run
                flush(&mut run, run_kind);
                run_kind = None;
            }
        }
    }
    flush(&mut run, run_kind);
}

/// Unique tile ids across all groups, in first-appearance order.
///
/// A tile on an L/T intersection appears in two groups; removal must be
/// attempted exactly once per tile.
pub fn matched_tiles(groups: &[MatchGroup]) -> Vec<TileId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for group in groups {
        for &(id, _) in &group.tiles {
            if seen.insert(id) {
                ids.push(id);
            }
        }
    }
    ids
}
