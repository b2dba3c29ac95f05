//! Board module - manages the tile grid
//!
//! The board owns one Field per (row, col) cell; each Field owns at most
//! one Tile. Fields live for the board's lifetime, tiles churn as matches
//! clear and the board refills. A non-owning id -> field index tracks every
//! tile's current position so ownership transfers stay O(1).
//!
//! Coordinates are (row, col): row 0 is the top edge, column 0 the left
//! edge. Storage is a flat row-major Vec for cache locality.

use std::collections::HashMap;

use crate::core::rng::KindSampler;
use crate::types::{BoardConfig, GridPos, TileId, TileKind};

/// A movable game piece. Kind is immutable once created; identity is
/// stable across swaps and falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
}

/// A fixed grid cell. Row/col are assigned once at construction and double
/// as the field's identity; `tile` is the only mutable attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    row: usize,
    col: usize,
    tile: Option<Tile>,
}

impl Field {
    pub fn pos(&self) -> GridPos {
        GridPos::new(self.row, self.col)
    }

    pub fn tile(&self) -> Option<Tile> {
        self.tile
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }
}

/// The grid: owns all fields, creates and places tiles, executes swaps,
/// and answers adjacency/lookup queries.
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Row-major field storage, index = row * cols + col
    fields: Vec<Field>,
    /// Non-owning index from tile id to its current field
    index: HashMap<TileId, usize>,
    next_tile_id: u32,
}

impl Board {
    /// Create a board with every field populated from the sampler.
    ///
    /// The result may contain matches; the resolution engine scrubs them
    /// before the board is exposed to the player.
    pub fn new(config: &BoardConfig, sampler: &mut KindSampler) -> Self {
        let mut board = Self::empty(config.rows, config.cols);
        for idx in 0..board.fields.len() {
            let pos = board.fields[idx].pos();
            let kind = sampler.draw();
            board.spawn_tile(pos, kind);
        }
        board
    }

    /// Create a board of empty fields
    fn empty(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board dimensions must be positive");
        let mut fields = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                fields.push(Field {
                    row,
                    col,
                    tile: None,
                });
            }
        }
        Self {
            rows,
            cols,
            fields,
            index: HashMap::new(),
            next_tile_id: 0,
        }
    }

    /// Build a board from explicit kind rows (tests and demos).
    ///
    /// Tile ids are allocated in row-major order starting at 0.
    ///
    /// # Panics
    ///
    /// Panics if rows are empty or ragged.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty(), "at least one row required");
        let cols = rows[0].len();
        assert!(cols > 0, "at least one column required");
        assert!(
            rows.iter().all(|r| r.len() == cols),
            "all rows must have the same length"
        );

        let mut board = Self::empty(rows.len(), cols);
        for (row, kinds) in rows.iter().enumerate() {
            for (col, &kind) in kinds.iter().enumerate() {
                board.spawn_tile(GridPos::new(row, col), TileKind(kind));
            }
        }
        board
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Calculate flat index from (row, col), None if out of range
    fn flat_index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// Get the field at (row, col), None if out of range
    pub fn field(&self, row: usize, col: usize) -> Option<&Field> {
        self.flat_index(row, col).map(|idx| &self.fields[idx])
    }

    /// Tile currently occupying (row, col), if any
    pub fn tile_at(&self, pos: GridPos) -> Option<Tile> {
        self.field(pos.row, pos.col).and_then(Field::tile)
    }

    /// Current position of a tile, None if it is not on the board
    pub fn position_of(&self, id: TileId) -> Option<GridPos> {
        self.index.get(&id).map(|&idx| self.fields[idx].pos())
    }

    /// Iterate over all fields in row-major order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Number of tiles currently on the board
    pub fn tile_count(&self) -> usize {
        self.index.len()
    }

    /// True when every field holds a tile
    pub fn is_full(&self) -> bool {
        self.index.len() == self.fields.len()
    }

    /// Positions of all empty fields, row-major
    pub fn empty_positions(&self) -> Vec<GridPos> {
        self.fields
            .iter()
            .filter(|f| f.is_empty())
            .map(Field::pos)
            .collect()
    }

    /// Two tiles are neighbours iff their fields are 4-adjacent
    pub fn are_neighbours(&self, a: TileId, b: TileId) -> bool {
        match (self.position_of(a), self.position_of(b)) {
            (Some(pa), Some(pb)) => pa.is_neighbour(&pb),
            _ => false,
        }
    }

    /// Create a fresh tile on an empty field.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of range or the field is occupied.
    pub fn spawn_tile(&mut self, pos: GridPos, kind: TileKind) -> Tile {
        let idx = self
            .flat_index(pos.row, pos.col)
            .unwrap_or_else(|| panic!("spawn outside the grid at {pos}"));
        assert!(
            self.fields[idx].tile.is_none(),
            "spawn onto occupied field at {pos}"
        );

        let tile = Tile {
            id: TileId(self.next_tile_id),
            kind,
        };
        self.next_tile_id += 1;
        self.fields[idx].tile = Some(tile);
        self.index.insert(tile.id, idx);
        tile
    }

    /// Remove a tile from the board. Idempotent: removing an id that is
    /// not present returns None and mutates nothing.
    pub fn remove_tile(&mut self, id: TileId) -> Option<(Tile, GridPos)> {
        let idx = self.index.remove(&id)?;
        let tile = self.fields[idx].tile.take();
        debug_assert_eq!(tile.map(|t| t.id), Some(id), "index out of sync");
        tile.map(|t| (t, self.fields[idx].pos()))
    }

    /// Unconditionally exchange the field ownership of two tiles.
    ///
    /// Legality (adjacency, engine phase) is the resolution engine's job.
    /// Returns false iff either id is not on the board, in which case
    /// nothing is mutated.
    pub fn swap(&mut self, a: TileId, b: TileId) -> bool {
        let (Some(&ia), Some(&ib)) = (self.index.get(&a), self.index.get(&b)) else {
            return false;
        };
        if ia == ib {
            return true;
        }

        let tile_a = self.fields[ia].tile.take();
        let tile_b = self.fields[ib].tile.take();
        self.fields[ia].tile = tile_b;
        self.fields[ib].tile = tile_a;
        self.index.insert(a, ib);
        self.index.insert(b, ia);

        debug_assert!(self.index_consistent());
        true
    }

    /// Apply gravity board-wide and return every move as
    /// (tile, from, to).
    ///
    /// Each column is compacted independently, bottom to top, from one
    /// snapshot of its empties: surviving tiles end up on the lowest
    /// available rows with their relative order preserved, all empties
    /// end at the top, and no tile moves more than once per call.
    pub fn apply_gravity(&mut self) -> Vec<(Tile, GridPos, GridPos)> {
        let mut moves = Vec::new();

        for col in 0..self.cols {
            // Two-pointer compaction: read bottom-up, write to the lowest
            // row not yet settled.
            let mut write_row = self.rows;
            for read_row in (0..self.rows).rev() {
                let read_idx = read_row * self.cols + col;
                let Some(tile) = self.fields[read_idx].tile else {
                    continue;
                };
                write_row -= 1;
                if write_row != read_row {
                    let write_idx = write_row * self.cols + col;
                    self.fields[read_idx].tile = None;
                    self.fields[write_idx].tile = Some(tile);
                    self.index.insert(tile.id, write_idx);
                    moves.push((
                        tile,
                        GridPos::new(read_row, col),
                        GridPos::new(write_row, col),
                    ));
                }
            }
        }

        debug_assert!(self.index_consistent());
        moves
    }

    /// Fill every still-empty field with a fresh tile, returning the
    /// spawns in row-major order. Postcondition: the board is full.
    pub fn refill(&mut self, sampler: &mut KindSampler) -> Vec<(Tile, GridPos)> {
        let mut spawns = Vec::new();
        for pos in self.empty_positions() {
            let kind = sampler.draw();
            let tile = self.spawn_tile(pos, kind);
            spawns.push((tile, pos));
        }
        assert!(self.is_full(), "refill left empty fields");
        spawns
    }

    /// Kind of every cell as a 2D grid (255 = empty); snapshot-style view
    /// for assertions and display.
    pub fn kind_grid(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| {
                        self.field(row, col)
                            .and_then(Field::tile)
                            .map_or(u8::MAX, |t| t.kind.0)
                    })
                    .collect()
            })
            .collect()
    }

    fn index_consistent(&self) -> bool {
        if self.index.len() != self.fields.iter().filter(|f| f.tile.is_some()).count() {
            return false;
        }
        self.index.iter().all(|(&id, &idx)| {
            self.fields
                .get(idx)
                .and_then(|f| f.tile)
                .is_some_and(|t| t.id == id)
        })
    }

    /// Assert the id index and field contents agree
    pub fn check_consistency(&self) {
        assert!(self.index_consistent(), "tile index out of sync with fields");
    }
}
