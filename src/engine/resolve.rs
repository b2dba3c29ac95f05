//! Resolution engine - the swap/resolve/cascade state machine
//!
//! Sequences: swap -> validate match -> remove matches -> gravity ->
//! refill -> re-check -> repeat until stable. Logical board state always
//! runs ahead of the visuals: a swap is applied immediately, then the
//! engine suspends until the collaborator signals animation completion.
//!
//! Per-tile fall and spawn completions within one pass form a
//! fan-out/join barrier; the next pass never starts before every pending
//! completion has been signalled exactly once. Player input arriving
//! outside `Idle` is dropped, not queued.

use std::collections::{HashSet, VecDeque};

use crate::core::{find_matches, matched_tiles, Board, KindSampler};
use crate::events::BoardEvent;
use crate::types::{BoardConfig, ConfigError, GridPos, MoveCause, TileId};

/// Engine phase. `Resolving` covers remove + gravity + refill in flight;
/// `Cascading` is the re-check after a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingSwapAnimation,
    Resolving,
    Cascading,
}

/// Outcome of a tile activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// First tile of a pair selected
    Selected,
    /// Second tile was not a neighbour; it became the new selection
    Reselected,
    /// Neighbour pair - the swap was applied and awaits its animation
    SwapStarted,
    /// Input dropped: engine busy or unknown tile
    Ignored,
}

pub struct ResolutionEngine {
    board: Board,
    sampler: KindSampler,
    phase: Phase,
    selected: Option<TileId>,
    /// Falls not yet acknowledged by the collaborator (current pass)
    pending_falls: HashSet<TileId>,
    /// Spawns not yet acknowledged by the collaborator (current pass)
    pending_spawns: HashSet<TileId>,
    /// Whether the current pass has issued its refill yet
    refilled: bool,
    /// Resolve passes completed in the current round
    cascades: u32,
    events: VecDeque<BoardEvent>,
}

impl ResolutionEngine {
    /// Build an engine with a freshly populated, scrubbed board.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration is invalid.
    pub fn new(config: &BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sampler = KindSampler::new(config);
        let board = Board::new(config, &mut sampler);
        let mut engine = Self::from_parts(board, sampler);
        engine.scrub_start_matches();
        Ok(engine)
    }

    /// Wrap an explicit full board without scrubbing (harnesses and tests).
    ///
    /// # Panics
    ///
    /// Panics if the board has empty fields.
    pub fn from_parts(board: Board, sampler: KindSampler) -> Self {
        assert!(board.is_full(), "engine requires a fully populated board");
        Self {
            board,
            sampler,
            phase: Phase::Idle,
            selected: None,
            pending_falls: HashSet::new(),
            pending_spawns: HashSet::new(),
            refilled: false,
            cascades: 0,
            events: VecDeque::new(),
        }
    }

    /// Replace matched tiles in place until the board is match-free.
    ///
    /// Runs before the board is exposed to the player: no gravity pass is
    /// needed (removal plus immediate respawn keeps the board full), no
    /// events are emitted, and no move is counted.
    fn scrub_start_matches(&mut self) {
        loop {
            let groups = find_matches(&self.board);
            if groups.is_empty() {
                break;
            }
            for id in matched_tiles(&groups) {
                let (_, pos) = self
                    .board
                    .remove_tile(id)
                    .expect("matched tile missing from board");
                self.board.spawn_tile(pos, self.sampler.draw());
            }
        }
        assert!(self.board.is_full());
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selected(&self) -> Option<TileId> {
        self.selected
    }

    /// True while a swap round-trip is in flight; all player input is
    /// dropped until the engine returns to `Idle`.
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Falls awaiting `on_fall_animation_complete`, sorted for
    /// deterministic harness iteration
    pub fn pending_falls(&self) -> Vec<TileId> {
        let mut ids: Vec<_> = self.pending_falls.iter().copied().collect();
        ids.sort();
        ids
    }

    /// Spawns awaiting `on_spawn_animation_complete`, sorted
    pub fn pending_spawns(&self) -> Vec<TileId> {
        let mut ids: Vec<_> = self.pending_spawns.iter().copied().collect();
        ids.sort();
        ids
    }

    /// Drain all queued events for the collaborator
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.events.drain(..).collect()
    }

    /// Entry point for a player selecting a tile.
    ///
    /// Drives the `Idle` selection sub-state: first activation selects,
    /// a non-neighbour second activation reselects (the invalid-move
    /// recovery), a neighbour second activation applies the swap and
    /// enters `AwaitingSwapAnimation`.
    pub fn on_tile_activated(&mut self, id: TileId) -> Activation {
        if self.is_busy() {
            return Activation::Ignored;
        }
        let Some(pos) = self.board.position_of(id) else {
            return Activation::Ignored;
        };

        let Some(selected) = self.selected else {
            self.selected = Some(id);
            return Activation::Selected;
        };

        if !self.board.are_neighbours(selected, id) {
            self.selected = Some(id);
            return Activation::Reselected;
        }

        // Logical swap applies immediately; the visual swap animates
        // concurrently in the collaborator layer.
        let from = self
            .board
            .position_of(selected)
            .expect("selected tile missing from board");
        let a = self.board.tile_at(from).expect("field lost its tile");
        let b = self.board.tile_at(pos).expect("field lost its tile");
        self.board.swap(selected, id);
        self.emit_move(a.id, from, pos, MoveCause::Swap);
        self.emit_move(b.id, pos, from, MoveCause::Swap);

        self.selected = None;
        self.phase = Phase::AwaitingSwapAnimation;
        Activation::SwapStarted
    }

    /// Collaborator signal: the visual swap finished.
    ///
    /// Queries the match finder. No matches leaves the tiles swapped and
    /// returns to `Idle` (see DESIGN.md); matches start the first resolve
    /// pass. Returns false when called outside `AwaitingSwapAnimation`.
    pub fn on_swap_animation_complete(&mut self) -> bool {
        if self.phase != Phase::AwaitingSwapAnimation {
            return false;
        }

        let groups = find_matches(&self.board);
        if groups.is_empty() {
            self.settle();
        } else {
            self.begin_resolve_pass(&matched_tiles(&groups));
        }
        true
    }

    /// Collaborator signal: one falling tile's visual fall finished.
    ///
    /// Returns false for an id that is not a pending fall or a call in the
    /// wrong phase (exactly-once accounting; double signals are dropped).
    pub fn on_fall_animation_complete(&mut self, id: TileId) -> bool {
        if self.phase != Phase::Resolving || !self.pending_falls.remove(&id) {
            return false;
        }
        if self.pending_falls.is_empty() && !self.refilled {
            self.begin_refill();
        }
        true
    }

    /// Collaborator signal: one spawned tile's visual drop-in finished.
    pub fn on_spawn_animation_complete(&mut self, id: TileId) -> bool {
        if self.phase != Phase::Resolving || !self.pending_spawns.remove(&id) {
            return false;
        }
        if self.pending_spawns.is_empty() && self.pending_falls.is_empty() {
            self.cascade_check();
        }
        true
    }

    /// Drive the engine to `Idle` by acknowledging every pending
    /// completion immediately - a trivial headless collaborator, used by
    /// the demo binary and benchmarks.
    pub fn settle_headless(&mut self) {
        if self.phase == Phase::AwaitingSwapAnimation {
            self.on_swap_animation_complete();
        }
        while self.phase == Phase::Resolving {
            for id in self.pending_falls() {
                self.on_fall_animation_complete(id);
            }
            for id in self.pending_spawns() {
                self.on_spawn_animation_complete(id);
            }
        }
    }

    /// One resolve pass: remove every unique matched tile, then apply
    /// board-wide gravity and fan out the fall completions.
    fn begin_resolve_pass(&mut self, matched: &[TileId]) {
        self.phase = Phase::Resolving;
        self.refilled = false;
        self.cascades += 1;

        for &id in matched {
            let (tile, at) = self
                .board
                .remove_tile(id)
                .expect("matched tile missing from board");
            self.events.push_back(BoardEvent::TileRemoved { tile, at });
        }

        // Gravity is board-wide: every column compacts from one snapshot
        // of its empties before the pass advances.
        let falls = self.board.apply_gravity();
        for &(tile, from, to) in &falls {
            self.pending_falls.insert(tile.id);
            self.emit_move(tile.id, from, to, MoveCause::Fall);
        }

        if self.pending_falls.is_empty() {
            self.begin_refill();
        }
    }

    /// Refill every still-empty field (necessarily at the top of its
    /// column) and fan out the spawn completions.
    fn begin_refill(&mut self) {
        debug_assert!(self.pending_falls.is_empty());
        self.refilled = true;

        let spawns = self.board.refill(&mut self.sampler);
        for &(tile, at) in &spawns {
            self.pending_spawns.insert(tile.id);
            // Conceptually dropped in from above the top row
            self.events.push_back(BoardEvent::TileSpawned {
                tile,
                at,
                drop_height: at.row + 1,
            });
        }

        if self.pending_spawns.is_empty() {
            // A pass always removes tiles, so refill must have spawned
            debug_assert!(spawns.is_empty());
            self.cascade_check();
        }
    }

    /// After the join barrier: re-check for matches created by gravity
    /// and refill; loop back into another pass or settle.
    fn cascade_check(&mut self) {
        self.phase = Phase::Cascading;
        let groups = find_matches(&self.board);
        if groups.is_empty() {
            self.settle();
        } else {
            self.begin_resolve_pass(&matched_tiles(&groups));
        }
    }

    /// Return to `Idle` and report the end of the round. The settled
    /// invariant (full, match-free board) is a hard grid invariant;
    /// breaking it is a logic fault, so it fails loudly.
    fn settle(&mut self) {
        assert!(self.board.is_full(), "settled board has empty fields");
        assert!(
            find_matches(&self.board).is_empty(),
            "settled board still has matches"
        );

        self.phase = Phase::Idle;
        self.events.push_back(BoardEvent::BoardSettled {
            cascades: self.cascades,
        });
        self.cascades = 0;
    }

    fn emit_move(&mut self, id: TileId, from: GridPos, to: GridPos, cause: MoveCause) {
        let tile = self
            .board
            .tile_at(to)
            .expect("moved tile missing from destination field");
        debug_assert_eq!(tile.id, id);
        self.events.push_back(BoardEvent::TileMoved {
            tile,
            from,
            to,
            cause,
        });
    }
}
