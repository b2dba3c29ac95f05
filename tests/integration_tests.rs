//! Integration tests - full rounds over seeded random play

use tilematch::core::{find_matches, SimpleRng};
use tilematch::{Activation, BoardConfig, BoardEvent, GridPos, Phase, ResolutionEngine};

fn random_neighbour_pair(rng: &mut SimpleRng, rows: usize, cols: usize) -> (GridPos, GridPos) {
    loop {
        let row = rng.next_range(rows as u32) as usize;
        let col = rng.next_range(cols as u32) as usize;
        let a = GridPos::new(row, col);
        let b = if rng.next_range(2) == 0 {
            GridPos::new(row + 1, col)
        } else {
            GridPos::new(row, col + 1)
        };
        if b.row < rows && b.col < cols {
            return (a, b);
        }
    }
}

#[test]
fn test_random_play_always_returns_to_stable_idle() {
    let config = BoardConfig {
        rows: 8,
        cols: 8,
        kinds: 6,
        seed: 7,
        ..BoardConfig::default()
    };
    let mut engine = ResolutionEngine::new(&config).unwrap();
    let mut rng = SimpleRng::new(31337);

    for move_no in 0..50 {
        let (pa, pb) = random_neighbour_pair(&mut rng, 8, 8);
        let a = engine.board().tile_at(pa).unwrap().id;
        let b = engine.board().tile_at(pb).unwrap().id;

        assert_eq!(engine.on_tile_activated(a), Activation::Selected);
        assert_eq!(engine.on_tile_activated(b), Activation::SwapStarted);
        engine.settle_headless();

        // Every round-trip ends in a stable Idle state: board full,
        // match-free, index consistent
        assert_eq!(engine.phase(), Phase::Idle, "move {move_no}");
        assert!(engine.board().is_full(), "move {move_no}");
        assert!(find_matches(engine.board()).is_empty(), "move {move_no}");
        engine.board().check_consistency();

        let events = engine.drain_events();
        assert!(matches!(
            events.last(),
            Some(BoardEvent::BoardSettled { .. })
        ));
    }
}

#[test]
fn test_event_stream_is_balanced() {
    let config = BoardConfig {
        rows: 8,
        cols: 8,
        kinds: 5,
        seed: 99,
        ..BoardConfig::default()
    };
    let mut engine = ResolutionEngine::new(&config).unwrap();
    let mut rng = SimpleRng::new(555);

    let mut removed = 0usize;
    let mut spawned = 0usize;
    for _ in 0..30 {
        let (pa, pb) = random_neighbour_pair(&mut rng, 8, 8);
        let a = engine.board().tile_at(pa).unwrap().id;
        let b = engine.board().tile_at(pb).unwrap().id;
        engine.on_tile_activated(a);
        engine.on_tile_activated(b);
        engine.settle_headless();

        for event in engine.drain_events() {
            match event {
                BoardEvent::TileRemoved { .. } => removed += 1,
                BoardEvent::TileSpawned { at, drop_height, .. } => {
                    spawned += 1;
                    assert_eq!(drop_height, at.row + 1);
                }
                _ => {}
            }
        }
    }

    // On a board that stays full, every removal is matched by a spawn
    assert_eq!(removed, spawned);
}

#[test]
fn test_config_from_json_applies_defaults() {
    let config: BoardConfig =
        serde_json::from_str(r#"{"rows": 9, "cols": 7, "kinds": 4}"#).unwrap();

    assert_eq!(config.rows, 9);
    assert_eq!(config.cols, 7);
    assert_eq!(config.kinds, 4);
    assert_eq!(config.weights, None);
    assert_eq!(config.seed, 1);
    assert_eq!(config.validate(), Ok(()));

    let engine = ResolutionEngine::new(&config).unwrap();
    assert_eq!(engine.board().rows(), 9);
    assert_eq!(engine.board().cols(), 7);
}

#[test]
fn test_invalid_config_rejected_by_engine() {
    let config: BoardConfig =
        serde_json::from_str(r#"{"rows": 8, "cols": 8, "kinds": 2}"#).unwrap();
    assert!(ResolutionEngine::new(&config).is_err());
}

#[test]
fn test_weighted_board_spawns_only_weighted_kinds() {
    let config = BoardConfig {
        rows: 6,
        cols: 6,
        kinds: 6,
        weights: Some(vec![1, 1, 1, 0, 0, 0]),
        seed: 13,
    };
    let mut engine = ResolutionEngine::new(&config).unwrap();
    let mut rng = SimpleRng::new(77);

    for _ in 0..20 {
        let (pa, pb) = random_neighbour_pair(&mut rng, 6, 6);
        let a = engine.board().tile_at(pa).unwrap().id;
        let b = engine.board().tile_at(pb).unwrap().id;
        engine.on_tile_activated(a);
        engine.on_tile_activated(b);
        engine.settle_headless();
    }

    for field in engine.board().fields() {
        let kind = field.tile().unwrap().kind;
        assert!(kind.0 < 3, "zero-weight kind {kind} on the board");
    }
}

#[test]
fn test_events_serialize_for_collaborators() {
    let config = BoardConfig {
        rows: 4,
        cols: 4,
        seed: 21,
        ..BoardConfig::default()
    };
    let mut engine = ResolutionEngine::new(&config).unwrap();

    let a = engine.board().tile_at(GridPos::new(0, 0)).unwrap().id;
    let b = engine.board().tile_at(GridPos::new(0, 1)).unwrap().id;
    engine.on_tile_activated(a);
    engine.on_tile_activated(b);
    engine.settle_headless();

    let events = engine.drain_events();
    assert!(!events.is_empty());
    for event in &events {
        let line = serde_json::to_string(event).unwrap();
        let back: BoardEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(back, *event);
    }
}
