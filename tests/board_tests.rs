//! Board tests - grid ownership, swap, gravity, refill

use tilematch::core::KindSampler;
use tilematch::{Board, BoardConfig, GridPos, TileId, TileKind};

fn sorted_ids(board: &Board) -> Vec<TileId> {
    let mut ids: Vec<TileId> = board.fields().filter_map(|f| f.tile()).map(|t| t.id).collect();
    ids.sort();
    ids
}

#[test]
fn test_board_new_is_full() {
    let config = BoardConfig {
        rows: 6,
        cols: 7,
        seed: 3,
        ..BoardConfig::default()
    };
    let mut sampler = KindSampler::new(&config);
    let board = Board::new(&config, &mut sampler);

    assert_eq!(board.rows(), 6);
    assert_eq!(board.cols(), 7);
    assert!(board.is_full());
    assert_eq!(board.tile_count(), 42);

    // Every (row, col) maps to exactly one field with a tile in alphabet
    for row in 0..6 {
        for col in 0..7 {
            let field = board.field(row, col).expect("field missing");
            assert_eq!(field.pos(), GridPos::new(row, col));
            let tile = field.tile().expect("field empty after construction");
            assert!(tile.kind.0 < config.kinds);
        }
    }
}

#[test]
fn test_board_lookup_out_of_range() {
    let board = Board::from_rows(&[&[0, 1, 2], &[1, 2, 0]]);

    assert!(board.field(2, 0).is_none());
    assert!(board.field(0, 3).is_none());
    assert!(board.tile_at(GridPos::new(9, 9)).is_none());
    assert!(board.position_of(TileId(999)).is_none());
}

#[test]
fn test_swap_conserves_tile_multiset() {
    let mut board = Board::from_rows(&[&[0, 1, 2], &[1, 2, 0], &[2, 0, 1]]);
    let before = sorted_ids(&board);

    let a = board.tile_at(GridPos::new(0, 0)).unwrap();
    let b = board.tile_at(GridPos::new(2, 2)).unwrap();
    assert!(board.swap(a.id, b.id));

    // No tile lost or duplicated, only field assignments exchanged
    assert_eq!(sorted_ids(&board), before);
    assert_eq!(board.position_of(a.id), Some(GridPos::new(2, 2)));
    assert_eq!(board.position_of(b.id), Some(GridPos::new(0, 0)));
    board.check_consistency();
}

#[test]
fn test_are_neighbours_four_directional() {
    let board = Board::from_rows(&[&[0, 1, 2], &[1, 2, 0], &[2, 0, 1]]);
    let center = board.tile_at(GridPos::new(1, 1)).unwrap().id;

    for (row, col) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
        let other = board.tile_at(GridPos::new(row, col)).unwrap().id;
        assert!(board.are_neighbours(center, other), "({row},{col})");
    }
    for (row, col) in [(0, 0), (0, 2), (2, 0), (2, 2)] {
        let other = board.tile_at(GridPos::new(row, col)).unwrap().id;
        assert!(!board.are_neighbours(center, other), "({row},{col})");
    }
    assert!(!board.are_neighbours(center, center));
    assert!(!board.are_neighbours(center, TileId(999)));
}

#[test]
fn test_gravity_compacts_column_preserving_order() {
    // Column 0 top-to-bottom kinds: 0, 1, 2, 3, 4
    let mut board = Board::from_rows(&[
        &[0, 9],
        &[1, 9],
        &[2, 9],
        &[3, 9],
        &[4, 9],
    ]);

    // Punch holes at rows 1 and 3
    let hole1 = board.tile_at(GridPos::new(1, 0)).unwrap();
    let hole3 = board.tile_at(GridPos::new(3, 0)).unwrap();
    board.remove_tile(hole1.id);
    board.remove_tile(hole3.id);

    let moves = board.apply_gravity();

    // Survivors settle on the lowest rows in their original order,
    // empties end at the top
    let col0: Vec<Option<u8>> = (0..5)
        .map(|row| board.tile_at(GridPos::new(row, 0)).map(|t| t.kind.0))
        .collect();
    assert_eq!(col0, vec![None, None, Some(0), Some(2), Some(4)]);

    // Exactly the two tiles above the holes moved, each once
    assert_eq!(moves.len(), 2);
    let moved: Vec<(u8, usize, usize)> = moves
        .iter()
        .map(|&(tile, from, to)| (tile.kind.0, from.row, to.row))
        .collect();
    assert!(moved.contains(&(2, 2, 3)));
    assert!(moved.contains(&(0, 0, 2)));

    // Untouched column stays put
    for row in 0..5 {
        assert_eq!(board.tile_at(GridPos::new(row, 1)).unwrap().kind, TileKind(9));
    }
    board.check_consistency();
}

#[test]
fn test_gravity_on_full_board_is_noop() {
    let mut board = Board::from_rows(&[&[0, 1], &[2, 3]]);
    let before = board.kind_grid();

    assert!(board.apply_gravity().is_empty());
    assert_eq!(board.kind_grid(), before);
}

#[test]
fn test_gravity_whole_column_empty() {
    let mut board = Board::from_rows(&[&[0, 1], &[2, 3], &[4, 5]]);
    for row in 0..3 {
        let id = board.tile_at(GridPos::new(row, 0)).unwrap().id;
        board.remove_tile(id);
    }

    assert!(board.apply_gravity().is_empty());
    assert_eq!(
        board.empty_positions(),
        vec![GridPos::new(0, 0), GridPos::new(1, 0), GridPos::new(2, 0)]
    );
}

#[test]
fn test_refill_only_touches_empty_fields() {
    let config = BoardConfig {
        rows: 5,
        cols: 5,
        seed: 17,
        ..BoardConfig::default()
    };
    let mut sampler = KindSampler::new(&config);
    let mut board = Board::new(&config, &mut sampler);

    let keep: Vec<(TileId, GridPos)> = board
        .fields()
        .filter(|f| f.pos().row > 0)
        .map(|f| (f.tile().unwrap().id, f.pos()))
        .collect();

    // Clear the top row
    for col in 0..5 {
        let id = board.tile_at(GridPos::new(0, col)).unwrap().id;
        board.remove_tile(id);
    }

    let spawns = board.refill(&mut sampler);
    assert_eq!(spawns.len(), 5);
    assert!(board.is_full());
    assert!(spawns.iter().all(|&(_, pos)| pos.row == 0));

    // Surviving tiles were not disturbed
    for (id, pos) in keep {
        assert_eq!(board.position_of(id), Some(pos));
    }
}

#[test]
fn test_spawned_ids_never_reused() {
    let config = BoardConfig {
        rows: 4,
        cols: 4,
        seed: 23,
        ..BoardConfig::default()
    };
    let mut sampler = KindSampler::new(&config);
    let mut board = Board::new(&config, &mut sampler);

    let mut seen: Vec<TileId> = sorted_ids(&board);

    for _ in 0..10 {
        let victim = board.fields().find_map(|f| f.tile()).unwrap();
        board.remove_tile(victim.id);
        let spawns = board.refill(&mut sampler);
        for (tile, _) in spawns {
            assert!(!seen.contains(&tile.id), "id {} reused", tile.id);
            seen.push(tile.id);
        }
    }
}
