//! Headless demo driver.
//!
//! Plays seeded random neighbour swaps against the engine, acting as a
//! trivial collaborator that acknowledges every animation completion
//! immediately. Useful for eyeballing cascade behavior and as a smoke
//! test for the event stream.

use anyhow::{anyhow, Result};

use tilematch::core::SimpleRng;
use tilematch::{BoardConfig, BoardEvent, GridPos, ResolutionEngine};

#[derive(Debug, Clone)]
struct DemoConfig {
    board: BoardConfig,
    moves: u32,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<DemoConfig> {
    let mut board = BoardConfig::default();
    let mut moves = 20u32;
    let mut json = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--rows" => board.rows = parse_value(args, &mut i, "--rows")?,
            "--cols" => board.cols = parse_value(args, &mut i, "--cols")?,
            "--kinds" => board.kinds = parse_value(args, &mut i, "--kinds")?,
            "--seed" => board.seed = parse_value(args, &mut i, "--seed")?,
            "--moves" => moves = parse_value(args, &mut i, "--moves")?,
            "--json" => json = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(DemoConfig { board, moves, json })
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T> {
    *i += 1;
    let v = args
        .get(*i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid value for {}: {}", flag, v))
}

/// Pick a uniformly random pair of 4-adjacent positions
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

fn print_grid(engine: &ResolutionEngine) {
    for row in engine.board().kind_grid() {
        let line: Vec<String> = row.iter().map(|k| k.to_string()).collect();
        println!("  {}", line.join(" "));
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;
    config.board.validate()?;

    let mut engine = ResolutionEngine::new(&config.board)?;
    let mut rng = SimpleRng::new(config.board.seed ^ 0x9e37_79b9);

    let mut swaps_matched = 0u32;
    let mut total_removed = 0u64;
    let mut best_cascade = 0u32;

    println!(
        "board {}x{}, {} kinds, seed {}",
        config.board.rows, config.board.cols, config.board.kinds, config.board.seed
    );
    print_grid(&engine);

    for move_no in 1..=config.moves {
        let (pa, pb) = random_neighbour_pair(&mut rng, config.board.rows, config.board.cols);
        let a = engine
            .board()
            .tile_at(pa)
            .ok_or_else(|| anyhow!("empty field at {}", pa))?;
        let b = engine
            .board()
            .tile_at(pb)
            .ok_or_else(|| anyhow!("empty field at {}", pb))?;

        engine.on_tile_activated(a.id);
        engine.on_tile_activated(b.id);
        engine.settle_headless();

        let events = engine.drain_events();
        let mut removed = 0u64;
        let mut cascades = 0u32;
        for event in &events {
            if config.json {
                println!("{}", serde_json::to_string(event)?);
            }
            match event {
                BoardEvent::TileRemoved { .. } => removed += 1,
                BoardEvent::BoardSettled { cascades: c } => cascades = *c,
                _ => {}
            }
        }

        if removed > 0 {
            swaps_matched += 1;
            total_removed += removed;
            best_cascade = best_cascade.max(cascades);
        }
        if !config.json {
            println!(
                "move {move_no}: swap {pa} <-> {pb}, removed {removed}, cascades {cascades}"
            );
        }
    }

    println!(
        "{} of {} swaps matched, {} tiles removed, best cascade {}",
        swaps_matched, config.moves, total_removed, best_cascade
    );
    print_grid(&engine);

    Ok(())
}
