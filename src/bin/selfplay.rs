// Self-play harness: the Reversi agent against a seeded random opponent
//
// Usage:
//   cargo run --release --bin selfplay -- [--games N] [--size N] [--seed N] [--config <path>]

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::env;
use std::process;
use std::time::Instant;

use grid_agents::bot::Bot;
use grid_agents::config::Config;
use grid_agents::reversi::{Board, Disc, ReversiAgent};

/// Final disc counts of one game, from the agent's side
struct GameResult {
    own: usize,
    opponent: usize,
    plies: u32,
}

fn play_game(agent: &ReversiAgent, rng: &mut StdRng, agent_first: bool) -> GameResult {
    // Always kept from the agent's perspective
    let mut board = Board::opening(agent.size());
    let mut agent_to_move = agent_first;
    let mut passes = 0;
    let mut plies = 0;

    while passes < 2 {
        let chosen = if agent_to_move {
            agent.place(&board).best_move
        } else {
            let view = board.swapped();
            view.legal_moves().choose(rng).copied()
        };

        match chosen {
            Some(at) => {
                passes = 0;
                if agent_to_move {
                    board.apply_move(at);
                } else {
                    let mut view = board.swapped();
                    view.apply_move(at);
                    board = view.swapped();
                }
                let side = if agent_to_move { "agent" } else { "random" };
                debug!("Ply {}: {} played {:?}", plies, side, at);
            }
            None => passes += 1,
        }

        plies += 1;
        agent_to_move = !agent_to_move;
    }

    GameResult {
        own: board.count_discs(Disc::Own),
        opponent: board.count_discs(Disc::Opponent),
        plies,
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let Some(value) = args.get(i + 1) else {
        eprintln!("Error: {} requires an argument", flag);
        process::exit(1);
    };
    value.parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value '{}' for {}", value, flag);
        process::exit(1);
    })
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut games: u32 = 10;
    let mut size: usize = 8;
    let mut seed: u64 = 42;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => games = parse_flag(&args, i, "--games"),
            "--size" => size = parse_flag(&args, i, "--size"),
            "--seed" => seed = parse_flag(&args, i, "--seed"),
            "--config" => config_path = Some(parse_flag(&args, i, "--config")),
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                process::exit(1);
            }
        }
        i += 2;
    }

    if size < 4 || size % 2 != 0 {
        eprintln!("Error: board size must be an even number of at least 4");
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };

    let bot = Bot::new(config);
    let agent = bot.start_reversi(size);
    let mut rng = StdRng::seed_from_u64(seed);

    let (mut wins, mut losses, mut draws) = (0, 0, 0);
    let start_time = Instant::now();

    for game in 0..games {
        let result = play_game(&agent, &mut rng, game % 2 == 0);
        info!(
            "Game {}: agent {} - {} random ({} plies)",
            game + 1,
            result.own,
            result.opponent,
            result.plies
        );
        match result.own.cmp(&result.opponent) {
            std::cmp::Ordering::Greater => wins += 1,
            std::cmp::Ordering::Less => losses += 1,
            std::cmp::Ordering::Equal => draws += 1,
        }
        bot.end(result.plies as i32);
    }

    println!(
        "{} games on {}x{}: {} wins, {} losses, {} draws ({:.1}s)",
        games,
        size,
        size,
        wins,
        losses,
        draws,
        start_time.elapsed().as_secs_f64()
    );
}
