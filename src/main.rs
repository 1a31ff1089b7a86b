// One-shot decision tool
//
// Reads a turn snapshot as JSON (from a file argument, or stdin when none is
// given), runs the matching engine and prints the decision as JSON.
//
// Usage:
//   grid-agents [snapshot.json] [--config <path>]

use log::{error, info};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use grid_agents::bot::Bot;
use grid_agents::config::Config;
use grid_agents::types::Snapshot;

fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read snapshot file '{}': {}", path, e)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read snapshot from stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut snapshot_path = None;
    let mut config_path = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            other => snapshot_path = Some(other.to_string()),
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
            error!("Could not load config from '{}': {}", path, e);
            process::exit(1);
        }),
        None => Config::load_or_default(),
    };
    let bot = Bot::new(config);

    let input = read_input(snapshot_path.as_deref()).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    let snapshot: Snapshot = serde_json::from_str(&input).unwrap_or_else(|e| {
        error!("Failed to parse snapshot: {}", e);
        process::exit(1);
    });

    info!("Deciding turn {}", snapshot.turn());
    match bot.decide(&snapshot) {
        Ok(decision) => println!("{}", decision.response()),
        Err(e) => {
            error!("Rejected snapshot: {}", e);
            process::exit(1);
        }
    }
}
