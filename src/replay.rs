// Replay module for re-running logged decisions
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run both engines on the logged snapshots
// 3. Compare logged vs replayed moves
// 4. Generate summary reports

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::DecisionLogger;
use crate::types::{Coord, Snapshot};

/// A single line of the decision log
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogEntry {
    pub turn: i32,
    /// `None` for a Reversi pass
    pub chosen_move: Option<Coord>,
    pub snapshot: Snapshot,
    pub timestamp: String,
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Option<Coord>,
    pub replayed_move: Option<Coord>,
    pub matches: bool,
    /// Search score; Pac-Man decisions carry none
    pub replayed_score: Option<i32>,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    bot: Bot,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine; replays never write to the decision log
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            bot: Bot::with_logger(config, DecisionLogger::disabled()),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Runs the matching engine on one snapshot
    /// Returns the chosen move, the score if any, and the elapsed time
    pub fn replay_turn(
        &self,
        snapshot: &Snapshot,
    ) -> Result<(Option<Coord>, Option<i32>, u128), String> {
        let start_time = Instant::now();
        let decision = self
            .bot
            .decide(snapshot)
            .map_err(|e| format!("Invalid snapshot: {}", e))?;
        Ok((
            decision.chosen_move,
            decision.score(),
            start_time.elapsed().as_millis(),
        ))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let (replayed_move, replayed_score, computation_time) =
            self.replay_turn(&entry.snapshot)?;
        let matches = entry.chosen_move == replayed_move;

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: MATCH - {} (score: {:?}, time: {}ms)",
                    entry.turn,
                    format_move(replayed_move),
                    replayed_score,
                    computation_time
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH - Original: {}, Replayed: {} (score: {:?}, time: {}ms)",
                    entry.turn,
                    format_move(entry.chosen_move),
                    format_move(replayed_move),
                    replayed_score,
                    computation_time
                );
            }
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original_move: entry.chosen_move,
            replayed_move,
            matches,
            replayed_score,
            computation_time_ms: computation_time,
        })
    }

    /// Replays all entries in parallel; results keep log order
    pub fn replay_all(&self, entries: &[LogEntry]) -> Result<Vec<ReplayResult>, String> {
        let results = entries
            .par_iter()
            .map(|entry| (entry.turn, self.replay_entry(entry)))
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|(turn, result)| match result {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn, e);
                    None
                }
            })
            .collect();

        Ok(results)
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a summary report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n===========================================================");
        println!("                    REPLAY REPORT");
        println!("===========================================================");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("===========================================================\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("===========================================================");
            println!("                  DETAILED MISMATCHES");
            println!("===========================================================");

            for result in mismatches {
                println!(
                    "Turn {}: {} -> {} (score: {:?}, time: {}ms)",
                    result.turn,
                    format_move(result.original_move),
                    format_move(result.replayed_move),
                    result.replayed_score,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Option<Coord>>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            if !acceptable.contains(&entry.chosen_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable
                        .iter()
                        .map(|m| format_move(*m))
                        .collect::<Vec<_>>(),
                    format_move(entry.chosen_move)
                ));
            }
        }

        Ok(())
    }
}

/// Parses `"x,y"` or `"pass"` into a move
pub fn parse_move(s: &str) -> Result<Option<Coord>, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        return Ok(None);
    }

    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("Invalid move '{}'. Expected 'x,y' or 'pass'", s))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("Invalid row '{}': {}", x, e))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("Invalid column '{}': {}", y, e))?;
    Ok(Some(Coord::new(x, y)))
}

/// Inverse of [`parse_move`]
pub fn format_move(m: Option<Coord>) -> String {
    match m {
        Some(c) => format!("{},{}", c.x, c.y),
        None => "pass".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReversiSnapshot;

    fn opening_entry(turn: i32, chosen_move: Option<Coord>) -> LogEntry {
        LogEntry {
            turn,
            chosen_move,
            snapshot: Snapshot::Reversi(ReversiSnapshot {
                turn,
                rows: vec!["....".into(), ".Oo.".into(), ".oO.".into(), "....".into()],
            }),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("3,4").unwrap(), Some(Coord::new(3, 4)));
        assert_eq!(parse_move(" 0 , 7 ").unwrap(), Some(Coord::new(0, 7)));
        assert_eq!(parse_move("pass").unwrap(), None);
        assert_eq!(parse_move("PASS").unwrap(), None);

        assert!(parse_move("up").is_err());
        assert!(parse_move("1;2").is_err());
        assert!(parse_move("a,2").is_err());
    }

    #[test]
    fn test_format_move_inverts_parse() {
        assert_eq!(format_move(Some(Coord::new(2, 5))), "2,5");
        assert_eq!(format_move(None), "pass");
        assert_eq!(
            parse_move(&format_move(Some(Coord::new(2, 5)))).unwrap(),
            Some(Coord::new(2, 5))
        );
    }

    #[test]
    fn test_replay_is_deterministic() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let first = engine.replay_entry(&opening_entry(0, None)).unwrap();
        let logged = opening_entry(0, first.replayed_move);

        let results = engine.replay_all(&[logged.clone(), logged]).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.matches));
        assert!(results.iter().all(|r| r.replayed_score.is_some()));
    }

    #[test]
    fn test_generate_stats() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let result = |matches| ReplayResult {
            turn: 0,
            original_move: None,
            replayed_move: None,
            matches,
            replayed_score: None,
            computation_time_ms: 0,
        };
        let stats =
            engine.generate_stats(&[result(true), result(true), result(false), result(true)]);
        assert_eq!(stats.total_turns, 4);
        assert_eq!(stats.matches, 3);
        assert_eq!(stats.mismatches, 1);
        assert!((stats.match_rate - 75.0).abs() < f64::EPSILON);

        let empty = engine.generate_stats(&[]);
        assert_eq!(empty.match_rate, 0.0);
    }

    #[test]
    fn test_validate_expected_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![
            opening_entry(1, Some(Coord::new(0, 1))),
            opening_entry(2, None),
        ];

        assert!(engine
            .validate_expected_moves(
                &entries,
                &[(1, vec![Some(Coord::new(0, 1)), Some(Coord::new(1, 0))]), (2, vec![None])]
            )
            .is_ok());

        let err = engine
            .validate_expected_moves(&entries, &[(1, vec![Some(Coord::new(3, 2))])])
            .unwrap_err();
        assert!(err.contains("Turn 1"));
        assert!(err.contains("0,1"));

        assert!(engine
            .validate_expected_moves(&entries, &[(9, vec![None])])
            .is_err());
    }

    #[test]
    fn test_replay_turns_missing_turn_is_error() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![opening_entry(0, None)];
        assert!(engine.replay_turns(&entries, &[5]).is_err());
    }
}
