// Engine facade used by the binaries and the replay tool
//
// The harness calls one engine per turn with a snapshot and expects a single
// grid cell back. `Bot` owns the static configuration and the decision log
// and dispatches snapshots to the right engine.

use log::info;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::DecisionLogger;
use crate::pacman::{PacmanDecision, PacmanPolicy};
use crate::reversi::{ReversiAgent, SearchOutcome};
use crate::types::{Coord, Snapshot, SnapshotError};

/// Engine-specific details of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionDetail {
    Reversi(SearchOutcome),
    Pacman(PacmanDecision),
}

/// Result of one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub turn: i32,
    /// `None` only for a Reversi pass
    pub chosen_move: Option<Coord>,
    pub detail: DecisionDetail,
}

impl Decision {
    /// Score reported by the engine, if it produces one
    pub fn score(&self) -> Option<i32> {
        match self.detail {
            DecisionDetail::Reversi(outcome) => Some(outcome.score),
            DecisionDetail::Pacman(_) => None,
        }
    }

    /// JSON response handed back to the harness
    pub fn response(&self) -> Value {
        match self.detail {
            DecisionDetail::Reversi(outcome) => json!({
                "move": self.chosen_move,
                "score": outcome.score,
                "nodes": outcome.stats.nodes,
            }),
            DecisionDetail::Pacman(decision) => json!({
                "move": self.chosen_move,
                "target": decision.target,
                "reason": format!("{:?}", decision.reason).to_lowercase(),
            }),
        }
    }
}

/// Decision engines with their static configuration
///
/// Each game keeps one engine per session: the Reversi weight table is
/// derived when a session starts and reused for every later turn.
pub struct Bot {
    config: Config,
    logger: DecisionLogger,
    reversi: Mutex<Option<Arc<ReversiAgent>>>,
    pacman: Mutex<Option<Arc<PacmanPolicy>>>,
}

impl Bot {
    /// Creates a new Bot; the decision log follows `config.debug`
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let logger = DecisionLogger::new(config.debug.enabled, &config.debug.log_file_path);
        Bot::with_logger(config, logger)
    }

    /// Creates a Bot that writes decisions to the given logger
    pub fn with_logger(config: Config, logger: DecisionLogger) -> Self {
        Bot {
            config,
            logger,
            reversi: Mutex::new(None),
            pacman: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts a Reversi session; derives the weight table for the board size
    pub fn start_reversi(&self, size: usize) -> Arc<ReversiAgent> {
        info!("GAME START: reversi {}x{}", size, size);
        let agent = Arc::new(ReversiAgent::new(self.config.reversi.clone(), size));
        *self.reversi.lock() = Some(Arc::clone(&agent));
        agent
    }

    /// Starts a Pac-Man session
    pub fn start_pacman(&self) -> Arc<PacmanPolicy> {
        info!("GAME START: pacman");
        let policy = Arc::new(PacmanPolicy::new(self.config.pacman.clone()));
        *self.pacman.lock() = Some(Arc::clone(&policy));
        policy
    }

    /// Current Reversi session, if one was started
    pub fn reversi_session(&self) -> Option<Arc<ReversiAgent>> {
        self.reversi.lock().clone()
    }

    /// Current Pac-Man session, if one was started
    pub fn pacman_session(&self) -> Option<Arc<PacmanPolicy>> {
        self.pacman.lock().clone()
    }

    /// Called when a game ends
    pub fn end(&self, turn: i32) {
        info!("GAME OVER after turn {}", turn);
    }

    /// Session agent for a board of side `size`; a new session starts when
    /// none exists or the board size changed
    fn reversi_for(&self, size: usize) -> Arc<ReversiAgent> {
        match self.reversi_session() {
            Some(agent) if agent.size() == size => agent,
            _ => self.start_reversi(size),
        }
    }

    fn pacman_for(&self) -> Arc<PacmanPolicy> {
        self.pacman_session().unwrap_or_else(|| self.start_pacman())
    }

    /// Decodes one snapshot, runs the matching engine and logs the result
    ///
    /// # Returns
    /// * `Result<Decision, SnapshotError>` - The chosen cell, or why the snapshot was rejected
    pub fn decide(&self, snapshot: &Snapshot) -> Result<Decision, SnapshotError> {
        let start_time = Instant::now();
        let turn = snapshot.turn();

        let decision = match snapshot {
            Snapshot::Reversi(s) => {
                let board = s.to_board()?;
                let outcome = self.reversi_for(board.size()).place(&board);
                Decision {
                    turn,
                    chosen_move: outcome.best_move,
                    detail: DecisionDetail::Reversi(outcome),
                }
            }
            Snapshot::Pacman(s) => {
                let state = s.to_state()?;
                let decision = self.pacman_for().decide(&state);
                Decision {
                    turn,
                    chosen_move: Some(decision.next),
                    detail: DecisionDetail::Pacman(decision),
                }
            }
        };

        info!(
            "Turn {}: Chose {:?} (score: {:?}, time: {}ms)",
            turn,
            decision.chosen_move,
            decision.score(),
            start_time.elapsed().as_millis()
        );

        self.logger.log_decision(snapshot, decision.chosen_move);
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_logger::DecisionLogger;
    use crate::types::{PacmanSnapshot, ReversiSnapshot};

    fn bot() -> Bot {
        Bot::with_logger(Config::default_hardcoded(), DecisionLogger::disabled())
    }

    #[test]
    fn test_reversi_snapshot_yields_legal_move() {
        let snapshot = Snapshot::Reversi(ReversiSnapshot {
            turn: 0,
            rows: vec![
                "........".into(),
                "........".into(),
                "........".into(),
                "...Oo...".into(),
                "...oO...".into(),
                "........".into(),
                "........".into(),
                "........".into(),
            ],
        });
        let decision = bot().decide(&snapshot).unwrap();
        let chosen = decision.chosen_move.unwrap();
        let legal = [
            Coord::new(2, 4),
            Coord::new(3, 5),
            Coord::new(4, 2),
            Coord::new(5, 3),
        ];
        assert!(legal.contains(&chosen), "{:?} is not legal", chosen);
        assert!(decision.score().is_some());
    }

    #[test]
    fn test_reversi_pass_serialises_as_null_move() {
        let snapshot = Snapshot::Reversi(ReversiSnapshot {
            turn: 3,
            rows: vec!["O...".into(), "....".into(), "....".into(), "....".into()],
        });
        let decision = bot().decide(&snapshot).unwrap();
        assert_eq!(decision.chosen_move, None);
        assert_eq!(decision.response()["move"], Value::Null);
    }

    #[test]
    fn test_pacman_snapshot_response() {
        let snapshot = Snapshot::Pacman(PacmanSnapshot {
            turn: 12,
            rows: vec!["#####".into(), "#..o#".into(), "#####".into()],
            position: Coord::new(1, 1),
            status: 0,
            ghosts: [Coord::new(0, 0), Coord::new(0, 4)],
            opponent: Coord::new(2, 0),
            opponent_status: 0,
        });
        let decision = bot().decide(&snapshot).unwrap();
        assert_eq!(decision.chosen_move, Some(Coord::new(1, 2)));
        let response = decision.response();
        assert_eq!(response["move"], json!({"x": 1, "y": 2}));
        assert_eq!(response["reason"], "target");
    }

    fn opening_snapshot(turn: i32, size: usize) -> Snapshot {
        let mut rows = vec![".".repeat(size); size];
        let mid = size / 2;
        rows[mid - 1] = format!("{}Oo{}", ".".repeat(mid - 1), ".".repeat(mid - 1));
        rows[mid] = format!("{}oO{}", ".".repeat(mid - 1), ".".repeat(mid - 1));
        Snapshot::Reversi(ReversiSnapshot { turn, rows })
    }

    #[test]
    fn test_decide_reuses_reversi_session() {
        let bot = bot();
        let session = bot.start_reversi(8);

        bot.decide(&opening_snapshot(0, 8)).unwrap();
        bot.decide(&opening_snapshot(1, 8)).unwrap();
        let current = bot.reversi_session().unwrap();
        assert!(Arc::ptr_eq(&session, &current), "session was rebuilt");
    }

    #[test]
    fn test_decide_starts_session_on_demand_and_on_resize() {
        let bot = bot();
        assert!(bot.reversi_session().is_none());

        bot.decide(&opening_snapshot(0, 8)).unwrap();
        let first = bot.reversi_session().unwrap();
        assert_eq!(first.size(), 8);

        bot.decide(&opening_snapshot(0, 6)).unwrap();
        let resized = bot.reversi_session().unwrap();
        assert_eq!(resized.size(), 6);
        assert!(!Arc::ptr_eq(&first, &resized));
    }

    #[test]
    fn test_decide_reuses_pacman_session() {
        let bot = bot();
        let session = bot.start_pacman();
        let snapshot = Snapshot::Pacman(PacmanSnapshot {
            turn: 1,
            rows: vec!["#####".into(), "#..o#".into(), "#####".into()],
            position: Coord::new(1, 1),
            status: 0,
            ghosts: [Coord::new(0, 0), Coord::new(0, 4)],
            opponent: Coord::new(2, 0),
            opponent_status: 0,
        });

        bot.decide(&snapshot).unwrap();
        assert!(Arc::ptr_eq(&session, &bot.pacman_session().unwrap()));
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        let snapshot = Snapshot::Reversi(ReversiSnapshot {
            turn: 0,
            rows: vec![],
        });
        assert_eq!(bot().decide(&snapshot), Err(SnapshotError::Empty));
    }
}
