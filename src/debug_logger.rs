// Decision log: one JSON line per decision
//
// Each entry carries the snapshot the engine saw and the move it chose, so
// the replay tool can re-run any turn later.

use log::error;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Arc;

use crate::replay::LogEntry;
use crate::types::{Coord, Snapshot};

/// Shared decision logger state
/// Clones share the same file handle
#[derive(Clone)]
pub struct DecisionLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DecisionLogger {
    /// Creates a new decision logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DecisionLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Decision logging enabled: {}", log_file_path);
                DecisionLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!(
                    "Failed to create decision log file '{}': {}",
                    log_file_path, e
                );
                DecisionLogger::disabled()
            }
        }
    }

    /// Creates a disabled logger (no-op)
    pub fn disabled() -> Self {
        DecisionLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends one decision; failures are logged and otherwise ignored
    pub fn log_decision(&self, snapshot: &Snapshot, chosen_move: Option<Coord>) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            turn: snapshot.turn(),
            chosen_move,
            snapshot: snapshot.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let json_line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize decision log entry: {}", e);
                return;
            }
        };

        let mut guard = self.file.lock();
        if let Some(file) = guard.as_mut() {
            if let Err(e) = writeln!(file, "{}", json_line) {
                error!("Failed to write decision log entry: {}", e);
            } else if let Err(e) = file.flush() {
                error!("Failed to flush decision log: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReversiSnapshot;
    use std::fs;
    use tempfile::NamedTempFile;

    fn snapshot(turn: i32) -> Snapshot {
        Snapshot::Reversi(ReversiSnapshot {
            turn,
            rows: vec!["....".into(), ".Oo.".into(), ".oO.".into(), "....".into()],
        })
    }

    #[test]
    fn test_entries_are_written_as_json_lines() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap().to_string();
        let logger = DecisionLogger::new(true, &path);
        assert!(logger.is_enabled());

        logger.log_decision(&snapshot(0), Some(Coord::new(0, 1)));
        logger.log_decision(&snapshot(1), None);

        let contents = fs::read_to_string(&path).unwrap();
        let entries: Vec<LogEntry> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].chosen_move, Some(Coord::new(0, 1)));
        assert_eq!(entries[1].turn, 1);
        assert_eq!(entries[1].chosen_move, None);
        assert_eq!(entries[1].snapshot, snapshot(1));
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let logger = DecisionLogger::disabled();
        assert!(!logger.is_enabled());
        logger.log_decision(&snapshot(0), None);
    }
}
