//! Pac-Man pursuit/evasion agent
//!
//! - [`grid`]: maze tiles, actors, validity and safety tests
//! - [`bfs`]: shared BFS, target scoring, path backtrace
//! - [`dead_end`]: look-ahead dead corridor detection
//! - [`policy`]: per-tick decision combining all of the above

pub mod bfs;
pub mod dead_end;
pub mod grid;
pub mod policy;

pub use bfs::{breadth_first, find_target, BfsTree, Target, TargetSearch};
pub use dead_end::{analyze_path, DeadEndAnalysis};
pub use grid::{Actors, Grid, PacmanState, Tile};
pub use policy::{DecisionReason, PacmanDecision, PacmanPolicy};
