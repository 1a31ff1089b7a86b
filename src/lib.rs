// Library exports for the grid game agents
// The binaries, benches and integration tests all go through these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod pacman;
pub mod replay;
pub mod reversi;
pub mod types;
