//! Core of the rainbow snake game: the grid simulation, the turn filter,
//! the tick-driven lifecycle controller and the high-score hook, plus the
//! logger and YAML config layer they run on.

pub mod config;
pub mod games;
pub mod logger;
pub mod scores;
pub mod storage;
