#![doc = include_str!("../README.md")]

pub mod error;
pub mod stats;
pub mod cube3;
pub mod pattern_db;
pub mod solver;

pub use cube3::moves::{Face, Move};
pub use cube3::state::CubeState;
pub use pattern_db::{Heuristic, PatternDb, PatternDbSet, StandardTable};
pub use solver::CubeSolver;
