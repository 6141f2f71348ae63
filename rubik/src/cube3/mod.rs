//! The 3x3x3 cube: state, moves, ranking of sub-states and pattern generation.

pub mod utils;
pub mod moves;
pub mod state;
pub mod ranking;
pub mod pattern;
