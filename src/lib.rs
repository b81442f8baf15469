//! Optimal solver for N x N sliding-tile puzzles.
//!
//! Boards are checked for solvability by inversion parity before any search,
//! then solved with A* under the Manhattan-distance heuristic.

pub mod board;
pub mod error;
pub mod heuristic;
pub mod render;
pub mod search;
pub mod solvability;

pub use board::{Board, Move, Tile};
pub use error::{BoardError, SolveError};
pub use search::{solve, solve_tiles, solve_with, Outcome, Solution, SolverConfig};
pub use solvability::{inversions, is_solvable, is_solvable_tiles};
