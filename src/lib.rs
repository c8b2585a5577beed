//! Upitup: a shortest-path solver for the rolling-cube sliding puzzle.
//!
//! Eight cubes share a 3x3 tray with one gap. Sliding a cube into the gap
//! rolls it a quarter turn, changing which face points up. The puzzle is solved
//! when every cube shows face 1 and the gap is back in the middle.
//!
//! ## Modules
//!
//! - [`puzzle`] - Boards, moves, the base-7 encoding and goal predicates
//! - [`solver`] - Breadth-first search over encodings with path reconstruction
//! - [`render`] - Terminal output for boards and move lists
//!
//! ## Example
//!
//! ```
//! use upitup::puzzle::Board;
//! use upitup::solver::{Outcome, Solver};
//!
//! let start: Board = "1 1 1 / 0 1 1 / 1 1 1".parse().unwrap();
//! let mut solver = Solver::new();
//! if let Outcome::Solved(solution) = solver.solve(&start).unwrap() {
//!     assert_eq!(start.apply_moves(&solution.moves).unwrap(), solution.goal);
//! }
//! ```

pub mod puzzle;
pub mod render;
pub mod solver;

pub use puzzle::{Board, Goal, Move, Upright};
pub use solver::{solve, Outcome, Solution, Solver};
