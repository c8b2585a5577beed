//! Breadth-first search over board encodings.
//!
//! The solver owns two flat tables indexed by [`Code`]: a one-byte move tag
//! per visited board and the code of the board it was first reached from.
//! Both are sized to the whole encoding space up front, so revisit checks and
//! path reconstruction are plain array lookups.

use log::{debug, info, trace};
use std::collections::VecDeque;
use thiserror::Error;

use crate::puzzle::{Board, Code, Goal, Move, PuzzleError, Upright};

const UNVISITED: u8 = 0;
const START: u8 = b'S';

/// How often the frontier size is logged, in expanded boards.
const PROGRESS_INTERVAL: usize = 1_000_000;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
    #[error("parent chain broken at encoding {0}")]
    BrokenChain(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Moves from the start to `goal`, first move first.
    pub moves: Vec<Move>,
    pub goal: Board,
    /// Boards marked visited when the goal was dequeued.
    pub explored: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// Every board reachable from the start was checked and none is a goal.
    Unsolvable { explored: usize },
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            Outcome::Unsolvable { .. } => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }
}

/// Search context owning the visited and parent tables.
///
/// A solver runs one search at a time; use separate solvers for searches
/// that must not share state.
pub struct Solver {
    visited: Vec<u8>,
    parent: Vec<u32>,
    dirty: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        trace!("allocating search tables for {} encodings", Code::SPACE);
        Self {
            visited: vec![UNVISITED; Code::SPACE],
            parent: vec![0; Code::SPACE],
            dirty: false,
        }
    }

    /// Searches for the [`Upright`] goal.
    pub fn solve(&mut self, start: &Board) -> Result<Outcome, SearchError> {
        self.solve_with(start, &Upright)
    }

    pub fn solve_with<G: Goal + ?Sized>(
        &mut self,
        start: &Board,
        goal: &G,
    ) -> Result<Outcome, SearchError> {
        self.reset();
        self.dirty = true;

        info!("searching from {:?}", start.rows());

        let mut queue = VecDeque::new();
        self.visited[start.encode().index()] = START;
        queue.push_back(*start);
        let mut explored = 1;
        let mut expanded = 0;

        while let Some(board) = queue.pop_front() {
            let code = board.encode();
            if goal.is_goal(&board) {
                let moves = self.trace_back(code)?;
                info!(
                    "found a {}-move solution after visiting {} boards",
                    moves.len(),
                    explored
                );
                return Ok(Outcome::Solved(Solution {
                    moves,
                    goal: board,
                    explored,
                }));
            }

            for (movement, next) in board.neighbours()? {
                let index = next.encode().index();
                if self.visited[index] == UNVISITED {
                    self.visited[index] = movement.tag();
                    self.parent[index] = code.value();
                    queue.push_back(next);
                    explored += 1;
                }
            }

            expanded += 1;
            if expanded % PROGRESS_INTERVAL == 0 {
                debug!(
                    "expanded {} boards, {} visited, frontier {}",
                    expanded,
                    explored,
                    queue.len()
                );
            }
        }

        info!("no goal reachable, {} boards visited", explored);
        Ok(Outcome::Unsolvable { explored })
    }

    /// Walks parent links from `code` back to the start board.
    fn trace_back(&self, code: Code) -> Result<Vec<Move>, SearchError> {
        let mut moves = Vec::new();
        let mut current = code.value();
        loop {
            let tag = self.visited[current as usize];
            if tag == START {
                break;
            }
            let movement = Move::from_tag(tag).ok_or(SearchError::BrokenChain(current))?;
            if moves.len() >= Code::SPACE {
                return Err(SearchError::BrokenChain(current));
            }
            moves.push(movement);
            current = self.parent[current as usize];
        }
        moves.reverse();
        Ok(moves)
    }

    fn reset(&mut self) {
        // parent entries are only read behind a visited mark, so they can stay stale
        if self.dirty {
            self.visited.fill(UNVISITED);
            self.dirty = false;
        }
    }
}

/// Runs a single search with a freshly allocated [`Solver`].
pub fn solve(start: &Board) -> Result<Outcome, SearchError> {
    Solver::new().solve(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Move::{Down, Left, Right, Up};

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    #[test]
    fn goal_start_needs_no_moves() {
        let outcome = solve(&Board::solved()).unwrap();
        assert_eq!(
            outcome,
            Outcome::Solved(Solution {
                moves: vec![],
                goal: Board::solved(),
                explored: 1,
            })
        );
    }

    #[test]
    fn finds_the_first_shortest_path_in_expansion_order() {
        let start = board("1 1 1 / 0 1 1 / 1 1 1");
        let outcome = solve(&start).unwrap();
        let solution = outcome.solution().unwrap();
        assert_eq!(
            solution.moves,
            vec![Right, Up, Left, Down, Right, Up, Left, Down, Right]
        );
        assert_eq!(solution.goal, Board::solved());
        assert_eq!(solution.explored, 742);
    }

    #[test]
    fn isolated_start_is_unsolvable() {
        // the first hole only swaps with other holes, so nothing else is reachable
        let start = Board::from_rows([[0, 0, 0], [0, 0, 0], [0, 0, 3]]).unwrap();
        let outcome = solve(&start).unwrap();
        assert_eq!(outcome, Outcome::Unsolvable { explored: 1 });
        assert!(!outcome.is_solved());
    }

    #[test]
    fn custom_goal_is_honoured() {
        let start = board("1 1 1 / 1 0 1 / 1 1 1");
        let hole_top_left = |b: &Board| b.get(0, 0) == 0;
        let mut solver = Solver::new();
        let outcome = solver.solve_with(&start, &hole_top_left).unwrap();
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.moves, vec![Up, Left]);
        assert_eq!(start.apply_moves(&solution.moves).unwrap(), solution.goal);
    }

    #[test]
    fn reused_solver_matches_fresh_one() {
        let first = board("1 1 1 / 0 1 1 / 1 1 1");
        let second = board("1 1 1 / 3 1 1 / 1 0 1");

        let mut solver = Solver::new();
        let a = solver.solve(&first).unwrap();
        let b = solver.solve(&second).unwrap();
        let again = solver.solve(&first).unwrap();

        assert_eq!(a, again);
        assert_eq!(b, Solver::new().solve(&second).unwrap());
    }

    #[test]
    fn broken_chain_is_reported() {
        let mut solver = Solver::new();
        let code = Board::solved().encode();
        assert!(matches!(
            solver.trace_back(code),
            Err(SearchError::BrokenChain(c)) if c == code.value()
        ));
        solver.visited[code.index()] = START;
        assert_eq!(solver.trace_back(code).unwrap(), Vec::<Move>::new());
    }
}
