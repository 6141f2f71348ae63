use crate::cube3::moves::{Face, Move};
use crate::cube3::state::CubeState;
use crate::cube3::utils::GODS_NUMBER;
use crate::error::SolveError;
use crate::pattern_db::Heuristic;
use crate::stats::SearchStatsCollector;
use arrayvec::ArrayVec;
use log::{debug, info};

/// Returns `true` if the move turning `face` should not follow the move turning `previous` face.
///
/// Turning the same face twice in a row is never needed. Turns of opposite faces commute,
/// so they are only allowed in the order of increasing face codes (for example L after R, but not R after L).
#[inline(always)] pub fn is_pruned(face: Face, previous: Face) -> bool {
    face == previous || (face == previous.opposite() && face.index() < previous.index())
}

/// Entry of the depth-first search stack.
#[derive(Copy, Clone)]
struct SearchNode {
    state: CubeState,
    /// Number of moves made from the initial state.
    depth: u8,
    /// Lower bound of the length of solutions that pass through the node.
    cost: u8,
    /// Move that produced the node, `None` for the initial state.
    last_move: Option<Move>
}

/// Solves the cube with IDA*, guided by the given heuristic.
pub struct CubeSolver<H: Heuristic> {
    heuristic: H,
    max_depth: u8
}

impl<H: Heuristic> CubeSolver<H> {
    /// Constructs the solver that uses `heuristic` and searches for solutions of up to `GODS_NUMBER` moves.
    pub fn new(heuristic: H) -> Self {
        Self { heuristic, max_depth: GODS_NUMBER }
    }

    /// Changes the length of the longest solution searched for.
    #[must_use] pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline] pub fn heuristic(&self) -> &H { &self.heuristic }

    #[inline] pub fn max_depth(&self) -> u8 { self.max_depth }

    /// Returns heuristic value of `state` used by the search.
    #[inline] fn estimate(&self, state: &CubeState) -> u8 {
        let value = self.heuristic.lower_bound(state);
        // Note about "max(1)": non-solved state needs at least one move, even if heuristic says 0
        if value == 0 && !state.is_solved() { 1 } else { value }
    }

    /// Returns the moves that solve `state` (empty if it is already solved).
    /// Collects statistics during search and stops if `stats` requests it.
    ///
    /// The solution is the first one found by the depth-first search with the lowest bound
    /// (and it is optimal if the heuristic is admissible).
    /// Among the children of each node, the ones with lower estimated cost are visited first.
    pub fn solve_stats(&self, state: &CubeState, stats: &mut impl SearchStatsCollector) -> Result<Vec<Move>, SolveError> {
        let mut bound = self.estimate(state);
        let mut stack = Vec::with_capacity(16 * self.max_depth as usize + 1);
        let mut path = Vec::with_capacity(self.max_depth as usize);
        let mut successors = ArrayVec::<SearchNode, 18>::new();
        loop {
            if bound > self.max_depth {
                return Err(SolveError::BoundExceeded { bound, max_depth: self.max_depth });
            }
            if !stats.iteration(bound) { return Err(SolveError::Cancelled); }
            info!("searching for solutions of {} moves", bound);
            let mut next_bound = u8::MAX;
            path.clear();
            stack.push(SearchNode { state: *state, depth: 0, cost: bound, last_move: None });
            while let Some(node) = stack.pop() {
                if let Some(m) = node.last_move {
                    path.truncate(node.depth as usize - 1);
                    path.push(m);
                }
                if node.depth == bound {
                    if node.state.is_solved() {
                        stats.leaf();
                        debug!("solution of {} moves found", path.len());
                        return Ok(path);
                    }
                    if !stats.leaf() { return Err(SolveError::Cancelled); }
                    continue;
                }
                stats.internal();
                let depth = node.depth + 1;
                for m in Move::ALL {
                    if let Some(last) = node.last_move {
                        if is_pruned(m.face(), last.face()) { continue; }
                    }
                    let state = node.state.applied(m);
                    let cost = depth.saturating_add(self.estimate(&state));
                    if cost <= bound {
                        successors.push(SearchNode { state, depth, cost, last_move: Some(m) });
                    } else {
                        if !stats.leaf() { return Err(SolveError::Cancelled); }
                        next_bound = next_bound.min(cost);
                    }
                }
                // stable sort keeps generation order among equal costs,
                // the node pushed last is visited first
                successors.sort_by_key(|s| s.cost);
                stack.extend(successors.drain(..).rev());
            }
            bound = next_bound;
        }
    }

    /// Returns the moves that solve `state` (empty if it is already solved).
    #[inline] pub fn solve(&self, state: &CubeState) -> Result<Vec<Move>, SolveError> {
        self.solve_stats(state, &mut ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube3::moves::{parse_sequence, format_sequence};
    use crate::stats::{Limited, SearchAllStats};
    use std::collections::HashSet;

    fn scrambled(moves: &str) -> CubeState {
        CubeState::solved().apply_sequence(&parse_sequence(moves).unwrap())
    }

    #[test]
    fn test_pruning_rules() {
        assert!(is_pruned(Face::R, Face::R));
        assert!(is_pruned(Face::R, Face::L));
        assert!(!is_pruned(Face::L, Face::R));
        assert!(is_pruned(Face::U, Face::D));
        assert!(!is_pruned(Face::D, Face::U));
        assert!(is_pruned(Face::F, Face::B));
        assert!(!is_pruned(Face::B, Face::F));
        assert!(!is_pruned(Face::U, Face::R));
        assert!(!is_pruned(Face::R, Face::U));
        for face in Face::ALL {
            assert_eq!(Face::ALL.iter().filter(|f| is_pruned(**f, face)).count(), if face.index() < 3 { 1 } else { 2 });
        }
    }

    fn reached(depth: u8, last: Option<Face>, state: CubeState, pruned: bool, result: &mut HashSet<CubeState>) {
        result.insert(state);
        if depth == 0 { return; }
        for m in Move::ALL {
            let skip = match last {
                Some(last) if pruned => is_pruned(m.face(), last),
                Some(last) => m.face() == last,
                None => false
            };
            if skip { continue; }
            reached(depth - 1, Some(m.face()), state.applied(m), pruned, result);
        }
    }

    #[test]
    fn test_pruning_reaches_all_states() {
        let mut unpruned = HashSet::new();
        let mut pruned = HashSet::new();
        reached(4, None, CubeState::solved(), false, &mut unpruned);
        reached(4, None, CubeState::solved(), true, &mut pruned);
        assert_eq!(unpruned.len(), 1 + 18 + 243 + 3240 + 43239);
        assert_eq!(pruned, unpruned);
    }

    #[test]
    fn test_solved() {
        let solver = CubeSolver::new(());
        assert_eq!(solver.solve(&CubeState::solved()), Ok(Vec::new()));
    }

    #[test]
    fn test_single_moves() {
        let solver = CubeSolver::new(());
        for m in Move::ALL {
            assert_eq!(solver.solve(&CubeState::solved().applied(m)), Ok(vec![m.inverse()]));
        }
    }

    #[test]
    fn test_short_scramble_without_heuristic() {
        let solver = CubeSolver::new(());
        let state = scrambled("R U F'");
        let mut stats = SearchAllStats::default();
        let solution = solver.solve_stats(&state, &mut stats).unwrap();
        assert_eq!(format_sequence(&solution), "F U' R'");
        assert!(state.apply_sequence(&solution).is_solved());
        assert_eq!(stats.iterations, 3);
        assert!(stats.internal > 0);
    }

    #[test]
    fn test_bound_exceeded() {
        let solver = CubeSolver::new(()).with_max_depth(1);
        assert_eq!(solver.max_depth(), 1);
        assert_eq!(solver.solve(&scrambled("R U")), Err(SolveError::BoundExceeded { bound: 2, max_depth: 1 }));
    }

    #[test]
    fn test_cancel() {
        let solver = CubeSolver::new(());
        let mut stats = Limited::with_limit(1000);
        assert_eq!(solver.solve_stats(&scrambled("R U F L D"), &mut stats), Err(SolveError::Cancelled));
        assert!(stats.visits() >= 1000);
    }
}
