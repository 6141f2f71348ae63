use crate::cube3::moves::{Face, Move, Orbit};
use crate::cube3::ranking::{PermutationRanker, encode_orientations, decode_orientations, power};
use crate::cube3::state::CubeState;
use crate::cube3::utils::MAX_PIECES;
use crate::error::{BuildError, PatternError};
use crate::pattern_db::PatternDb;
use crate::stats::BuildStatsCollector;
use arrayvec::ArrayVec;
use log::debug;

/// Value of pattern database entries that have not been reached (yet) during generation.
/// It never occurs in a completely generated database.
pub const UNEXPLORED: u8 = u8::MAX;

/// Which properties of the tracked pieces are encoded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Encoding {
    /// Positions and orientations of the tracked pieces.
    PositionsAndOrientations,
    /// Only positions of the tracked pieces.
    Positions
}

/// Positions (and optionally orientations) of the pieces tracked by a pattern,
/// i.e. the projection of a cube state onto these pieces.
///
/// The i-th entries describe the i-th tracked piece. `orientations` is empty if they are not tracked.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SubState {
    pub positions: ArrayVec<u8, MAX_PIECES>,
    pub orientations: ArrayVec<u8, MAX_PIECES>
}

/// Pattern, i.e. the ordered subset of pieces of one orbit, whose positions (and orientations)
/// are used to index pattern database.
///
/// Index of a sub-state is: `rank(positions) * orientations^k + orientations encoded in base orientations`,
/// where the second component is omitted for `Encoding::Positions`.
/// Indices of all sub-states form the range `[0, size())` without gaps.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Pattern {
    orbit: Orbit,
    /// Numbers of the tracked pieces.
    pieces: ArrayVec<u8, MAX_PIECES>,
    encoding: Encoding,
    ranker: PermutationRanker,
    /// Number of different encoded orientation vectors (1 if orientations are not tracked).
    orientation_count: u32
}

impl Pattern {
    /// Returns the pattern that tracks given `pieces` of the `orbit`.
    pub fn new(orbit: Orbit, pieces: impl IntoIterator<Item=u8>, encoding: Encoding) -> Result<Self, PatternError> {
        let mut tracked = ArrayVec::<u8, MAX_PIECES>::new();
        for piece in pieces {
            if piece as usize >= orbit.len() { return Err(PatternError::PieceOutOfRange(piece)); }
            if tracked.contains(&piece) { return Err(PatternError::DuplicatedPiece(piece)); }
            tracked.push(piece);    // distinct pieces of one orbit always fit
        }
        if tracked.is_empty() { return Err(PatternError::Empty); }
        let k = tracked.len() as u8;
        Ok(Self {
            orbit,
            ranker: PermutationRanker::new(orbit.len() as u8, k),
            orientation_count: match encoding {
                Encoding::PositionsAndOrientations => power(orbit.orientations(), k),
                Encoding::Positions => 1
            },
            pieces: tracked,
            encoding
        })
    }

    /// Returns the pattern that tracks positions and orientations of the corners `0..k`.
    pub fn corners(k: u8) -> Result<Self, PatternError> {
        Self::first_pieces(Orbit::Corners, k, Encoding::PositionsAndOrientations)
    }

    /// Returns the pattern that tracks positions and orientations of the given edges.
    pub fn edges(pieces: &[u8]) -> Result<Self, PatternError> {
        Self::new(Orbit::Edges, pieces.iter().cloned(), Encoding::PositionsAndOrientations)
    }

    /// Returns the pattern that tracks only positions of the edges `0..k`.
    pub fn edge_positions(k: u8) -> Result<Self, PatternError> {
        Self::first_pieces(Orbit::Edges, k, Encoding::Positions)
    }

    fn first_pieces(orbit: Orbit, k: u8, encoding: Encoding) -> Result<Self, PatternError> {
        if k as usize > orbit.len() {
            return Err(PatternError::TooManyPieces { tracked: k as usize, available: orbit.len() });
        }
        Self::new(orbit, 0..k, encoding)
    }

    #[inline] pub fn orbit(&self) -> Orbit { self.orbit }

    #[inline] pub fn pieces(&self) -> &[u8] { &self.pieces }

    #[inline] pub fn encoding(&self) -> Encoding { self.encoding }

    #[inline] fn tracks_orientations(&self) -> bool { self.encoding == Encoding::PositionsAndOrientations }

    /// Returns the number of different indices, i.e. the size of the pattern database.
    #[inline] pub fn size(&self) -> usize {
        self.ranker.count() as usize * self.orientation_count as usize
    }

    /// Returns the sub-state of the solved cube.
    pub fn goal(&self) -> SubState {
        SubState {
            positions: self.pieces.clone(),
            orientations: if self.tracks_orientations() { self.pieces.iter().map(|_| 0).collect() } else { ArrayVec::new() }
        }
    }

    /// Returns the projection of `state` onto the tracked pieces.
    #[inline] pub fn project(&self, state: &CubeState) -> SubState {
        let (positions, orientations) = state.orbit(self.orbit);
        SubState {
            positions: self.pieces.iter().map(|p| positions[*p as usize]).collect(),
            orientations: if self.tracks_orientations() {
                self.pieces.iter().map(|p| orientations[*p as usize]).collect()
            } else {
                ArrayVec::new()
            }
        }
    }

    /// Returns the index of `sub_state`.
    #[inline] pub fn index(&self, sub_state: &SubState) -> u32 {
        let rank = self.ranker.rank(&sub_state.positions);
        match self.encoding {
            Encoding::Positions => rank,
            Encoding::PositionsAndOrientations =>
                rank * self.orientation_count + encode_orientations(&sub_state.orientations, self.orbit.orientations())
        }
    }

    /// Returns the index of the projection of `state`.
    #[inline] pub fn index_of(&self, state: &CubeState) -> u32 {
        self.index(&self.project(state))
    }

    /// Returns the sub-state with the given `index`. Inverse of `index`.
    pub fn decode(&self, index: u32) -> SubState {
        let mut result = SubState {
            positions: self.pieces.iter().map(|_| 0).collect(),
            orientations: ArrayVec::new()
        };
        self.ranker.unrank(index / self.orientation_count, &mut result.positions);
        if self.tracks_orientations() {
            result.orientations = self.pieces.iter().map(|_| 0).collect();
            decode_orientations(index % self.orientation_count, self.orbit.orientations(), &mut result.orientations);
        }
        result
    }

    /// Returns `sub_state` after making the move `m`.
    #[inline] pub fn moved(&self, sub_state: &SubState, m: Move) -> SubState {
        let mut result = sub_state.clone();
        m.face().turn().apply(self.orbit, m.turns(), &mut result.positions, &mut result.orientations);
        result
    }
}

/// Entry of the search frontier: index of a sub-state and the face turned by the move that reached it.
#[derive(Clone, Copy)]
struct FrontierEntry {
    index: u32,
    last_face: Option<Face>
}

/// Generator of a pattern database. It uses BFS starting form the goal sub-state.
///
/// Distances are written to the table as soon as a sub-state is reached,
/// so each sub-state enters the frontier once, with its minimal distance.
/// Moves that turn the same face as the move that reached a sub-state are skipped,
/// as the two turns can always be replaced by a single one.
pub struct PatternDbGenerator {
    pattern: Pattern,
    table: Box<[u8]>,
    /// Sub-states at distance `depth`, not expanded yet.
    current: Vec<FrontierEntry>,
    depth: u8,
    explored: usize
}

impl PatternDbGenerator {
    /// Constructs `PatternDbGenerator` that has the goal sub-state in the frontier.
    pub fn new(pattern: Pattern) -> Self {
        debug!("allocating pattern database of {} entries", pattern.size());
        let mut table = vec![UNEXPLORED; pattern.size()].into_boxed_slice();
        let goal = pattern.index(&pattern.goal());
        table[goal as usize] = 0;
        Self {
            pattern,
            table,
            current: vec![FrontierEntry { index: goal, last_face: None }],
            depth: 0,
            explored: 1
        }
    }

    /// Distance to goal of the sub-states in the frontier.
    #[inline] pub fn depth(&self) -> u8 { self.depth }

    /// Number of sub-states in the frontier.
    #[inline] pub fn frontier_len(&self) -> usize { self.current.len() }

    /// Number of sub-states reached so far.
    #[inline] pub fn explored(&self) -> usize { self.explored }

    /// Returns `true` if all reachable sub-states have been reached.
    #[inline] pub fn is_finished(&self) -> bool { self.current.is_empty() }

    /// Expands the whole frontier, replacing it with the sub-states one move further away from the goal.
    /// Returns the number of newly reached sub-states.
    pub fn advance(&mut self) -> Result<usize, BuildError> {
        if self.current.is_empty() { return Ok(0); }
        let next_depth = self.depth + 1;
        if next_depth == UNEXPLORED { return Err(BuildError::DepthOverflow(next_depth)); }
        let mut next = Vec::new();
        for entry in std::mem::take(&mut self.current) {
            let sub_state = self.pattern.decode(entry.index);
            for m in Move::ALL {
                if entry.last_face == Some(m.face()) { continue; }
                let index = self.pattern.index(&self.pattern.moved(&sub_state, m));
                let distance = &mut self.table[index as usize];
                if *distance == UNEXPLORED {
                    *distance = next_depth;
                    next.push(FrontierEntry { index, last_face: Some(m.face()) });
                }
            }
        }
        self.explored += next.len();
        self.depth = next_depth;
        self.current = next;
        Ok(self.current.len())
    }

    /// Runs the search to the end, reporting each level to `stats`,
    /// and returns the complete pattern database.
    ///
    /// Fails if some entry has not been reached.
    pub fn finish(mut self, stats: &mut impl BuildStatsCollector) -> Result<PatternDb, BuildError> {
        stats.level(0, 1, self.explored);
        while !self.is_finished() {
            let new_states = self.advance()?;
            if new_states != 0 { stats.level(self.depth, new_states, self.explored); }
        }
        let unexplored = self.table.len() - self.explored;
        if unexplored != 0 { return Err(BuildError::Unexplored(unexplored)); }
        stats.finished(self.explored);
        Ok(PatternDb::from_complete_table(self.pattern, self.table))
    }
}
