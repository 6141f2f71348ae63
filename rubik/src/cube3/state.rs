use crate::cube3::moves::{Move, Orbit};
use crate::cube3::utils::{NUM_CORNERS, NUM_EDGES};
use crate::error::InvalidStateError;
use std::fmt;
use std::str::FromStr;

/// Cube state.
///
/// All arrays are indexed by piece number: `corner_positions[p]` is the slot occupied by corner `p`
/// and `corner_orientations[p]` is its twist relative to the solved state (similarly for edges).
/// Positions always form a permutation. Values are only produced by `solved`, by legal moves,
/// or by validated input (`from_arrays`, `from_str`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CubeState {
    corner_positions: [u8; NUM_CORNERS],
    corner_orientations: [u8; NUM_CORNERS],
    edge_positions: [u8; NUM_EDGES],
    edge_orientations: [u8; NUM_EDGES]
}

impl Default for CubeState {
    fn default() -> Self { Self::SOLVED }
}

/// Checks that `positions` is a permutation of `0..orbit.len()` and `orientations` are in range.
fn validate(orbit: Orbit, positions: &[u8], orientations: &[u8]) -> Result<(), InvalidStateError> {
    for (array, found) in [("positions", positions.len()), ("orientations", orientations.len())] {
        if found != orbit.len() {
            return Err(InvalidStateError::WrongLength { orbit: orbit.name(), array, expected: orbit.len(), found });
        }
    }
    let mut seen = 0u32;
    for &slot in positions {
        if slot as usize >= orbit.len() || seen & (1 << slot) != 0 {
            return Err(InvalidStateError::NotAPermutation { orbit: orbit.name(), slot });
        }
        seen |= 1 << slot;
    }
    if let Some((piece, &orientation)) = orientations.iter().enumerate().find(|(_, o)| **o >= orbit.orientations()) {
        return Err(InvalidStateError::OrientationOutOfRange {
            orbit: orbit.name(), piece, orientation, limit: orbit.orientations() });
    }
    Ok(())
}

impl CubeState {
    pub const SOLVED: Self = Self {
        corner_positions: [0, 1, 2, 3, 4, 5, 6, 7],
        corner_orientations: [0; NUM_CORNERS],
        edge_positions: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        edge_orientations: [0; NUM_EDGES]
    };

    /// Returns the solved cube.
    #[inline] pub fn solved() -> Self { Self::SOLVED }

    /// Constructs the state from arrays indexed by piece numbers.
    /// Fails if positions are not permutations or some orientation is out of range.
    pub fn from_arrays(corner_positions: &[u8], corner_orientations: &[u8], edge_positions: &[u8], edge_orientations: &[u8]) -> Result<Self, InvalidStateError> {
        validate(Orbit::Corners, corner_positions, corner_orientations)?;
        validate(Orbit::Edges, edge_positions, edge_orientations)?;
        let mut result = Self::SOLVED;
        result.corner_positions.copy_from_slice(corner_positions);
        result.corner_orientations.copy_from_slice(corner_orientations);
        result.edge_positions.copy_from_slice(edge_positions);
        result.edge_orientations.copy_from_slice(edge_orientations);
        Ok(result)
    }

    #[inline] pub fn is_solved(&self) -> bool { *self == Self::SOLVED }

    #[inline(always)] pub fn corner_positions(&self) -> &[u8; NUM_CORNERS] { &self.corner_positions }
    #[inline(always)] pub fn corner_orientations(&self) -> &[u8; NUM_CORNERS] { &self.corner_orientations }
    #[inline(always)] pub fn edge_positions(&self) -> &[u8; NUM_EDGES] { &self.edge_positions }
    #[inline(always)] pub fn edge_orientations(&self) -> &[u8; NUM_EDGES] { &self.edge_orientations }

    /// Returns positions and orientations of pieces of the given `orbit`.
    #[inline(always)] pub fn orbit(&self, orbit: Orbit) -> (&[u8], &[u8]) {
        match orbit {
            Orbit::Corners => (&self.corner_positions, &self.corner_orientations),
            Orbit::Edges => (&self.edge_positions, &self.edge_orientations)
        }
    }

    /// Returns the state obtained from `self` by making the move `m`.
    #[inline] pub fn applied(mut self, m: Move) -> Self {
        let turn = m.face().turn();
        turn.apply(Orbit::Corners, m.turns(), &mut self.corner_positions, &mut self.corner_orientations);
        turn.apply(Orbit::Edges, m.turns(), &mut self.edge_positions, &mut self.edge_orientations);
        self
    }

    /// Returns the state obtained from `self` by making all `moves` in order.
    pub fn apply_sequence<'a>(self, moves: impl IntoIterator<Item=&'a Move>) -> Self {
        moves.into_iter().fold(self, |state, m| state.applied(*m))
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, values: &[u8]) -> fmt::Result {
    let mut iter = values.iter();
    if let Some(first) = iter.next() { write!(f, "{}", first)?; }
    for v in iter { write!(f, " {}", v)?; }
    writeln!(f)
}

/// Prints four lines: corner positions, corner orientations, edge positions and edge orientations.
/// The output can be parsed back with `from_str`.
impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_row(f, &self.corner_positions)?;
        write_row(f, &self.corner_orientations)?;
        write_row(f, &self.edge_positions)?;
        write_row(f, &self.edge_orientations)
    }
}

impl FromStr for CubeState {
    type Err = InvalidStateError;

    /// Parses four non-empty lines of whitespace-separated numbers, in the order printed by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split_whitespace()
                .map(|v| v.parse::<u8>().map_err(|_| InvalidStateError::NotANumber(v.to_owned())))
                .collect::<Result<Vec<u8>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        if let [cp, co, ep, eo] = rows.as_slice() {
            Self::from_arrays(cp, co, ep, eo)
        } else {
            Err(InvalidStateError::WrongLineCount(rows.len()))
        }
    }
}
