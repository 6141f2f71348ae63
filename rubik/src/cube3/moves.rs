use crate::cube3::utils::{UNAFFECTED, NUM_CORNERS, NUM_EDGES, CORNER_ORIENTATIONS, EDGE_ORIENTATIONS};
use crate::error::ParseMoveError;
use std::fmt;
use std::str::FromStr;

/// Face of the cube. Discriminants are the face codes used by move ordering,
/// opposite faces differ by 3.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Face { R = 0, U = 1, F = 2, L = 3, D = 4, B = 5 }

impl Face {
    pub const ALL: [Face; 6] = [Face::R, Face::U, Face::F, Face::L, Face::D, Face::B];

    #[inline(always)] pub const fn index(self) -> usize { self as usize }

    /// Returns the face parallel to `self`. Turns of opposite faces commute.
    #[inline] pub const fn opposite(self) -> Face {
        Self::ALL[(self as usize + 3) % 6]
    }

    pub const fn letter(self) -> char {
        match self {
            Face::R => 'R', Face::U => 'U', Face::F => 'F',
            Face::L => 'L', Face::D => 'D', Face::B => 'B'
        }
    }

    pub fn from_letter(letter: char) -> Option<Face> {
        Self::ALL.into_iter().find(|f| f.letter() == letter)
    }

    /// Returns the clockwise quarter turn of this face.
    #[inline(always)] pub fn turn(self) -> &'static FaceTurn {
        &FACE_TURNS[self.index()]
    }
}

/// Kind of pieces: corners or edges.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Orbit { Corners, Edges }

impl Orbit {
    /// Number of pieces in the orbit.
    #[inline] pub const fn len(self) -> usize {
        match self { Orbit::Corners => NUM_CORNERS, Orbit::Edges => NUM_EDGES }
    }

    /// Number of orientations each piece of the orbit can have.
    #[inline] pub const fn orientations(self) -> u8 {
        match self { Orbit::Corners => CORNER_ORIENTATIONS, Orbit::Edges => EDGE_ORIENTATIONS }
    }

    pub const fn name(self) -> &'static str {
        match self { Orbit::Corners => "corner", Orbit::Edges => "edge" }
    }
}

/// Describes the clockwise quarter turn of one face.
///
/// Position-change tables are indexed by slot and give the slot that the piece moves to,
/// or `UNAFFECTED` if the slot does not belong to the turned face.
/// Orientation-change tables are indexed by the current orientation of a moved piece and give its new orientation.
pub struct FaceTurn {
    pub corner_positions: [u8; NUM_CORNERS],
    pub corner_orientations: [u8; CORNER_ORIENTATIONS as usize],
    pub edge_positions: [u8; NUM_EDGES],
    pub edge_orientations: [u8; EDGE_ORIENTATIONS as usize]
}

const NA: u8 = UNAFFECTED;

/// Clockwise quarter turns of all faces, indexed by face codes.
pub static FACE_TURNS: [FaceTurn; 6] = [
    FaceTurn {  // R
        corner_positions: [NA, 5, 1, NA, NA, 6, 2, NA],
        corner_orientations: [1, 0, 2],
        edge_positions: [NA, 5, NA, NA, NA, 9, 1, NA, NA, 6, NA, NA],
        edge_orientations: [0, 1]
    },
    FaceTurn {  // U
        corner_positions: [1, 2, 3, 0, NA, NA, NA, NA],
        corner_orientations: [0, 2, 1],
        edge_positions: [1, 2, 3, 0, NA, NA, NA, NA, NA, NA, NA, NA],
        edge_orientations: [0, 1]
    },
    FaceTurn {  // F
        corner_positions: [NA, NA, 6, 2, NA, NA, 7, 3],
        corner_orientations: [2, 1, 0],
        edge_positions: [NA, NA, 6, NA, NA, NA, 10, 2, NA, NA, 7, NA],
        edge_orientations: [1, 0]
    },
    FaceTurn {  // L
        corner_positions: [3, NA, NA, 7, 0, NA, NA, 4],
        corner_orientations: [1, 0, 2],
        edge_positions: [NA, NA, NA, 7, 3, NA, NA, 11, NA, NA, NA, 4],
        edge_orientations: [0, 1]
    },
    FaceTurn {  // D
        corner_positions: [NA, NA, NA, NA, 7, 4, 5, 6],
        corner_orientations: [0, 2, 1],
        edge_positions: [NA, NA, NA, NA, NA, NA, NA, NA, 11, 8, 9, 10],
        edge_orientations: [0, 1]
    },
    FaceTurn {  // B
        corner_positions: [4, 0, NA, NA, 5, 1, NA, NA],
        corner_orientations: [2, 1, 0],
        edge_positions: [4, NA, NA, NA, 8, 0, NA, NA, 5, NA, NA, NA],
        edge_orientations: [1, 0]
    },
];

impl FaceTurn {
    /// Returns position- and orientation-change tables for the given `orbit`.
    #[inline(always)] pub fn tables(&self, orbit: Orbit) -> (&[u8], &[u8]) {
        match orbit {
            Orbit::Corners => (&self.corner_positions, &self.corner_orientations),
            Orbit::Edges => (&self.edge_positions, &self.edge_orientations)
        }
    }

    /// Applies this turn `turns` times to the pieces of `orbit`.
    ///
    /// `positions[i]` is the slot of the i-th piece and `orientations[i]` its orientation.
    /// `orientations` can be empty if orientations are not tracked.
    pub fn apply(&self, orbit: Orbit, turns: u8, positions: &mut [u8], orientations: &mut [u8]) {
        let (position_changes, orientation_changes) = self.tables(orbit);
        for (i, position) in positions.iter_mut().enumerate() {
            if position_changes[*position as usize] == UNAFFECTED { continue; }
            for _ in 0..turns { *position = position_changes[*position as usize]; }
            if let Some(orientation) = orientations.get_mut(i) {
                for _ in 0..turns { *orientation = orientation_changes[*orientation as usize]; }
            }
        }
    }
}

/// Turn of a face by 1 (clockwise), 2 (half turn) or 3 (counter-clockwise) quarter turns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    face: Face,
    turns: u8
}

impl Move {
    /// All 18 moves, ordered by face code and then by the number of quarter turns.
    pub const ALL: [Move; 18] = {
        let mut result = [Move { face: Face::R, turns: 1 }; 18];
        let mut i = 0;
        while i < 18 {
            result[i] = Move { face: Face::ALL[i / 3], turns: (i % 3) as u8 + 1 };
            i += 1;
        }
        result
    };

    /// Returns the move that turns `face` by `turns` quarter turns clockwise, or `None` if `turns` is not in 1..=3.
    pub const fn new(face: Face, turns: u8) -> Option<Self> {
        if turns >= 1 && turns <= 3 { Some(Self { face, turns }) } else { None }
    }

    #[inline(always)] pub const fn face(self) -> Face { self.face }

    #[inline(always)] pub const fn turns(self) -> u8 { self.turns }

    /// Index of `self` in `Move::ALL`.
    #[inline(always)] pub const fn index(self) -> usize { self.face.index() * 3 + self.turns as usize - 1 }

    /// Returns the move that undoes `self`.
    #[inline] pub const fn inverse(self) -> Self {
        Self { face: self.face, turns: 4 - self.turns }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SUFFIXES: [&str; 3] = ["", "2", "'"];
        write!(f, "{}{}", self.face.letter(), SUFFIXES[self.turns as usize - 1])
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars.next().ok_or(ParseMoveError::Empty)?;
        let face = Face::from_letter(letter).ok_or(ParseMoveError::UnknownFace(letter))?;
        let turns = match chars.as_str() {
            "" => 1,
            "2" => 2,
            "'" => 3,
            suffix => return Err(ParseMoveError::UnknownSuffix(suffix.to_owned(), s.to_owned()))
        };
        Ok(Self { face, turns })
    }
}

/// Parses whitespace-separated moves, like `R U2 F'`.
pub fn parse_sequence(s: &str) -> Result<Vec<Move>, ParseMoveError> {
    s.split_whitespace().map(str::parse).collect()
}

/// Formats `moves` separated by single spaces.
pub fn format_sequence(moves: &[Move]) -> String {
    moves.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
}

/// Returns the inverse of the move sequence `moves`.
pub fn inverse_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|m| m.inverse()).collect()
}
