/// Number of corner pieces (and corner slots).
pub const NUM_CORNERS: usize = 8;

/// Number of edge pieces (and edge slots).
pub const NUM_EDGES: usize = 12;

/// Number of distinct corner orientations (twists).
pub const CORNER_ORIENTATIONS: u8 = 3;

/// Number of distinct edge orientations (flips).
pub const EDGE_ORIENTATIONS: u8 = 2;

/// Marks a slot in a position-change table whose piece is not moved by the turn.
pub const UNAFFECTED: u8 = u8::MAX;

/// Number of moves that suffices to solve any cube state.
pub const GODS_NUMBER: u8 = 20;

/// Maximum number of pieces in one orbit, and so the maximum length of a pattern.
pub const MAX_PIECES: usize = NUM_EDGES;
