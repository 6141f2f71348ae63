use crate::cube3::pattern::{Pattern, PatternDbGenerator, UNEXPLORED};
use crate::cube3::state::CubeState;
use crate::error::{BuildError, PatternDbError};
use crate::stats::BuildStatsCollector;
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Heuristic that gives lower bounds for the number of moves needed to solve the cube.
pub trait Heuristic {
    /// Returns the value that is not greater than the number of moves needed to solve `state`.
    fn lower_bound(&self, state: &CubeState) -> u8;
}

/// Fake heuristic that always returns `0`. Turns IDA* into iterative deepening.
impl Heuristic for () {
    #[inline(always)] fn lower_bound(&self, _state: &CubeState) -> u8 { 0 }
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    #[inline(always)] fn lower_bound(&self, state: &CubeState) -> u8 { (**self).lower_bound(state) }
}

/// Pattern database: the map from sub-states (indices of the pattern) to their distances to goal.
///
/// The table is stored as a flat array of bytes, one for each index.
/// The same layout (without any header) is used by files.
pub struct PatternDb {
    pattern: Pattern,
    table: Box<[u8]>
}

impl PatternDb {
    /// Constructs the database from the `table` produced by a complete search.
    pub(crate) fn from_complete_table(pattern: Pattern, table: Box<[u8]>) -> Self {
        debug_assert_eq!(table.len(), pattern.size());
        debug_assert!(!table.contains(&UNEXPLORED));
        Self { pattern, table }
    }

    /// Generates the database for the given `pattern`, reporting progress to `stats`.
    pub fn build(pattern: Pattern, stats: &mut impl BuildStatsCollector) -> Result<Self, BuildError> {
        PatternDbGenerator::new(pattern).finish(stats)
    }

    /// Constructs the database from raw bytes. The only check is the number of `bytes`.
    pub fn from_bytes(pattern: Pattern, bytes: impl Into<Box<[u8]>>) -> Result<Self, PatternDbError> {
        let table = bytes.into();
        if table.len() != pattern.size() {
            return Err(PatternDbError::SizeMismatch { expected: pattern.size(), found: table.len() });
        }
        Ok(Self { pattern, table })
    }

    /// Reads the database from the given `reader`, which should contain exactly `pattern.size()` bytes.
    pub fn read_from(pattern: Pattern, reader: impl Read) -> Result<Self, PatternDbError> {
        let size = pattern.size();
        let mut bytes = Vec::with_capacity(size);
        // one extra byte is enough to detect too long input
        reader.take(size as u64 + 1).read_to_end(&mut bytes)?;
        Self::from_bytes(pattern, bytes)
    }

    /// Loads the database from the file with the given `path`.
    pub fn load(pattern: Pattern, path: impl AsRef<Path>) -> Result<Self, PatternDbError> {
        let path = path.as_ref();
        let io_error = |source| PatternDbError::Io { path: path.to_owned(), source };
        let file = File::open(path).map_err(io_error)?;
        let result = Self::read_from(pattern, BufReader::new(file)).map_err(|e| match e {
            PatternDbError::Stream(source) => io_error(source),
            e => e
        })?;
        debug!("loaded {} entries from {}", result.len(), path.display());
        Ok(result)
    }

    /// Writes all bytes of the table to `writer`.
    pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
        writer.write_all(&self.table)
    }

    /// Saves the database to the file with the given `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PatternDbError> {
        let path = path.as_ref();
        let io_error = |source| PatternDbError::Io { path: path.to_owned(), source };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        self.write_to(&mut writer).and_then(|_| writer.flush()).map_err(io_error)?;
        debug!("saved {} entries to {}", self.len(), path.display());
        Ok(())
    }

    #[inline] pub fn pattern(&self) -> &Pattern { &self.pattern }

    #[inline] pub fn as_bytes(&self) -> &[u8] { &self.table }

    /// Returns the number of entries (equal to `pattern().size()`).
    #[inline] pub fn len(&self) -> usize { self.table.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.table.is_empty() }

    /// Returns the distance to goal of the sub-state with given `index`.
    #[inline] pub fn value_at(&self, index: u32) -> u8 { self.table[index as usize] }

    /// Returns the distance to goal of the projection of `state`, which is a lower bound of the number of moves that solve `state`.
    #[inline] pub fn moves_lower_bound(&self, state: &CubeState) -> u8 {
        self.value_at(self.pattern.index_of(state))
    }

    /// Returns the largest value in the table.
    pub fn max_depth(&self) -> u8 {
        self.table.iter().copied().max().unwrap_or(0)
    }

    /// Returns the vector whose i-th element is the number of sub-states at distance i from goal.
    pub fn depth_histogram(&self) -> Vec<usize> {
        let mut result = vec![0; self.max_depth() as usize + 1];
        for &depth in self.table.iter() { result[depth as usize] += 1; }
        result
    }
}

impl Heuristic for PatternDb {
    #[inline(always)] fn lower_bound(&self, state: &CubeState) -> u8 { self.moves_lower_bound(state) }
}

/// Heuristic which value is the maximum of the values given by a number of pattern databases.
#[derive(Default)]
pub struct PatternDbSet {
    dbs: Vec<PatternDb>
}

impl PatternDbSet {
    pub fn new() -> Self { Default::default() }

    pub fn push(&mut self, db: PatternDb) { self.dbs.push(db); }

    #[inline] pub fn dbs(&self) -> &[PatternDb] { &self.dbs }

    #[inline] pub fn len(&self) -> usize { self.dbs.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.dbs.is_empty() }

    /// Loads given `tables` from the directory `dir`. Fails if any of them cannot be loaded.
    pub fn load(dir: impl AsRef<Path>, tables: &[StandardTable]) -> Result<Self, PatternDbError> {
        let dir = dir.as_ref();
        tables.iter()
            .map(|table| PatternDb::load(table.pattern(), dir.join(table.file_name())))
            .collect()
    }

    /// Loads all standard tables from the directory `dir`.
    pub fn load_standard(dir: impl AsRef<Path>) -> Result<Self, PatternDbError> {
        Self::load(dir, &StandardTable::ALL)
    }
}

impl FromIterator<PatternDb> for PatternDbSet {
    fn from_iter<I: IntoIterator<Item=PatternDb>>(iter: I) -> Self {
        Self { dbs: iter.into_iter().collect() }
    }
}

impl Heuristic for PatternDbSet {
    #[inline] fn lower_bound(&self, state: &CubeState) -> u8 {
        self.dbs.iter().map(|db| db.moves_lower_bound(state)).max().unwrap_or(0)
    }
}

/// Pattern databases used by the solver.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum StandardTable {
    /// Positions and orientations of the corners 0..=6.
    Corners,
    /// Positions and orientations of the edges 1, 3, 4, 6, 7, 8, 10.
    Edges1,
    /// Positions and orientations of the edges 0, 2, 5, 6, 7, 9, 11.
    Edges2,
    /// Positions of the edges 0..=10.
    EdgePositions
}

impl StandardTable {
    pub const ALL: [StandardTable; 4] = [StandardTable::Corners, StandardTable::Edges1, StandardTable::Edges2, StandardTable::EdgePositions];

    pub fn pattern(self) -> Pattern {
        match self {
            StandardTable::Corners => Pattern::corners(7),
            StandardTable::Edges1 => Pattern::edges(&[1, 3, 4, 6, 7, 8, 10]),
            StandardTable::Edges2 => Pattern::edges(&[0, 2, 5, 6, 7, 9, 11]),
            StandardTable::EdgePositions => Pattern::edge_positions(11)
        }.expect("standard patterns are valid")
    }

    pub fn file_name(self) -> &'static str {
        match self {
            StandardTable::Corners => "corners.pdb",
            StandardTable::Edges1 => "edges_1.pdb",
            StandardTable::Edges2 => "edges_2.pdb",
            StandardTable::EdgePositions => "edge_positions.pdb"
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StandardTable::Corners => "corners",
            StandardTable::Edges1 => "edges 1",
            StandardTable::Edges2 => "edges 2",
            StandardTable::EdgePositions => "edge positions"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube3::moves::{Move, parse_sequence};
    use std::collections::{HashMap, HashSet};

    fn small_dbs() -> Vec<PatternDb> {
        [Pattern::corners(3), Pattern::edges(&[2, 7, 9]), Pattern::edge_positions(4)].into_iter()
            .map(|p| PatternDb::build(p.unwrap(), &mut ()).unwrap())
            .collect()
    }

    /// Distances of all states reachable in at most `max_depth` moves.
    fn cube_bfs(max_depth: u8) -> HashMap<CubeState, u8> {
        let mut distances = HashMap::from([(CubeState::solved(), 0)]);
        let mut frontier = vec![CubeState::solved()];
        for depth in 1..=max_depth {
            let mut next = Vec::new();
            for state in frontier {
                for m in Move::ALL {
                    let moved = state.applied(m);
                    if !distances.contains_key(&moved) {
                        distances.insert(moved, depth);
                        next.push(moved);
                    }
                }
            }
            frontier = next;
        }
        distances
    }

    #[test]
    fn test_triangle_property() {
        for db in small_dbs() {
            let pattern = db.pattern();
            assert!(!db.as_bytes().contains(&UNEXPLORED));
            assert_eq!(db.value_at(pattern.index(&pattern.goal())), 0);
            for index in 0..db.len() as u32 {
                let sub_state = pattern.decode(index);
                let depth = db.value_at(index);
                if depth != 0 { assert_ne!(sub_state, pattern.goal()); }
                for m in Move::ALL {
                    let neighbor = db.value_at(pattern.index(&pattern.moved(&sub_state, m)));
                    assert!(depth.abs_diff(neighbor) <= 1, "{} and its neighbor {} differ too much", depth, neighbor);
                }
            }
        }
    }

    #[test]
    fn test_admissibility() {
        let dbs: PatternDbSet = small_dbs().into_iter().collect();
        for (state, distance) in cube_bfs(4) {
            for db in dbs.dbs() {
                assert!(db.moves_lower_bound(&state) <= distance);
            }
            assert!(dbs.lower_bound(&state) <= distance);
        }
        assert_eq!(dbs.lower_bound(&CubeState::solved()), 0);
    }

    #[test]
    fn test_set_is_max() {
        let dbs = small_dbs();
        let state = CubeState::solved().apply_sequence(&parse_sequence("R U F' L2 D").unwrap());
        let expected = dbs.iter().map(|db| db.lower_bound(&state)).max().unwrap();
        let set: PatternDbSet = dbs.into_iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.lower_bound(&state), expected);
        assert_eq!(set.lower_bound(&CubeState::solved()), 0);
        assert_eq!(PatternDbSet::new().lower_bound(&state), 0);
        assert_eq!(().lower_bound(&state), 0);
        assert_eq!((&set).lower_bound(&state), expected);
    }

    #[test]
    fn test_histogram() {
        let db = PatternDb::build(Pattern::corners(2).unwrap(), &mut ()).unwrap();
        let histogram = db.depth_histogram();
        assert_eq!(histogram.len(), db.max_depth() as usize + 1);
        assert_eq!(histogram[0], 1);
        assert_eq!(histogram.iter().sum::<usize>(), db.len());
        assert!(histogram.iter().all(|count| *count > 0));
    }

    #[test]
    fn test_bytes() {
        let db = PatternDb::build(Pattern::edges(&[0, 1]).unwrap(), &mut ()).unwrap();
        let mut bytes = Vec::new();
        db.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.as_slice(), db.as_bytes());
        let read = PatternDb::read_from(db.pattern().clone(), bytes.as_slice()).unwrap();
        assert_eq!(read.as_bytes(), db.as_bytes());
        let mut too_long = bytes.clone();
        too_long.push(0);
        assert!(matches!(PatternDb::read_from(db.pattern().clone(), too_long.as_slice()),
            Err(PatternDbError::SizeMismatch { expected: 528, found: 529 })));
        assert!(matches!(PatternDb::from_bytes(db.pattern().clone(), vec![0; 10]),
            Err(PatternDbError::SizeMismatch { expected: 528, found: 10 })));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("rubik_pattern_db_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("corners_2.pdb");
        let db = PatternDb::build(Pattern::corners(2).unwrap(), &mut ()).unwrap();
        db.save(&path).unwrap();
        let loaded = PatternDb::load(Pattern::corners(2).unwrap(), &path).unwrap();
        assert_eq!(loaded.as_bytes(), db.as_bytes());
        assert!(matches!(PatternDb::load(Pattern::corners(3).unwrap(), &path), Err(PatternDbError::SizeMismatch { .. })));
        match PatternDb::load(Pattern::corners(2).unwrap(), dir.join("missing.pdb")) {
            Err(PatternDbError::Io { path, .. }) => assert_eq!(path, dir.join("missing.pdb")),
            _ => panic!("loading missing file should fail with Io error")
        }
        assert!(PatternDbSet::load_standard(dir.join("no_such_dir")).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_standard_tables() {
        let names: HashSet<_> = StandardTable::ALL.iter().map(|t| t.file_name()).collect();
        assert_eq!(names.len(), 4);
        assert_eq!(StandardTable::Corners.pattern().size(), 88_179_840);
        assert_eq!(StandardTable::EdgePositions.pattern().size(), 479_001_600);
        assert_eq!(StandardTable::Edges1.pattern().pieces(), &[1, 3, 4, 6, 7, 8, 10]);
        assert_eq!(StandardTable::Edges2.name(), "edges 2");
    }
}
