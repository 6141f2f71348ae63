use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rubik::cube3::moves::{Move, parse_sequence, format_sequence};
use rubik::cube3::pattern::Pattern;
use rubik::error::SolveError;
use rubik::stats::{CancelFlag, SearchAllStats};
use rubik::{CubeSolver, CubeState, Heuristic, PatternDb, PatternDbSet, StandardTable};

/// Small pattern databases, built once for all tests.
fn small_tables() -> &'static PatternDbSet {
    static TABLES: OnceLock<PatternDbSet> = OnceLock::new();
    TABLES.get_or_init(|| small_patterns().into_iter()
        .map(|pattern| PatternDb::build(pattern, &mut ()).unwrap())
        .collect())
}

fn small_patterns() -> Vec<Pattern> {
    vec![
        Pattern::corners(4).unwrap(),
        Pattern::edges(&[0, 1, 2, 3]).unwrap(),
        Pattern::edges(&[4, 5, 6, 7]).unwrap(),
        Pattern::edges(&[8, 9, 10, 11]).unwrap()
    ]
}

/// Returns random sequence of `len` moves, without two consecutive turns of the same face.
fn random_scramble(rng: &mut ChaCha8Rng, len: usize) -> Vec<Move> {
    let mut result: Vec<Move> = Vec::with_capacity(len);
    while result.len() < len {
        let m = Move::ALL[rng.gen_range(0..Move::ALL.len())];
        if result.last().map_or(false, |last| last.face() == m.face()) { continue; }
        result.push(m);
    }
    result
}

fn assert_solves(state: &CubeState, solution: &[Move]) {
    assert!(state.apply_sequence(solution).is_solved(), "{} does not solve the state", format_sequence(solution));
}

#[test_log::test]
fn solved_cube_needs_no_moves() {
    let solver = CubeSolver::new(small_tables());
    assert_eq!(solver.solve(&CubeState::solved()), Ok(Vec::new()));
}

#[test_log::test]
fn single_turn_is_undone() {
    let solver = CubeSolver::new(small_tables());
    let r = CubeState::solved().applied("R".parse().unwrap());
    assert_eq!(format_sequence(&solver.solve(&r).unwrap()), "R'");
    for m in Move::ALL {
        assert_eq!(solver.solve(&CubeState::solved().applied(m)), Ok(vec![m.inverse()]));
    }
}

#[test_log::test]
fn random_short_scrambles_are_solved() {
    let solver = CubeSolver::new(small_tables());
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for len in 1..=6 {
        for _ in 0..3 {
            let scramble = random_scramble(&mut rng, len);
            let state = CubeState::solved().apply_sequence(&scramble);
            let mut stats = SearchAllStats::default();
            let solution = solver.solve_stats(&state, &mut stats).unwrap();
            assert!(solution.len() <= len, "{} solved by longer {}", format_sequence(&scramble), format_sequence(&solution));
            assert_solves(&state, &solution);
            assert!(stats.iterations >= 1);
        }
    }
}

#[test_log::test]
fn solutions_are_optimal() {
    let informed = CubeSolver::new(small_tables());
    let uninformed = CubeSolver::new(());
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..10 {
        let state = CubeState::solved().apply_sequence(&random_scramble(&mut rng, 4));
        let solution = informed.solve(&state).unwrap();
        assert_eq!(solution.len(), uninformed.solve(&state).unwrap().len());
        assert!(small_tables().lower_bound(&state) as usize <= solution.len());
    }
}

#[test_log::test]
fn opposite_faces_scramble() {
    let solver = CubeSolver::new(small_tables());
    let state = CubeState::solved().apply_sequence(&parse_sequence("L R' U2 D").unwrap());
    let solution = solver.solve(&state).unwrap();
    assert!(solution.len() <= 4);
    assert_solves(&state, &solution);
    for pair in solution.windows(2) {
        let (first, second) = (pair[0].face(), pair[1].face());
        assert!(!(second == first.opposite() && second.index() < first.index()), "commuting moves in wrong order");
        assert_ne!(first, second);
    }
}

#[test_log::test]
fn saved_tables_give_the_same_solution() {
    let dir = std::env::temp_dir().join(format!("rubik_solver_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    for (i, db) in small_tables().dbs().iter().enumerate() {
        db.save(dir.join(format!("{}.pdb", i))).unwrap();
    }
    let loaded: PatternDbSet = small_patterns().into_iter().enumerate()
        .map(|(i, pattern)| PatternDb::load(pattern, dir.join(format!("{}.pdb", i))).unwrap())
        .collect();
    std::fs::remove_dir_all(&dir).unwrap();
    let state = CubeState::solved().apply_sequence(&parse_sequence("F2 D' B R U'").unwrap());
    let original = CubeSolver::new(small_tables()).solve(&state).unwrap();
    assert_eq!(CubeSolver::new(&loaded).solve(&state).unwrap(), original);
    assert_eq!(CubeSolver::new(small_tables()).solve(&state).unwrap(), original);
}

#[test_log::test]
fn raised_flag_cancels_search() {
    let flag = AtomicBool::new(true);
    let solver = CubeSolver::new(small_tables());
    let state = CubeState::solved().apply_sequence(&parse_sequence("R U F").unwrap());
    assert_eq!(solver.solve_stats(&state, &mut CancelFlag(&flag)), Err(SolveError::Cancelled));
}

/// Needs the standard tables: read from `RUBIK_TABLES_DIR` if set, otherwise built (several GB of memory).
#[test_log::test]
#[ignore]
fn fifteen_move_scramble_with_standard_tables() {
    let tables = match std::env::var_os("RUBIK_TABLES_DIR") {
        Some(dir) => PatternDbSet::load_standard(dir).unwrap(),
        None => StandardTable::ALL.iter()
            .map(|table| PatternDb::build(table.pattern(), &mut ()).unwrap())
            .collect()
    };
    let scramble = parse_sequence("R U2 F' L D B R' U F2 L' D' R B U2 F").unwrap();
    let state = CubeState::solved().apply_sequence(&scramble);
    let mut stats = SearchAllStats::default();
    let solution = CubeSolver::new(&tables).solve_stats(&state, &mut stats).unwrap();
    assert!(solution.len() <= 15);
    assert_solves(&state, &solution);
}
