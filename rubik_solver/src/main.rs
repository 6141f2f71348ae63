#![doc = include_str!("../README.md")]

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, WrapErr};
use cpu_time::ProcessTime;
use env_logger::TimestampPrecision;
use fsum::FSum;
use log::{info, LevelFilter};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rubik::cube3::moves::{Move, parse_sequence, format_sequence};
use rubik::stats::{BuildStatsLogger, SearchAllStats};
use rubik::{CubeSolver, CubeState, PatternDb, PatternDbSet, StandardTable};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Builds pattern databases and solves the 3x3x3 cube
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory with pattern database files
    #[arg(long, short = 't', env = "RUBIK_TABLES_DIR", default_value = "tables")]
    tables_dir: PathBuf,

    /// Verbosity of log messages. Can be given up to three times.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate pattern databases and save them to the tables directory
    Build {
        /// Tables to generate (all if none is given)
        #[arg(value_enum)]
        tables: Vec<Table>,
        /// Generate tables concurrently, each in its own thread
        #[arg(long)]
        parallel: bool,
    },
    /// Solve the cube using all pattern databases
    Solve {
        #[command(flatten)]
        source: StateSource,
        /// Seed of the random number generator used by --random
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print distribution of values in pattern databases
    Stats {
        /// Tables to analyse (all if none is given)
        #[arg(value_enum)]
        tables: Vec<Table>,
    },
}

/// Where the state to solve comes from.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct StateSource {
    /// Moves that scramble the solved cube, like "R U2 F'"
    #[arg(long, short)]
    scramble: Option<String>,
    /// Scramble the solved cube with the given number of random moves
    #[arg(long, short)]
    random: Option<usize>,
    /// File with the state: corner positions, corner orientations, edge positions and edge orientations
    /// in four lines; "-" reads standard input
    #[arg(long)]
    state: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Table {
    Corners,
    Edges1,
    Edges2,
    EdgePositions,
}

impl From<Table> for StandardTable {
    fn from(table: Table) -> Self {
        match table {
            Table::Corners => StandardTable::Corners,
            Table::Edges1 => StandardTable::Edges1,
            Table::Edges2 => StandardTable::Edges2,
            Table::EdgePositions => StandardTable::EdgePositions,
        }
    }
}

/// Returns standard tables given by user, or all of them if `tables` is empty.
fn selected(tables: &[Table]) -> Vec<StandardTable> {
    if tables.is_empty() {
        StandardTable::ALL.to_vec()
    } else {
        tables.iter().map(|t| (*t).into()).collect()
    }
}

fn build_table(dir: &Path, table: StandardTable) -> color_eyre::Result<()> {
    let pattern = table.pattern();
    let size = pattern.size();
    info!("generating {} pattern database of {} entries", table.name(), size);
    let start_moment = ProcessTime::try_now()?;
    let db = PatternDb::build(pattern, &mut BuildStatsLogger::new(table.name(), size))?;
    let seconds = start_moment.try_elapsed()?.as_secs_f64();
    let path = dir.join(table.file_name());
    db.save(&path)?;
    println!("{}: {} entries, max distance {}, saved to {} ({:.1} sec of CPU)",
             table.name(), db.len(), db.max_depth(), path.display(), seconds);
    Ok(())
}

fn build(dir: &Path, tables: &[StandardTable], parallel: bool) -> color_eyre::Result<()> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("cannot create directory {}", dir.display()))?;
    if !parallel {
        return tables.iter().try_for_each(|table| build_table(dir, *table));
    }
    std::thread::scope(|scope| {
        let handles: Vec<_> = tables.iter()
            .map(|table| scope.spawn(move || build_table(dir, *table)))
            .collect();
        handles.into_iter().try_for_each(|handle|
            handle.join().map_err(|_| eyre!("pattern database generation panicked"))?)
    })
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

/// Returns the state to solve and the scramble that produces it (if known).
fn read_state(source: StateSource, seed: u64) -> color_eyre::Result<(CubeState, Option<Vec<Move>>)> {
    let scramble = if let Some(moves) = source.scramble {
        parse_sequence(&moves)?
    } else if let Some(len) = source.random {
        random_scramble(&mut ChaCha8Rng::seed_from_u64(seed), len)
    } else if let Some(path) = source.state {
        let text = if path.as_os_str() == "-" {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        } else {
            fs::read_to_string(&path).wrap_err_with(|| format!("cannot read state from {}", path.display()))?
        };
        return Ok((text.parse()?, None));
    } else {
        return Err(eyre!("no state to solve given"));
    };
    Ok((CubeState::solved().apply_sequence(&scramble), Some(scramble)))
}

fn solve(dir: &Path, source: StateSource, seed: u64) -> color_eyre::Result<()> {
    let (state, scramble) = read_state(source, seed)?;
    if let Some(scramble) = scramble {
        println!("scramble: {}", format_sequence(&scramble));
    }
    print!("state:\n{}", state);
    let tables = PatternDbSet::load_standard(dir)
        .wrap_err("cannot load pattern databases, they can be generated by the build command")?;
    let solver = CubeSolver::new(&tables);
    let mut stats = SearchAllStats::default();
    let start_moment = ProcessTime::try_now()?;
    let solution = solver.solve_stats(&state, &mut stats)?;
    let seconds = start_moment.try_elapsed()?.as_secs_f64();
    println!("solution: {}", format_sequence(&solution));
    println!("{} moves found in {:.3} sec of CPU, {} nodes visited ({} expanded, {} leaves) in {} iterations.",
             solution.len(), seconds, stats.visits(), stats.internal, stats.leaves, stats.iterations);
    if !state.apply_sequence(&solution).is_solved() {
        return Err(eyre!("the solution found does not solve the cube"));
    }
    Ok(())
}

/// Prints distribution of distances stored in `db`, their mean and entropy.
fn print_pattern_db_stats(name: &str, db: &PatternDb) {
    let total_len = db.len() as f64;
    let histogram = db.depth_histogram();
    println!("{}:", name);
    let mut distance_sum = 0;
    let mut len_sum = 0;
    for (distance_to_goal, len) in histogram.iter().copied().enumerate() {
        len_sum += len;
        distance_sum += distance_to_goal * len;
        println!("{}\t{} {:.2}%\t{} {:.2}%", distance_to_goal, len, len as f64 * 100.0 / total_len, len_sum, len_sum as f64 * 100.0 / total_len);
    }
    let entropy = - FSum::with_all(histogram.iter().filter(|len| **len != 0).map(|len| {
        let p = *len as f64 / total_len;
        p * p.log2()
    })).value();
    println!("pattern database: {} abstract states with average distance to goal {:.2}, value entropy {:.2}.",
             db.len(), distance_sum as f64 / total_len, entropy);
}

fn stats(dir: &Path, tables: &[StandardTable]) -> color_eyre::Result<()> {
    for table in tables {
        let db = PatternDb::load(table.pattern(), dir.join(table.file_name()))?;
        print_pattern_db_stats(table.name(), &db);
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match cli.command {
        Commands::Build { tables, parallel } => build(&cli.tables_dir, &selected(&tables), parallel),
        Commands::Solve { source, seed } => solve(&cli.tables_dir, source, seed),
        Commands::Stats { tables } => stats(&cli.tables_dir, &selected(&tables)),
    }
}
