use std::ops::AddAssign;
use std::sync::atomic::{AtomicBool, Ordering};
use log::info;

/// Search statistic collector.
/// It collects data during IDA* search and can cancel it.
pub trait SearchStatsCollector {
    /// Called at the beginning of each IDA* iteration with its depth bound,
    /// can return false to cancel search process.
    #[inline(always)] fn iteration(&mut self, _bound: u8) -> bool { true }
    /// Called for each state visited but not expanded, can return false to cancel search process.
    #[inline(always)] fn leaf(&mut self) -> bool { true }
    /// Called for each state expanded.
    #[inline(always)] fn internal(&mut self) { }
}

/// Search statistic collector that ignore all events.
impl SearchStatsCollector for () {}

/// Counts all visited states.
impl SearchStatsCollector for u64 {
    #[inline(always)] fn leaf(&mut self) -> bool { *self += 1; true }
    #[inline(always)] fn internal(&mut self) { *self += 1; }
}

#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
pub struct SearchAllStats {
    pub internal: u64,
    pub leaves: u64,
    pub iterations: u32
}

impl SearchAllStats {
    pub fn visits(&self) -> u64 { self.internal + self.leaves }
}

impl AddAssign for SearchAllStats {
    fn add_assign(&mut self, rhs: Self) {
        self.internal += rhs.internal;
        self.leaves += rhs.leaves;
        self.iterations += rhs.iterations;
    }
}

impl SearchStatsCollector for SearchAllStats {
    #[inline(always)] fn iteration(&mut self, _bound: u8) -> bool { self.iterations += 1; true }
    #[inline(always)] fn leaf(&mut self) -> bool { self.leaves += 1; true }
    #[inline(always)] fn internal(&mut self) { self.internal += 1; }
}

/// Collector that cancels the search after visiting `limit` states.
pub struct Limited {
    pub internal: u64,
    pub leaves: u64,
    pub limit: u64
}

impl Limited {
    pub fn with_limit(limit: u64) -> Self { Self{internal: 0, leaves: 0, limit} }

    pub fn reset_visits(&mut self) { self.internal = 0; self.leaves = 0; }

    pub fn reset_limit(&mut self, limit: u64) { self.reset_visits(); self.limit = limit; }

    pub fn visits(&self) -> u64 { self.internal + self.leaves }
}

impl SearchStatsCollector for Limited {
    #[inline(always)] fn iteration(&mut self, _bound: u8) -> bool { self.visits() < self.limit }

    #[inline(always)] fn leaf(&mut self) -> bool {
        if self.visits() >= self.limit { return false; }
        self.leaves += 1;
        true
    }

    #[inline(always)] fn internal(&mut self) { self.internal += 1; }
}

/// Collector that cancels the search once the flag is raised, possibly by another thread.
#[derive(Clone, Copy)]
pub struct CancelFlag<'f>(pub &'f AtomicBool);

impl CancelFlag<'_> {
    #[inline] fn is_raised(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

impl SearchStatsCollector for CancelFlag<'_> {
    #[inline(always)] fn iteration(&mut self, _bound: u8) -> bool { !self.is_raised() }
    #[inline(always)] fn leaf(&mut self) -> bool { !self.is_raised() }
}

/// Pattern database generation statistics collector.
pub trait BuildStatsCollector {
    /// Called after reaching all (`new_states` of) the sub-states at given `depth`.
    /// `explored` is the total number of sub-states reached so far.
    #[inline(always)] fn level(&mut self, _depth: u8, _new_states: usize, _explored: usize) {}

    /// Called when generation is completed successfully.
    #[inline(always)] fn finished(&mut self, _explored: usize) {}
}

/// Build statistic collector that ignore all events.
impl BuildStatsCollector for () {}

/// Logs (with `info` level) progress of pattern database generation.
pub struct BuildStatsLogger {
    /// Name of the database, included in messages.
    pub name: String,
    /// Size of the database.
    pub size: usize
}

impl BuildStatsLogger {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self { name: name.into(), size }
    }
}

impl BuildStatsCollector for BuildStatsLogger {
    fn level(&mut self, depth: u8, new_states: usize, explored: usize) {
        info!("{}: depth {:>2}: {:>11} new, {:>11} total ({:.2}%)",
            self.name, depth, new_states, explored, explored as f64 * 100.0 / self.size as f64);
    }

    fn finished(&mut self, explored: usize) {
        info!("{}: all {} entries reached", self.name, explored);
    }
}
