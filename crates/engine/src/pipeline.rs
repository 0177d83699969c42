use std::{
    ops::ControlFlow,
    time::{Duration, Instant},
};

use filetab_fs::{Candidate, expand_patterns};
use filetab_shortcut::SystemShell;
use log::{debug, warn};

use crate::{
    FileTable,
    assemble::RESOLVES_SHORTCUTS,
    dsl::{CompiledPredicate, ParseError, Predicate, parse_predicate},
    row::FileRow,
    scan::ScanJob,
    stats::{ScanStats, ScanSummary},
    table::RowSet,
};

/// Initial state - pipeline created but no predicate given yet.
pub struct InitialState;

/// Predicate compiled against the working directory, ready for expansion.
pub struct ParsedState {
    compiled: CompiledPredicate,
}

/// Candidate paths known, ready for collection.
pub struct ExpandedState {
    compiled: CompiledPredicate,
    candidates: Vec<Candidate>,
}

/// Rows collected.
pub struct CollectedState {
    rows: RowSet,
}

/// Outcome of [`QueryPipeline::stream`].
#[derive(Debug, Clone)]
pub struct Streamed {
    pub summary: ScanSummary,
    pub metrics: Option<PipelineMetrics>,
}

/// Stages for which we record timings.
#[derive(Copy, Clone, Debug)]
pub enum Stage {
    Parse,
    Expand,
    Collect,
}

/// Timing metrics collected during pipeline execution.
#[derive(Debug, Clone, Default)]
pub struct PipelineMetrics {
    pub parse_time: Option<Duration>,
    pub expand_time: Option<Duration>,
    pub collect_time: Option<Duration>,
}

impl PipelineMetrics {
    /// Total time across all measured stages.
    pub fn total(&self) -> Duration {
        self.parse_time.unwrap_or_default()
            + self.expand_time.unwrap_or_default()
            + self.collect_time.unwrap_or_default()
    }
}

/// Strategy trait for timing behavior.
pub trait Timer {
    /// Run `f`, optionally measuring and recording the duration for `stage`.
    fn measure<F, R>(&mut self, stage: Stage, f: F) -> R
    where
        F: FnOnce() -> R;

    fn metrics(&self) -> Option<&PipelineMetrics> {
        None
    }
}

#[derive(Debug, Default)]
pub struct NoopTimer;

impl Timer for NoopTimer {
    #[inline]
    fn measure<F, R>(&mut self, _stage: Stage, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        f()
    }
}

#[derive(Debug, Default)]
pub struct MetricsTimer {
    metrics: PipelineMetrics,
}

impl Timer for MetricsTimer {
    fn measure<F, R>(&mut self, stage: Stage, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        match stage {
            Stage::Parse => self.metrics.parse_time = Some(elapsed),
            Stage::Expand => self.metrics.expand_time = Some(elapsed),
            Stage::Collect => self.metrics.collect_time = Some(elapsed),
        }

        result
    }

    fn metrics(&self) -> Option<&PipelineMetrics> {
        Some(&self.metrics)
    }
}

/// One query, driven stage by stage. The typestate parameter `S` fixes the
/// order parse → expand → collect at compile time; `T` decides whether the
/// stages are timed.
pub struct QueryPipeline<'a, S, T: Timer = NoopTimer> {
    table: &'a FileTable,
    stats: ScanStats,
    state: S,
    timer: T,
}

impl<'a> QueryPipeline<'a, InitialState, NoopTimer> {
    pub fn new(table: &'a FileTable) -> Self {
        Self::with_timer(table, NoopTimer)
    }
}

impl<'a> QueryPipeline<'a, InitialState, MetricsTimer> {
    pub fn new_timed(table: &'a FileTable) -> Self {
        Self::with_timer(table, MetricsTimer::default())
    }
}

impl<'a, S, T: Timer> QueryPipeline<'a, S, T> {
    pub fn metrics(&self) -> Option<&PipelineMetrics> {
        self.timer.metrics()
    }

    fn advance<N>(self, state: N) -> QueryPipeline<'a, N, T> {
        QueryPipeline {
            table: self.table,
            stats: self.stats,
            state,
            timer: self.timer,
        }
    }
}

impl<'a, T: Timer> QueryPipeline<'a, InitialState, T> {
    fn with_timer(table: &'a FileTable, timer: T) -> Self {
        Self {
            table,
            stats: ScanStats::new(),
            state: InitialState,
            timer,
        }
    }

    /// Parse a predicate string; the only stage that can fail.
    pub fn parse(mut self, input: &str) -> Result<QueryPipeline<'a, ParsedState, T>, ParseError> {
        let table = self.table;
        let compiled = self.timer.measure(Stage::Parse, || {
            parse_predicate(input).map(|p| table.compile(&p))
        })?;
        Ok(self.advance(ParsedState { compiled }))
    }

    /// Use an already built predicate.
    pub fn with_predicate(mut self, pred: &Predicate) -> QueryPipeline<'a, ParsedState, T> {
        let table = self.table;
        let compiled = self.timer.measure(Stage::Parse, || table.compile(pred));
        self.advance(ParsedState { compiled })
    }
}

impl<'a, T: Timer> QueryPipeline<'a, ParsedState, T> {
    pub fn expand(mut self) -> QueryPipeline<'a, ExpandedState, T> {
        let ParsedState { compiled } = self.state;
        let patterns = compiled.scan_patterns();
        if patterns.is_empty() {
            warn!("[scan] predicate constrains no path; nothing to enumerate");
        }

        let opts = self.table.options().expand_options();
        let expansion = self
            .timer
            .measure(Stage::Expand, || expand_patterns(patterns, &opts));
        self.stats.absorb_expand(&expansion.stats);
        debug!(
            "[expand] {} patterns -> {} candidates",
            patterns.len(),
            expansion.candidates.len()
        );

        QueryPipeline {
            table: self.table,
            stats: self.stats,
            state: ExpandedState {
                compiled,
                candidates: expansion.candidates,
            },
            timer: self.timer,
        }
    }
}

impl<'a, T: Timer> QueryPipeline<'a, ExpandedState, T> {
    pub fn candidate_count(&self) -> usize {
        self.state.candidates.len()
    }

    /// Stream rows into `sink` instead of collecting them.
    pub fn stream<F>(self, sink: F) -> Streamed
    where
        F: FnMut(FileRow) -> ControlFlow<()>,
    {
        let QueryPipeline {
            table,
            stats,
            state: ExpandedState {
                compiled,
                candidates,
            },
            mut timer,
        } = self;

        run_job(table, &stats, &mut timer, &compiled, candidates, sink);
        Streamed {
            summary: stats.snapshot(),
            metrics: timer.metrics().cloned(),
        }
    }

    pub fn collect(self) -> QueryPipeline<'a, CollectedState, T> {
        let QueryPipeline {
            table,
            stats,
            state: ExpandedState {
                compiled,
                candidates,
            },
            mut timer,
        } = self;

        let mut rows = Vec::new();
        run_job(table, &stats, &mut timer, &compiled, candidates, |row| {
            rows.push(row);
            ControlFlow::Continue(())
        });

        let summary = stats.snapshot();
        QueryPipeline {
            table,
            stats,
            state: CollectedState {
                rows: RowSet::new(rows, summary),
            },
            timer,
        }
    }
}

fn run_job<T, F>(
    table: &FileTable,
    stats: &ScanStats,
    timer: &mut T,
    compiled: &CompiledPredicate,
    candidates: Vec<Candidate>,
    sink: F,
) where
    T: Timer,
    F: FnMut(FileRow) -> ControlFlow<()>,
{
    let opts = table.options();
    let shell = SystemShell::default();
    let job = ScanJob {
        filter: compiled,
        threads: opts.threads,
        limit: opts.limit,
        stats,
        shell: RESOLVES_SHORTCUTS.then_some(&shell),
    };
    timer.measure(Stage::Collect, || job.run(candidates, sink));
}

impl<T: Timer> QueryPipeline<'_, CollectedState, T> {
    pub fn rows(&self) -> &RowSet {
        &self.state.rows
    }

    pub fn into_rows(self) -> RowSet {
        self.state.rows
    }
}
