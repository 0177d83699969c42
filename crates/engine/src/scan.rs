use std::{
    ops::ControlFlow,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use crossbeam::channel;
use filetab_fs::{Candidate, Origin};
use filetab_shortcut::ShellInfo;
use log::debug;

use crate::{
    assemble::assemble_with,
    dsl::CompiledPredicate,
    row::FileRow,
    stats::{Counter, ScanStats},
};

/// Rows in flight per worker before a slow sink applies back-pressure.
const RESULTS_PER_WORKER: usize = 16;

pub(crate) struct ScanJob<'a, S> {
    pub filter: &'a CompiledPredicate,
    pub threads: usize,
    pub limit: Option<usize>,
    pub stats: &'a ScanStats,
    pub shell: Option<&'a S>,
}

impl<S: ShellInfo + Sync> ScanJob<'_, S> {
    /// Turn candidates into rows and hand each to `sink` until the candidates
    /// run out, `limit` rows were delivered or the sink breaks.
    pub(crate) fn run<F>(&self, candidates: Vec<Candidate>, sink: F)
    where
        F: FnMut(FileRow) -> ControlFlow<()>,
    {
        if self.threads <= 1 || candidates.len() <= 1 {
            self.run_sequential(candidates, sink);
        } else {
            self.run_parallel(candidates, sink);
        }
    }

    fn admit(&self, c: &Candidate) -> bool {
        self.filter.matches_path(&filter_path(c))
    }

    fn process(&self, c: &Candidate) -> Option<FileRow> {
        if !self.admit(c) {
            return None;
        }
        assemble_with(c, self.stats, self.shell)
    }

    /// Hand one row to the sink. A row arriving once `limit` rows were
    /// emitted is dropped and ends the scan, so hitting the limit exactly
    /// is not reported as a cut.
    fn deliver<F>(&self, row: FileRow, emitted: &mut usize, sink: &mut F) -> ControlFlow<()>
    where
        F: FnMut(FileRow) -> ControlFlow<()>,
    {
        if self.limit.is_some_and(|limit| *emitted >= limit) {
            self.stats.mark_limit_reached();
            return ControlFlow::Break(());
        }
        *emitted += 1;
        self.stats.bump(Counter::Rows);
        sink(row)
    }

    fn run_sequential<F>(&self, candidates: Vec<Candidate>, mut sink: F)
    where
        F: FnMut(FileRow) -> ControlFlow<()>,
    {
        let mut emitted = 0;
        for c in &candidates {
            if let Some(row) = self.process(c)
                && self.deliver(row, &mut emitted, &mut sink).is_break()
            {
                debug!("[scan] stopped after {emitted} rows");
                return;
            }
        }
    }

    fn run_parallel<F>(&self, candidates: Vec<Candidate>, mut sink: F)
    where
        F: FnMut(FileRow) -> ControlFlow<()>,
    {
        let threads = self.threads.min(candidates.len());
        let (work_tx, work_rx) = channel::unbounded::<Candidate>();
        for c in candidates {
            let _ = work_tx.send(c);
        }
        // No more work will arrive; workers exit once the queue drains.
        drop(work_tx);

        let (row_tx, row_rx) = channel::bounded::<FileRow>(threads * RESULTS_PER_WORKER);
        let stop = AtomicBool::new(false);

        debug!("[scan] starting with {threads} threads");

        thread::scope(|s| {
            for _ in 0..threads {
                let work_rx = work_rx.clone();
                let row_tx = row_tx.clone();
                let stop = &stop;
                s.spawn(move || self.worker_loop(work_rx, row_tx, stop));
            }
            drop(row_tx);

            let mut emitted = 0;
            for row in &row_rx {
                if self.deliver(row, &mut emitted, &mut sink).is_break() {
                    debug!("[scan] stopped after {emitted} rows");
                    stop.store(true, Ordering::Release);
                    break;
                }
            }
            // Unblocks any worker parked on a full channel.
            drop(row_rx);
        });
    }

    fn worker_loop(
        &self,
        work_rx: channel::Receiver<Candidate>,
        row_tx: channel::Sender<FileRow>,
        stop: &AtomicBool,
    ) {
        for c in work_rx.iter() {
            if stop.load(Ordering::Acquire) {
                return;
            }
            if let Some(row) = self.process(&c)
                && row_tx.send(row).is_err()
            {
                return;
            }
        }
    }
}

/// Siblings are admitted on behalf of the file they were paired with.
fn filter_path(c: &Candidate) -> PathBuf {
    match c.origin {
        Origin::Matched => c.path.clone(),
        Origin::ShortcutSibling => c.path.with_extension(""),
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
