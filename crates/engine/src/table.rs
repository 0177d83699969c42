use std::{
    ops::ControlFlow,
    path::{MAIN_SEPARATOR_STR, Path, PathBuf},
};

use filetab_fs::{ExpandOptions, platform_case_insensitive};
use filetab_runtime::ScanConfig;
use hashbrown::HashMap;
use log::warn;

use crate::{
    dsl::{CompiledPredicate, ParseError, Predicate},
    pipeline::QueryPipeline,
    row::FileRow,
    stats::ScanSummary,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// `1` scans on the calling thread.
    pub threads: usize,
    pub max_depth: usize,
    pub pair_shortcuts: bool,
    pub case_insensitive: bool,
    /// Stop after this many rows.
    pub limit: Option<usize>,
    /// Anchor for relative patterns; the process working directory when unset.
    pub cwd: Option<PathBuf>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl ScanOptions {
    pub fn from_config(cfg: &ScanConfig) -> Self {
        Self {
            threads: cfg.threads.max(1),
            max_depth: cfg.max_depth,
            pair_shortcuts: cfg.pair_shortcuts,
            case_insensitive: platform_case_insensitive(),
            limit: None,
            cwd: None,
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(&ScanConfig::from_env())
    }

    pub(crate) fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            case_insensitive: self.case_insensitive,
            max_depth: self.max_depth,
            pair_shortcuts: self.pair_shortcuts,
        }
    }

    fn resolve_cwd(&self) -> PathBuf {
        if let Some(cwd) = &self.cwd {
            return cwd.clone();
        }
        std::env::current_dir().unwrap_or_else(|e| {
            warn!("[scan] cannot read working directory, anchoring at root: {e}");
            PathBuf::from(MAIN_SEPARATOR_STR)
        })
    }
}

/// The `file` table: answers predicates with one row per matching path.
/// Holds no state between queries.
#[derive(Debug, Clone, Default)]
pub struct FileTable {
    opts: ScanOptions,
}

impl FileTable {
    pub fn new(opts: ScanOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.opts
    }

    pub(crate) fn compile(&self, pred: &Predicate) -> CompiledPredicate {
        CompiledPredicate::new(pred, &self.opts.resolve_cwd(), self.opts.case_insensitive)
    }

    pub fn query(&self, pred: &Predicate) -> RowSet {
        QueryPipeline::new(self)
            .with_predicate(pred)
            .expand()
            .collect()
            .into_rows()
    }

    pub fn query_str(&self, input: &str) -> Result<RowSet, ParseError> {
        Ok(QueryPipeline::new(self).parse(input)?.expand().collect().into_rows())
    }

    /// Stream rows as they are produced. Returning `ControlFlow::Break` from
    /// `sink` cancels the rest of the scan.
    pub fn scan<F>(&self, pred: &Predicate, sink: F) -> ScanSummary
    where
        F: FnMut(FileRow) -> ControlFlow<()>,
    {
        QueryPipeline::new(self)
            .with_predicate(pred)
            .expand()
            .stream(sink)
            .summary
    }
}

/// Rows of one query. Order carries no meaning: equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    rows: Vec<FileRow>,
    summary: ScanSummary,
}

impl RowSet {
    pub fn new(rows: Vec<FileRow>, summary: ScanSummary) -> Self {
        Self { rows, summary }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRow> {
        self.rows.iter()
    }

    pub fn rows(&self) -> &[FileRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FileRow> {
        self.rows
    }

    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    /// First row whose `filename` is `name`.
    pub fn by_filename(&self, name: &str) -> Option<&FileRow> {
        self.rows.iter().find(|r| r.filename() == name)
    }

    pub fn by_path(&self, path: &Path) -> Option<&FileRow> {
        let path = path.to_str()?;
        self.rows.iter().find(|r| r.path() == path)
    }

    pub fn sorted_by_path(mut self) -> Self {
        self.rows.sort_by(|a, b| a.path().cmp(b.path()));
        self
    }
}

impl PartialEq for RowSet {
    fn eq(&self, other: &Self) -> bool {
        if self.rows.len() != other.rows.len() {
            return false;
        }
        let mut counts: HashMap<&FileRow, isize> = HashMap::new();
        for r in &self.rows {
            *counts.entry(r).or_default() += 1;
        }
        for r in &other.rows {
            *counts.entry(r).or_default() -= 1;
        }
        counts.values().all(|&n| n == 0)
    }
}

impl Eq for RowSet {}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a FileRow;
    type IntoIter = std::slice::Iter<'a, FileRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for RowSet {
    type Item = FileRow;
    type IntoIter = std::vec::IntoIter<FileRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
