//! Compare this host's rows with rows produced inside an isolated
//! environment (a container, a VM) for the same predicate.

use std::{collections::BTreeMap, io};

use filetab_fs::PlatformMeta;

use crate::{
    FileTable,
    dsl::Predicate,
    row::FileRow,
    schema::{Platform, columns_for},
};

/// Runs a predicate somewhere else and hands back the rows. How the
/// isolation boundary is crossed is up to the implementation.
pub trait IsolatedRunner {
    fn run(&self, predicate: &str) -> io::Result<Vec<FileRow>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    /// Columns expected to differ between environments.
    pub ignore: Vec<&'static str>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore: vec!["inode", "device", "atime", "mtime", "ctime", "btime"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDiff {
    OnlyLocal(String),
    OnlyRemote(String),
    Changed {
        path: String,
        column: &'static str,
        local: String,
        remote: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    /// Set when the two sides report different column sets.
    pub schema_mismatch: Option<(Vec<&'static str>, Vec<&'static str>)>,
    pub differences: Vec<RowDiff>,
}

impl DiffReport {
    pub fn is_clean(&self) -> bool {
        self.schema_mismatch.is_none() && self.differences.is_empty()
    }
}

fn platform_of(row: &FileRow) -> Platform {
    match row.record.platform {
        PlatformMeta::Posix(_) => Platform::Posix,
        PlatformMeta::Apple(_) => Platform::Apple,
        PlatformMeta::Windows(_) => Platform::Windows,
    }
}

fn schema_of(rows: &[FileRow]) -> Option<Vec<&'static str>> {
    let first = rows.first()?;
    Some(
        columns_for(platform_of(first))
            .iter()
            .map(|c| c.name)
            .collect(),
    )
}

/// Rows are matched by `path`; rows present on one side only are reported
/// as such, matched rows are compared cell by cell.
pub fn diff_rows(local: &[FileRow], remote: &[FileRow], opts: &DiffOptions) -> DiffReport {
    let mut report = DiffReport::default();

    let (ls, rs) = (schema_of(local), schema_of(remote));
    let schema = match (ls, rs) {
        (Some(l), Some(r)) if l != r => {
            report.schema_mismatch = Some((l, r));
            return report;
        }
        (Some(s), _) | (None, Some(s)) => s,
        (None, None) => return report,
    };

    let by_path = |rows: &[FileRow]| -> BTreeMap<String, usize> {
        rows.iter()
            .enumerate()
            .map(|(i, r)| (r.path().to_owned(), i))
            .collect()
    };
    let (lmap, rmap) = (by_path(local), by_path(remote));

    for (path, &li) in &lmap {
        let Some(&ri) = rmap.get(path) else {
            report.differences.push(RowDiff::OnlyLocal(path.clone()));
            continue;
        };
        let (l, r) = (&local[li], &remote[ri]);
        for &column in schema.iter().filter(|c| !opts.ignore.contains(c)) {
            let lv = l.get(column).map(|v| v.to_string()).unwrap_or_default();
            let rv = r.get(column).map(|v| v.to_string()).unwrap_or_default();
            if lv != rv {
                report.differences.push(RowDiff::Changed {
                    path: path.clone(),
                    column,
                    local: lv,
                    remote: rv,
                });
            }
        }
    }
    for path in rmap.keys().filter(|p| !lmap.contains_key(*p)) {
        report.differences.push(RowDiff::OnlyRemote(path.clone()));
    }

    report
}

/// Run `pred` locally and through `runner`, then diff the results.
pub fn compare_with<R: IsolatedRunner>(
    table: &FileTable,
    runner: &R,
    pred: &Predicate,
    opts: &DiffOptions,
) -> io::Result<DiffReport> {
    let local = table.query(pred).into_rows();
    let remote = runner.run(&pred.to_string())?;
    Ok(diff_rows(&local, &remote, opts))
}

#[cfg(test)]
#[path = "differ_tests.rs"]
mod tests;
