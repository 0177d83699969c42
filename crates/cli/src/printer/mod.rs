use std::io::{self, Write};

use anyhow::anyhow;
use filetab_engine::{ColumnType, FileRow, PipelineMetrics, ScanSummary, Value, columns};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with optional colors.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Color handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Automatically detect TTY and enable colors if appropriate.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Configuration for printing query results.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Output format (human or JSON).
    pub format: OutputFormat,
    /// Color handling strategy.
    pub color: ColorChoice,
    /// Columns to print, in order.
    pub columns: Vec<&'static str>,
    /// Whether to show timing statistics.
    pub show_timing: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorChoice::Auto,
            columns: all_columns(),
            show_timing: true,
        }
    }
}

fn all_columns() -> Vec<&'static str> {
    columns().into_iter().map(|c| c.name).collect()
}

/// Turn a comma separated column list into schema names. `None` selects
/// every column of this platform.
pub fn resolve_columns(list: Option<&str>) -> anyhow::Result<Vec<&'static str>> {
    let Some(list) = list else {
        return Ok(all_columns());
    };

    let schema = columns();
    let picked = list
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            schema
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
                .map(|c| c.name)
                .ok_or_else(|| anyhow!("unknown column `{name}`"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if picked.is_empty() {
        return Err(anyhow!("no columns selected"));
    }
    Ok(picked)
}

pub fn type_label(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Text => "TEXT",
        ColumnType::Integer => "INTEGER",
    }
}

/// Human-readable printer with optional color support.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    use_color: bool,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    /// Generic writers cannot be probed for a TTY, so `Auto` means no color.
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        let use_color = cfg.color == ColorChoice::Always;
        Self {
            out,
            err,
            cfg,
            use_color,
        }
    }

    /// Create a printer that writes to stdout and stderr with TTY detection.
    pub fn stdout(cfg: PrinterConfig) -> HumanPrinter<io::Stdout, io::Stderr> {
        use std::io::IsTerminal;

        let use_color = match cfg.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };

        HumanPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
            use_color,
        }
    }

    #[inline]
    fn format_path(&self, path: &str) -> String {
        if self.use_color {
            format!("\x1b[32m{}\x1b[0m", path)
        } else {
            path.to_owned()
        }
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    /// Create a printer that writes to stdout and stderr.
    pub fn stdout(cfg: PrinterConfig) -> JsonPrinter<io::Stdout, io::Stderr> {
        JsonPrinter {
            out: io::stdout(),
            err: io::stderr(),
            cfg,
        }
    }

    fn selects_everything(&self) -> bool {
        self.cfg.columns == all_columns()
    }
}

/// Static context about a print run.
#[derive(Debug)]
pub struct QueryPrintContext<'a> {
    /// Label for this query type
    pub kind: &'a str,
    /// Predicate as typed.
    pub predicate: &'a str,
}

/// What the footer reports once the stream has ended.
#[derive(Debug)]
pub struct QueryFooter<'a> {
    /// Rows actually printed.
    pub rows: usize,
    /// Whether the row limit cut the scan short.
    pub truncated: bool,
    pub summary: &'a ScanSummary,
    pub metrics: Option<&'a PipelineMetrics>,
}

/// Receives a stream of rows and is responsible for formatting them.
pub trait QueryPrinter {
    /// Called once before any rows are printed.
    fn begin(&mut self, ctx: &QueryPrintContext) -> io::Result<()>;

    /// Called for each result row.
    fn print_row(&mut self, row: &FileRow) -> io::Result<()>;

    /// Called once after all rows are printed.
    fn finish(&mut self, ctx: &QueryPrintContext, footer: &QueryFooter<'_>) -> io::Result<()>;
}

#[inline]
fn millis(d: Option<std::time::Duration>) -> f64 {
    d.unwrap_or_default().as_secs_f64() * 1000.0
}

impl<W: Write, E: Write> QueryPrinter for HumanPrinter<W, E> {
    fn begin(&mut self, _ctx: &QueryPrintContext) -> io::Result<()> {
        writeln!(self.out, "{}", self.cfg.columns.join("  "))
    }

    fn print_row(&mut self, row: &FileRow) -> io::Result<()> {
        let cells: Vec<String> = self
            .cfg
            .columns
            .iter()
            .map(|&name| match row.get(name) {
                Some(Value::Text(s)) if name == "path" => self.format_path(s),
                Some(v) => v.to_string(),
                None => String::new(),
            })
            .collect();
        writeln!(self.out, "{}", cells.join("  "))
    }

    fn finish(&mut self, ctx: &QueryPrintContext, footer: &QueryFooter<'_>) -> io::Result<()> {
        if footer.truncated {
            writeln!(self.out, "... stopped after {} rows", footer.rows)?;
        }

        if !self.cfg.show_timing {
            return Ok(());
        }

        let skipped = footer.summary.skipped();
        match footer.metrics {
            Some(m) => writeln!(
                self.err,
                "\n[{}] {} rows in {:.2}ms (expand: {:.2}ms, collect: {:.2}ms, skipped: {})",
                ctx.kind,
                footer.rows,
                m.total().as_secs_f64() * 1000.0,
                millis(m.expand_time),
                millis(m.collect_time),
                skipped,
            ),
            None => writeln!(
                self.err,
                "\n[{}] {} rows (skipped: {})",
                ctx.kind, footer.rows, skipped
            ),
        }
    }
}

impl<W: Write, E: Write> QueryPrinter for JsonPrinter<W, E> {
    fn begin(&mut self, _ctx: &QueryPrintContext) -> io::Result<()> {
        Ok(())
    }

    fn print_row(&mut self, row: &FileRow) -> io::Result<()> {
        if self.selects_everything() {
            serde_json::to_writer(&mut self.out, row)?;
        } else {
            let obj: serde_json::Map<String, serde_json::Value> = self
                .cfg
                .columns
                .iter()
                .filter_map(|&name| {
                    let value = match row.get(name)? {
                        Value::Int(n) => serde_json::Value::from(n),
                        Value::Text(s) => serde_json::Value::from(s),
                    };
                    Some((name.to_owned(), value))
                })
                .collect();
            serde_json::to_writer(&mut self.out, &obj)?;
        }
        writeln!(self.out)
    }

    fn finish(&mut self, ctx: &QueryPrintContext, footer: &QueryFooter<'_>) -> io::Result<()> {
        if !self.cfg.show_timing {
            return Ok(());
        }

        let s = footer.summary;
        let mut obj = serde_json::json!({
            "type": "summary",
            "kind": ctx.kind,
            "predicate": ctx.predicate,
            "rows": footer.rows,
            "truncated": footer.truncated,
            "skipped": {
                "vanished": s.vanished,
                "permission_denied": s.permission_denied,
                "io_errors": s.io_errors,
                "non_unicode": s.non_unicode,
                "unreadable_dirs": s.unreadable_dirs,
                "depth_limited": s.depth_limited,
                "missing_prefix": s.missing_prefix,
            },
            "shortcuts": {
                "malformed": s.malformed_shortcuts,
                "partial": s.partial_shortcuts,
            },
        });
        if let Some(m) = footer.metrics {
            obj["timing_ms"] = serde_json::json!({
                "total": m.total().as_secs_f64() * 1000.0,
                "parse": millis(m.parse_time),
                "expand": millis(m.expand_time),
                "collect": millis(m.collect_time),
            });
        }
        writeln!(self.err, "{}", obj)
    }
}

#[cfg(test)]
#[path = "printer_tests.rs"]
mod tests;
