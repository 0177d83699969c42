use std::io::{self, ErrorKind, Stderr, Stdout};
use std::ops::ControlFlow;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use filetab_engine::{FileTable, QueryPipeline, ScanOptions};
use log::debug;

use crate::commands::CommandResult;
use crate::printer::{
    ColorChoice, HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, QueryFooter,
    QueryPrintContext, QueryPrinter, resolve_columns,
};

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output results as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Suppress timing statistics
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Comma separated columns to print (default: all)
    #[arg(long, value_name = "COLS")]
    pub columns: Option<String>,
}

impl OutputOptions {
    /// Create a printer based on the output options.
    pub fn make_printer(&self, columns: Vec<&'static str>) -> Box<dyn QueryPrinter> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let color = match self.color.as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        };

        let cfg = PrinterConfig {
            format,
            color,
            columns,
            show_timing: !self.quiet,
        };

        match format {
            OutputFormat::Human => Box::new(HumanPrinter::<Stdout, Stderr>::stdout(cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::<Stdout, Stderr>::stdout(cfg)),
        }
    }
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Predicate over `path` and `directory`, e.g. "path LIKE '/etc/%'"
    pub predicate: String,

    /// Stop after this many rows
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Worker threads (overrides FILETAB_THREADS)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Deepest directory level a `%%` segment descends (overrides FILETAB_MAX_DEPTH)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Also report the `.lnk` sibling of every matched file
    #[arg(long)]
    pub pair_shortcuts: bool,

    /// Output formatting options
    #[command(flatten)]
    pub output: OutputOptions,
}

impl QueryArgs {
    fn scan_options(&self) -> ScanOptions {
        let mut opts = ScanOptions::from_env();
        if let Some(threads) = self.threads {
            opts.threads = threads.max(1);
        }
        if let Some(depth) = self.max_depth {
            opts.max_depth = depth;
        }
        opts.pair_shortcuts |= self.pair_shortcuts;
        opts.limit = self.limit;
        opts
    }
}

pub fn run(args: QueryArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: &QueryArgs) -> CommandResult<ExitCode> {
    let columns = resolve_columns(args.output.columns.as_deref())?;
    let opts = args.scan_options();
    debug!("[query] {opts:?}");

    let table = FileTable::new(opts);
    let pipeline = QueryPipeline::new_timed(&table)
        .parse(&args.predicate)
        .with_context(|| format!("invalid predicate `{}`", args.predicate))?
        .expand();
    debug!("[query] {} candidates", pipeline.candidate_count());

    let mut printer = args.output.make_printer(columns);
    let ctx = QueryPrintContext {
        kind: "query",
        predicate: &args.predicate,
    };
    printer.begin(&ctx)?;

    let mut printed = 0usize;
    let mut failure: Option<io::Error> = None;
    let streamed = pipeline.stream(|row| match printer.print_row(&row) {
        Ok(()) => {
            printed += 1;
            ControlFlow::Continue(())
        }
        Err(e) => {
            failure = Some(e);
            ControlFlow::Break(())
        }
    });

    match failure {
        // A closed pipe (`| head`) ends the query quietly.
        Some(e) if e.kind() == ErrorKind::BrokenPipe => return Ok(ExitCode::SUCCESS),
        Some(e) => return Err(e.into()),
        None => {}
    }

    let footer = QueryFooter {
        rows: printed,
        truncated: streamed.summary.limit_reached,
        summary: &streamed.summary,
        metrics: streamed.metrics.as_ref(),
    };
    printer.finish(&ctx, &footer)?;

    Ok(ExitCode::SUCCESS)
}
