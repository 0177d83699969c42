use std::fs;

use filetab_engine::{FileTable, PipelineMetrics, ScanOptions, ScanSummary};
use tempfile::TempDir;

use super::*;

fn sample_row(dir: &TempDir) -> FileRow {
    let path = dir.path().join("notes.txt");
    fs::write(&path, b"hello").unwrap();

    let rows = FileTable::new(ScanOptions::default())
        .query_str(&format!("path = '{}'", path.display()))
        .unwrap();
    assert_eq!(rows.len(), 1);
    rows.into_rows().remove(0)
}

fn cfg(columns: &[&'static str]) -> PrinterConfig {
    PrinterConfig {
        format: OutputFormat::Human,
        color: ColorChoice::Never,
        columns: columns.to_vec(),
        show_timing: true,
    }
}

const CTX: QueryPrintContext<'static> = QueryPrintContext {
    kind: "query",
    predicate: "path LIKE '%'",
};

fn footer<'a>(summary: &'a ScanSummary, metrics: Option<&'a PipelineMetrics>) -> QueryFooter<'a> {
    QueryFooter {
        rows: 1,
        truncated: false,
        summary,
        metrics,
    }
}

#[test]
fn human_printer_writes_header_and_selected_cells() {
    let dir = TempDir::new().unwrap();
    let row = sample_row(&dir);
    let (mut out, mut err) = (Vec::new(), Vec::new());

    let mut p = HumanPrinter::new(&mut out, &mut err, cfg(&["filename", "size", "type"]));
    p.begin(&CTX).unwrap();
    p.print_row(&row).unwrap();
    p.finish(&CTX, &footer(&ScanSummary::default(), None)).unwrap();
    drop(p);

    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, ["filename  size  type", "notes.txt  5  regular"]);

    let err = String::from_utf8(err).unwrap();
    assert!(err.contains("[query] 1 rows (skipped: 0)"), "{err}");
}

#[test]
fn human_printer_colors_paths_only_when_asked() {
    let dir = TempDir::new().unwrap();
    let row = sample_row(&dir);

    let cases = [(ColorChoice::Always, true), (ColorChoice::Never, false), (ColorChoice::Auto, false)];
    for (color, colored) in cases {
        let mut out = Vec::new();
        let mut config = cfg(&["path"]);
        config.color = color;

        let mut p = HumanPrinter::new(&mut out, Vec::new(), config);
        p.print_row(&row).unwrap();
        drop(p);

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.contains("\x1b[32m"), colored, "{color:?}");
        assert!(out.contains(row.path()));
    }
}

#[test]
fn human_footer_reports_truncation_and_timings() {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let metrics = PipelineMetrics {
        parse_time: Some(std::time::Duration::from_millis(1)),
        expand_time: Some(std::time::Duration::from_millis(2)),
        collect_time: Some(std::time::Duration::from_millis(3)),
    };
    let summary = ScanSummary {
        vanished: 2,
        ..ScanSummary::default()
    };

    let mut p = HumanPrinter::new(&mut out, &mut err, cfg(&["path"]));
    let mut f = footer(&summary, Some(&metrics));
    f.truncated = true;
    p.finish(&CTX, &f).unwrap();
    drop(p);

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("stopped after 1 rows"), "{out}");
    let err = String::from_utf8(err).unwrap();
    assert!(err.contains("in 6.00ms"), "{err}");
    assert!(err.contains("expand: 2.00ms, collect: 3.00ms, skipped: 2"), "{err}");
}

#[test]
fn quiet_printers_write_no_footer() {
    let summary = ScanSummary::default();
    let mut config = cfg(&["path"]);
    config.show_timing = false;

    let mut err = Vec::new();
    HumanPrinter::new(Vec::new(), &mut err, config.clone())
        .finish(&CTX, &footer(&summary, None))
        .unwrap();
    assert!(err.is_empty());

    JsonPrinter::new(Vec::new(), &mut err, config)
        .finish(&CTX, &footer(&summary, None))
        .unwrap();
    assert!(err.is_empty());
}

#[test]
fn json_printer_emits_one_object_per_row() {
    let dir = TempDir::new().unwrap();
    let row = sample_row(&dir);
    let mut out = Vec::new();

    let mut p = JsonPrinter::new(&mut out, Vec::new(), PrinterConfig::default());
    p.print_row(&row).unwrap();
    p.print_row(&row).unwrap();
    drop(p);

    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);

    let v: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(v["filename"], "notes.txt");
    assert_eq!(v["size"], 5);
    assert_eq!(v.as_object().unwrap().len(), columns().len());
}

#[test]
fn json_printer_honours_column_selection() {
    let dir = TempDir::new().unwrap();
    let row = sample_row(&dir);
    let mut out = Vec::new();

    let mut p = JsonPrinter::new(&mut out, Vec::new(), cfg(&["filename", "size"]));
    p.print_row(&row).unwrap();
    drop(p);

    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let obj = v.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(obj["filename"], "notes.txt");
    assert_eq!(obj["size"], 5);
}

#[test]
fn json_summary_goes_to_stderr() {
    let summary = ScanSummary {
        malformed_shortcuts: 1,
        ..ScanSummary::default()
    };
    let metrics = PipelineMetrics::default();
    let mut err = Vec::new();

    JsonPrinter::new(Vec::new(), &mut err, cfg(&["path"]))
        .finish(&CTX, &footer(&summary, Some(&metrics)))
        .unwrap();

    let v: serde_json::Value = serde_json::from_slice(&err).unwrap();
    assert_eq!(v["type"], "summary");
    assert_eq!(v["predicate"], "path LIKE '%'");
    assert_eq!(v["shortcuts"]["malformed"], 1);
    assert!(v["timing_ms"]["total"].is_number());
}

#[test]
fn resolve_columns_validates_names() {
    assert_eq!(resolve_columns(None).unwrap().len(), columns().len());
    assert_eq!(
        resolve_columns(Some("path, SIZE ,type")).unwrap(),
        ["path", "size", "type"]
    );

    let cases = ["nope", "path,bogus", " , "];
    for list in cases {
        assert!(resolve_columns(Some(list)).is_err(), "{list}");
    }
}
