mod assemble;
pub mod differ;
mod dsl;
mod pipeline;
mod row;
mod scan;
pub mod schema;
mod stats;
mod table;
#[cfg(test)]
mod testutil;

pub use assemble::{RESOLVES_SHORTCUTS, assemble, assemble_with};
pub use dsl::*;
pub use pipeline::{
    CollectedState, ExpandedState, InitialState, MetricsTimer, NoopTimer, ParsedState,
    PipelineMetrics, QueryPipeline, Stage, Streamed, Timer,
};
pub use row::{FileRow, Value};
pub use schema::{ColumnDef, ColumnType, Platform, columns, columns_for};
pub use stats::{ScanStats, ScanSummary};
pub use table::{FileTable, RowSet, ScanOptions};
