pub mod query;
pub mod schema;

use clap::Subcommand;
pub use query::QueryArgs;
pub use schema::SchemaArgs;

/// Common error type for command handlers
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select rows from the file table.
    ///
    /// Example:
    ///   filetab query "path LIKE '/etc/%.conf'"
    ///   filetab query -n 5 --columns path,size "directory = '/tmp'"
    Query(QueryArgs),

    /// List the columns this build reports.
    Schema(SchemaArgs),
}
