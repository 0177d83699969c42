use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::Command;
use filetab_runtime::logging;

#[derive(Debug, Parser)]
#[command(
    name = "filetab",
    version,
    about = "Query file metadata as a table",
    propagate_version = true
)]
pub struct Cli {
    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with_verbosity(cli.verbose).ok();

    match cli.command {
        Command::Query(args) => commands::query::run(args),
        Command::Schema(args) => commands::schema::run(args),
    }
}
