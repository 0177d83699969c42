use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::anyhow;
use clap::Args;
use filetab_engine::{Platform, columns_for};

use crate::commands::CommandResult;
use crate::printer::type_label;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Print one JSON object per column
    #[arg(long)]
    pub json: bool,

    /// Show another platform's columns: posix, apple or windows
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,
}

pub fn run(args: SchemaArgs) -> ExitCode {
    match execute(&args, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn parse_platform(name: Option<&str>) -> CommandResult<Platform> {
    Ok(match name {
        None => Platform::current(),
        Some("posix" | "linux") => Platform::Posix,
        Some("apple" | "macos") => Platform::Apple,
        Some("windows") => Platform::Windows,
        Some(other) => return Err(anyhow!("unknown platform `{other}`").into()),
    })
}

fn execute(args: &SchemaArgs, out: &mut impl Write) -> CommandResult<()> {
    let platform = parse_platform(args.platform.as_deref())?;

    for col in columns_for(platform) {
        if args.json {
            let obj = serde_json::json!({ "name": col.name, "type": type_label(col.ty) });
            writeln!(out, "{obj}")?;
        } else {
            writeln!(out, "{:<28}{}", col.name, type_label(col.ty))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
