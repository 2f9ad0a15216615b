//! Command line interface for the release train.
//!
//! Argument parsing, colored output, interactive prompts and the release
//! command itself.

mod args;
pub mod commands;
mod output;
mod prompt;

pub use args::{Args, VERSION_FLAGS, is_version_request};
pub use commands::execute_command;
pub use output::OutputManager;
pub use prompt::{BranchSelection, NewBranch, Prompter, TerminalPrompter};

use crate::error::Result;
use clap::Parser;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let raw: Vec<String> = std::env::args().collect();
    if is_version_request(&raw) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    let args = Args::parse_from(raw);
    execute_command(args).await
}
