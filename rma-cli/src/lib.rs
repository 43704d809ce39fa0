//! Command-line front end for the returns assistant.
//!
//! The `rma` binary wires the retrieval pipeline from `rma-rag` and the
//! rule engines from `rma-policy` behind a handful of subcommands, plus
//! an interactive query session when invoked bare. All configuration
//! comes from the environment (see [`config::Settings`]).

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod logging;

use anyhow::Result;

use cli::{Cli, Command};
use config::Settings;

/// Dispatch a parsed command line to its implementation.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env()?;

    match cli.command {
        Some(Command::Ingest { reingest }) => commands::ingest::run(&settings, reingest).await,
        Some(Command::Query { text, top_k, scores }) => {
            commands::query::run(&settings, &text, top_k, scores).await
        }
        Some(Command::Stats) => commands::stats::run(&settings).await,
        Some(Command::Check { purchase_date, category, as_of }) => {
            commands::check::run(&purchase_date, &category, as_of.as_deref())
        }
        Some(Command::Summarize { focus, file }) => {
            commands::summarize::run(&focus, file.as_deref())
        }
        None => console::run_console(&settings).await,
    }
}
