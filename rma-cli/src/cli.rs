use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rma", about = "Customer return and refund policy assistant", version)]
pub struct Cli {
    /// Enable verbose output (debug-level logging).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Without a subcommand, starts the interactive query session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest policy documents into the vector index.
    Ingest {
        /// Delete the existing collection before ingesting.
        #[arg(long)]
        reingest: bool,
    },

    /// Search the policy index and print the matching passages.
    Query {
        /// The question to search for.
        text: String,
        /// Number of passages to return.
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Include relevance scores in the output.
        #[arg(long)]
        scores: bool,
    },

    /// Print statistics for the policy collection.
    Stats,

    /// Check whether a purchase is still eligible for return.
    Check {
        /// Purchase date in YYYY-MM-DD format.
        purchase_date: String,
        /// Product category (general, electronics, clothing, food, perishables).
        #[arg(short, long, default_value = "general")]
        category: String,
        /// Evaluate as of this date instead of today (YYYY-MM-DD).
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Extract the key points of a policy document.
    Summarize {
        /// Focus area: timeframes, requirements, process, or general.
        #[arg(short, long, default_value = "general")]
        focus: String,
        /// Read the policy text from this file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}
