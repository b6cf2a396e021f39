//! Main CLI parser and top-level argument handling.

use clap::{Parser, Subcommand};

/// Command-line interface definition for the gantry gateway.
#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "AI orchestration gateway for construction project analysis")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to listen on (overrides GANTRY_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Dispatch mode: pre-dispatch or post-dispatch
        #[arg(long)]
        mode: Option<String>,
    },

    /// Show which backend services a query would route to
    Classify {
        /// The query to classify
        query: String,
    },
}
