//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// OpenAgent - conversational agent with tiered memory
#[derive(Parser, Debug)]
#[command(name = "openagent")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive conversation
    Chat(ChatArgs),

    /// Print the memory context stored in a state file
    Context(ContextArgs),

    /// List or search built-in skills
    Skills {
        /// Only list skills in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Search names and descriptions
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show version
    Version,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Agent name (overrides config)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Initial task recorded in mid-term memory
    #[arg(short, long, default_value = "Chat with the user")]
    pub task: String,

    /// Identity prompt recorded in long-term memory
    #[arg(
        short,
        long,
        default_value = "You are a helpful AI assistant focused on getting tasks done."
    )]
    pub system: String,

    /// Memory state file: restored on start, saved on exit
    #[arg(long, env = "OPENAGENT_STATE")]
    pub state: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Memory state file written by `openagent chat --state`
    #[arg(long, env = "OPENAGENT_STATE")]
    pub state: PathBuf,

    /// Show the compact per-turn view instead of the full context
    #[arg(short, long)]
    pub compact: bool,

    /// Leave out short-term memory from the full context
    #[arg(long, conflicts_with = "compact")]
    pub no_short: bool,

    /// Show a single tier: long_term, mid_term or short_term
    #[arg(long, conflicts_with_all = ["compact", "no_short"])]
    pub tier: Option<String>,

    /// With --tier, show only the most recent N entries
    #[arg(short, long, requires = "tier")]
    pub limit: Option<usize>,
}
