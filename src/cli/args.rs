//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Browse and edit a hierarchy of labeled items in memory
#[derive(Parser, Debug)]
#[command(name = "querytree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Seed file with the starting hierarchy (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub seed: Option<PathBuf>,

    /// Config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the canonical tree
    Show,

    /// Print the flattened rows with depth and expandability
    Flat,

    /// Apply operations in order, then print the tree
    ///
    /// Operations: "insert <parent> <label>", "subfolder <parent> [label]",
    /// "rename <id> <label>", "move <id> up|down", "delete <id>"
    Run {
        /// Operations, one per argument
        #[arg(required = true)]
        ops: Vec<String>,

        /// Print flattened rows instead of the tree
        #[arg(long)]
        flat: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Write config template to the global config path
    Init,

    /// Show config paths
    Path,
}
