//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Organigram builder: reporting lines from CSV as sunburst page and dendrogram
#[derive(Parser, Debug)]
#[command(name = "organigram")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file (default: ./.organigram.toml if present)
    #[arg(short, long, global = true, env = "ORGANIGRAM_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the sunburst page over HTTP
    Serve {
        /// Input CSV (default: input.path from config)
        #[arg(value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write the dendrogram diagram as SVG
    Dendrogram {
        /// Input CSV (default: input.path from config)
        #[arg(value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,
        /// Output file (default: render.output from config)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Open the diagram in the default viewer
        #[arg(long)]
        open: bool,
    },

    /// Write the sunburst page as a static HTML file
    Sunburst {
        /// Input CSV (default: input.path from config)
        #[arg(value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show hierarchy as tree
    Tree {
        /// Input CSV (default: input.path from config)
        #[arg(value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,
    },

    /// Print dendrogram coordinates
    Layout {
        /// Input CSV (default: input.path from config)
        #[arg(value_hint = ValueHint::FilePath)]
        csv: Option<PathBuf>,
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

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
