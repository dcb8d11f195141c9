use crate::types::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tracescope")]
#[command(about = "Browse function-tracer event logs with on-demand symbolication", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to $TRACESCOPE_PATH, then the XDG config dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Config file (defaults to <data dir>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "info", global = true)]
    pub log_level: LogLevel,

    /// Log file for `view` (defaults to <data dir>/tracescope.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive event panel
    View {
        /// JSONL event log
        events: PathBuf,

        /// nm-style symbol table used to resolve addresses
        #[arg(long)]
        symbols: Option<PathBuf>,

        /// Reload the log whenever it changes on disk
        #[arg(long)]
        follow: bool,
    },

    /// Print the grouped event list as plain text
    Dump {
        events: PathBuf,

        /// Expand the detail of this event index
        #[arg(long)]
        select: Option<usize>,

        /// nm-style symbol table used for the expanded detail
        #[arg(long)]
        symbols: Option<PathBuf>,

        /// Disable colored output even on a terminal
        #[arg(long)]
        no_color: bool,
    },

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}
