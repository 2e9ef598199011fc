use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weatherer")]
#[command(about = "Import weather observation exports into SQLite and report daily temperatures")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Config file path [default: <config dir>/weatherer/config.toml]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and schema if they do not exist
    Init,

    /// Import one or more observation files (one transaction per file)
    Import {
        #[arg(required = true, help = "Input CSV files, named <area>_<anything>")]
        files: Vec<PathBuf>,
    },

    /// Show the temperature series for a day
    Show {
        #[arg(help = "Date in YYYY/MM/DD format")]
        date: String,

        #[arg(long, default_value = "false", help = "Emit JSON instead of a text table")]
        json: bool,
    },

    /// List observations between two timestamps (inclusive)
    Range {
        #[arg(short, long, help = "Start, 'YYYY/MM/DD HH:MM:SS' in the source timezone")]
        start: String,

        #[arg(short, long, help = "End, 'YYYY/MM/DD HH:MM:SS' in the source timezone")]
        end: String,

        #[arg(long, default_value = "false", help = "Emit JSON instead of a text table")]
        json: bool,
    },
}
