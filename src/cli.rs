//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Motion Guard - classify pointer-movement sessions as human or bot
#[derive(Parser, Debug)]
#[command(name = "motion-guard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: $MOTION_GUARD_CONFIG or config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate synthetic human and bot sessions
    Generate {
        /// Output session file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        humans: Option<usize>,

        #[arg(long)]
        bots: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Extract the feature table from a session file
    Extract {
        /// Input session file
        #[arg(short, long)]
        sessions: Option<PathBuf>,

        /// Output CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Train and publish a model from a feature table
    Train {
        /// Input CSV
        #[arg(short, long)]
        features: Option<PathBuf>,

        /// Output model artifact
        #[arg(short, long)]
        model: Option<PathBuf>,

        #[arg(long)]
        test_fraction: Option<f64>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score a published model over a feature table
    Evaluate {
        #[arg(short, long)]
        features: Option<PathBuf>,

        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Classify trajectory files (point arrays or session records)
    Predict {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Per-class feature statistics of a feature table
    Summary {
        #[arg(short, long)]
        features: Option<PathBuf>,
    },
}
