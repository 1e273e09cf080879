//! Splat PLY CLI
//!
//! Inspect Gaussian splat PLY headers and dump decoded GPU buffers.
//!
//! Features:
//! - Header summary as text or JSON
//! - Decode with log/logit overrides and a JSON options file
//! - Raw center, covariance and RGBA blobs for upload tests

mod commands;
mod error;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use error::CliError;

/// Splat PLY - Gaussian splat PLY inspector and decoder
#[derive(Parser, Debug)]
#[command(name = "splat-ply")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the header of a PLY file
    Inspect {
        file: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Decode splats and optionally write raw buffers
    Decode(commands::DecodeArgs),
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    let result = match args.command {
        Command::Inspect { file, json } => commands::inspect(&file, json),
        Command::Decode(decode) => commands::decode(&decode),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
