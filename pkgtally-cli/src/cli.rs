//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// pkgtally -- host and container package inventory.
///
/// Use `pkgtally <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "pkgtally", version, about, long_about = None)]
pub struct Cli {
    /// Path to the pkgtally.toml configuration file.
    #[arg(short, long, default_value = "pkgtally.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the host and running containers for installed packages.
    Scan(ScanArgs),

    /// List running containers visible to the configured runtime.
    Containers,

    /// List supported package database formats.
    Formats,
}

// ---- scan ----

/// Run a one-shot package inventory scan.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Scan only the local host, skipping containers.
    #[arg(long, conflicts_with = "containers_only")]
    pub host_only: bool,

    /// Scan only containers, skipping the local host.
    #[arg(long)]
    pub containers_only: bool,

    /// Hostname recorded in the report (default: $HOSTNAME).
    #[arg(long)]
    pub hostname: Option<String>,

    /// Restrict the scan to one package manager (apk, deb).
    #[arg(long, value_name = "MANAGER")]
    pub manager: Option<String>,
}
