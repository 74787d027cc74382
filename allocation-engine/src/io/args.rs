use clap::Parser;
use std::path::PathBuf;

/// Operator entrypoint for the fund allocation ledger service.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML settings file (defaults to ./ledger.toml when present)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Override the admin HTTP port from settings
    #[arg(long)]
    pub admin_port: Option<u16>,

    /// Override the snapshot file from settings
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}
