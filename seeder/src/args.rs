use clap::Parser;
use std::path::PathBuf;

/// Fixture seeder for the fund allocation ledger.
///
/// Writes a snapshot file the allocation engine loads at startup, keeping
/// sample-data generation out of the ledger service itself.
#[derive(Parser, Debug)]
#[command(name = "seeder")]
#[command(about = "Generate ledger fixture snapshots", long_about = None)]
pub struct Args {
    /// Number of investors to create (each with a funded wallet)
    #[arg(long, default_value_t = 8)]
    pub investors: usize,

    /// Number of fund plans
    #[arg(long, default_value_t = 3)]
    pub plans: usize,

    /// Pending investment requests per investor
    #[arg(long, default_value_t = 1)]
    pub requests_per_investor: usize,

    /// Pre-executed allocations per investor, valued above cost so payout
    /// runs have profit to distribute
    #[arg(long, default_value_t = 1)]
    pub allocations_per_investor: usize,

    /// Smallest request amount
    #[arg(long, default_value_t = 50_000.0)]
    pub min_amount: f64,

    /// Largest request amount
    #[arg(long, default_value_t = 250_000.0)]
    pub max_amount: f64,

    /// RNG seed for reproducible amount streams
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Snapshot output path
    #[arg(long, default_value = "ledger-data.json")]
    pub out: PathBuf,

    /// Overwrite an existing snapshot
    #[arg(long, default_value_t = false)]
    pub force: bool,
}
