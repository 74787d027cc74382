use clap::Parser;
use log::info;

pub mod args;
pub mod error;
pub mod generator;

use allocation_engine::store::{snapshot, LedgerStore};
use args::Args;
use error::{Result, SeedError};

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    if args.out.exists() && !args.force {
        return Err(SeedError::SnapshotExists(args.out.clone()));
    }

    info!(
        "Seeding {} investor(s) across {} plan(s)...",
        args.investors, args.plans
    );
    let store = generator::generate(&args)?;

    snapshot::save_snapshot(&args.out, &store)?;

    info!("Fixture snapshot written to {}", args.out.display());
    info!(
        "Pending requests: {}, allocations: {}, transactions: {}",
        store.pending_requests().len(),
        store.allocations().len(),
        store.transactions().len()
    );
    Ok(())
}
