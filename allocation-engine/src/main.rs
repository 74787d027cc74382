use allocation_engine::engine::Engine;
use allocation_engine::io::admin::{self, AdminState};
use allocation_engine::io::args::Args;
use allocation_engine::notify::LogNotifier;
use allocation_engine::settings::EngineSettings;
use allocation_engine::store::memory::MemoryStore;
use allocation_engine::store::snapshot;
use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut settings = EngineSettings::load(args.settings.as_deref())?;
    if let Some(port) = args.admin_port {
        settings.admin_port = port;
    }
    if let Some(path) = args.data_file {
        settings.data_file = path;
    }

    let store = match snapshot::load_snapshot(&settings.data_file) {
        Ok(store) => {
            info!("Loaded ledger snapshot from {}", settings.data_file.display());
            store
        }
        Err(e) => {
            warn!(
                "No usable snapshot at {} ({}); starting with an empty ledger",
                settings.data_file.display(),
                e
            );
            MemoryStore::default()
        }
    };

    let engine = Engine::new(store, Box::new(LogNotifier))
        .with_batch_limit(settings.payout.max_batch_size);

    let state = AdminState {
        engine: Arc::new(Mutex::new(engine)),
        data_file: settings.data_file.clone(),
    };
    admin::serve(state, settings.admin_port).await
}
