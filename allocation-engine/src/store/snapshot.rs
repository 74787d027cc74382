use super::memory::MemoryStore;
use ledger_core::error::Result;
use std::io::Write;
use std::path::Path;

/// Saves the store to a JSON snapshot atomically.
///
/// Writes to a temporary file in the same directory first, fsyncs it, and
/// renames it over the target so a crash mid-write never leaves a torn
/// snapshot behind.
pub fn save_snapshot(path: &Path, store: &MemoryStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(store)?;

    let temp_path = path.with_extension("tmp");
    let mut temp_file = std::fs::File::create(&temp_path)?;
    temp_file.write_all(json.as_bytes())?;
    temp_file.sync_all()?;

    std::fs::rename(&temp_path, path)?;
    Ok(())
}

/// Loads a store snapshot from disk.
///
/// Fails if the file is missing or unreadable; callers decide whether a
/// missing snapshot means "start empty" or is an error.
pub fn load_snapshot(path: &Path) -> Result<MemoryStore> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let store = serde_json::from_reader(reader)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LedgerStore;
    use ledger_core::model::{FundPlan, FundPlanId, Investor, InvestorId, WalletAccount};
    use uuid::Uuid;

    #[test]
    fn test_snapshot_round_trip() {
        let mut store = MemoryStore::default();
        store.insert_investor(Investor::new(InvestorId::new("inv-1"), "Asha"));
        store.insert_fund_plan(FundPlan::new(FundPlanId::new("growth"), "Growth Fund", 12.5));
        let mut wallet = WalletAccount::new();
        wallet.deposit(5_000.0);
        store.insert_wallet(InvestorId::new("inv-1"), wallet);

        let path = std::env::temp_dir().join(format!("ledger-snap-{}.json", Uuid::new_v4()));
        save_snapshot(&path, &store).unwrap();

        let restored = load_snapshot(&path).unwrap();
        assert!(restored.investor(&InvestorId::new("inv-1")).is_some());
        assert_eq!(
            restored.wallet(&InvestorId::new("inv-1")).unwrap().available(),
            5_000.0
        );
        assert_eq!(restored.fund_plans().len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_snapshot_errors() {
        let path = std::env::temp_dir().join(format!("ledger-snap-{}.json", Uuid::new_v4()));
        assert!(load_snapshot(&path).is_err());
    }
}
