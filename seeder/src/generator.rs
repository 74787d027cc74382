use crate::args::Args;
use crate::error::{Result, SeedError};
use allocation_engine::engine::Engine;
use allocation_engine::notify::LogNotifier;
use allocation_engine::store::memory::MemoryStore;
use allocation_engine::store::LedgerStore;
use ledger_core::model::{
    round2, FundPlan, FundPlanId, InvestmentRequest, Investor, InvestorId, WalletAccount,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

const INVESTOR_NAMES: &[&str] = &[
    "Asha Verma", "Liam Okafor", "Mei Tanaka", "Jonas Weber", "Priya Nair", "Tomas Silva",
    "Nadia Haddad", "Erik Lund",
];

const PLAN_NAMES: &[&str] = &[
    "Steady Growth", "Blue Horizon", "Momentum Alpha", "Harbor Income", "Summit Equity",
];

fn amount_between(rng: &mut StdRng, min: f64, max: f64) -> f64 {
    if max > min {
        round2(rng.random_range(min..max))
    } else {
        min
    }
}

/// Builds a fixture ledger: funded investors, priced plans, pending
/// requests, and pre-executed allocations valued above cost.
///
/// Executions run through the real engine so the purchase transactions and
/// aggregate totals come out exactly as production writes them.
pub fn generate(args: &Args) -> Result<MemoryStore> {
    if args.investors == 0 || args.plans == 0 {
        return Err(SeedError::InvalidParams(
            "need at least one investor and one plan".into(),
        ));
    }
    if args.min_amount <= 0.0 || args.max_amount < args.min_amount {
        return Err(SeedError::InvalidParams(format!(
            "bad amount range {:.2}..{:.2}",
            args.min_amount, args.max_amount
        )));
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut store = MemoryStore::default();

    let mut plans: Vec<(FundPlanId, f64)> = Vec::new();
    for i in 0..args.plans {
        let id = FundPlanId::new(format!("plan-{:03}", i + 1));
        let nav = amount_between(&mut rng, 8.0, 40.0);
        let name = format!("{} Fund", PLAN_NAMES[i % PLAN_NAMES.len()]);
        store.insert_fund_plan(FundPlan::new(id.clone(), name, nav));
        plans.push((id, nav));
    }

    // (request, nav, markup on invested amount) executed after seeding.
    let mut to_execute: Vec<(Uuid, f64, f64)> = Vec::new();

    let items_per_investor = args.requests_per_investor + args.allocations_per_investor;
    for i in 0..args.investors {
        let investor = InvestorId::new(format!("inv-{:04}", i + 1));
        let name = INVESTOR_NAMES[i % INVESTOR_NAMES.len()];
        store.insert_investor(Investor::new(investor.clone(), name));

        let mut wallet = WalletAccount::new();
        wallet.deposit(round2(args.max_amount * items_per_investor as f64 * 1.25));
        store.insert_wallet(investor.clone(), wallet);

        for n in 0..items_per_investor {
            let (plan_id, nav) = plans[(i + n) % plans.len()].clone();
            let amount = amount_between(&mut rng, args.min_amount, args.max_amount);

            let wallet = store
                .wallet_mut(&investor)
                .expect("wallet was just inserted");
            wallet.lock(amount);

            let request = InvestmentRequest::new(investor.clone(), plan_id, amount);
            if n >= args.requests_per_investor {
                let markup = rng.random_range(1.02..1.35);
                to_execute.push((request.id(), nav, markup));
            }
            store.insert_request(request);
        }
    }

    let mut engine = Engine::new(store, Box::new(LogNotifier));
    for (request_id, nav, markup) in to_execute {
        let receipt = engine.execute_allocation(request_id, nav)?;
        let value = round2(receipt.amount_invested * markup);
        engine.apply_valuation(receipt.allocation_id, value)?;
    }

    Ok(engine.into_store())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn small_args() -> Args {
        Args {
            investors: 2,
            plans: 1,
            requests_per_investor: 1,
            allocations_per_investor: 1,
            min_amount: 10_000.0,
            max_amount: 20_000.0,
            seed: 7,
            out: PathBuf::from("unused.json"),
            force: false,
        }
    }

    #[test]
    fn test_fixture_shape() {
        let store = generate(&small_args()).unwrap();

        assert_eq!(store.investors().len(), 2);
        assert_eq!(store.fund_plans().len(), 1);
        assert_eq!(store.pending_requests().len(), 2);
        assert_eq!(store.allocations().len(), 2);
        // One purchase per executed allocation.
        assert_eq!(store.transactions().len(), 2);

        // Every pre-executed allocation carries distributable profit.
        for allocation in store.allocations() {
            assert!(allocation.current_value() > allocation.total_invested());
        }

        let plan = store.fund_plan(&FundPlanId::new("plan-001")).unwrap();
        assert!(plan.aum > 0.0);
        assert_eq!(plan.investor_count, 2);
    }

    #[test]
    fn test_amount_streams_are_reproducible() {
        let a = generate(&small_args()).unwrap();
        let b = generate(&small_args()).unwrap();

        let amounts = |store: &MemoryStore| {
            let mut v: Vec<f64> = store.allocations().iter().map(|x| x.total_invested()).collect();
            v.sort_by(|x, y| x.partial_cmp(y).unwrap());
            v
        };
        assert_eq!(amounts(&a), amounts(&b));
    }

    #[test]
    fn test_rejects_bad_amount_range() {
        let mut args = small_args();
        args.min_amount = 0.0;
        assert!(matches!(
            generate(&args),
            Err(SeedError::InvalidParams(_))
        ));

        let mut args = small_args();
        args.max_amount = 5_000.0;
        assert!(matches!(
            generate(&args),
            Err(SeedError::InvalidParams(_))
        ));
    }
}
