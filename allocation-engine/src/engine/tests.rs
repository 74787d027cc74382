use super::*;
use crate::notify::{LogNotifier, Notifier, PayoutNotice};
use crate::store::memory::MemoryStore;
use ledger_core::model::{
    Allocation, FundPlan, FundPlanId, InvestmentRequest, Investor, InvestorId, RequestStatus,
    TransactionKind, TransactionStatus, WalletAccount,
};

struct FailingNotifier;
impl Notifier for FailingNotifier {
    fn payout_executed(&mut self, _: &PayoutNotice) -> ledger_core::error::Result<()> {
        Err(LedgerError::ExternalService("smtp unreachable".into()))
    }
}

fn investor_id() -> InvestorId {
    InvestorId::new("inv-1")
}

fn plan_id() -> FundPlanId {
    FundPlanId::new("growth")
}

fn base_store() -> MemoryStore {
    let mut store = MemoryStore::default();
    store.insert_fund_plan(FundPlan::new(plan_id(), "Growth Fund", 10.0));
    store
}

/// Investor with `amount` fully locked and a pending request over it.
fn add_funded_investor(store: &mut MemoryStore, id: &str, amount: f64) -> Uuid {
    let investor = InvestorId::new(id);
    store.insert_investor(Investor::new(investor.clone(), id));
    let mut wallet = WalletAccount::new();
    wallet.deposit(amount);
    wallet.lock(amount);
    store.insert_wallet(investor.clone(), wallet);
    let request = InvestmentRequest::new(investor, plan_id(), amount);
    let request_id = request.id();
    store.insert_request(request);
    request_id
}

fn seeded_engine(amount: f64) -> (Engine<MemoryStore>, Uuid) {
    let mut store = base_store();
    let request_id = add_funded_investor(&mut store, "inv-1", amount);
    (Engine::new(store, Box::new(LogNotifier)), request_id)
}

#[test]
fn test_execute_converts_request_into_units() {
    let (mut engine, request_id) = seeded_engine(200_000.0);

    let receipt = engine.execute_allocation(request_id, 12.5).unwrap();
    assert!((receipt.units - 16_000.0).abs() < 1e-6);

    let store = engine.store();
    assert_eq!(store.allocations().len(), 1);
    let allocation = &store.allocations()[0];
    assert_eq!(allocation.total_invested(), 200_000.0);
    assert_eq!(allocation.current_value(), 200_000.0);
    assert!(allocation.is_active());

    assert_eq!(store.transactions().len(), 1);
    let purchase = &store.transactions()[0];
    assert_eq!(purchase.kind(), TransactionKind::Purchase);
    assert_eq!(purchase.allocation_id(), allocation.id());
    assert_eq!(purchase.nav(), Some(12.5));

    assert_eq!(store.wallet(&investor_id()).unwrap().locked(), 0.0);
    assert_eq!(
        store.request(request_id).unwrap().status(),
        RequestStatus::Executed
    );

    assert_eq!(store.investor(&investor_id()).unwrap().total_invested, 200_000.0);
    let plan = store.fund_plan(&plan_id()).unwrap();
    assert_eq!(plan.aum, 200_000.0);
    assert_eq!(plan.investor_count, 1);
}

#[test]
fn test_execute_rejects_non_positive_nav() {
    let (mut engine, request_id) = seeded_engine(50_000.0);

    for nav in [0.0, -5.0] {
        let err = engine.execute_allocation(request_id, nav).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    // No side effects: everything is retryable.
    let store = engine.store();
    assert!(store.allocations().is_empty());
    assert!(store.transactions().is_empty());
    assert_eq!(store.wallet(&investor_id()).unwrap().locked(), 50_000.0);
    assert!(store.request(request_id).unwrap().is_pending());
}

#[test]
fn test_execute_is_exactly_once() {
    let (mut engine, request_id) = seeded_engine(80_000.0);

    engine.execute_allocation(request_id, 10.0).unwrap();
    let err = engine.execute_allocation(request_id, 10.0).unwrap_err();
    assert!(matches!(err, LedgerError::Concurrency(_)));

    assert_eq!(engine.store().allocations().len(), 1);
    assert_eq!(engine.store().transactions().len(), 1);
}

#[test]
fn test_execute_without_wallet_is_retryable() {
    let mut store = base_store();
    let investor = investor_id();
    store.insert_investor(Investor::new(investor.clone(), "Asha"));
    let request = InvestmentRequest::new(investor.clone(), plan_id(), 10_000.0);
    let request_id = request.id();
    store.insert_request(request);
    let mut engine = Engine::new(store, Box::new(LogNotifier));

    let err = engine.execute_allocation(request_id, 10.0).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
    assert!(engine.store().request(request_id).unwrap().is_pending());

    // The wallet turns up; the same request now goes through.
    let mut wallet = WalletAccount::new();
    wallet.deposit(10_000.0);
    wallet.lock(10_000.0);
    engine.store_mut().insert_wallet(investor, wallet);
    engine.execute_allocation(request_id, 10.0).unwrap();
    assert_eq!(engine.store().allocations().len(), 1);
}

#[test]
fn test_short_locked_balance_clamps_to_zero() {
    let mut store = base_store();
    let investor = investor_id();
    store.insert_investor(Investor::new(investor.clone(), "Asha"));
    let mut wallet = WalletAccount::new();
    wallet.deposit(30_000.0);
    wallet.lock(30_000.0); // request wants more than is locked
    store.insert_wallet(investor.clone(), wallet);
    let request = InvestmentRequest::new(investor.clone(), plan_id(), 50_000.0);
    let request_id = request.id();
    store.insert_request(request);

    let mut engine = Engine::new(store, Box::new(LogNotifier));
    engine.execute_allocation(request_id, 10.0).unwrap();

    assert_eq!(engine.store().wallet(&investor).unwrap().locked(), 0.0);
    assert_eq!(engine.store().allocations().len(), 1);
}

#[test]
fn test_payout_recomputes_from_history() {
    let (mut engine, request_id) = seeded_engine(200_000.0);
    let receipt = engine.execute_allocation(request_id, 12.5).unwrap();
    engine.apply_valuation(receipt.allocation_id, 230_000.0).unwrap();

    let report = engine.run_payout_batch(10.0, Some("monthly run".into())).unwrap();
    assert_eq!(report.paid_count, 1);
    assert_eq!(report.total_paid, 3_000.0);
    assert!(report.failures.is_empty());
    assert_eq!(engine.store().wallet(&investor_id()).unwrap().available(), 3_000.0);

    let allocation = engine.store().allocation(receipt.allocation_id).unwrap();
    assert_eq!(
        profit::distributable_profit(allocation, engine.store().transactions()),
        27_000.0
    );

    // A second run distributes 10% of what is left, not of the original.
    let report = engine.run_payout_batch(10.0, None).unwrap();
    assert_eq!(report.total_paid, 2_700.0);
    assert_eq!(engine.store().wallet(&investor_id()).unwrap().available(), 5_700.0);
}

#[test]
fn test_payout_rejects_out_of_range_percentage() {
    let (mut engine, request_id) = seeded_engine(100_000.0);
    let receipt = engine.execute_allocation(request_id, 10.0).unwrap();
    engine.apply_valuation(receipt.allocation_id, 120_000.0).unwrap();

    for pct in [0.0, 0.5, 101.0, -10.0] {
        let err = engine.run_payout_batch(pct, None).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
    // Nothing was written.
    assert_eq!(engine.store().transactions().len(), 1);
    assert_eq!(engine.store().wallet(&investor_id()).unwrap().available(), 0.0);
}

#[test]
fn test_batch_isolation_on_missing_wallet() {
    let (mut engine, request_id) = seeded_engine(100_000.0);
    let receipt = engine.execute_allocation(request_id, 10.0).unwrap();
    engine.apply_valuation(receipt.allocation_id, 110_000.0).unwrap();

    // A second holding whose wallet has vanished upstream.
    let ghost = InvestorId::new("inv-ghost");
    let orphan_request = InvestmentRequest::new(ghost, plan_id(), 50_000.0);
    let mut orphan = Allocation::open(&orphan_request, 10.0);
    orphan.revalue(60_000.0);
    let orphan_id = orphan.id();
    engine.store_mut().insert_allocation(orphan);

    let report = engine.run_payout_batch(10.0, None).unwrap();

    assert_eq!(report.paid_count, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].allocation_id, orphan_id);
    // The healthy investor was still paid.
    assert_eq!(engine.store().wallet(&investor_id()).unwrap().available(), 1_000.0);
    // The failed attempt is on record and never counts as paid.
    assert!(engine
        .store()
        .transactions()
        .iter()
        .any(|tx| tx.status() == TransactionStatus::Failed));
    let orphan = engine.store().allocation(orphan_id).unwrap();
    assert_eq!(
        profit::distributable_profit(orphan, engine.store().transactions()),
        10_000.0
    );
}

#[test]
fn test_notifier_failure_never_rolls_back_the_payout() {
    let mut store = base_store();
    let request_id = add_funded_investor(&mut store, "inv-1", 100_000.0);
    let mut engine = Engine::new(store, Box::new(FailingNotifier));

    let receipt = engine.execute_allocation(request_id, 10.0).unwrap();
    engine.apply_valuation(receipt.allocation_id, 110_000.0).unwrap();

    let report = engine.run_payout_batch(10.0, None).unwrap();
    assert_eq!(report.paid_count, 1);
    assert!(report.failures.is_empty());
    assert_eq!(engine.store().wallet(&investor_id()).unwrap().available(), 1_000.0);
    assert!(engine
        .store()
        .transactions()
        .iter()
        .any(|tx| tx.kind() == TransactionKind::ProfitPayout && tx.is_completed()));
}

#[test]
fn test_batch_limit_defers_items_to_the_next_run() {
    let mut store = base_store();
    let requests = [
        add_funded_investor(&mut store, "inv-1", 10_000.0),
        add_funded_investor(&mut store, "inv-2", 10_000.0),
        add_funded_investor(&mut store, "inv-3", 10_000.0),
    ];
    let mut engine = Engine::new(store, Box::new(LogNotifier)).with_batch_limit(Some(2));
    for request_id in requests {
        let receipt = engine.execute_allocation(request_id, 10.0).unwrap();
        engine.apply_valuation(receipt.allocation_id, 11_000.0).unwrap();
    }

    // Full distribution drains each settled item, so the deferred one is
    // exactly what the next run finds eligible.
    let report = engine.run_payout_batch(100.0, None).unwrap();
    assert_eq!(report.paid_count, 2);
    assert_eq!(report.deferred, 1);
    assert_eq!(report.total_paid, 2_000.0);

    let report = engine.run_payout_batch(100.0, None).unwrap();
    assert_eq!(report.paid_count, 1);
    assert_eq!(report.deferred, 0);
    assert_eq!(report.total_paid, 1_000.0);
}

#[test]
fn test_devalued_allocation_pays_nothing_more() {
    let (mut engine, request_id) = seeded_engine(200_000.0);
    let receipt = engine.execute_allocation(request_id, 10.0).unwrap();
    engine.apply_valuation(receipt.allocation_id, 230_000.0).unwrap();

    let report = engine.run_payout_batch(100.0, None).unwrap();
    assert_eq!(report.total_paid, 30_000.0);

    // Valuation falls back below the paid watermark.
    engine.apply_valuation(receipt.allocation_id, 210_000.0).unwrap();
    let tx_count = engine.store().transactions().len();

    let report = engine.run_payout_batch(10.0, None).unwrap();
    assert_eq!(report.paid_count, 0);
    assert!(report.failures.is_empty());
    assert_eq!(engine.store().transactions().len(), tx_count);
}

#[test]
fn test_payout_reduction_is_proportional_within_rounding() {
    let (mut engine, request_id) = seeded_engine(10_000.0);
    let receipt = engine.execute_allocation(request_id, 10.0).unwrap();
    engine.apply_valuation(receipt.allocation_id, 11_000.33).unwrap();

    let allocation = engine.store().allocation(receipt.allocation_id).unwrap();
    let before = profit::distributable_profit(allocation, engine.store().transactions());

    engine.run_payout_batch(33.0, None).unwrap();

    let allocation = engine.store().allocation(receipt.allocation_id).unwrap();
    let after = profit::distributable_profit(allocation, engine.store().transactions());
    assert!(after >= 0.0);
    assert!(
        (after - before * 0.67).abs() < 0.02,
        "expected ~{:.4}, got {:.4}",
        before * 0.67,
        after
    );
}

#[test]
fn test_summary_reflects_ledger_state() {
    let (mut engine, request_id) = seeded_engine(100_000.0);
    let receipt = engine.execute_allocation(request_id, 10.0).unwrap();
    engine.apply_valuation(receipt.allocation_id, 115_000.0).unwrap();

    let summary = engine.summary();
    assert_eq!(summary.investors, 1);
    assert_eq!(summary.pending_requests, 0);
    assert_eq!(summary.active_allocations, 1);
    assert_eq!(summary.transactions, 1);
    assert_eq!(summary.plans.len(), 1);
    assert_eq!(summary.plans[0].aum, 115_000.0);
}
