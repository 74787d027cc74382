use crate::notify::{Notifier, PayoutNotice};
use crate::store::LedgerStore;
use ledger_core::error::{LedgerError, Result};
use ledger_core::model::{
    round2, Allocation, FundPlanId, InvestorId, RequestStatus, Transaction,
};
use ledger_core::profit;
use log::{info, warn};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

/// Summary returned to the operator after a single execution.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReceipt {
    pub allocation_id: Uuid,
    pub request_id: Uuid,
    pub units: f64,
    pub nav: f64,
    pub amount_invested: f64,
}

/// One failed item in a payout batch. The batch itself keeps going.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutFailure {
    pub allocation_id: Uuid,
    pub reason: String,
}

/// Outcome of one payout batch run.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutReport {
    pub percentage: f64,
    pub paid_count: usize,
    pub total_paid: f64,
    pub failures: Vec<PayoutFailure>,
    /// Eligible items left for the next run by the batch size cap.
    pub deferred: usize,
    pub completed_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub id: FundPlanId,
    pub name: String,
    pub nav: f64,
    pub aum: f64,
    pub investor_count: u32,
}

/// Point-in-time counts for the admin summary endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub investors: usize,
    pub pending_requests: usize,
    pub active_allocations: usize,
    pub transactions: usize,
    pub plans: Vec<PlanSummary>,
}

/// Orchestrates the two ledger operations over the record store: turning
/// approved requests into unit holdings, and distributing a percentage of
/// unrealized profit across eligible holdings.
pub struct Engine<S: LedgerStore> {
    store: S,
    notifier: Box<dyn Notifier>,
    batch_limit: Option<usize>,
}

impl<S: LedgerStore> Engine<S> {
    pub fn new(store: S, notifier: Box<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            batch_limit: None,
        }
    }

    /// Caps how many allocations a single payout run settles. Deferred
    /// items are safe to leave behind: the next run re-derives eligibility
    /// from the transaction history and picks them up.
    pub fn with_batch_limit(mut self, limit: Option<usize>) -> Self {
        self.batch_limit = limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Converts an approved investment request into a unit holding at the
    /// given NAV.
    ///
    /// Every failure path before the status flip leaves the store untouched,
    /// so a failed request stays pending and may be retried. The status flip
    /// itself is the concurrency guard: a raced retry fails there instead of
    /// creating a second allocation.
    pub fn execute_allocation(&mut self, request_id: Uuid, nav: f64) -> Result<AllocationReceipt> {
        if !nav.is_finite() || nav <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "NAV must be positive, got {}",
                nav
            )));
        }

        let request = self
            .store
            .request(request_id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found("investment request", request_id))?;

        if request.status() != RequestStatus::PendingExecution {
            return Err(LedgerError::Concurrency(format!(
                "request {} is not pending execution",
                request_id
            )));
        }

        let investor_id = request.investor_id().clone();
        let fund_plan_id = request.fund_plan_id().clone();
        let amount = request.amount();

        if self.store.investor(&investor_id).is_none() {
            return Err(LedgerError::not_found("investor", &investor_id));
        }
        if self.store.fund_plan(&fund_plan_id).is_none() {
            return Err(LedgerError::not_found("fund plan", &fund_plan_id));
        }
        if self.store.wallet(&investor_id).is_none() {
            return Err(LedgerError::not_found("wallet", &investor_id));
        }

        self.store
            .request_mut(request_id)
            .ok_or_else(|| LedgerError::not_found("investment request", request_id))?
            .mark_executed()?;

        let allocation = Allocation::open(&request, nav);
        let receipt = AllocationReceipt {
            allocation_id: allocation.id(),
            request_id,
            units: allocation.units(),
            nav,
            amount_invested: amount,
        };

        self.store.insert_transaction(Transaction::purchase(&allocation));
        self.store.insert_allocation(allocation);

        if let Some(wallet) = self.store.wallet_mut(&investor_id) {
            if wallet.locked() < amount {
                warn!(
                    "Wallet {} holds {:.2} locked but request {} needs {:.2}; clamping at zero",
                    investor_id,
                    wallet.locked(),
                    request_id,
                    amount
                );
            }
            wallet.debit_locked(amount);
        }

        self.refresh_aggregates(&investor_id, &fund_plan_id);

        info!(
            "Executed request {} for {}: {:.4} units @ NAV {:.4} ({:.2} invested)",
            request_id, investor_id, receipt.units, nav, amount
        );
        Ok(receipt)
    }

    /// Distributes `percentage` percent of each eligible allocation's
    /// distributable profit.
    ///
    /// The eligible set is materialized as a queue of independent work
    /// items. Each item re-derives the amount owed from the transaction
    /// history at settlement time, so re-running a batch (after a crash,
    /// or by accident) pays out the remainder instead of paying twice.
    pub fn run_payout_batch(
        &mut self,
        percentage: f64,
        notes: Option<String>,
    ) -> Result<PayoutReport> {
        if !percentage.is_finite() || !(1.0..=100.0).contains(&percentage) {
            return Err(LedgerError::Validation(format!(
                "payout percentage must be within 1-100, got {}",
                percentage
            )));
        }

        let eligible: Vec<Uuid> =
            profit::eligible_allocations(self.store.allocations(), self.store.transactions())
                .iter()
                .map(|a| a.id())
                .collect();

        let cap = self.batch_limit.unwrap_or(eligible.len());
        let deferred = eligible.len().saturating_sub(cap);
        let mut queue: VecDeque<Uuid> = eligible.into_iter().take(cap).collect();

        info!(
            "Payout batch started: {:.1}% across {} allocation(s){}",
            percentage,
            queue.len(),
            if deferred > 0 {
                format!(", {} deferred", deferred)
            } else {
                String::new()
            }
        );

        let mut report = PayoutReport {
            percentage,
            paid_count: 0,
            total_paid: 0.0,
            failures: Vec::new(),
            deferred,
            completed_at: 0,
        };

        while let Some(allocation_id) = queue.pop_front() {
            match self.settle_one(allocation_id, percentage, notes.as_deref()) {
                Ok(Some(paid)) => {
                    report.paid_count += 1;
                    report.total_paid += paid;
                }
                Ok(None) => {} // rounded to zero; nothing written
                Err(err) => {
                    warn!("Payout for allocation {} skipped: {}", allocation_id, err);
                    report.failures.push(PayoutFailure {
                        allocation_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report.total_paid = round2(report.total_paid);
        report.completed_at = chrono::Utc::now().timestamp_millis();
        info!(
            "Payout batch finished: {} paid, {:.2} distributed, {} failed",
            report.paid_count,
            report.total_paid,
            report.failures.len()
        );
        Ok(report)
    }

    /// Settles one allocation: recompute, then credit + record atomically,
    /// then best-effort notify.
    fn settle_one(
        &mut self,
        allocation_id: Uuid,
        percentage: f64,
        notes: Option<&str>,
    ) -> Result<Option<f64>> {
        let allocation = self
            .store
            .allocation(allocation_id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found("allocation", allocation_id))?;

        // Fresh read. Eligibility was decided when the queue was built, but
        // the amount owed is derived from the history as of now.
        let distributable = profit::distributable_profit(&allocation, self.store.transactions());
        let payout = round2(distributable * percentage / 100.0);
        if payout <= 0.0 {
            return Ok(None);
        }

        let investor_id = allocation.investor_id().clone();
        let tx = Transaction::profit_payout(&allocation, payout, notes.map(str::to_string));
        if let Err(err) = self.store.record_payout(&investor_id, payout, tx) {
            // Keep an audit trail of the attempt. Failed entries never count
            // toward paid profit.
            let failed =
                Transaction::profit_payout(&allocation, payout, notes.map(str::to_string)).failed();
            self.store.insert_transaction(failed);
            return Err(err);
        }

        let notice = PayoutNotice {
            investor_id,
            fund_plan_id: allocation.fund_plan_id().clone(),
            allocation_id,
            amount: payout,
            notes: notes.map(str::to_string),
        };
        if let Err(err) = self.notifier.payout_executed(&notice) {
            warn!(
                "Payout notification for allocation {} failed: {}",
                allocation_id, err
            );
        }

        Ok(Some(payout))
    }

    /// Applies an externally-sourced valuation to an allocation and
    /// refreshes the derived aggregates.
    pub fn apply_valuation(&mut self, allocation_id: Uuid, current_value: f64) -> Result<()> {
        if !current_value.is_finite() || current_value < 0.0 {
            return Err(LedgerError::Validation(format!(
                "current value must be non-negative, got {}",
                current_value
            )));
        }

        let (investor_id, fund_plan_id) = {
            let allocation = self
                .store
                .allocation_mut(allocation_id)
                .ok_or_else(|| LedgerError::not_found("allocation", allocation_id))?;
            allocation.revalue(current_value);
            (
                allocation.investor_id().clone(),
                allocation.fund_plan_id().clone(),
            )
        };

        self.refresh_aggregates(&investor_id, &fund_plan_id);
        Ok(())
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            investors: self.store.investors().len(),
            pending_requests: self.store.pending_requests().len(),
            active_allocations: self
                .store
                .allocations()
                .iter()
                .filter(|a| a.is_active())
                .count(),
            transactions: self.store.transactions().len(),
            plans: self
                .store
                .fund_plans()
                .iter()
                .map(|p| PlanSummary {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    nav: p.nav,
                    aum: p.aum,
                    investor_count: p.investor_count,
                })
                .collect(),
        }
    }

    /// Recomputes the touched investor's totals and the touched plan's
    /// AUM/investor count from the allocation records. Derived state is
    /// rebuilt from the records, never incremented in place.
    fn refresh_aggregates(&mut self, investor_id: &InvestorId, fund_plan_id: &FundPlanId) {
        let (invested, value, aum, holder_count) = {
            let mut invested = 0.0;
            let mut value = 0.0;
            let mut aum = 0.0;
            let mut holders: HashSet<&InvestorId> = HashSet::new();

            for allocation in self.store.allocations() {
                if !allocation.is_active() {
                    continue;
                }
                if allocation.investor_id() == investor_id {
                    invested += allocation.total_invested();
                    value += allocation.current_value();
                }
                if allocation.fund_plan_id() == fund_plan_id {
                    aum += allocation.current_value();
                    holders.insert(allocation.investor_id());
                }
            }
            (invested, value, aum, holders.len() as u32)
        };

        if let Some(investor) = self.store.investor_mut(investor_id) {
            investor.total_invested = invested;
            investor.current_value = value;
        }
        if let Some(plan) = self.store.fund_plan_mut(fund_plan_id) {
            plan.aum = aum;
            plan.investor_count = holder_count;
        }
    }
}

#[cfg(test)]
mod tests;
