use super::allocation::Allocation;
use super::ids::{FundPlanId, InvestorId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    ProfitPayout,
    Redemption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Failed,
}

/// Immutable ledger entry.
///
/// Once recorded as `Completed` an entry is never mutated or deleted; the
/// transaction history is the system of record for what has already been
/// paid. There are constructors per kind and no setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    investor_id: InvestorId,
    fund_plan_id: FundPlanId,
    allocation_id: Uuid,
    kind: TransactionKind,
    amount: f64,
    units: Option<f64>,
    nav: Option<f64>,
    status: TransactionStatus,
    notes: Option<String>,
    timestamp: i64,
}

impl Transaction {
    /// Records the conversion of invested cash into units.
    pub fn purchase(allocation: &Allocation) -> Self {
        Self {
            id: Uuid::new_v4(),
            investor_id: allocation.investor_id().clone(),
            fund_plan_id: allocation.fund_plan_id().clone(),
            allocation_id: allocation.id(),
            kind: TransactionKind::Purchase,
            amount: allocation.total_invested(),
            units: Some(allocation.units()),
            nav: Some(allocation.nav_at_creation()),
            status: TransactionStatus::Completed,
            notes: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Records a profit distribution against an allocation.
    pub fn profit_payout(allocation: &Allocation, amount: f64, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            investor_id: allocation.investor_id().clone(),
            fund_plan_id: allocation.fund_plan_id().clone(),
            allocation_id: allocation.id(),
            kind: TransactionKind::ProfitPayout,
            amount,
            units: None,
            nav: None,
            status: TransactionStatus::Completed,
            notes,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Downgrades a not-yet-recorded entry to `Failed`, for audit trails of
    /// attempts whose financial write did not go through. Failed entries
    /// never count toward paid profit.
    pub fn failed(mut self) -> Self {
        self.status = TransactionStatus::Failed;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn investor_id(&self) -> &InvestorId {
        &self.investor_id
    }

    pub fn fund_plan_id(&self) -> &FundPlanId {
        &self.fund_plan_id
    }

    pub fn allocation_id(&self) -> Uuid {
        self.allocation_id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn units(&self) -> Option<f64> {
        self.units
    }

    pub fn nav(&self) -> Option<f64> {
        self.nav
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}
