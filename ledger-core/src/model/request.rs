use super::ids::{FundPlanId, InvestorId};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    PendingExecution,
    Executed,
}

/// An approved investment awaiting conversion into a unit holding.
///
/// The status moves to `Executed` exactly once; a request that fails
/// execution stays `PendingExecution` and may be retried safely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentRequest {
    id: Uuid,
    investor_id: InvestorId,
    fund_plan_id: FundPlanId,
    amount: f64,
    status: RequestStatus,
    created_at: i64,
}

impl InvestmentRequest {
    pub fn new(investor_id: InvestorId, fund_plan_id: FundPlanId, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            investor_id,
            fund_plan_id,
            amount,
            status: RequestStatus::PendingExecution,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
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

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::PendingExecution
    }

    /// Compare-and-set to `Executed`.
    ///
    /// This is the sole concurrency control point for execution: a request
    /// that is no longer pending loses the race here, and the caller must
    /// not create an allocation for it.
    pub fn mark_executed(&mut self) -> Result<()> {
        if self.status != RequestStatus::PendingExecution {
            return Err(LedgerError::Concurrency(format!(
                "request {} has already been executed",
                self.id
            )));
        }
        self.status = RequestStatus::Executed;
        Ok(())
    }
}
