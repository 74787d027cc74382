use super::ids::{FundPlanId, InvestorId};
use super::request::InvestmentRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    Active,
    Closed,
}

/// One discrete investment event: units bought at a fixed NAV.
///
/// An investor/plan pair may hold any number of concurrent active
/// allocations; the aggregate position view is derived from these records
/// and never authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    id: Uuid,
    investor_id: InvestorId,
    fund_plan_id: FundPlanId,
    units: f64,
    nav_at_creation: f64,
    total_invested: f64,
    current_value: f64,
    status: AllocationStatus,
    created_at: i64,
    request_id: Uuid,
}

impl Allocation {
    /// Opens a holding for an approved request at the given NAV.
    ///
    /// `units = amount / nav`. The current value starts at the invested
    /// amount and moves only when an external valuation is applied.
    pub fn open(request: &InvestmentRequest, nav: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            investor_id: request.investor_id().clone(),
            fund_plan_id: request.fund_plan_id().clone(),
            units: request.amount() / nav,
            nav_at_creation: nav,
            total_invested: request.amount(),
            current_value: request.amount(),
            status: AllocationStatus::Active,
            created_at: chrono::Utc::now().timestamp_millis(),
            request_id: request.id(),
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

    pub fn units(&self) -> f64 {
        self.units
    }

    pub fn nav_at_creation(&self) -> f64 {
        self.nav_at_creation
    }

    pub fn total_invested(&self) -> f64 {
        self.total_invested
    }

    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    pub fn status(&self) -> AllocationStatus {
        self.status
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn is_active(&self) -> bool {
        self.status == AllocationStatus::Active
    }

    /// Applies an externally-sourced valuation. Values never go below zero.
    pub fn revalue(&mut self, value: f64) {
        self.current_value = value.max(0.0);
    }

    /// Marks the holding closed after full redemption. Closed allocations
    /// drop out of aggregates and payout eligibility; the record stays.
    pub fn close(&mut self) {
        self.status = AllocationStatus::Closed;
    }
}
