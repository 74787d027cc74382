use super::ids::InvestorId;
use serde::{Deserialize, Serialize};

/// An investor record with aggregate totals over their active allocations.
///
/// The totals are derived state, recomputed after every execution or
/// revaluation; the allocation records stay authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investor {
    pub id: InvestorId,
    pub name: String,
    pub total_invested: f64,
    pub current_value: f64,
}

impl Investor {
    pub fn new(id: InvestorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            total_invested: 0.0,
            current_value: 0.0,
        }
    }
}
