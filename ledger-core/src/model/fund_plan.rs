use super::ids::FundPlanId;
use serde::{Deserialize, Serialize};

/// A fund product investors buy units of.
///
/// `aum` and `investor_count` are derived aggregates over active
/// allocations. `nav` is the latest value known to the plan record and is
/// advisory only; executions always price at the NAV passed by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundPlan {
    pub id: FundPlanId,
    pub name: String,
    pub nav: f64,
    pub aum: f64,
    pub investor_count: u32,
}

impl FundPlan {
    pub fn new(id: FundPlanId, name: impl Into<String>, nav: f64) -> Self {
        Self {
            id,
            name: name.into(),
            nav,
            aum: 0.0,
            investor_count: 0,
        }
    }
}
