use ledger_core::error::Result;
use ledger_core::model::{FundPlanId, InvestorId};
use log::info;
use uuid::Uuid;

/// Details of a completed payout, handed to the notification collaborator.
#[derive(Debug, Clone)]
pub struct PayoutNotice {
    pub investor_id: InvestorId,
    pub fund_plan_id: FundPlanId,
    pub allocation_id: Uuid,
    pub amount: f64,
    pub notes: Option<String>,
}

/// Interface to the notification/email collaborator.
///
/// Strictly best-effort: the caller logs a failure and moves on. A
/// notification must never roll back or delay the financial write it
/// follows.
pub trait Notifier: Send {
    fn payout_executed(&mut self, notice: &PayoutNotice) -> Result<()>;
}

/// Default notifier: records the notice in the service log. Stands in for
/// the platform's external email delivery.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn payout_executed(&mut self, notice: &PayoutNotice) -> Result<()> {
        info!(
            "Payout notice: investor {} credited {:.2} from plan {} (allocation {})",
            notice.investor_id, notice.amount, notice.fund_plan_id, notice.allocation_id
        );
        Ok(())
    }
}
