//! Distributable-profit derivation.
//!
//! Pure functions over an allocation snapshot and the transaction history.
//! Paid profit is always re-derived from completed payout transactions, so
//! a repeated payout run sees a smaller distributable amount instead of
//! paying the same profit twice. That recompute-from-history shape is the
//! idempotency mechanism of the whole payout path; do not replace it with
//! in-place subtraction on the allocation.

use crate::model::{Allocation, Transaction, TransactionKind, TransactionStatus};
use uuid::Uuid;

/// Unrealized gain on an allocation, floored at zero.
pub fn unrealized_gain(allocation: &Allocation) -> f64 {
    (allocation.current_value() - allocation.total_invested()).max(0.0)
}

/// Total profit already distributed for an allocation: the sum of its
/// completed payout transactions. Failed attempts never count.
pub fn already_paid(allocation_id: Uuid, history: &[Transaction]) -> f64 {
    history
        .iter()
        .filter(|tx| {
            tx.allocation_id() == allocation_id
                && tx.kind() == TransactionKind::ProfitPayout
                && tx.status() == TransactionStatus::Completed
        })
        .map(|tx| tx.amount())
        .sum()
}

/// Profit still eligible for distribution.
///
/// Clamped at zero: an allocation whose value has dropped below what was
/// already paid out simply has nothing to distribute until its value
/// recovers past the paid watermark. No clawback is attempted.
pub fn distributable_profit(allocation: &Allocation, history: &[Transaction]) -> f64 {
    (unrealized_gain(allocation) - already_paid(allocation.id(), history)).max(0.0)
}

/// Active allocations that currently have profit to distribute.
pub fn eligible_allocations<'a>(
    allocations: &'a [Allocation],
    history: &[Transaction],
) -> Vec<&'a Allocation> {
    allocations
        .iter()
        .filter(|a| a.is_active() && distributable_profit(a, history) > 0.0)
        .collect()
}
