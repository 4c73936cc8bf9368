//! Single-share computation.

use rust_decimal::Decimal;

use crate::expense::{Expense, Participant, SplitMethod};

/// Returns the amount `participant` owes for `expense`, unrounded.
///
/// - `EQUAL`: `amount / participant_count`
/// - `BY_SHARES`, `BY_PERCENT`, `FULL`: `amount * share_count / total_weight`,
///   or zero when the total weight is not positive or the arithmetic overflows
/// - `BY_EXACT`: the participant's `share_count`, taken as a literal amount
/// - unknown methods: zero
///
/// No remainder correction happens here; see [`super::ShareAllocator`] for
/// shares that sum exactly to the expense amount.
#[must_use]
pub fn compute_share(expense: &Expense, participant: &Participant) -> Decimal {
    match expense.split_method {
        SplitMethod::Equal => {
            let count = expense.participants.len();
            if count == 0 {
                Decimal::ZERO
            } else {
                expense.amount / Decimal::from(count as u64)
            }
        }
        SplitMethod::ByShares | SplitMethod::ByPercent | SplitMethod::Full => {
            expense
                .total_weight()
                .filter(|total| *total > Decimal::ZERO)
                .and_then(|total| participant.share_count.checked_div(total))
                .and_then(|ratio| expense.amount.checked_mul(ratio))
                .unwrap_or_default()
        }
        SplitMethod::ByExact => participant.share_count,
        SplitMethod::Unknown => Decimal::ZERO,
    }
}
