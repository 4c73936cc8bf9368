//! Entry validation for expense records.
//!
//! The ledger engine never calls this: it degrades malformed records to a
//! zero contribution instead. These checks belong to whoever creates or
//! imports expenses, before they reach the engine.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use splitledger_shared::types::UserId;
use thiserror::Error;

use super::types::{Expense, SplitMethod};

/// Validation errors for expense records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    /// Amount is zero or negative.
    #[error("Expense amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Currency label is empty.
    #[error("Expense currency must not be empty")]
    MissingCurrency,

    /// No payer recorded.
    #[error("Expense has no payer")]
    MissingPayer,

    /// No participants recorded.
    #[error("Expense must have at least one participant")]
    NoParticipants,

    /// The same person is listed twice.
    #[error("Participant {0} is listed more than once")]
    DuplicateParticipant(UserId),

    /// A weight is negative.
    #[error("Participant {user} has a negative weight {weight}")]
    NegativeWeight {
        /// The participant.
        user: UserId,
        /// The offending weight.
        weight: Decimal,
    },

    /// Percentages do not add up to 100.
    #[error("Percentages must sum to 100, got {0}")]
    PercentagesNotHundred(Decimal),

    /// A `FULL` split does not name exactly one person owing everything.
    #[error("Full split must assign 100 to exactly one participant and 0 to the rest")]
    InvalidFullSplit,

    /// Exact amounts do not add up to the expense amount.
    #[error("Exact amounts sum to {actual}, expected {expected}")]
    ExactAmountMismatch {
        /// The expense amount.
        expected: Decimal,
        /// Sum of participant amounts.
        actual: Decimal,
    },

    /// Weights too large to add up.
    #[error("Split weights are too large to sum")]
    WeightOverflow,

    /// Weighted split where every weight is zero.
    #[error("Split weights sum to zero")]
    ZeroTotalWeight,

    /// Split method not recognised.
    #[error("Unknown split method")]
    UnknownSplitMethod,
}

/// Validates an expense record before it is stored or resolved.
///
/// # Errors
///
/// Returns the first rule the expense violates.
pub fn validate_expense(expense: &Expense) -> Result<(), ExpenseError> {
    if expense.amount <= Decimal::ZERO {
        return Err(ExpenseError::NonPositiveAmount(expense.amount));
    }
    if expense.currency.is_empty() {
        return Err(ExpenseError::MissingCurrency);
    }
    if expense.paid_by.is_none() {
        return Err(ExpenseError::MissingPayer);
    }
    if expense.participants.is_empty() {
        return Err(ExpenseError::NoParticipants);
    }

    let mut seen = BTreeSet::new();
    for participant in &expense.participants {
        if !seen.insert(participant.user_id) {
            return Err(ExpenseError::DuplicateParticipant(participant.user_id));
        }
        if participant.share_count < Decimal::ZERO {
            return Err(ExpenseError::NegativeWeight {
                user: participant.user_id,
                weight: participant.share_count,
            });
        }
    }

    let total = expense
        .total_weight()
        .ok_or(ExpenseError::WeightOverflow)?;
    if expense.split_method.is_weighted() && total.is_zero() {
        return Err(ExpenseError::ZeroTotalWeight);
    }

    match expense.split_method {
        SplitMethod::Equal | SplitMethod::ByShares => Ok(()),
        SplitMethod::ByPercent => {
            if total == Decimal::ONE_HUNDRED {
                Ok(())
            } else {
                Err(ExpenseError::PercentagesNotHundred(total))
            }
        }
        SplitMethod::Full => {
            let owers = expense
                .participants
                .iter()
                .filter(|p| p.share_count == Decimal::ONE_HUNDRED)
                .count();
            let others_zero = expense
                .participants
                .iter()
                .all(|p| p.share_count.is_zero() || p.share_count == Decimal::ONE_HUNDRED);
            if owers == 1 && others_zero {
                Ok(())
            } else {
                Err(ExpenseError::InvalidFullSplit)
            }
        }
        SplitMethod::ByExact => {
            if total == expense.amount {
                Ok(())
            } else {
                Err(ExpenseError::ExactAmountMismatch {
                    expected: expense.amount,
                    actual: total,
                })
            }
        }
        SplitMethod::Unknown => Err(ExpenseError::UnknownSplitMethod),
    }
}
