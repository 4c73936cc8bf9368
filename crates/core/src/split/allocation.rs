//! Batch share allocation with the remainder assigned to the first participant.
//!
//! Every batch function works in whole minor units:
//! 1. Round the total to the target precision
//! 2. Compute each exact portion and round it (half away from zero)
//! 3. Add the signed remainder (total - sum of rounded) to the FIRST entry
//!
//! The remainder may be negative when several portions round up, so the
//! first entry can end up below its rounded portion. Participant order
//! therefore decides who absorbs rounding drift.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use splitledger_shared::types::UserId;
use tracing::debug;

use crate::expense::{Expense, SplitMethod};

/// One participant's allocated portion of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    /// The participant.
    pub user_id: UserId,
    /// The amount they owe for the expense.
    pub amount: Decimal,
}

/// Allocator for splitting one expense into exact shares.
///
/// Guarantees, for positive totals:
/// - `split_equal` sums EXACTLY to the rounded total
/// - `split_by_shares` sums EXACTLY to the rounded total unless all weights are
///   zero or the weights overflow, in which case every share is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareAllocator {
    decimal_places: u32,
}

impl Default for ShareAllocator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl ShareAllocator {
    /// Creates an allocator rounding to `decimal_places` minor-unit digits.
    #[must_use]
    pub const fn new(decimal_places: u32) -> Self {
        Self { decimal_places }
    }

    /// Minor-unit precision this allocator rounds to.
    #[must_use]
    pub const fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Rounds an amount to the allocator precision, midpoints away from zero.
    #[must_use]
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Split `amount` equally across `count` participants.
    ///
    /// Returns an empty vector when `count` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use splitledger_core::ShareAllocator;
    ///
    /// // 100 / 3 = [33.34, 33.33, 33.33], sum = 100.00
    /// let shares = ShareAllocator::default().split_equal(dec!(100), 3);
    /// assert_eq!(shares, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    /// ```
    #[must_use]
    pub fn split_equal(&self, amount: Decimal, count: usize) -> Vec<Decimal> {
        if count == 0 {
            return vec![];
        }

        let total = self.round(amount);
        let base = self.round(total / Decimal::from(count as u64));
        let mut shares = vec![base; count];
        Self::assign_remainder(&mut shares, total);
        shares
    }

    /// Split `amount` proportionally to `weights`.
    ///
    /// If the weights sum to zero or less, every share is zero and the sum is
    /// zero rather than `amount`: nobody owes anything. Weights too large to
    /// sum or divide are treated the same way.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use splitledger_core::ShareAllocator;
    ///
    /// let shares = ShareAllocator::default().split_by_shares(dec!(100), &[dec!(1), dec!(3)]);
    /// assert_eq!(shares, vec![dec!(25), dec!(75)]);
    /// ```
    #[must_use]
    pub fn split_by_shares(&self, amount: Decimal, weights: &[Decimal]) -> Vec<Decimal> {
        if weights.is_empty() {
            return vec![];
        }

        let total = self.round(amount);
        let Some(mut shares) = self.weighted_portions(total, weights) else {
            return vec![Decimal::ZERO; weights.len()];
        };
        Self::assign_remainder(&mut shares, total);
        shares
    }

    /// Rounded `total * w / Σw` per weight, or `None` when the weights sum to
    /// zero or less or the arithmetic overflows.
    fn weighted_portions(&self, total: Decimal, weights: &[Decimal]) -> Option<Vec<Decimal>> {
        let total_weight = weights
            .iter()
            .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(*w));
        let Some(total_weight) = total_weight else {
            debug!(parts = weights.len(), "Split weights overflow, allocating nothing");
            return None;
        };
        if total_weight <= Decimal::ZERO {
            return None;
        }

        let portions = weights
            .iter()
            .map(|w| {
                w.checked_div(total_weight)
                    .and_then(|ratio| total.checked_mul(ratio))
                    .map(|portion| self.round(portion))
            })
            .collect::<Option<Vec<_>>>();
        if portions.is_none() {
            debug!(%total, "Split portion overflows, allocating nothing");
        }
        portions
    }

    /// Take literal per-participant amounts, rounded to minor units.
    ///
    /// No remainder correction is made: the literals are the shares.
    #[must_use]
    pub fn split_exact(&self, amounts: &[Decimal]) -> Vec<Decimal> {
        amounts.iter().map(|a| self.round(*a)).collect()
    }

    /// Allocate an expense across its participants, in participant order.
    ///
    /// Unknown split methods allocate zero to everyone.
    #[must_use]
    pub fn allocate(&self, expense: &Expense) -> Vec<Share> {
        let weights: Vec<Decimal> = expense.participants.iter().map(|p| p.share_count).collect();

        let amounts = match expense.split_method {
            SplitMethod::Equal => self.split_equal(expense.amount, weights.len()),
            SplitMethod::ByShares | SplitMethod::ByPercent | SplitMethod::Full => {
                self.split_by_shares(expense.amount, &weights)
            }
            SplitMethod::ByExact => self.split_exact(&weights),
            SplitMethod::Unknown => vec![Decimal::ZERO; weights.len()],
        };

        expense
            .participants
            .iter()
            .zip(amounts)
            .map(|(p, amount)| Share {
                user_id: p.user_id,
                amount,
            })
            .collect()
    }

    /// Adds `total - Σ shares` (possibly negative) to the first share.
    fn assign_remainder(shares: &mut [Decimal], total: Decimal) {
        let allocated = shares
            .iter()
            .try_fold(Decimal::ZERO, |acc, share| acc.checked_add(*share));
        let remainder = allocated.and_then(|allocated| total.checked_sub(allocated));
        if let (Some(first), Some(remainder)) = (shares.first_mut(), remainder) {
            *first += remainder;
        }
    }
}
