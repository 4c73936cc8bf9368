//! Per-currency net balance calculations.
//!
//! A positive balance means the person is owed money within the evaluated
//! scope; a negative balance means they owe money. Every currency is an
//! independent sub-ledger.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use splitledger_shared::types::{CurrencyCode, UserId};
use tracing::debug;

use super::settlement::Settlement;
use crate::expense::Expense;
use crate::split::{Share, ShareAllocator};

/// Net balances of every person in one currency.
///
/// Entries are keyed by [`UserId`], so iteration order is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetBalances {
    currency: CurrencyCode,
    #[serde(rename = "balances")]
    entries: BTreeMap<UserId, Decimal>,
    #[serde(skip)]
    tolerance: Decimal,
}

impl NetBalances {
    /// Creates an empty sub-ledger for `currency`.
    ///
    /// Balances within `tolerance` of zero are treated as settled.
    #[must_use]
    pub fn new(currency: CurrencyCode, tolerance: Decimal) -> Self {
        Self {
            currency,
            entries: BTreeMap::new(),
            tolerance,
        }
    }

    /// The currency of this sub-ledger.
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// The settle tolerance.
    #[must_use]
    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Net balance of `user`, zero if they never appeared.
    #[must_use]
    pub fn get(&self, user: UserId) -> Decimal {
        self.entries.get(&user).copied().unwrap_or_default()
    }

    /// Credits `user` (they fronted money).
    pub fn credit(&mut self, user: UserId, amount: Decimal) {
        *self.entries.entry(user).or_default() += amount;
    }

    /// Debits `user` (they owe a share).
    pub fn debit(&mut self, user: UserId, amount: Decimal) {
        *self.entries.entry(user).or_default() -= amount;
    }

    /// Posts one expense: debits every share and credits `payer` with their sum.
    ///
    /// Nothing is changed and `false` is returned if any resulting balance
    /// would overflow.
    pub fn post(&mut self, payer: UserId, shares: &[Share]) -> bool {
        let mut deltas: BTreeMap<UserId, Decimal> = BTreeMap::new();
        let mut allocated = Decimal::ZERO;
        for share in shares {
            let Some(sum) = allocated.checked_add(share.amount) else {
                return false;
            };
            allocated = sum;
            let delta = deltas.entry(share.user_id).or_default();
            let Some(next) = delta.checked_sub(share.amount) else {
                return false;
            };
            *delta = next;
        }
        let delta = deltas.entry(payer).or_default();
        let Some(next) = delta.checked_add(allocated) else {
            return false;
        };
        *delta = next;

        let mut updated = Vec::with_capacity(deltas.len());
        for (user, delta) in deltas {
            let Some(balance) = self.get(user).checked_add(delta) else {
                return false;
            };
            updated.push((user, balance));
        }
        self.entries.extend(updated);
        true
    }

    /// Applies a settlement: the debtor pays the creditor.
    pub fn apply(&mut self, settlement: &Settlement) {
        self.credit(settlement.debtor, settlement.amount);
        self.debit(settlement.creditor, settlement.amount);
    }

    /// Iterates over `(user, balance)` pairs in user order.
    pub fn iter(&self) -> impl Iterator<Item = (UserId, Decimal)> + '_ {
        self.entries.iter().map(|(user, amount)| (*user, *amount))
    }

    /// The underlying mapping.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<UserId, Decimal> {
        &self.entries
    }

    /// Number of people in this sub-ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nobody has a balance entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero whenever shares were allocated in full.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.entries.values().copied().sum()
    }

    /// Returns true if `amount` is within the tolerance of zero.
    #[must_use]
    pub fn is_negligible(&self, amount: Decimal) -> bool {
        amount.abs() <= self.tolerance
    }

    /// People owed money, with the amount they are owed.
    #[must_use]
    pub fn creditors(&self) -> Vec<(UserId, Decimal)> {
        self.iter()
            .filter(|(_, amount)| *amount > self.tolerance)
            .collect()
    }

    /// People owing money, with the (positive) amount they owe.
    #[must_use]
    pub fn debtors(&self) -> Vec<(UserId, Decimal)> {
        self.iter()
            .filter(|(_, amount)| *amount < -self.tolerance)
            .map(|(user, amount)| (user, -amount))
            .collect()
    }

    /// Returns true if every balance is within the tolerance of zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.entries.values().all(|amount| self.is_negligible(*amount))
    }
}

/// Accumulates net balances per currency over a set of expenses.
///
/// For each expense every participant is debited their allocated share and
/// the payer is credited with the sum of those shares. That sum equals the
/// amount for well-formed expenses; a `BY_EXACT` expense whose literals do not
/// add up credits the payer with the literal total instead, so each currency
/// still sums to zero. Expenses without a payer or without participants are
/// skipped. An expense whose shares allocate to zero (all weights zero,
/// unknown split method) or whose amounts overflow contributes nothing at all.
pub fn compute_balances<'a, I>(
    expenses: I,
    allocator: &ShareAllocator,
    tolerance: Decimal,
) -> BTreeMap<CurrencyCode, NetBalances>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut ledgers: BTreeMap<CurrencyCode, NetBalances> = BTreeMap::new();

    for expense in expenses {
        let Some(payer) = expense.paid_by.filter(|_| expense.is_resolvable()) else {
            debug!(expense_id = %expense.id, "Skipping expense without payer or participants");
            continue;
        };

        let shares = allocator.allocate(expense);
        let ledger = ledgers
            .entry(expense.currency.clone())
            .or_insert_with(|| NetBalances::new(expense.currency.clone(), tolerance));
        if !ledger.post(payer, &shares) {
            debug!(expense_id = %expense.id, "Expense amounts overflow, no balance change");
        }
    }

    ledgers
}
