//! Debt simplification: reduce net balances to a short list of transfers.
//!
//! Greedy matching over two work queues. Each step pops the front debtor and
//! the front creditor, transfers the smaller of the two amounts, and pushes
//! back whichever side still has more than the tolerance left. Every step
//! exhausts at least one side, so at most `debtors + creditors - 1` transfers
//! are produced.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::types::{CurrencyCode, Money, UserId};
use tracing::trace;

use super::balance::NetBalances;

/// A suggested transfer from a net debtor to a net creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Who pays.
    pub debtor: UserId,
    /// Who receives.
    pub creditor: UserId,
    /// How much.
    pub amount: Decimal,
    /// In which currency.
    pub currency: CurrencyCode,
}

impl Settlement {
    /// The transferred amount with its currency.
    #[must_use]
    pub fn money(&self) -> Money {
        Money::new(self.amount, self.currency.clone())
    }
}

/// Remaining open amount of one person in the matching queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    user: UserId,
    remaining: Decimal,
}

impl Position {
    fn after(self, transferred: Decimal) -> Self {
        Self {
            user: self.user,
            remaining: self.remaining - transferred,
        }
    }
}

/// Computes the transfers that bring every balance in `balances` to zero.
///
/// Debtors and creditors are matched in user order, so identical balances
/// always produce identical transfers. Transfers at or below the tolerance
/// are dropped.
#[must_use]
pub fn simplify_debts(balances: &NetBalances) -> Vec<Settlement> {
    let tolerance = balances.tolerance();
    let mut debtors: VecDeque<Position> = balances
        .debtors()
        .into_iter()
        .map(|(user, remaining)| Position { user, remaining })
        .collect();
    let mut creditors: VecDeque<Position> = balances
        .creditors()
        .into_iter()
        .map(|(user, remaining)| Position { user, remaining })
        .collect();

    let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));

    while let (Some(debtor), Some(creditor)) = (debtors.pop_front(), creditors.pop_front()) {
        let amount = debtor.remaining.min(creditor.remaining);
        trace!(
            debtor = %debtor.user,
            creditor = %creditor.user,
            %amount,
            currency = %balances.currency(),
            "Matched transfer"
        );
        transfers.push(Settlement {
            debtor: debtor.user,
            creditor: creditor.user,
            amount,
            currency: balances.currency().clone(),
        });

        let debtor = debtor.after(amount);
        if debtor.remaining > tolerance {
            debtors.push_front(debtor);
        }
        let creditor = creditor.after(amount);
        if creditor.remaining > tolerance {
            creditors.push_front(creditor);
        }
    }

    transfers.retain(|t| t.amount > tolerance);
    transfers
}
