//! Property-based tests for ledger resolution.
//!
//! - Property 4: Balance conservation
//! - Property 5: Settlements zero every balance
//! - Property 6: Settlement shape (no self-transfers, bounded count)
//! - Property 7: Determinism
//! - Property 8: Degenerate expenses are inert

use proptest::prelude::*;
use rust_decimal::Decimal;
use splitledger_shared::types::{CurrencyCode, UserId};

use super::resolver::LedgerResolver;
use crate::expense::{Expense, Scope, SplitMethod};

const POOL: u128 = 6;
const CURRENCIES: [&str; 2] = ["USD", "EUR"];

fn split_method() -> impl Strategy<Value = SplitMethod> {
    prop_oneof![
        Just(SplitMethod::Equal),
        Just(SplitMethod::ByShares),
        Just(SplitMethod::ByPercent),
        Just(SplitMethod::Full),
        Just(SplitMethod::ByExact),
        Just(SplitMethod::Unknown),
    ]
}

/// Zero, whole, one-decimal, and cent weights, plus the `FULL` marker 100.
fn weight() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::ONE_HUNDRED),
        (1i64..10).prop_map(Decimal::from),
        (1i64..1_000).prop_map(|tenths| Decimal::new(tenths, 1)),
        (1i64..100_000).prop_map(|cents| Decimal::new(cents, 2)),
    ]
}

/// Strategy to generate one expense among a pool of six people, covering
/// every split method, missing payers, empty or all-zero participant lists,
/// and `BY_EXACT` literals that need not add up to the amount.
fn expense() -> impl Strategy<Value = Expense> {
    (
        100i64..1_000_000i64,
        0usize..CURRENCIES.len(),
        split_method(),
        prop::option::weighted(0.9, 0..POOL),
        prop::collection::btree_set(0..POOL, 0..5),
        prop::collection::vec(weight(), 5),
        prop::bool::weighted(0.1),
    )
        .prop_map(|(cents, currency, method, payer, members, weights, all_zero)| {
            let mut expense = members.into_iter().zip(weights).fold(
                Expense::new(
                    Decimal::new(cents, 2),
                    CURRENCIES[currency],
                    method,
                    UserId::from_u128(0),
                ),
                |e, (member, weight)| {
                    let weight = if all_zero { Decimal::ZERO } else { weight };
                    e.with_participant(UserId::from_u128(member), weight)
                },
            );
            expense.paid_by = payer.map(UserId::from_u128);
            expense
        })
}

fn expenses() -> impl Strategy<Value = Vec<Expense>> {
    prop::collection::vec(expense(), 1..12)
}

/// True for expenses that cannot move any balance.
fn is_degenerate(expense: &Expense) -> bool {
    !expense.is_resolvable()
        || expense.split_method == SplitMethod::Unknown
        || (expense.split_method != SplitMethod::Equal
            && expense.participants.iter().all(|p| p.share_count.is_zero()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 4: Balance conservation
    // =========================================================================

    /// *For any* set of expenses, balances in each currency SHALL sum to zero.
    #[test]
    fn prop_balances_conserve(expenses in expenses()) {
        let balances = LedgerResolver::default().balances(&expenses);
        for ledger in balances.values() {
            prop_assert_eq!(ledger.total(), Decimal::ZERO);
        }
    }

    // =========================================================================
    // Property 5: Settlements zero every balance
    // =========================================================================

    /// Applying every settlement SHALL leave each balance within the tolerance.
    #[test]
    fn prop_settlements_zero_balances(expenses in expenses()) {
        let report = LedgerResolver::default().resolve(&expenses, &Scope::Everyone);
        for (currency, ledger) in &report.balances {
            let mut after = ledger.clone();
            for settlement in report.settlements_for(currency) {
                prop_assert_eq!(&settlement.currency, currency);
                after.apply(settlement);
            }
            prop_assert!(after.is_settled(), "unsettled after transfers: {:?}", after);
        }
    }

    // =========================================================================
    // Property 6: Settlement shape
    // =========================================================================

    /// No transfer SHALL go from a person to themselves, and every amount
    /// SHALL exceed the tolerance.
    #[test]
    fn prop_no_self_or_dust_transfers(expenses in expenses()) {
        let report = LedgerResolver::default().resolve(&expenses, &Scope::Everyone);
        for settlement in report.all_settlements() {
            prop_assert_ne!(settlement.debtor, settlement.creditor);
            prop_assert!(settlement.amount > Decimal::new(1, 2));
        }
    }

    /// Transfers per currency SHALL not exceed `debtors + creditors - 1`.
    #[test]
    fn prop_transfer_count_bounded(expenses in expenses()) {
        let report = LedgerResolver::default().resolve(&expenses, &Scope::Everyone);
        for (currency, ledger) in &report.balances {
            let open = ledger.creditors().len() + ledger.debtors().len();
            prop_assert!(report.settlements_for(currency).len() <= open.saturating_sub(1));
        }
    }

    // =========================================================================
    // Property 7: Determinism
    // =========================================================================

    /// Two resolutions of the same snapshot SHALL be identical.
    #[test]
    fn prop_resolution_deterministic(expenses in expenses()) {
        let resolver = LedgerResolver::default();
        prop_assert_eq!(
            resolver.resolve(&expenses, &Scope::Everyone),
            resolver.resolve(&expenses, &Scope::Everyone)
        );
    }

    // =========================================================================
    // Property 8: Degenerate expenses are inert
    // =========================================================================

    /// Expenses without a payer or participants, with an unknown method, or
    /// with all-zero weights SHALL leave every balance unchanged.
    #[test]
    fn prop_degenerate_expenses_are_inert(expenses in expenses()) {
        let sound: Vec<Expense> = expenses.iter().filter(|e| !is_degenerate(e)).cloned().collect();
        let resolver = LedgerResolver::default();
        let all = resolver.resolve(&expenses, &Scope::Everyone);
        let without = resolver.resolve(&sound, &Scope::Everyone);

        for n in 0..POOL {
            let user = UserId::from_u128(n);
            for currency in CURRENCIES.map(CurrencyCode::new) {
                let lhs = all.balances.get(&currency).map(|b| b.get(user)).unwrap_or_default();
                let rhs = without.balances.get(&currency).map(|b| b.get(user)).unwrap_or_default();
                prop_assert_eq!(lhs, rhs);
            }
        }
        prop_assert_eq!(
            all.all_settlements().collect::<Vec<_>>(),
            without.all_settlements().collect::<Vec<_>>()
        );
    }
}
