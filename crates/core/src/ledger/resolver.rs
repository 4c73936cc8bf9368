//! Ledger resolver: scoped expenses in, balances and settlements out.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use splitledger_shared::config::LedgerConfig;
use splitledger_shared::types::{CurrencyCode, UserId};
use tracing::debug;

use super::balance::{NetBalances, compute_balances};
use super::settlement::{Settlement, simplify_debts};
use crate::expense::{Expense, Scope};
use crate::split::ShareAllocator;

/// Arithmetic knobs for the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Balances within this distance of zero count as settled.
    pub tolerance: Decimal,
    /// Minor-unit precision of allocated shares.
    pub decimal_places: u32,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
            decimal_places: 2,
        }
    }
}

impl From<&LedgerConfig> for ResolverOptions {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            decimal_places: config.decimal_places,
        }
    }
}

/// Balances and suggested settlements, both keyed by currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerReport {
    /// Net balance per person, per currency.
    pub balances: BTreeMap<CurrencyCode, NetBalances>,
    /// Transfers that settle each currency.
    pub settlements: BTreeMap<CurrencyCode, Vec<Settlement>>,
}

impl LedgerReport {
    /// Currencies with at least one balance entry.
    pub fn currencies(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.balances.keys()
    }

    /// Balance of `user` in every currency they appear in.
    #[must_use]
    pub fn balance_of(&self, user: UserId) -> BTreeMap<CurrencyCode, Decimal> {
        self.balances
            .iter()
            .filter_map(|(currency, ledger)| {
                ledger
                    .as_map()
                    .get(&user)
                    .map(|amount| (currency.clone(), *amount))
            })
            .collect()
    }

    /// Transfers for one currency.
    #[must_use]
    pub fn settlements_for(&self, currency: &CurrencyCode) -> &[Settlement] {
        self.settlements
            .get(currency)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every transfer across all currencies, currency by currency.
    pub fn all_settlements(&self) -> impl Iterator<Item = &Settlement> {
        self.settlements.values().flatten()
    }

    /// Returns true if no currency needs any transfer.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.balances.values().all(NetBalances::is_settled)
    }
}

/// Ledger resolver.
///
/// Stateless apart from its options: every call recomputes from the given
/// snapshot, so one resolver can be shared freely between callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerResolver {
    options: ResolverOptions,
    allocator: ShareAllocator,
}

impl LedgerResolver {
    /// Creates a resolver.
    #[must_use]
    pub const fn new(options: ResolverOptions) -> Self {
        Self {
            options,
            allocator: ShareAllocator::new(options.decimal_places),
        }
    }

    /// The resolver options.
    #[must_use]
    pub const fn options(&self) -> ResolverOptions {
        self.options
    }

    /// The allocator used to split expenses.
    #[must_use]
    pub const fn allocator(&self) -> &ShareAllocator {
        &self.allocator
    }

    /// Net balances per currency over `expenses`.
    pub fn balances<'a, I>(&self, expenses: I) -> BTreeMap<CurrencyCode, NetBalances>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        compute_balances(expenses, &self.allocator, self.options.tolerance)
    }

    /// Transfers that settle one currency's balances.
    #[must_use]
    pub fn settle(&self, balances: &NetBalances) -> Vec<Settlement> {
        simplify_debts(balances)
    }

    /// Resolves every expense given, regardless of scope.
    pub fn resolve_all<'a, I>(&self, expenses: I) -> LedgerReport
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let balances = self.balances(expenses);
        let settlements = balances
            .iter()
            .map(|(currency, ledger)| {
                let transfers = self.settle(ledger);
                debug!(
                    %currency,
                    people = ledger.len(),
                    transfers = transfers.len(),
                    "Resolved currency"
                );
                (currency.clone(), transfers)
            })
            .collect();

        LedgerReport {
            balances,
            settlements,
        }
    }

    /// Resolves the expenses that fall within `scope`.
    #[must_use]
    pub fn resolve(&self, expenses: &[Expense], scope: &Scope) -> LedgerReport {
        let scoped = scope.filter(expenses);
        debug!(%scope, total = expenses.len(), in_scope = scoped.len(), "Resolving ledger");
        self.resolve_all(scoped)
    }
}
