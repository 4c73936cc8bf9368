//! Ledger resolution.
//!
//! This module turns a scoped snapshot of expenses into:
//! - Net balances per person, per currency
//! - A short list of settlement transfers per currency
//! - Labeled settlements for presentation

pub mod balance;
pub mod labels;
pub mod resolver;
pub mod settlement;

#[cfg(test)]
mod props;

pub use balance::{NetBalances, compute_balances};
pub use labels::{LabeledSettlement, NameLookup, label_settlements, name_or_id};
pub use resolver::{LedgerReport, LedgerResolver, ResolverOptions};
pub use settlement::{Settlement, simplify_debts};
