//! Ledger engine for Splitledger.
//!
//! This crate contains pure business logic with ZERO storage or network dependencies.
//! It reads a snapshot of expenses and derives balances and settlement suggestions.
//!
//! # Modules
//!
//! - `expense` - Expense and participant records, scopes, entry validation
//! - `split` - Share allocation (how one expense is divided)
//! - `ledger` - Per-currency net balances and debt simplification

pub mod expense;
pub mod ledger;
pub mod split;

pub use expense::{Expense, ExpenseError, Participant, Scope, SplitMethod};
pub use ledger::{LedgerReport, LedgerResolver, NetBalances, ResolverOptions, Settlement};
pub use split::{Share, ShareAllocator, compute_share};
