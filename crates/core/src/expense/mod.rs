//! Expense records as supplied by the storage layer.

pub mod scope;
pub mod types;
pub mod validation;

pub use scope::Scope;
pub use types::{Expense, Participant, SplitMethod};
pub use validation::{ExpenseError, validate_expense};
