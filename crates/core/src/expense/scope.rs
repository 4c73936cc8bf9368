//! Scope selection: which expenses take part in one computation.

use serde::{Deserialize, Serialize};
use splitledger_shared::types::{GroupId, UserId};

use super::types::Expense;

/// The subset of expenses considered for a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum Scope {
    /// Direct (group-less) expenses both people are involved in.
    Direct {
        /// First person.
        a: UserId,
        /// Second person.
        b: UserId,
    },
    /// Every expense tagged with the group.
    Group(GroupId),
    /// Every expense, direct or grouped, the user is involved in.
    User(UserId),
    /// Every expense.
    Everyone,
}

impl Scope {
    /// Returns true if the expense belongs to this scope.
    ///
    /// A direct scope between a person and themselves matches nothing.
    #[must_use]
    pub fn contains(&self, expense: &Expense) -> bool {
        match *self {
            Self::Direct { a, b } => {
                a != b && expense.is_direct() && expense.involves(a) && expense.involves(b)
            }
            Self::Group(group) => expense.group_id == Some(group),
            Self::User(user) => expense.involves(user),
            Self::Everyone => true,
        }
    }

    /// Returns the expenses in this scope, preserving input order.
    pub fn filter<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|e| self.contains(e)).collect()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct { a, b } => write!(f, "direct {a} <-> {b}"),
            Self::Group(group) => write!(f, "group {group}"),
            Self::User(user) => write!(f, "user {user}"),
            Self::Everyone => write!(f, "everyone"),
        }
    }
}
