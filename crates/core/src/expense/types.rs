//! Expense domain types.
//!
//! Expenses and their participants are owned by the storage layer. The engine
//! only reads them, so these types carry data and small helpers, nothing more.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::types::{CurrencyCode, ExpenseId, GroupId, UserId};

/// How an expense amount is divided across its participants.
///
/// The meaning of [`Participant::share_count`] depends on the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitMethod {
    /// Every participant owes `amount / participant_count`; weights are ignored.
    Equal,
    /// Weights are raw shares: portion = `weight / total_weight * amount`.
    ByShares,
    /// Weights are percentages summing to 100.
    ByPercent,
    /// One participant owes everything (weight 100), everyone else weight 0.
    Full,
    /// Weights are literal monetary amounts owed by each participant.
    ByExact,
    /// Any method this engine does not recognise. Contributes no shares.
    #[serde(other)]
    Unknown,
}

impl SplitMethod {
    /// Returns true for the methods divided proportionally to weights.
    #[must_use]
    pub fn is_weighted(self) -> bool {
        matches!(self, Self::ByShares | Self::ByPercent | Self::Full)
    }
}

impl std::fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Equal => "EQUAL",
            Self::ByShares => "BY_SHARES",
            Self::ByPercent => "BY_PERCENT",
            Self::Full => "FULL",
            Self::ByExact => "BY_EXACT",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// One person's stake in an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// The person taking part.
    pub user_id: UserId,
    /// Weight whose meaning depends on the expense's [`SplitMethod`].
    #[serde(default)]
    pub share_count: Decimal,
}

impl Participant {
    /// Creates a participant with the given weight.
    #[must_use]
    pub const fn new(user_id: UserId, share_count: Decimal) -> Self {
        Self {
            user_id,
            share_count,
        }
    }
}

/// One shared cost, fronted by a payer and owed by its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense identifier.
    pub id: ExpenseId,
    /// Total amount (expected positive, exact to minor units).
    pub amount: Decimal,
    /// Currency label. Never converted or merged with other labels.
    pub currency: CurrencyCode,
    /// How `amount` is divided.
    pub split_method: SplitMethod,
    /// Who fronted the money. Expenses without a payer are ignored.
    #[serde(default)]
    pub paid_by: Option<UserId>,
    /// Group scope, or `None` for a direct expense between people.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// When the collaborator recorded the expense.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Free-text label.
    #[serde(default)]
    pub description: Option<String>,
    /// Participants in the order the collaborator listed them.
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Expense {
    /// Creates a direct expense with no participants yet.
    #[must_use]
    pub fn new(
        amount: Decimal,
        currency: impl Into<CurrencyCode>,
        split_method: SplitMethod,
        paid_by: UserId,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            amount,
            currency: currency.into(),
            split_method,
            paid_by: Some(paid_by),
            group_id: None,
            created_at: None,
            description: None,
            participants: Vec::new(),
        }
    }

    /// Adds a participant with the given weight.
    #[must_use]
    pub fn with_participant(mut self, user_id: UserId, share_count: Decimal) -> Self {
        self.participants.push(Participant::new(user_id, share_count));
        self
    }

    /// Adds participants with weight 1, the usual shape of an `EQUAL` split.
    #[must_use]
    pub fn with_participants(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.participants
            .extend(users.into_iter().map(|user| Participant::new(user, Decimal::ONE)));
        self
    }

    /// Tags the expense with a group.
    #[must_use]
    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// Returns true if the expense is not tagged with a group.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.group_id.is_none()
    }

    /// Returns true if `user` paid or participates in the expense.
    #[must_use]
    pub fn involves(&self, user: UserId) -> bool {
        self.paid_by == Some(user) || self.participants.iter().any(|p| p.user_id == user)
    }

    /// Sum of all participant weights, `None` if it overflows.
    #[must_use]
    pub fn total_weight(&self) -> Option<Decimal> {
        self.participants
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.share_count))
    }

    /// Returns true if the expense can contribute to balances.
    ///
    /// Expenses without a payer or without participants contribute nothing.
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        self.paid_by.is_some() && !self.participants.is_empty()
    }
}
