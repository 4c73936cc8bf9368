//! Human-readable labels for settlements.
//!
//! Names are presentation only and never feed back into arithmetic.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::Serialize;
use splitledger_shared::types::UserId;

use super::settlement::Settlement;

/// Lookup from a user to their display name.
pub trait NameLookup {
    /// Returns the display name of `user`, if known.
    fn display_name(&self, user: UserId) -> Option<&str>;
}

impl<S: BuildHasher> NameLookup for HashMap<UserId, String, S> {
    fn display_name(&self, user: UserId) -> Option<&str> {
        self.get(&user).map(String::as_str)
    }
}

impl NameLookup for BTreeMap<UserId, String> {
    fn display_name(&self, user: UserId) -> Option<&str> {
        self.get(&user).map(String::as_str)
    }
}

/// A settlement with debtor and creditor names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledSettlement {
    /// The underlying transfer.
    #[serde(flatten)]
    pub settlement: Settlement,
    /// Display name of the debtor.
    pub debtor_name: String,
    /// Display name of the creditor.
    pub creditor_name: String,
}

impl std::fmt::Display for LabeledSettlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} owes {} {}",
            self.debtor_name,
            self.creditor_name,
            self.settlement.money()
        )
    }
}

/// Display name of `user`, or the id's string form if unknown.
pub fn name_or_id(names: &impl NameLookup, user: UserId) -> String {
    names
        .display_name(user)
        .map_or_else(|| user.to_string(), ToString::to_string)
}

/// Attaches display names to settlements; unknown users fall back to their id.
pub fn label_settlements(
    settlements: &[Settlement],
    names: &impl NameLookup,
) -> Vec<LabeledSettlement> {
    settlements
        .iter()
        .map(|s| LabeledSettlement {
            settlement: s.clone(),
            debtor_name: name_or_id(names, s.debtor),
            creditor_name: name_or_id(names, s.creditor),
        })
        .collect()
}
