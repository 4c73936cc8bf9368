//! Expense snapshot files.
//!
//! A snapshot is what the storage layer hands the engine: every expense with
//! its participants, plus display names for the people involved.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use splitledger_core::Expense;
use splitledger_core::expense::validate_expense;
use splitledger_shared::types::UserId;
use splitledger_shared::{AppError, AppResult};
use tracing::warn;

/// Expenses and display names read from a JSON file.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    /// Expense records with their participants.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Display names keyed by user id.
    #[serde(default)]
    pub users: HashMap<UserId, String>,
}

impl Snapshot {
    /// Reads and parses a snapshot file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(path.display().to_string())
            } else {
                AppError::Input(format!("{}: {err}", path.display()))
            }
        })?;
        Self::parse(&raw)
    }

    /// Parses a snapshot from JSON text.
    pub fn parse(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|err| AppError::Input(err.to_string()))
    }

    /// Logs every expense that fails entry validation and returns how many did.
    ///
    /// Suspect expenses are still resolved; the engine degrades them on its own.
    pub fn report_invalid(&self) -> usize {
        self.expenses
            .iter()
            .filter_map(|expense| validate_expense(expense).err().map(|err| (expense.id, err)))
            .inspect(|(id, err)| warn!(expense_id = %id, error = %err, "Suspect expense"))
            .count()
    }
}
