//! Rendering of ledger reports for the terminal.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::Serialize;
use splitledger_core::LedgerReport;
use splitledger_core::ledger::{LabeledSettlement, NameLookup, label_settlements, name_or_id};
use splitledger_shared::types::CurrencyCode;

/// Report with display names attached, as emitted in JSON mode.
#[derive(Debug, Serialize)]
struct NamedReport<'a> {
    balances: BTreeMap<&'a CurrencyCode, BTreeMap<String, Decimal>>,
    settlements: BTreeMap<&'a CurrencyCode, Vec<LabeledSettlement>>,
}

fn signed(amount: Decimal) -> String {
    if amount > Decimal::ZERO {
        format!("+{amount}")
    } else {
        amount.to_string()
    }
}

/// Renders balances and settlements as plain text, one block per currency.
pub fn render_text(report: &LedgerReport, names: &impl NameLookup) -> String {
    if report.balances.is_empty() {
        return "No expenses in scope.\n".to_string();
    }

    let mut out = String::new();
    for (currency, ledger) in &report.balances {
        let _ = writeln!(out, "{currency}");
        for (user, amount) in ledger.iter() {
            let _ = writeln!(out, "  {:<24} {:>14}", name_or_id(names, user), signed(amount));
        }

        let transfers = label_settlements(report.settlements_for(currency), names);
        if transfers.is_empty() {
            let _ = writeln!(out, "  All settled.");
        } else {
            let _ = writeln!(out, "  Settlements:");
            for transfer in &transfers {
                let _ = writeln!(out, "    {transfer}");
            }
        }
    }
    out
}

/// Renders the report as pretty-printed JSON with display names.
pub fn render_json(report: &LedgerReport, names: &impl NameLookup) -> serde_json::Result<String> {
    let named = NamedReport {
        balances: report
            .balances
            .iter()
            .map(|(currency, ledger)| {
                let by_name = ledger
                    .iter()
                    .map(|(user, amount)| (name_or_id(names, user), amount))
                    .collect();
                (currency, by_name)
            })
            .collect(),
        settlements: report
            .settlements
            .iter()
            .map(|(currency, transfers)| (currency, label_settlements(transfers, names)))
            .collect(),
    };
    serde_json::to_string_pretty(&named)
}
