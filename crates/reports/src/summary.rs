//! Income/expense summaries.

use std::collections::HashMap;

use entities::{Category, Transaction, TransactionKind};
use serde::Serialize;

/// Display name used for transactions whose category no longer resolves.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Income and expense subtotals for one category name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    /// Sum of income amounts.
    pub income: f64,
    /// Sum of expense amounts.
    pub expense: f64,
}

/// Totals over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionSummary {
    /// Sum of all income amounts.
    pub total_income: f64,
    /// Sum of all expense amounts.
    pub total_expense: f64,
    /// Income minus expense.
    pub net: f64,
    /// Subtotals keyed by category display name. Distinct categories that
    /// share a name are merged under it.
    pub by_category: HashMap<String, CategoryTotals>,
}

/// Summarizes a pre-filtered set of transactions.
///
/// `categories` supplies display names; transactions whose category is not
/// present are grouped under [`UNCATEGORIZED_LABEL`]. Empty input yields
/// zeros and an empty mapping.
pub fn summarize(transactions: &[Transaction], categories: &[Category]) -> TransactionSummary {
    let names: HashMap<_, _> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut summary = TransactionSummary::default();

    for tx in transactions {
        let name = names
            .get(&tx.category_id)
            .copied()
            .unwrap_or(UNCATEGORIZED_LABEL);
        let totals = summary.by_category.entry(name.to_string()).or_default();

        match tx.kind {
            TransactionKind::Income => {
                summary.total_income += tx.amount;
                totals.income += tx.amount;
            }
            TransactionKind::Expense => {
                summary.total_expense += tx.amount;
                totals.expense += tx.amount;
            }
        }
    }

    summary.net = summary.total_income - summary.total_expense;
    summary
}
