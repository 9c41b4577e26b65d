//! Per-category spending totals.

use std::collections::HashMap;

use entities::{Transaction, TransactionKind};
use uuid::Uuid;

use crate::DateRange;

/// Sums expense amounts per category over the inclusive date range.
///
/// Only expense transactions dated within `range` contribute. Categories
/// with no matching transactions are absent from the result; callers treat
/// absence as zero. Empty input yields an empty map.
pub fn aggregate_spending(transactions: &[Transaction], range: DateRange) -> HashMap<Uuid, f64> {
    let mut totals = HashMap::new();

    for tx in transactions {
        if tx.kind == TransactionKind::Expense && range.contains(tx.date) {
            *totals.entry(tx.category_id).or_insert(0.0) += tx.amount;
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(amount: f64, kind: TransactionKind, category_id: Uuid, day: u32) -> Transaction {
        Transaction::new(amount, kind, category_id, Uuid::new_v4()).with_date(date(2026, 8, day))
    }

    #[test]
    fn test_groups_expenses_by_category() {
        let food = Uuid::new_v4();
        let travel = Uuid::new_v4();
        let transactions = vec![
            tx(50.0, TransactionKind::Expense, food, 5),
            tx(30.0, TransactionKind::Expense, food, 10),
            tx(10.0, TransactionKind::Income, travel, 12),
        ];
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let totals = aggregate_spending(&transactions, range);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&food], 80.0);
        // Income-only categories are absent, not zero.
        assert!(!totals.contains_key(&travel));
    }

    #[test]
    fn test_range_is_inclusive_both_ends() {
        let cat = Uuid::new_v4();
        let transactions = vec![
            tx(1.0, TransactionKind::Expense, cat, 1),
            tx(2.0, TransactionKind::Expense, cat, 15),
            tx(4.0, TransactionKind::Expense, cat, 31),
        ];
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        assert_eq!(aggregate_spending(&transactions, range)[&cat], 7.0);
    }

    #[test]
    fn test_out_of_range_excluded() {
        let cat = Uuid::new_v4();
        let transactions = vec![tx(9.0, TransactionKind::Expense, cat, 5)];
        let range = DateRange::new(date(2026, 8, 10), date(2026, 8, 20));

        assert!(aggregate_spending(&transactions, range).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));
        assert!(aggregate_spending(&[], range).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let cat = Uuid::new_v4();
        let transactions = vec![tx(5.0, TransactionKind::Expense, cat, 5)];
        let range = DateRange::new(date(2026, 8, 1), date(2026, 8, 31));

        let first = aggregate_spending(&transactions, range);
        let second = aggregate_spending(&transactions, range);
        assert_eq!(first, second);
    }
}
