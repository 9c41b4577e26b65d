//! Budget spend tracking and threshold alerts.

use chrono::NaiveDate;
use entities::{Budget, Category, Transaction, TransactionKind};
use serde::Serialize;
use uuid::Uuid;

/// Label used in alert messages when a budget's category no longer resolves
/// to a name.
const UNKNOWN_CATEGORY_LABEL: &str = "unknown category";

/// Percentage of the limit at which a budget is considered exceeded.
pub const ALERT_THRESHOLD_EXCEEDED: f64 = 100.0;

/// Percentage of the limit at which a budget is considered close to its
/// limit.
pub const ALERT_THRESHOLD_WARNING: f64 = 80.0;

/// Derived spend figures for one budget.
///
/// Computed the same way for the alerting path and for decorating budget
/// responses, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpendSnapshot {
    /// Total expense amount within the budget's period and category.
    pub spent: f64,
    /// Limit minus spent. Negative when the budget is exceeded.
    pub remaining: f64,
    /// Spent as a percentage of the limit, 0 when the limit is not positive.
    pub percentage_used: f64,
}

impl SpendSnapshot {
    /// Builds a snapshot from a budget limit and the spend against it.
    pub fn new(limit: f64, spent: f64) -> Self {
        let percentage_used = if limit > 0.0 {
            (spent / limit) * 100.0
        } else {
            0.0
        };
        Self {
            spent,
            remaining: limit - spent,
            percentage_used,
        }
    }
}

/// How urgent a budget alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Budget is at or past 80% of its limit.
    Medium,
    /// Budget has been exceeded.
    High,
}

/// An alert for a budget that is close to or past its limit.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetAlert {
    /// The budget this alert is about.
    pub budget_id: Uuid,
    /// Display name of the budget's category, if it still resolves.
    pub category_name: Option<String>,
    /// Alert severity.
    pub severity: AlertSeverity,
    /// Human-readable alert text.
    pub message: String,
}

/// Sums the expense transactions that count against `budget`: same owner,
/// same category, dated within the budget's own inclusive range.
pub fn spent_in_budget(budget: &Budget, transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|tx| {
            tx.kind == TransactionKind::Expense
                && tx.user_id == budget.user_id
                && tx.category_id == budget.category_id
                && budget.start_date <= tx.date
                && tx.date <= budget.end_date
        })
        .map(|tx| tx.amount)
        .sum()
}

/// Computes the spend snapshot for one budget from the owner's transactions.
pub fn budget_snapshot(budget: &Budget, transactions: &[Transaction]) -> SpendSnapshot {
    SpendSnapshot::new(budget.amount, spent_in_budget(budget, transactions))
}

/// Evaluates budgets active as of `reference_date` and returns alerts for
/// those at or past the warning thresholds, in input budget order.
///
/// Spend is re-derived per budget from `transactions`; precomputed figures
/// are never trusted. Budgets below the warning threshold produce no alert.
pub fn evaluate_budgets(
    budgets: &[Budget],
    transactions: &[Transaction],
    categories: &[Category],
    reference_date: NaiveDate,
) -> Vec<BudgetAlert> {
    let mut alerts = Vec::new();

    for budget in budgets {
        if !budget.is_active(reference_date) {
            continue;
        }

        let snapshot = budget_snapshot(budget, transactions);
        let category_name = categories
            .iter()
            .find(|c| c.id == budget.category_id)
            .map(|c| c.name.clone());
        let label = category_name.as_deref().unwrap_or(UNKNOWN_CATEGORY_LABEL);

        let (severity, message) = if snapshot.percentage_used >= ALERT_THRESHOLD_EXCEEDED {
            (
                AlertSeverity::High,
                format!(
                    "Budget for {} has been exceeded ({:.1}%)",
                    label, snapshot.percentage_used
                ),
            )
        } else if snapshot.percentage_used >= ALERT_THRESHOLD_WARNING {
            (
                AlertSeverity::Medium,
                format!(
                    "Budget for {} is at {:.1}% of limit",
                    label, snapshot.percentage_used
                ),
            )
        } else {
            continue;
        };

        alerts.push(BudgetAlert {
            budget_id: budget.id,
            category_name,
            severity,
            message,
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        user_id: Uuid,
        category: Category,
        budget: Budget,
    }

    fn fixture(limit: f64) -> Fixture {
        let user_id = Uuid::new_v4();
        let category = Category::new("Food", user_id);
        let budget = Budget::new(
            limit,
            date(2026, 8, 1),
            date(2026, 8, 31),
            category.id,
            user_id,
        );
        Fixture {
            user_id,
            category,
            budget,
        }
    }

    fn expense(f: &Fixture, amount: f64, day: u32) -> Transaction {
        Transaction::new(amount, TransactionKind::Expense, f.category.id, f.user_id)
            .with_date(date(2026, 8, day))
    }

    #[test]
    fn test_snapshot_formula() {
        let snapshot = SpendSnapshot::new(200.0, 50.0);

        assert_eq!(snapshot.spent, 50.0);
        assert_eq!(snapshot.remaining, 150.0);
        assert_eq!(snapshot.percentage_used, 25.0);
    }

    #[test]
    fn test_snapshot_zero_limit_avoids_division() {
        let snapshot = SpendSnapshot::new(0.0, 50.0);
        assert_eq!(snapshot.percentage_used, 0.0);
    }

    #[test]
    fn test_spent_ignores_other_categories_users_and_dates() {
        let f = fixture(100.0);
        let other_user = Transaction::new(
            40.0,
            TransactionKind::Expense,
            f.category.id,
            Uuid::new_v4(),
        )
        .with_date(date(2026, 8, 10));
        let other_category =
            Transaction::new(40.0, TransactionKind::Expense, Uuid::new_v4(), f.user_id)
                .with_date(date(2026, 8, 10));
        let out_of_range = expense(&f, 40.0, 10).with_date(date(2026, 9, 1));
        let income = Transaction::new(40.0, TransactionKind::Income, f.category.id, f.user_id)
            .with_date(date(2026, 8, 10));
        let counted = expense(&f, 25.0, 10);

        let transactions = vec![other_user, other_category, out_of_range, income, counted];
        assert_eq!(spent_in_budget(&f.budget, &transactions), 25.0);
    }

    #[test]
    fn test_exceeded_budget_raises_high_alert() {
        let f = fixture(100.0);
        let transactions = vec![expense(&f, 100.0, 15)];

        let alerts = evaluate_budgets(
            std::slice::from_ref(&f.budget),
            &transactions,
            std::slice::from_ref(&f.category),
            date(2026, 8, 20),
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[0].budget_id, f.budget.id);
        assert_eq!(
            alerts[0].message,
            "Budget for Food has been exceeded (100.0%)"
        );
    }

    #[test]
    fn test_near_limit_raises_medium_alert() {
        let f = fixture(100.0);
        let transactions = vec![expense(&f, 85.0, 15)];

        let alerts = evaluate_budgets(
            std::slice::from_ref(&f.budget),
            &transactions,
            std::slice::from_ref(&f.category),
            date(2026, 8, 20),
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Medium);
        assert_eq!(alerts[0].message, "Budget for Food is at 85.0% of limit");
    }

    #[test]
    fn test_under_threshold_raises_nothing() {
        let f = fixture(100.0);
        let transactions = vec![expense(&f, 50.0, 15)];

        let alerts = evaluate_budgets(
            std::slice::from_ref(&f.budget),
            &transactions,
            std::slice::from_ref(&f.category),
            date(2026, 8, 20),
        );

        assert!(alerts.is_empty());
    }

    #[test]
    fn test_zero_limit_budget_never_alerts() {
        let f = fixture(0.0);
        let transactions = vec![expense(&f, 50.0, 15)];

        let alerts = evaluate_budgets(
            std::slice::from_ref(&f.budget),
            &transactions,
            std::slice::from_ref(&f.category),
            date(2026, 8, 20),
        );

        assert!(alerts.is_empty());
    }

    #[test]
    fn test_inactive_budget_skipped() {
        let f = fixture(100.0);
        let transactions = vec![expense(&f, 100.0, 15)];

        // Reference date outside the budget period.
        let alerts = evaluate_budgets(
            std::slice::from_ref(&f.budget),
            &transactions,
            std::slice::from_ref(&f.category),
            date(2026, 9, 5),
        );

        assert!(alerts.is_empty());
    }

    #[test]
    fn test_missing_category_uses_fallback_label() {
        let f = fixture(100.0);
        let transactions = vec![expense(&f, 100.0, 15)];

        let alerts = evaluate_budgets(
            std::slice::from_ref(&f.budget),
            &transactions,
            &[],
            date(2026, 8, 20),
        );

        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].category_name.is_none());
        assert!(alerts[0].message.contains("unknown category"));
    }

    #[test]
    fn test_alerts_follow_input_order() {
        let user_id = Uuid::new_v4();
        let cat_a = Category::new("A", user_id);
        let cat_b = Category::new("B", user_id);
        let budget_a = Budget::new(100.0, date(2026, 8, 1), date(2026, 8, 31), cat_a.id, user_id);
        let budget_b = Budget::new(100.0, date(2026, 8, 1), date(2026, 8, 31), cat_b.id, user_id);
        let transactions = vec![
            Transaction::new(120.0, TransactionKind::Expense, cat_a.id, user_id)
                .with_date(date(2026, 8, 5)),
            Transaction::new(90.0, TransactionKind::Expense, cat_b.id, user_id)
                .with_date(date(2026, 8, 5)),
        ];

        let alerts = evaluate_budgets(
            &[budget_a.clone(), budget_b.clone()],
            &transactions,
            &[cat_a, cat_b],
            date(2026, 8, 20),
        );

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].budget_id, budget_a.id);
        assert_eq!(alerts[1].budget_id, budget_b.id);
    }
}
