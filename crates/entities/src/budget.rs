//! Budget-related entity definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spending limit for one category over an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier.
    pub id: Uuid,
    /// The spending limit. Always positive.
    pub amount: f64,
    /// First day of the budget period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the budget period (inclusive). Never before `start_date`.
    pub end_date: NaiveDate,
    /// Category this budget limits. Must be owned by `user_id`.
    pub category_id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Creates a new budget.
    pub fn new(
        amount: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        category_id: Uuid,
        user_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount,
            start_date,
            end_date,
            category_id,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the budget's date range contains the given date.
    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_budget_is_active() {
        let budget = Budget::new(
            100.0,
            date(2026, 3, 1),
            date(2026, 3, 31),
            Uuid::new_v4(),
            Uuid::new_v4(),
        );

        assert!(budget.is_active(date(2026, 3, 1)));
        assert!(budget.is_active(date(2026, 3, 31)));
        assert!(!budget.is_active(date(2026, 2, 28)));
        assert!(!budget.is_active(date(2026, 4, 1)));
    }
}
