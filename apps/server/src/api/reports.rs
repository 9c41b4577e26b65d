//! Spending report endpoints.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{Datelike, Utc};
use entities::TransactionKind;
use finance_store::{FinanceStore, TransactionFilter};
use reports::{DateRange, aggregate_spending, resolve_period};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::parse_date;
use crate::error::ApiResult;
use crate::middleware::AuthenticatedUser;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct SpendingQuery {
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Reports total expense per category over a date range. The range
/// comes either from a named period or from explicit start/end dates,
/// each of which independently defaults when absent.
pub async fn get_spending<S: FinanceStore>(
    State(state): State<SharedState<S>>,
    Extension(current): Extension<AuthenticatedUser>,
    Query(query): Query<SpendingQuery>,
) -> ApiResult<Json<Value>> {
    let today = Utc::now().date_naive();

    let range = match query.period {
        Some(period) => resolve_period(&period, today),
        None => {
            let start = match query.start_date {
                Some(s) => parse_date(&s, "start_date")?,
                None => today.with_day(1).unwrap_or(today),
            };
            let end = match query.end_date {
                Some(s) => parse_date(&s, "end_date")?,
                None => today,
            };
            DateRange { start, end }
        }
    };

    let filter = TransactionFilter {
        kind: Some(TransactionKind::Expense),
        from: Some(range.start),
        to: Some(range.end),
        ..Default::default()
    };
    let transactions = state.store.list_transactions(current.id, filter).await?;

    let spending = aggregate_spending(&transactions, range);

    Ok(Json(json!({
        "start_date": range.start,
        "end_date": range.end,
        "spending": spending,
    })))
}

#[cfg(test)]
mod tests {
    use finance_store::MemoryStore;

    use super::*;
    use crate::api::transactions::{CreateTransactionRequest, create_transaction};
    use crate::error::ApiError;
    use crate::test_utils::{create_category_for, register_user, test_state};

    #[tokio::test]
    async fn test_spending_with_explicit_range() {
        let state = test_state(MemoryStore::new());
        let alice = register_user(&state, "alice", "alice@example.com").await;
        let food = create_category_for(&state, &alice, "Food").await;

        for (amount, date) in [(30.0, "2026-08-05"), (50.0, "2026-08-20"), (99.0, "2026-07-01")] {
            create_transaction(
                State(state.clone()),
                Extension(alice.clone()),
                Json(CreateTransactionRequest {
                    amount: Some(amount),
                    description: None,
                    date: Some(date.to_string()),
                    kind: Some("expense".to_string()),
                    category_id: Some(food.id),
                }),
            )
            .await
            .unwrap();
        }

        let body = get_spending(
            State(state),
            Extension(alice),
            Query(SpendingQuery {
                period: None,
                start_date: Some("2026-08-01".to_string()),
                end_date: Some("2026-08-31".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(body["start_date"], "2026-08-01");
        assert_eq!(body["end_date"], "2026-08-31");
        assert_eq!(body["spending"][food.id.to_string()], 80.0);
    }

    #[tokio::test]
    async fn test_spending_defaults_to_current_month() {
        let state = test_state(MemoryStore::new());
        let alice = register_user(&state, "alice", "alice@example.com").await;

        let body = get_spending(
            State(state),
            Extension(alice),
            Query(SpendingQuery {
                period: None,
                start_date: None,
                end_date: None,
            }),
        )
        .await
        .unwrap();

        let today = Utc::now().date_naive();
        let first_of_month = today.with_day(1).unwrap();
        assert_eq!(body["start_date"], first_of_month.format("%Y-%m-%d").to_string());
        assert_eq!(body["end_date"], today.format("%Y-%m-%d").to_string());
    }

    #[tokio::test]
    async fn test_spending_rejects_bad_date() {
        let state = test_state(MemoryStore::new());
        let alice = register_user(&state, "alice", "alice@example.com").await;

        let err = get_spending(
            State(state),
            Extension(alice),
            Query(SpendingQuery {
                period: None,
                start_date: Some("not-a-date".to_string()),
                end_date: None,
            }),
        )
        .await
        .unwrap_err();

        assert!(
            matches!(err, ApiError::InvalidRequest(msg) if msg == "Invalid start_date format. Use YYYY-MM-DD")
        );
    }

    #[tokio::test]
    async fn test_spending_named_period_ignores_dates() {
        let state = test_state(MemoryStore::new());
        let alice = register_user(&state, "alice", "alice@example.com").await;

        let body = get_spending(
            State(state),
            Extension(alice),
            Query(SpendingQuery {
                period: Some("today".to_string()),
                start_date: Some("2000-01-01".to_string()),
                end_date: Some("2000-12-31".to_string()),
            }),
        )
        .await
        .unwrap();

        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(body["start_date"], today);
        assert_eq!(body["end_date"], today);
    }
}
