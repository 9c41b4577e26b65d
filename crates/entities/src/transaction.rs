//! Transaction-related entity definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a transaction adds to or subtracts from the user's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// Parses the wire representation (`income` / `expense`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single income or expense record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: Uuid,
    /// Amount in the user's currency. Always positive; the sign is carried
    /// by `kind`.
    pub amount: f64,
    /// Optional free-form description.
    pub description: String,
    /// Calendar date of the transaction (no time component).
    pub date: NaiveDate,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Category this transaction belongs to. Must be owned by `user_id`.
    pub category_id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new transaction dated today (UTC).
    pub fn new(amount: f64, kind: TransactionKind, category_id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            amount,
            description: String::new(),
            date: now.date_naive(),
            kind,
            category_id,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the transaction date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}
