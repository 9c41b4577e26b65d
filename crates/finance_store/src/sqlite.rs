//! SQLite store implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use entities::{Budget, Category, Transaction, TransactionKind, User};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, Pool, Sqlite};
use uuid::Uuid;

use crate::{BudgetFilter, FinanceStore, StoreError, StoreResult, TransactionFilter};

/// Schema applied idempotently at startup.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    color TEXT NOT NULL DEFAULT '#000000',
    user_id TEXT NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    amount REAL NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
    category_id TEXT NOT NULL REFERENCES categories(id),
    user_id TEXT NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS budgets (
    id TEXT PRIMARY KEY,
    amount REAL NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    category_id TEXT NOT NULL REFERENCES categories(id),
    user_id TEXT NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
CREATE INDEX IF NOT EXISTS idx_budgets_user ON budgets(user_id);
"#;

fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap_or(Uuid::nil())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|_| Utc::now().date_naive())
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: String,
    updated_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: parse_uuid(&row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    description: String,
    color: String,
    user_id: String,
    created_at: String,
    updated_at: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: parse_uuid(&row.id),
            name: row.name,
            description: row.description,
            color: row.color,
            user_id: parse_uuid(&row.user_id),
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: String,
    amount: f64,
    description: String,
    date: String,
    kind: String,
    category_id: String,
    user_id: String,
    created_at: String,
    updated_at: String,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            id: parse_uuid(&row.id),
            amount: row.amount,
            description: row.description,
            date: parse_date(&row.date),
            // The CHECK constraint keeps this a closed set.
            kind: TransactionKind::parse(&row.kind).unwrap_or(TransactionKind::Expense),
            category_id: parse_uuid(&row.category_id),
            user_id: parse_uuid(&row.user_id),
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

#[derive(Debug, FromRow)]
struct BudgetRow {
    id: String,
    amount: f64,
    start_date: String,
    end_date: String,
    category_id: String,
    user_id: String,
    created_at: String,
    updated_at: String,
}

impl From<BudgetRow> for Budget {
    fn from(row: BudgetRow) -> Self {
        Budget {
            id: parse_uuid(&row.id),
            amount: row.amount,
            start_date: parse_date(&row.start_date),
            end_date: parse_date(&row.end_date),
            category_id: parse_uuid(&row.category_id),
            user_id: parse_uuid(&row.user_id),
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

/// SQLite-backed store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Connects to the database at `url` and applies the schema.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new().max_connections(5).connect(url).await?;
        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    /// Creates a fresh in-memory database. Used in tests.
    pub async fn in_memory() -> StoreResult<Self> {
        // A single connection keeps every query on the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    async fn apply_schema(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::debug!("Database schema applied");
        Ok(())
    }

    fn map_unique_violation(e: sqlx::Error, entity_type: &'static str, id: String) -> StoreError {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::already_exists(entity_type, id)
            }
            _ => StoreError::Database(e),
        }
    }
}

#[async_trait]
impl FinanceStore for SqliteStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, "User", user.username.clone()))?;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let result = sqlx::query(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.updated_at.to_rfc3339())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, "User", user.username.clone()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("User", user.id.to_string()));
        }
        Ok(user)
    }

    // =========================================================================
    // Category operations
    // =========================================================================

    async fn create_category(&self, category: Category) -> StoreResult<Category> {
        sqlx::query(
            "INSERT INTO categories (id, name, description, color, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(category.id.to_string())
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.color)
        .bind(category.user_id.to_string())
        .bind(category.created_at.to_rfc3339())
        .bind(category.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(category)
    }

    async fn get_category(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT * FROM categories WHERE id = ? AND user_id = ?",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Category::from))
    }

    async fn list_categories(&self, user_id: Uuid) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT * FROM categories WHERE user_id = ? ORDER BY created_at",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn update_category(&self, category: Category) -> StoreResult<Category> {
        let result = sqlx::query(
            "UPDATE categories SET name = ?, description = ?, color = ?, updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.color)
        .bind(category.updated_at.to_rfc3339())
        .bind(category.id.to_string())
        .bind(category.user_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Category", category.id.to_string()));
        }
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Category", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Transaction operations
    // =========================================================================

    async fn create_transaction(&self, transaction: Transaction) -> StoreResult<Transaction> {
        sqlx::query(
            "INSERT INTO transactions \
             (id, amount, description, date, kind, category_id, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(transaction.id.to_string())
        .bind(transaction.amount)
        .bind(&transaction.description)
        .bind(transaction.date.to_string())
        .bind(transaction.kind.as_str())
        .bind(transaction.category_id.to_string())
        .bind(transaction.user_id.to_string())
        .bind(transaction.created_at.to_rfc3339())
        .bind(transaction.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(transaction)
    }

    async fn get_transaction(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions WHERE id = ? AND user_id = ?",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Transaction::from))
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
    ) -> StoreResult<Vec<Transaction>> {
        // Dynamic WHERE clause; every condition binds positionally.
        let mut sql = String::from("SELECT * FROM transactions WHERE user_id = ?");
        if filter.category_id.is_some() {
            sql.push_str(" AND category_id = ?");
        }
        if filter.kind.is_some() {
            sql.push_str(" AND kind = ?");
        }
        if filter.from.is_some() {
            sql.push_str(" AND date >= ?");
        }
        if filter.to.is_some() {
            sql.push_str(" AND date <= ?");
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC");

        let mut query = sqlx::query_as::<_, TransactionRow>(&sql).bind(user_id.to_string());
        if let Some(category_id) = filter.category_id {
            query = query.bind(category_id.to_string());
        }
        if let Some(kind) = filter.kind {
            query = query.bind(kind.as_str());
        }
        if let Some(from) = filter.from {
            query = query.bind(from.to_string());
        }
        if let Some(to) = filter.to {
            query = query.bind(to.to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    async fn update_transaction(&self, transaction: Transaction) -> StoreResult<Transaction> {
        let result = sqlx::query(
            "UPDATE transactions SET amount = ?, description = ?, date = ?, kind = ?, \
             category_id = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(transaction.amount)
        .bind(&transaction.description)
        .bind(transaction.date.to_string())
        .bind(transaction.kind.as_str())
        .bind(transaction.category_id.to_string())
        .bind(transaction.updated_at.to_rfc3339())
        .bind(transaction.id.to_string())
        .bind(transaction.user_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                "Transaction",
                transaction.id.to_string(),
            ));
        }
        Ok(transaction)
    }

    async fn delete_transaction(&self, id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Transaction", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Budget operations
    // =========================================================================

    async fn create_budget(&self, budget: Budget) -> StoreResult<Budget> {
        sqlx::query(
            "INSERT INTO budgets \
             (id, amount, start_date, end_date, category_id, user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(budget.id.to_string())
        .bind(budget.amount)
        .bind(budget.start_date.to_string())
        .bind(budget.end_date.to_string())
        .bind(budget.category_id.to_string())
        .bind(budget.user_id.to_string())
        .bind(budget.created_at.to_rfc3339())
        .bind(budget.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(budget)
    }

    async fn get_budget(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Budget>> {
        let row = sqlx::query_as::<_, BudgetRow>(
            "SELECT * FROM budgets WHERE id = ? AND user_id = ?",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Budget::from))
    }

    async fn list_budgets(&self, user_id: Uuid, filter: BudgetFilter) -> StoreResult<Vec<Budget>> {
        let mut sql = String::from("SELECT * FROM budgets WHERE user_id = ?");
        if filter.category_id.is_some() {
            sql.push_str(" AND category_id = ?");
        }
        if filter.active_on.is_some() {
            sql.push_str(" AND start_date <= ? AND end_date >= ?");
        }
        sql.push_str(" ORDER BY created_at");

        let mut query = sqlx::query_as::<_, BudgetRow>(&sql).bind(user_id.to_string());
        if let Some(category_id) = filter.category_id {
            query = query.bind(category_id.to_string());
        }
        if let Some(active_on) = filter.active_on {
            let date = active_on.to_string();
            query = query.bind(date.clone()).bind(date);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Budget::from).collect())
    }

    async fn update_budget(&self, budget: Budget) -> StoreResult<Budget> {
        let result = sqlx::query(
            "UPDATE budgets SET amount = ?, start_date = ?, end_date = ?, category_id = ?, \
             updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(budget.amount)
        .bind(budget.start_date.to_string())
        .bind(budget.end_date.to_string())
        .bind(budget.category_id.to_string())
        .bind(budget.updated_at.to_rfc3339())
        .bind(budget.id.to_string())
        .bind(budget.user_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Budget", budget.id.to_string()));
        }
        Ok(budget)
    }

    async fn delete_budget(&self, id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Budget", id.to_string()));
        }
        Ok(())
    }
}
