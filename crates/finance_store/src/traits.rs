//! Store trait definitions.

use async_trait::async_trait;
use chrono::NaiveDate;
use entities::{Budget, Category, Transaction, TransactionKind, User};
use uuid::Uuid;

use crate::StoreResult;

/// Filter options for listing transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Filter by income/expense.
    pub kind: Option<TransactionKind>,
    /// Earliest date (inclusive).
    pub from: Option<NaiveDate>,
    /// Latest date (inclusive).
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Returns true if the transaction matches every set predicate.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.category_id.is_none_or(|id| tx.category_id == id)
            && self.kind.is_none_or(|kind| tx.kind == kind)
            && self.from.is_none_or(|from| tx.date >= from)
            && self.to.is_none_or(|to| tx.date <= to)
    }
}

/// Filter options for listing budgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetFilter {
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Only budgets whose date range contains this date.
    pub active_on: Option<NaiveDate>,
}

impl BudgetFilter {
    /// Returns true if the budget matches every set predicate.
    pub fn matches(&self, budget: &Budget) -> bool {
        self.category_id.is_none_or(|id| budget.category_id == id)
            && self.active_on.is_none_or(|date| budget.is_active(date))
    }
}

/// Trait for Fintrack storage operations.
///
/// Every lookup, update, and delete of an owned entity is scoped by the
/// owning user id; a row belonging to another user behaves exactly like a
/// missing row.
#[async_trait]
pub trait FinanceStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by username.
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Updates a user.
    async fn update_user(&self, user: User) -> StoreResult<User>;

    // =========================================================================
    // Category operations
    // =========================================================================

    /// Creates a new category.
    async fn create_category(&self, category: Category) -> StoreResult<Category>;

    /// Gets a category owned by the given user.
    async fn get_category(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Category>>;

    /// Lists the user's categories.
    async fn list_categories(&self, user_id: Uuid) -> StoreResult<Vec<Category>>;

    /// Updates a category.
    async fn update_category(&self, category: Category) -> StoreResult<Category>;

    /// Deletes a category owned by the given user.
    async fn delete_category(&self, id: Uuid, user_id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Transaction operations
    // =========================================================================

    /// Creates a new transaction.
    async fn create_transaction(&self, transaction: Transaction) -> StoreResult<Transaction>;

    /// Gets a transaction owned by the given user.
    async fn get_transaction(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Transaction>>;

    /// Lists the user's transactions matching the filter, newest first.
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
    ) -> StoreResult<Vec<Transaction>>;

    /// Updates a transaction.
    async fn update_transaction(&self, transaction: Transaction) -> StoreResult<Transaction>;

    /// Deletes a transaction owned by the given user.
    async fn delete_transaction(&self, id: Uuid, user_id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Budget operations
    // =========================================================================

    /// Creates a new budget.
    async fn create_budget(&self, budget: Budget) -> StoreResult<Budget>;

    /// Gets a budget owned by the given user.
    async fn get_budget(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Budget>>;

    /// Lists the user's budgets matching the filter.
    async fn list_budgets(&self, user_id: Uuid, filter: BudgetFilter) -> StoreResult<Vec<Budget>>;

    /// Updates a budget.
    async fn update_budget(&self, budget: Budget) -> StoreResult<Budget>;

    /// Deletes a budget owned by the given user.
    async fn delete_budget(&self, id: Uuid, user_id: Uuid) -> StoreResult<()>;
}
