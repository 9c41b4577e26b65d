//! In-memory store implementation for testing.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{Budget, Category, Transaction, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{BudgetFilter, FinanceStore, StoreError, StoreResult, TransactionFilter};

/// In-memory store for testing purposes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    transactions: Arc<RwLock<HashMap<Uuid, Transaction>>>,
    budgets: Arc<RwLock<HashMap<Uuid, Budget>>>,
}

impl MemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FinanceStore for MemoryStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::already_exists("User", user.id.to_string()));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::already_exists("User", user.username.clone()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::already_exists("User", user.email.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(StoreError::not_found("User", user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    // =========================================================================
    // Category operations
    // =========================================================================

    async fn create_category(&self, category: Category) -> StoreResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.contains_key(&category.id) {
            return Err(StoreError::already_exists(
                "Category",
                category.id.to_string(),
            ));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn list_categories(&self, user_id: Uuid) -> StoreResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.created_at);
        Ok(result)
    }

    async fn update_category(&self, category: Category) -> StoreResult<Category> {
        let mut categories = self.categories.write().await;
        match categories.get(&category.id) {
            Some(existing) if existing.user_id == category.user_id => {
                categories.insert(category.id, category.clone());
                Ok(category)
            }
            _ => Err(StoreError::not_found("Category", category.id.to_string())),
        }
    }

    async fn delete_category(&self, id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut categories = self.categories.write().await;
        match categories.get(&id) {
            Some(existing) if existing.user_id == user_id => {
                categories.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::not_found("Category", id.to_string())),
        }
    }

    // =========================================================================
    // Transaction operations
    // =========================================================================

    async fn create_transaction(&self, transaction: Transaction) -> StoreResult<Transaction> {
        let mut transactions = self.transactions.write().await;
        if transactions.contains_key(&transaction.id) {
            return Err(StoreError::already_exists(
                "Transaction",
                transaction.id.to_string(),
            ));
        }
        transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn get_transaction(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned())
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
    ) -> StoreResult<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut result: Vec<Transaction> = transactions
            .values()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect();
        // Newest first, matching the SQL ordering.
        result.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(result)
    }

    async fn update_transaction(&self, transaction: Transaction) -> StoreResult<Transaction> {
        let mut transactions = self.transactions.write().await;
        match transactions.get(&transaction.id) {
            Some(existing) if existing.user_id == transaction.user_id => {
                transactions.insert(transaction.id, transaction.clone());
                Ok(transaction)
            }
            _ => Err(StoreError::not_found(
                "Transaction",
                transaction.id.to_string(),
            )),
        }
    }

    async fn delete_transaction(&self, id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut transactions = self.transactions.write().await;
        match transactions.get(&id) {
            Some(existing) if existing.user_id == user_id => {
                transactions.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::not_found("Transaction", id.to_string())),
        }
    }

    // =========================================================================
    // Budget operations
    // =========================================================================

    async fn create_budget(&self, budget: Budget) -> StoreResult<Budget> {
        let mut budgets = self.budgets.write().await;
        if budgets.contains_key(&budget.id) {
            return Err(StoreError::already_exists("Budget", budget.id.to_string()));
        }
        budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    async fn get_budget(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Budget>> {
        let budgets = self.budgets.read().await;
        Ok(budgets.get(&id).filter(|b| b.user_id == user_id).cloned())
    }

    async fn list_budgets(&self, user_id: Uuid, filter: BudgetFilter) -> StoreResult<Vec<Budget>> {
        let budgets = self.budgets.read().await;
        let mut result: Vec<Budget> = budgets
            .values()
            .filter(|b| b.user_id == user_id && filter.matches(b))
            .cloned()
            .collect();
        result.sort_by_key(|b| b.created_at);
        Ok(result)
    }

    async fn update_budget(&self, budget: Budget) -> StoreResult<Budget> {
        let mut budgets = self.budgets.write().await;
        match budgets.get(&budget.id) {
            Some(existing) if existing.user_id == budget.user_id => {
                budgets.insert(budget.id, budget.clone());
                Ok(budget)
            }
            _ => Err(StoreError::not_found("Budget", budget.id.to_string())),
        }
    }

    async fn delete_budget(&self, id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut budgets = self.budgets.write().await;
        match budgets.get(&id) {
            Some(existing) if existing.user_id == user_id => {
                budgets.remove(&id);
                Ok(())
            }
            _ => Err(StoreError::not_found("Budget", id.to_string())),
        }
    }
}
