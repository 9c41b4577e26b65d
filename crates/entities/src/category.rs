//! Category-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display color for categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#000000";

/// A transaction category, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    pub description: String,
    /// Display color as a hex string, e.g. `#00FF00`.
    pub color: String,
    /// Owning user.
    pub user_id: Uuid,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category for the given user.
    pub fn new(name: impl Into<String>, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
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

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_creation() {
        let user_id = Uuid::new_v4();
        let category = Category::new("Groceries", user_id)
            .with_description("Food and household items")
            .with_color("#00FF00");

        assert_eq!(category.name, "Groceries");
        assert_eq!(category.color, "#00FF00");
        assert_eq!(category.user_id, user_id);
    }

    #[test]
    fn test_category_defaults() {
        let category = Category::new("Rent", Uuid::new_v4());

        assert_eq!(category.color, DEFAULT_CATEGORY_COLOR);
        assert!(category.description.is_empty());
    }
}
