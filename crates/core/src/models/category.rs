use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a category's amounts count towards the income/expense series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    /// Money coming in (salary, refunds, ...)
    Income,
    /// Money going out (groceries, rent, ...)
    Expense,
    /// Movement between the user's own accounts. Counts towards neither series.
    Transfer,
}

impl CategoryKind {
    #[must_use]
    pub fn is_income(&self) -> bool {
        matches!(self, CategoryKind::Income)
    }

    #[must_use]
    pub fn is_expense(&self) -> bool {
        matches!(self, CategoryKind::Expense)
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryKind::Income => write!(f, "Income"),
            CategoryKind::Expense => write!(f, "Expense"),
            CategoryKind::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A user-defined category a transaction is filed under.
///
/// **Equality and hashing** are based solely on `id`, so renaming a
/// category does not break lookups keyed by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,

    /// Display name (e.g., "Groceries", "Salary"). Searched by the text filter.
    pub name: String,

    pub kind: CategoryKind,
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl std::hash::Hash for Category {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
        }
    }

    /// Convenience constructors for each kind
    pub fn income(name: impl Into<String>) -> Self {
        Self::new(name, CategoryKind::Income)
    }

    pub fn expense(name: impl Into<String>) -> Self {
        Self::new(name, CategoryKind::Expense)
    }

    pub fn transfer(name: impl Into<String>) -> Self {
        Self::new(name, CategoryKind::Transfer)
    }
}
