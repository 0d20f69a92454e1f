//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Create an expense.
#[derive(Clone, Debug)]
pub struct ExpenseCmd {
    pub user_id: String,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub is_fixed: bool,
    pub note: Option<String>,
}

impl ExpenseCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount_minor: i64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            amount_minor,
            occurred_at,
            category_id: None,
            is_fixed: false,
            note: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Update an existing expense. `None` fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateExpenseCmd {
    pub user_id: String,
    pub expense_id: Uuid,
    pub amount_minor: Option<i64>,
    pub occurred_at: Option<DateTime<Utc>>,
    /// `Some(None)` clears the category, `Some(Some(id))` retargets it.
    pub category_id: Option<Option<Uuid>>,
    pub is_fixed: Option<bool>,
    pub note: Option<Option<String>>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, expense_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            expense_id,
            amount_minor: None,
            occurred_at: None,
            category_id: None,
            is_fixed: None,
            note: None,
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Option<Uuid>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn is_fixed(mut self, is_fixed: bool) -> Self {
        self.is_fixed = Some(is_fixed);
        self
    }

    #[must_use]
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = Some(note);
        self
    }
}

/// Create an income.
#[derive(Clone, Debug)]
pub struct IncomeCmd {
    pub user_id: String,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    pub source: Option<String>,
}

impl IncomeCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount_minor: i64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            amount_minor,
            occurred_at,
            source: None,
        }
    }

    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Update an existing income. `None` fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateIncomeCmd {
    pub user_id: String,
    pub income_id: Uuid,
    pub amount_minor: Option<i64>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub source: Option<Option<String>>,
}

impl UpdateIncomeCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, income_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            income_id,
            amount_minor: None,
            occurred_at: None,
            source: None,
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn source(mut self, source: Option<String>) -> Self {
        self.source = Some(source);
        self
    }
}

/// Create a split expense with explicit per-user shares.
///
/// Shares are `(username, amount_due_minor)` pairs and must sum to
/// `total_amount_minor`. The creator may appear among the shares; their row
/// is created already settled.
#[derive(Clone, Debug)]
pub struct SplitCmd {
    pub creator_id: String,
    pub total_amount_minor: i64,
    pub shares: Vec<(String, i64)>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SplitCmd {
    #[must_use]
    pub fn new(
        creator_id: impl Into<String>,
        total_amount_minor: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            creator_id: creator_id.into(),
            total_amount_minor,
            shares: Vec::new(),
            description: None,
            created_at,
        }
    }

    #[must_use]
    pub fn share(mut self, user_id: impl Into<String>, amount_due_minor: i64) -> Self {
        self.shares.push((user_id.into(), amount_due_minor));
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Create a savings goal.
#[derive(Clone, Debug)]
pub struct GoalCmd {
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub target_date: Option<DateTime<Utc>>,
}

impl GoalCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        target_amount_minor: i64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            target_amount_minor,
            target_date: None,
        }
    }

    #[must_use]
    pub fn target_date(mut self, target_date: DateTime<Utc>) -> Self {
        self.target_date = Some(target_date);
        self
    }
}

/// Update an existing savings goal. `None` fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateGoalCmd {
    pub user_id: String,
    pub goal_id: Uuid,
    pub name: Option<String>,
    pub target_amount_minor: Option<i64>,
    pub target_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateGoalCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, goal_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            goal_id,
            name: None,
            target_amount_minor: None,
            target_date: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn target_amount_minor(mut self, target_amount_minor: i64) -> Self {
        self.target_amount_minor = Some(target_amount_minor);
        self
    }

    #[must_use]
    pub fn target_date(mut self, target_date: Option<DateTime<Utc>>) -> Self {
        self.target_date = Some(target_date);
        self
    }
}
