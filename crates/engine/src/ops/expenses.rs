use base64::Engine as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ExpenseCmd, ResultEngine, Transaction, UpdateExpenseCmd, transactions,
};

use super::{Engine, normalize_optional_text, require_positive_amount, with_tx};

/// Filters for listing expenses.
///
/// `from` and `to` are both inclusive, in UTC.
#[derive(Clone, Debug, Default)]
pub struct ExpenseListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// If present, only expenses in this category.
    pub category_id: Option<Uuid>,
    /// If true, only fixed recurring bills.
    pub fixed_only: bool,
}

fn validate_list_filter(filter: &ExpenseListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from > to
    {
        return Err(EngineError::InvalidWindow(
            "invalid range: from must be <= to".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ExpensesCursor {
    occurred_at: DateTime<Utc>,
    expense_id: Uuid,
}

impl ExpensesCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid expenses cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid expenses cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid expenses cursor".to_string()))
    }
}

impl Engine {
    /// Record an expense. An expense filed under a fixed category is always
    /// stored as fixed, whatever the command says.
    pub async fn create_expense(&self, cmd: ExpenseCmd) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &cmd.user_id).await?;
            require_positive_amount(cmd.amount_minor, "expense amount")?;

            let mut is_fixed = cmd.is_fixed;
            let category_id = match cmd.category_id {
                Some(id) => {
                    let category = self
                        .require_category_owned(&db_tx, &cmd.user_id, id)
                        .await?;
                    is_fixed = is_fixed || category.is_fixed;
                    Some(category.id)
                }
                None => None,
            };

            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                category_id,
                amount_minor: cmd.amount_minor,
                occurred_at: cmd.occurred_at,
                is_fixed,
                note: normalize_optional_text(cmd.note.as_deref()),
            };
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    /// Update an expense. `None` fields in the command are left unchanged;
    /// `Some(None)` clears the category or note.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_expense_owned(&db_tx, &cmd.user_id, cmd.expense_id)
                .await?;
            let no_changes = cmd.amount_minor.is_none()
                && cmd.occurred_at.is_none()
                && cmd.category_id.is_none()
                && cmd.is_fixed.is_none()
                && cmd.note.is_none();
            if no_changes {
                Ok(Transaction::from(model))
            } else {
                let mut active: transactions::ActiveModel = model.into();
                if let Some(amount_minor) = cmd.amount_minor {
                    require_positive_amount(amount_minor, "expense amount")?;
                    active.amount_minor = ActiveValue::Set(amount_minor);
                }
                if let Some(occurred_at) = cmd.occurred_at {
                    active.occurred_at = ActiveValue::Set(occurred_at);
                }
                if let Some(category_id) = cmd.category_id {
                    let resolved = match category_id {
                        Some(id) => {
                            let category = self
                                .require_category_owned(&db_tx, &cmd.user_id, id)
                                .await?;
                            if category.is_fixed {
                                active.is_fixed = ActiveValue::Set(true);
                            }
                            Some(category.id)
                        }
                        None => None,
                    };
                    active.category_id = ActiveValue::Set(resolved);
                }
                if let Some(is_fixed) = cmd.is_fixed {
                    active.is_fixed = ActiveValue::Set(is_fixed);
                }
                if let Some(note) = cmd.note {
                    active.note = ActiveValue::Set(normalize_optional_text(note.as_deref()));
                }
                let updated = active.update(&db_tx).await?;
                Ok(Transaction::from(updated))
            }
        })
    }

    pub async fn delete_expense(&self, user_id: &str, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_expense_owned(&db_tx, user_id, expense_id)
                .await?;
            transactions::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Lists a user's most recent expenses.
    pub async fn list_expenses(
        &self,
        user_id: &str,
        limit: u64,
        filter: &ExpenseListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let (items, _next) = self
            .list_expenses_page(user_id, limit, None, filter)
            .await?;
        Ok(items)
    }

    /// Lists a user's expenses with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(occurred_at DESC, id DESC)`.
    pub async fn list_expenses_page(
        &self,
        user_id: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &ExpenseListFilter,
    ) -> ResultEngine<(Vec<Transaction>, Option<String>)> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            validate_list_filter(filter)?;

            let limit_plus_one = limit.saturating_add(1);
            let mut query = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(transactions::Column::OccurredAt)
                .order_by_desc(transactions::Column::Id)
                .limit(limit_plus_one);

            if let Some(cursor) = cursor {
                let cursor = ExpensesCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::OccurredAt.lt(cursor.occurred_at))
                        .add(
                            Condition::all()
                                .add(transactions::Column::OccurredAt.eq(cursor.occurred_at))
                                .add(transactions::Column::Id.lt(cursor.expense_id)),
                        ),
                );
            }
            if let Some(from) = filter.from {
                query = query.filter(transactions::Column::OccurredAt.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(transactions::Column::OccurredAt.lte(to));
            }
            if let Some(category_id) = filter.category_id {
                query = query.filter(transactions::Column::CategoryId.eq(category_id));
            }
            if filter.fixed_only {
                query = query.filter(transactions::Column::IsFixed.eq(true));
            }

            let rows: Vec<transactions::Model> = query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let out: Vec<Transaction> = rows
                .into_iter()
                .take(limit as usize)
                .map(Transaction::from)
                .collect();

            let next_cursor = out.last().map(|tx| ExpensesCursor {
                occurred_at: tx.occurred_at,
                expense_id: tx.id,
            });
            let next_cursor = if has_more {
                next_cursor.map(|c| c.encode()).transpose()?
            } else {
                None
            };

            Ok((out, next_cursor))
        })
    }

    async fn require_expense_owned(
        &self,
        db: &sea_orm::DatabaseTransaction,
        user_id: &str,
        expense_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(expense_id)
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }
}
