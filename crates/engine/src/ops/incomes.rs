use base64::Engine as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Income, IncomeCmd, ResultEngine, UpdateIncomeCmd, incomes};

use super::{Engine, normalize_optional_text, require_positive_amount, with_tx};

/// Filters for listing incomes. `from` and `to` are both inclusive, in UTC.
#[derive(Clone, Debug, Default)]
pub struct IncomeListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

fn validate_list_filter(filter: &IncomeListFilter) -> ResultEngine<()> {
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
struct IncomesCursor {
    occurred_at: DateTime<Utc>,
    income_id: Uuid,
}

impl IncomesCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid incomes cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid incomes cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid incomes cursor".to_string()))
    }
}

impl Engine {
    pub async fn create_income(&self, cmd: IncomeCmd) -> ResultEngine<Income> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &cmd.user_id).await?;
            require_positive_amount(cmd.amount_minor, "income amount")?;

            let income = Income {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                amount_minor: cmd.amount_minor,
                occurred_at: cmd.occurred_at,
                source: normalize_optional_text(cmd.source.as_deref()),
            };
            incomes::ActiveModel::from(&income).insert(&db_tx).await?;
            Ok(income)
        })
    }

    /// Update an income. `None` fields are left unchanged; `Some(None)`
    /// clears the source label.
    pub async fn update_income(&self, cmd: UpdateIncomeCmd) -> ResultEngine<Income> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_income_owned(&db_tx, &cmd.user_id, cmd.income_id)
                .await?;
            let no_changes =
                cmd.amount_minor.is_none() && cmd.occurred_at.is_none() && cmd.source.is_none();
            if no_changes {
                Ok(Income::from(model))
            } else {
                let mut active: incomes::ActiveModel = model.into();
                if let Some(amount_minor) = cmd.amount_minor {
                    require_positive_amount(amount_minor, "income amount")?;
                    active.amount_minor = ActiveValue::Set(amount_minor);
                }
                if let Some(occurred_at) = cmd.occurred_at {
                    active.occurred_at = ActiveValue::Set(occurred_at);
                }
                if let Some(source) = cmd.source {
                    active.source = ActiveValue::Set(normalize_optional_text(source.as_deref()));
                }
                let updated = active.update(&db_tx).await?;
                Ok(Income::from(updated))
            }
        })
    }

    pub async fn delete_income(&self, user_id: &str, income_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_income_owned(&db_tx, user_id, income_id).await?;
            incomes::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Lists a user's most recent incomes.
    pub async fn list_incomes(
        &self,
        user_id: &str,
        limit: u64,
        filter: &IncomeListFilter,
    ) -> ResultEngine<Vec<Income>> {
        let (items, _next) = self.list_incomes_page(user_id, limit, None, filter).await?;
        Ok(items)
    }

    /// Lists a user's incomes with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(occurred_at DESC, id DESC)`.
    pub async fn list_incomes_page(
        &self,
        user_id: &str,
        limit: u64,
        cursor: Option<&str>,
        filter: &IncomeListFilter,
    ) -> ResultEngine<(Vec<Income>, Option<String>)> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            validate_list_filter(filter)?;

            let limit_plus_one = limit.saturating_add(1);
            let mut query = incomes::Entity::find()
                .filter(incomes::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(incomes::Column::OccurredAt)
                .order_by_desc(incomes::Column::Id)
                .limit(limit_plus_one);

            if let Some(cursor) = cursor {
                let cursor = IncomesCursor::decode(cursor)?;
                query = query.filter(
                    Condition::any()
                        .add(incomes::Column::OccurredAt.lt(cursor.occurred_at))
                        .add(
                            Condition::all()
                                .add(incomes::Column::OccurredAt.eq(cursor.occurred_at))
                                .add(incomes::Column::Id.lt(cursor.income_id)),
                        ),
                );
            }
            if let Some(from) = filter.from {
                query = query.filter(incomes::Column::OccurredAt.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(incomes::Column::OccurredAt.lte(to));
            }

            let rows: Vec<incomes::Model> = query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let out: Vec<Income> = rows
                .into_iter()
                .take(limit as usize)
                .map(Income::from)
                .collect();

            let next_cursor = out.last().map(|income| IncomesCursor {
                occurred_at: income.occurred_at,
                income_id: income.id,
            });
            let next_cursor = if has_more {
                next_cursor.map(|c| c.encode()).transpose()?
            } else {
                None
            };

            Ok((out, next_cursor))
        })
    }

    async fn require_income_owned(
        &self,
        db: &sea_orm::DatabaseTransaction,
        user_id: &str,
        income_id: Uuid,
    ) -> ResultEngine<incomes::Model> {
        incomes::Entity::find_by_id(income_id)
            .filter(incomes::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("income not exists".to_string()))
    }
}
