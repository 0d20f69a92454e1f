//! Income rows.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: Uuid,
    pub user_id: String,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    /// Free-form origin label ("salary", "refund", ...).
    pub source: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub amount_minor: i64,
    pub occurred_at: DateTimeUtc,
    pub source: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Income> for ActiveModel {
    fn from(income: &Income) -> Self {
        Self {
            id: ActiveValue::Set(income.id),
            user_id: ActiveValue::Set(income.user_id.clone()),
            amount_minor: ActiveValue::Set(income.amount_minor),
            occurred_at: ActiveValue::Set(income.occurred_at),
            source: ActiveValue::Set(income.source.clone()),
        }
    }
}

impl From<Model> for Income {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            amount_minor: model.amount_minor,
            occurred_at: model.occurred_at,
            source: model.source,
        }
    }
}
