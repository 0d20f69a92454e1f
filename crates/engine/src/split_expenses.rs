//! Split expenses: one shared cost fronted by a creator.
//!
//! The per-person shares live in [`super::split_participants`]; on creation
//! the engine enforces that shares sum to `total_amount_minor`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitExpense {
    pub id: Uuid,
    pub creator_id: String,
    pub total_amount_minor: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "split_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub creator_id: String,
    pub total_amount_minor: i64,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::split_participants::Entity")]
    Participants,
}

impl Related<super::split_participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SplitExpense> for ActiveModel {
    fn from(split: &SplitExpense) -> Self {
        Self {
            id: ActiveValue::Set(split.id),
            creator_id: ActiveValue::Set(split.creator_id.clone()),
            total_amount_minor: ActiveValue::Set(split.total_amount_minor),
            description: ActiveValue::Set(split.description.clone()),
            created_at: ActiveValue::Set(split.created_at),
        }
    }
}

impl From<Model> for SplitExpense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            creator_id: model.creator_id,
            total_amount_minor: model.total_amount_minor,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
