//! Per-person shares of a split expense, with their settlement status.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Settlement status of one participant's share.
///
/// `Paid` and `Declined` are terminal. Only `Pending` and `Accepted` shares
/// still count toward outstanding balances: a paid share is settled and a
/// declined share is not a pending debt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Pending,
    Accepted,
    Declined,
    Paid,
}

impl ParticipantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Paid => "paid",
        }
    }

    /// The status state machine: `Pending` may move anywhere, `Accepted` only
    /// to `Paid`, and the two terminal states never move again.
    pub fn can_transition_to(self, next: ParticipantStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Declined)
                | (Self::Pending, Self::Paid)
                | (Self::Accepted, Self::Paid)
        )
    }

    /// Whether a share in this status still counts toward owed/owing totals.
    pub fn counts_toward_balance(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }
}

impl TryFrom<&str> for ParticipantStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidStatus(format!(
                "invalid participant status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitParticipant {
    pub id: Uuid,
    pub split_expense_id: Uuid,
    pub user_id: String,
    pub amount_due_minor: i64,
    pub status: ParticipantStatus,
}

/// The `status` column is nullable: rows written before the status column
/// existed have NULL there and decode as `Pending`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "split_participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub split_expense_id: Uuid,
    pub user_id: String,
    pub amount_due_minor: i64,
    pub status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::split_expenses::Entity",
        from = "Column::SplitExpenseId",
        to = "super::split_expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    SplitExpenses,
}

impl Related<super::split_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SplitExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SplitParticipant> for ActiveModel {
    fn from(participant: &SplitParticipant) -> Self {
        Self {
            id: ActiveValue::Set(participant.id),
            split_expense_id: ActiveValue::Set(participant.split_expense_id),
            user_id: ActiveValue::Set(participant.user_id.clone()),
            amount_due_minor: ActiveValue::Set(participant.amount_due_minor),
            status: ActiveValue::Set(Some(participant.status.as_str().to_string())),
        }
    }
}

impl TryFrom<Model> for SplitParticipant {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = match model.status.as_deref() {
            None => ParticipantStatus::Pending,
            Some(raw) => ParticipantStatus::try_from(raw)?,
        };
        Ok(Self {
            id: model.id,
            split_expense_id: model.split_expense_id,
            user_id: model.user_id,
            amount_due_minor: model.amount_due_minor,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_status_decodes_as_pending() {
        let model = Model {
            id: Uuid::new_v4(),
            split_expense_id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            amount_due_minor: 100,
            status: None,
        };
        let participant = SplitParticipant::try_from(model).unwrap();
        assert_eq!(participant.status, ParticipantStatus::Pending);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let model = Model {
            id: Uuid::new_v4(),
            split_expense_id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            amount_due_minor: 100,
            status: Some("maybe".to_string()),
        };
        assert!(matches!(
            SplitParticipant::try_from(model),
            Err(EngineError::InvalidStatus(_))
        ));
    }

    #[test]
    fn transitions_follow_the_state_machine() {
        use ParticipantStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Declined));
        assert!(Pending.can_transition_to(Paid));
        assert!(Accepted.can_transition_to(Paid));

        assert!(!Accepted.can_transition_to(Declined));
        assert!(!Paid.can_transition_to(Pending));
        assert!(!Declined.can_transition_to(Accepted));
        assert!(!Paid.can_transition_to(Paid));
    }

    #[test]
    fn only_pending_and_accepted_count_toward_balance() {
        use ParticipantStatus::*;
        assert!(Pending.counts_toward_balance());
        assert!(Accepted.counts_toward_balance());
        assert!(!Declined.counts_toward_balance());
        assert!(!Paid.counts_toward_balance());
    }
}
