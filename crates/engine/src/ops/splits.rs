use std::collections::HashSet;

use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, ParticipantStatus, ResultEngine, SplitCmd, SplitExpense, SplitParticipant,
    split_expenses, split_participants,
};

use super::{Engine, normalize_optional_text, require_positive_amount, with_tx};

/// A split expense with its participant rows attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitExpenseView {
    pub expense: SplitExpense,
    pub participants: Vec<SplitParticipant>,
}

impl Engine {
    /// Create a split expense with explicit per-user shares.
    ///
    /// Shares must be non-empty, each positive, name distinct users, and sum
    /// exactly to the total. Every sharer other than the creator must be an
    /// accepted friend of the creator. The creator's own share row, when
    /// present, is created `Paid` since the creator fronted the bill; every
    /// other row starts `Pending`.
    pub async fn create_split_expense(&self, cmd: SplitCmd) -> ResultEngine<SplitExpenseView> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &cmd.creator_id).await?;
            require_positive_amount(cmd.total_amount_minor, "split total")?;
            if cmd.shares.is_empty() {
                return Err(EngineError::InvalidAmount(
                    "split needs at least one share".to_string(),
                ));
            }

            let mut seen: HashSet<&str> = HashSet::with_capacity(cmd.shares.len());
            let mut shares_sum = 0i64;
            for (user, amount_minor) in &cmd.shares {
                require_positive_amount(*amount_minor, "share amount")?;
                if !seen.insert(user.as_str()) {
                    return Err(EngineError::ExistingKey(format!("share for {user}")));
                }
                shares_sum += amount_minor;
            }
            if shares_sum != cmd.total_amount_minor {
                return Err(EngineError::InvalidAmount(format!(
                    "shares sum to {shares_sum}, expected the total {}",
                    cmd.total_amount_minor
                )));
            }
            for (user, _) in &cmd.shares {
                if user != &cmd.creator_id {
                    self.require_user_exists(&db_tx, user).await?;
                    self.require_accepted_friend(&db_tx, &cmd.creator_id, user)
                        .await?;
                }
            }

            let expense = SplitExpense {
                id: Uuid::new_v4(),
                creator_id: cmd.creator_id.clone(),
                total_amount_minor: cmd.total_amount_minor,
                description: normalize_optional_text(cmd.description.as_deref()),
                created_at: cmd.created_at,
            };
            split_expenses::ActiveModel::from(&expense)
                .insert(&db_tx)
                .await?;

            let mut participants = Vec::with_capacity(cmd.shares.len());
            for (user, amount_minor) in &cmd.shares {
                let status = if user == &cmd.creator_id {
                    ParticipantStatus::Paid
                } else {
                    ParticipantStatus::Pending
                };
                let participant = SplitParticipant {
                    id: Uuid::new_v4(),
                    split_expense_id: expense.id,
                    user_id: user.clone(),
                    amount_due_minor: *amount_minor,
                    status,
                };
                split_participants::ActiveModel::from(&participant)
                    .insert(&db_tx)
                    .await?;
                participants.push(participant);
            }

            Ok(SplitExpenseView {
                expense,
                participants,
            })
        })
    }

    /// Even per-head shares for a total, remainder cents going to the first
    /// shares. Every share must come out at least one minor unit.
    pub fn split_evenly(total_minor: i64, participants: u32) -> ResultEngine<Vec<i64>> {
        if participants == 0 {
            return Err(EngineError::InvalidAmount(
                "cannot split between zero participants".to_string(),
            ));
        }
        require_positive_amount(total_minor, "split total")?;
        let count = i64::from(participants);
        if total_minor < count {
            return Err(EngineError::InvalidAmount(format!(
                "cannot split {total_minor} between {participants} participants"
            )));
        }
        let base = total_minor / count;
        let remainder = total_minor % count;
        Ok((0..count)
            .map(|i| if i < remainder { base + 1 } else { base })
            .collect())
    }

    /// Move one participant's share through the status state machine.
    ///
    /// A participant may move their own row along any legal transition; the
    /// expense's creator may additionally mark other rows `Paid`. `Paid` and
    /// `Declined` are terminal.
    pub async fn set_participant_status(
        &self,
        acting_user: &str,
        split_id: Uuid,
        participant_user: &str,
        new_status: ParticipantStatus,
    ) -> ResultEngine<SplitParticipant> {
        with_tx!(self, |db_tx| {
            let expense = split_expenses::Entity::find_by_id(split_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("split expense not exists".to_string())
                })?;
            let row = split_participants::Entity::find()
                .filter(split_participants::Column::SplitExpenseId.eq(split_id))
                .filter(split_participants::Column::UserId.eq(participant_user.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("participant not exists".to_string()))?;
            let participant = SplitParticipant::try_from(row.clone())?;

            let own_row = acting_user == participant_user;
            let creator_settles =
                acting_user == expense.creator_id && new_status == ParticipantStatus::Paid;
            if !own_row && !creator_settles {
                return Err(EngineError::Forbidden(format!(
                    "{acting_user} may not change this share"
                )));
            }
            if !participant.status.can_transition_to(new_status) {
                return Err(EngineError::InvalidStatus(format!(
                    "cannot move share from {} to {}",
                    participant.status.as_str(),
                    new_status.as_str()
                )));
            }

            let mut active: split_participants::ActiveModel = row.into();
            active.status = ActiveValue::Set(Some(new_status.as_str().to_string()));
            let updated = active.update(&db_tx).await?;
            SplitParticipant::try_from(updated)
        })
    }

    /// Splits visible to a user: created by them or shared with them, newest
    /// first, participants attached.
    pub async fn list_split_expenses(&self, user_id: &str) -> ResultEngine<Vec<SplitExpenseView>> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let participating: Vec<Uuid> = split_participants::Entity::find()
                .filter(split_participants::Column::UserId.eq(user_id.to_string()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|row| row.split_expense_id)
                .collect();

            let expense_models = split_expenses::Entity::find()
                .filter(
                    Condition::any()
                        .add(split_expenses::Column::CreatorId.eq(user_id.to_string()))
                        .add(split_expenses::Column::Id.is_in(participating)),
                )
                .order_by_desc(split_expenses::Column::CreatedAt)
                .order_by_desc(split_expenses::Column::Id)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(expense_models.len());
            for model in expense_models {
                let rows = split_participants::Entity::find()
                    .filter(split_participants::Column::SplitExpenseId.eq(model.id))
                    .all(&db_tx)
                    .await?;
                let mut participants = Vec::with_capacity(rows.len());
                for row in rows {
                    participants.push(SplitParticipant::try_from(row)?);
                }
                out.push(SplitExpenseView {
                    expense: model.into(),
                    participants,
                });
            }
            Ok(out)
        })
    }

    /// Delete a split expense and all its participant rows. Creator only.
    pub async fn delete_split_expense(&self, user_id: &str, split_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let expense = split_expenses::Entity::find_by_id(split_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| {
                    EngineError::KeyNotFound("split expense not exists".to_string())
                })?;
            if expense.creator_id != user_id {
                return Err(EngineError::Forbidden(
                    "only the creator can delete a split expense".to_string(),
                ));
            }
            split_participants::Entity::delete_many()
                .filter(split_participants::Column::SplitExpenseId.eq(split_id))
                .exec(&db_tx)
                .await?;
            split_expenses::Entity::delete_by_id(split_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split_distributes_remainder_to_first_shares() {
        assert_eq!(Engine::split_evenly(90, 3).unwrap(), vec![30, 30, 30]);
        assert_eq!(Engine::split_evenly(100, 3).unwrap(), vec![34, 33, 33]);
        assert_eq!(Engine::split_evenly(101, 2).unwrap(), vec![51, 50]);
    }

    #[test]
    fn even_split_rejects_degenerate_inputs() {
        assert!(matches!(
            Engine::split_evenly(100, 0),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            Engine::split_evenly(0, 2),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            Engine::split_evenly(2, 3),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
