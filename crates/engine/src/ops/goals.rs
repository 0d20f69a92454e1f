use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, GoalCmd, ResultEngine, SavingsGoal, UpdateGoalCmd, savings_goals};

use super::{Engine, normalize_required_name, require_positive_amount, with_tx};

impl Engine {
    pub async fn create_goal(&self, cmd: GoalCmd) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &cmd.user_id).await?;
            require_positive_amount(cmd.target_amount_minor, "goal target")?;
            let name = normalize_required_name(&cmd.name, "goal")?;

            let goal = SavingsGoal {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                name,
                target_amount_minor: cmd.target_amount_minor,
                saved_amount_minor: 0,
                target_date: cmd.target_date,
            };
            savings_goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    pub async fn list_goals(&self, user_id: &str) -> ResultEngine<Vec<SavingsGoal>> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let models = savings_goals::Entity::find()
                .filter(savings_goals::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(savings_goals::Column::Name)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(SavingsGoal::from).collect())
        })
    }

    /// Update a goal's name, target amount or target date. `None` fields are
    /// left unchanged; `Some(None)` clears the target date.
    pub async fn update_goal(&self, cmd: UpdateGoalCmd) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_goal_owned(&db_tx, &cmd.user_id, cmd.goal_id)
                .await?;
            let no_changes = cmd.name.is_none()
                && cmd.target_amount_minor.is_none()
                && cmd.target_date.is_none();
            if no_changes {
                Ok(SavingsGoal::from(model))
            } else {
                let mut active: savings_goals::ActiveModel = model.into();
                if let Some(name) = &cmd.name {
                    active.name = ActiveValue::Set(normalize_required_name(name, "goal")?);
                }
                if let Some(target_amount_minor) = cmd.target_amount_minor {
                    require_positive_amount(target_amount_minor, "goal target")?;
                    active.target_amount_minor = ActiveValue::Set(target_amount_minor);
                }
                if let Some(target_date) = cmd.target_date {
                    active.target_date = ActiveValue::Set(target_date);
                }
                let updated = active.update(&db_tx).await?;
                Ok(SavingsGoal::from(updated))
            }
        })
    }

    /// Add to (or, with a negative amount, take back from) the saved total.
    /// The running total can never go below zero.
    pub async fn add_to_goal(
        &self,
        user_id: &str,
        goal_id: Uuid,
        amount_minor: i64,
    ) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |db_tx| {
            if amount_minor == 0 {
                return Err(EngineError::InvalidAmount(
                    "contribution must not be zero".to_string(),
                ));
            }
            let model = self.require_goal_owned(&db_tx, user_id, goal_id).await?;
            let new_saved = model.saved_amount_minor + amount_minor;
            if new_saved < 0 {
                return Err(EngineError::InvalidAmount(format!(
                    "cannot take back {} from a goal holding {}",
                    -amount_minor, model.saved_amount_minor
                )));
            }
            let mut active: savings_goals::ActiveModel = model.into();
            active.saved_amount_minor = ActiveValue::Set(new_saved);
            let updated = active.update(&db_tx).await?;
            Ok(SavingsGoal::from(updated))
        })
    }

    pub async fn delete_goal(&self, user_id: &str, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal_owned(&db_tx, user_id, goal_id).await?;
            savings_goals::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn require_goal_owned(
        &self,
        db: &sea_orm::DatabaseTransaction,
        user_id: &str,
        goal_id: Uuid,
    ) -> ResultEngine<savings_goals::Model> {
        savings_goals::Entity::find_by_id(goal_id)
            .filter(savings_goals::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))
    }
}
