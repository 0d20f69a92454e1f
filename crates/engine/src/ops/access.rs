use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, categories, friendships, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    /// The pair must have an accepted friendship row, in either direction.
    pub(super) async fn require_accepted_friend(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        other: &str,
    ) -> ResultEngine<()> {
        let (lo, hi) = friendships::canonical_pair(user_id, other);
        let accepted = friendships::Entity::find_by_id((lo.to_string(), hi.to_string()))
            .one(db)
            .await?
            .is_some_and(|row| row.accepted);
        if !accepted {
            return Err(EngineError::Forbidden(format!(
                "{other} is not an accepted friend of {user_id}"
            )));
        }
        Ok(())
    }

    pub(super) async fn require_category_owned(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }
}
