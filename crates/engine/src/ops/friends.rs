use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, friendships};

use super::{Engine, with_tx};

/// Where a pair of users stands, from the asking user's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FriendshipStatus {
    /// No request either way.
    NotConnected,
    /// The asking user sent a request that is still pending.
    PendingSent,
    /// The other user sent a request awaiting this user's answer.
    PendingReceived,
    Friends,
}

/// One friendship row seen from one side of the pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriendLink {
    /// The other user of the pair.
    pub username: String,
    pub requested_by: String,
    pub accepted: bool,
    pub since: DateTime<Utc>,
}

impl Engine {
    /// Send a friend request. The pair is stored once, under its canonical
    /// ordering, so the same relationship can never exist twice.
    pub async fn request_friendship(
        &self,
        from_user: &str,
        to_user: &str,
    ) -> ResultEngine<FriendLink> {
        with_tx!(self, |db_tx| {
            if from_user == to_user {
                return Err(EngineError::InvalidName(
                    "cannot send a friend request to yourself".to_string(),
                ));
            }
            self.require_user_exists(&db_tx, from_user).await?;
            self.require_user_exists(&db_tx, to_user).await?;

            let (lo, hi) = friendships::canonical_pair(from_user, to_user);
            let existing = friendships::Entity::find_by_id((lo.to_string(), hi.to_string()))
                .one(&db_tx)
                .await?;
            if let Some(row) = existing {
                let what = if row.accepted {
                    "friendship"
                } else {
                    "friend request"
                };
                return Err(EngineError::ExistingKey(what.to_string()));
            }

            let now = Utc::now();
            let active = friendships::ActiveModel {
                user_lo: ActiveValue::Set(lo.to_string()),
                user_hi: ActiveValue::Set(hi.to_string()),
                requested_by: ActiveValue::Set(from_user.to_string()),
                accepted: ActiveValue::Set(false),
                created_at: ActiveValue::Set(now),
            };
            active.insert(&db_tx).await?;

            Ok(FriendLink {
                username: to_user.to_string(),
                requested_by: from_user.to_string(),
                accepted: false,
                since: now,
            })
        })
    }

    /// Accept a pending request. Only the user who did not send it may
    /// accept.
    pub async fn accept_friendship(
        &self,
        acting_user: &str,
        other: &str,
    ) -> ResultEngine<FriendLink> {
        with_tx!(self, |db_tx| {
            let (lo, hi) = friendships::canonical_pair(acting_user, other);
            let row = friendships::Entity::find_by_id((lo.to_string(), hi.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("friendship not exists".to_string()))?;
            if row.accepted {
                return Err(EngineError::ExistingKey("friendship".to_string()));
            }
            if row.requested_by == acting_user {
                return Err(EngineError::Forbidden(
                    "only the requested user can accept".to_string(),
                ));
            }

            let mut active: friendships::ActiveModel = row.into();
            active.accepted = ActiveValue::Set(true);
            let updated = active.update(&db_tx).await?;

            Ok(FriendLink {
                username: other.to_string(),
                requested_by: updated.requested_by,
                accepted: true,
                since: updated.created_at,
            })
        })
    }

    /// Remove the row for the pair. Declining a pending request and
    /// unfriending are the same operation, from either side.
    pub async fn remove_friendship(&self, acting_user: &str, other: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (lo, hi) = friendships::canonical_pair(acting_user, other);
            let result = friendships::Entity::delete_by_id((lo.to_string(), hi.to_string()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("friendship not exists".to_string()));
            }
            Ok(())
        })
    }

    /// All of a user's friendship rows, accepted or pending, oldest first.
    pub async fn list_friends(&self, user_id: &str) -> ResultEngine<Vec<FriendLink>> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let rows = friendships::Entity::find()
                .filter(
                    Condition::any()
                        .add(friendships::Column::UserLo.eq(user_id.to_string()))
                        .add(friendships::Column::UserHi.eq(user_id.to_string())),
                )
                .order_by_asc(friendships::Column::CreatedAt)
                .order_by_asc(friendships::Column::UserLo)
                .all(&db_tx)
                .await?;

            Ok(rows
                .into_iter()
                .map(|row| {
                    let username = if row.user_lo == user_id {
                        row.user_hi.clone()
                    } else {
                        row.user_lo.clone()
                    };
                    FriendLink {
                        username,
                        requested_by: row.requested_by,
                        accepted: row.accepted,
                        since: row.created_at,
                    }
                })
                .collect())
        })
    }

    /// One lookup on the canonical pair answers both directions.
    pub async fn friendship_status(
        &self,
        user_id: &str,
        other: &str,
    ) -> ResultEngine<FriendshipStatus> {
        with_tx!(self, |db_tx| {
            let (lo, hi) = friendships::canonical_pair(user_id, other);
            let row = friendships::Entity::find_by_id((lo.to_string(), hi.to_string()))
                .one(&db_tx)
                .await?;
            Ok(match row {
                None => FriendshipStatus::NotConnected,
                Some(row) if row.accepted => FriendshipStatus::Friends,
                Some(row) if row.requested_by == user_id => FriendshipStatus::PendingSent,
                Some(_) => FriendshipStatus::PendingReceived,
            })
        })
    }
}
