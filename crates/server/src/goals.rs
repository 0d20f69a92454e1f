//! Savings goal API endpoints.

use api_types::goal::{GoalCreate, GoalCreated, GoalListResponse, GoalUpdate, GoalView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_goal(goal: engine::SavingsGoal) -> GoalView {
    GoalView {
        id: goal.id,
        name: goal.name,
        target_amount_minor: goal.target_amount_minor,
        saved_amount_minor: goal.saved_amount_minor,
        target_date: goal.target_date,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state
        .engine
        .list_goals(&user.username)
        .await?
        .into_iter()
        .map(map_goal)
        .collect();

    Ok(Json(GoalListResponse { goals }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalCreate>,
) -> Result<(StatusCode, Json<GoalCreated>), ServerError> {
    let goal = state
        .engine
        .create_goal(engine::GoalCmd {
            user_id: user.username.clone(),
            name: payload.name,
            target_amount_minor: payload.target_amount_minor,
            target_date: payload.target_date.map(|dt| dt.with_timezone(&Utc)),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(GoalCreated { id: goal.id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let has_field_update = payload.name.is_some()
        || payload.target_amount_minor.is_some()
        || payload.target_date.is_some();

    let mut goal = None;
    if has_field_update {
        goal = Some(
            state
                .engine
                .update_goal(engine::UpdateGoalCmd {
                    user_id: user.username.clone(),
                    goal_id: id,
                    name: payload.name,
                    target_amount_minor: payload.target_amount_minor,
                    target_date: payload
                        .target_date
                        .map(|opt| opt.map(|dt| dt.with_timezone(&Utc))),
                })
                .await?,
        );
    }

    if let Some(add_minor) = payload.add_minor {
        goal = Some(
            state
                .engine
                .add_to_goal(&user.username, id, add_minor)
                .await?,
        );
    }

    let Some(goal) = goal else {
        return Err(ServerError::Generic(
            "provide at least one of name, target_amount_minor, target_date or add_minor"
                .to_string(),
        ));
    };

    Ok(Json(map_goal(goal)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
