//! Split expense API endpoints.

use api_types::split::{
    ParticipantStatus as ApiStatus, ParticipantStatusUpdate, ParticipantView, SplitCreated,
    SplitListResponse, SplitNew, SplitView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_status(status: engine::ParticipantStatus) -> ApiStatus {
    match status {
        engine::ParticipantStatus::Pending => ApiStatus::Pending,
        engine::ParticipantStatus::Accepted => ApiStatus::Accepted,
        engine::ParticipantStatus::Declined => ApiStatus::Declined,
        engine::ParticipantStatus::Paid => ApiStatus::Paid,
    }
}

fn map_status_to_engine(status: ApiStatus) -> engine::ParticipantStatus {
    match status {
        ApiStatus::Pending => engine::ParticipantStatus::Pending,
        ApiStatus::Accepted => engine::ParticipantStatus::Accepted,
        ApiStatus::Declined => engine::ParticipantStatus::Declined,
        ApiStatus::Paid => engine::ParticipantStatus::Paid,
    }
}

fn map_participant(participant: engine::SplitParticipant) -> ParticipantView {
    ParticipantView {
        username: participant.user_id,
        amount_due_minor: participant.amount_due_minor,
        status: map_status(participant.status),
    }
}

fn map_split(view: engine::SplitExpenseView) -> SplitView {
    SplitView {
        id: view.expense.id,
        creator: view.expense.creator_id,
        total_amount_minor: view.expense.total_amount_minor,
        description: view.expense.description,
        created_at: view.expense.created_at,
        participants: view.participants.into_iter().map(map_participant).collect(),
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SplitListResponse>, ServerError> {
    let splits = state
        .engine
        .list_split_expenses(&user.username)
        .await?
        .into_iter()
        .map(map_split)
        .collect();

    Ok(Json(SplitListResponse { splits }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SplitNew>,
) -> Result<(StatusCode, Json<SplitCreated>), ServerError> {
    let view = state
        .engine
        .create_split_expense(engine::SplitCmd {
            creator_id: user.username.clone(),
            total_amount_minor: payload.total_amount_minor,
            shares: payload
                .shares
                .into_iter()
                .map(|share| (share.username, share.amount_due_minor))
                .collect(),
            description: payload.description,
            created_at: payload.created_at.with_timezone(&Utc),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SplitCreated {
            id: view.expense.id,
        }),
    ))
}

pub async fn set_status(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((split_id, username)): Path<(Uuid, String)>,
    Json(payload): Json<ParticipantStatusUpdate>,
) -> Result<Json<ParticipantView>, ServerError> {
    let participant = state
        .engine
        .set_participant_status(
            &user.username,
            split_id,
            &username,
            map_status_to_engine(payload.status),
        )
        .await?;

    Ok(Json(map_participant(participant)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_split_expense(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
