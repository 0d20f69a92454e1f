//! Income API endpoints.

use api_types::income::{
    IncomeCreated, IncomeList, IncomeListResponse, IncomeNew, IncomeUpdate, IncomeView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_income(income: engine::Income) -> IncomeView {
    IncomeView {
        id: income.id,
        amount_minor: income.amount_minor,
        occurred_at: income.occurred_at,
        source: income.source,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeList>,
) -> Result<Json<IncomeListResponse>, ServerError> {
    let limit = payload.limit.unwrap_or(50);
    let filter = engine::IncomeListFilter {
        from: payload.from.map(|dt| dt.with_timezone(&Utc)),
        to: payload.to.map(|dt| dt.with_timezone(&Utc)),
    };

    let (incomes, next_cursor) = state
        .engine
        .list_incomes_page(&user.username, limit, payload.cursor.as_deref(), &filter)
        .await?;

    Ok(Json(IncomeListResponse {
        incomes: incomes.into_iter().map(map_income).collect(),
        next_cursor,
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<IncomeCreated>), ServerError> {
    let income = state
        .engine
        .create_income(engine::IncomeCmd {
            user_id: user.username.clone(),
            amount_minor: payload.amount_minor,
            occurred_at: payload.occurred_at.with_timezone(&Utc),
            source: payload.source,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(IncomeCreated { id: income.id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomeUpdate>,
) -> Result<Json<IncomeView>, ServerError> {
    let income = state
        .engine
        .update_income(engine::UpdateIncomeCmd {
            user_id: user.username.clone(),
            income_id: id,
            amount_minor: payload.amount_minor,
            occurred_at: payload.occurred_at.map(|dt| dt.with_timezone(&Utc)),
            source: payload.source,
        })
        .await?;

    Ok(Json(map_income(income)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_income(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
