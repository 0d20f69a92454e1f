//! Expense API endpoints.

use api_types::transaction::{
    ExpenseCreated, ExpenseList, ExpenseListResponse, ExpenseNew, ExpenseUpdate, ExpenseView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_expense(expense: engine::Transaction) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        amount_minor: expense.amount_minor,
        occurred_at: expense.occurred_at,
        category_id: expense.category_id,
        is_fixed: expense.is_fixed,
        note: expense.note,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseList>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let limit = payload.limit.unwrap_or(50);
    let filter = engine::ExpenseListFilter {
        from: payload.from.map(|dt| dt.with_timezone(&Utc)),
        to: payload.to.map(|dt| dt.with_timezone(&Utc)),
        category_id: payload.category_id,
        fixed_only: payload.fixed_only.unwrap_or(false),
    };

    let (expenses, next_cursor) = state
        .engine
        .list_expenses_page(&user.username, limit, payload.cursor.as_deref(), &filter)
        .await?;

    Ok(Json(ExpenseListResponse {
        expenses: expenses.into_iter().map(map_expense).collect(),
        next_cursor,
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let expense = state
        .engine
        .create_expense(engine::ExpenseCmd {
            user_id: user.username.clone(),
            amount_minor: payload.amount_minor,
            occurred_at: payload.occurred_at.with_timezone(&Utc),
            category_id: payload.category_id,
            is_fixed: payload.is_fixed.unwrap_or(false),
            note: payload.note,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { id: expense.id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .update_expense(engine::UpdateExpenseCmd {
            user_id: user.username.clone(),
            expense_id: id,
            amount_minor: payload.amount_minor,
            occurred_at: payload.occurred_at.map(|dt| dt.with_timezone(&Utc)),
            category_id: payload.category_id,
            is_fixed: payload.is_fixed,
            note: payload.note,
        })
        .await?;

    Ok(Json(map_expense(expense)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
