//! Categories API endpoints.

use api_types::category::{
    CategoryCreate, CategoryCreated, CategoryList, CategoryListResponse, CategoryUpdate,
    CategoryView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        is_fixed: category.is_fixed,
        archived: category.archived,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryList>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let include_archived = payload.include_archived.unwrap_or(false);
    let categories = state
        .engine
        .list_categories(&user.username, include_archived)
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let category = state
        .engine
        .create_category(
            &user.username,
            &payload.name,
            payload.is_fixed.unwrap_or(false),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            id: category.id,
            name: category.name,
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    if payload.name.is_none() && payload.is_fixed.is_none() && payload.archived.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name, is_fixed or archived".to_string(),
        ));
    }

    let category = state
        .engine
        .update_category(
            &user.username,
            category_id,
            payload.name.as_deref(),
            payload.is_fixed,
            payload.archived,
        )
        .await?;
    Ok(Json(map_category(category)))
}
