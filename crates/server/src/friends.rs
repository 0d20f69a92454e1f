//! Friendship API endpoints.

use api_types::friend::{FriendListResponse, FriendRequest, FriendView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

fn map_friend(link: engine::FriendLink) -> FriendView {
    FriendView {
        username: link.username,
        requested_by: link.requested_by,
        accepted: link.accepted,
        since: link.since,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<FriendListResponse>, ServerError> {
    let friends = state
        .engine
        .list_friends(&user.username)
        .await?
        .into_iter()
        .map(map_friend)
        .collect();

    Ok(Json(FriendListResponse { friends }))
}

pub async fn request(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<FriendRequest>,
) -> Result<(StatusCode, Json<FriendView>), ServerError> {
    let link = state
        .engine
        .request_friendship(&user.username, &payload.username)
        .await?;

    Ok((StatusCode::CREATED, Json(map_friend(link))))
}

pub async fn accept(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<FriendView>, ServerError> {
    let link = state
        .engine
        .accept_friendship(&user.username, &username)
        .await?;

    Ok(Json(map_friend(link)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .remove_friendship(&user.username, &username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
