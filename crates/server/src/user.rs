//! User API endpoints

use api_types::user::{ProfileView, SignupNew, UserSummary};
use api_types::wish::WishSummary;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{EngineError, SignupCmd, users};

use crate::{ServerError, server::ServerState, views};

/// Handle requests for registering a new user
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<SignupNew>,
) -> Result<(StatusCode, Json<ProfileView>), ServerError> {
    let mut cmd = SignupCmd::new(payload.username, payload.email, payload.password);
    if let Some(about) = payload.about {
        cmd = cmd.about(about);
    }
    if let Some(avatar) = payload.avatar {
        cmd = cmd.avatar(avatar);
    }

    let user = state.engine.signup(cmd).await?;
    Ok((StatusCode::CREATED, Json(views::profile_view(&user)?)))
}

/// The authenticated caller's own profile
pub async fn me(Extension(user): Extension<users::Model>) -> Result<Json<ProfileView>, ServerError> {
    Ok(Json(views::profile_view(&user)?))
}

/// Wishes owned by the authenticated caller
pub async fn my_wishes(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<WishSummary>>, ServerError> {
    let wishes = state.engine.list_wishes_for_owner(&user.id).await?;
    let mut out = Vec::with_capacity(wishes.len());
    for (wish, owner) in &wishes {
        out.push(views::wish_summary(wish, owner)?);
    }
    Ok(Json(out))
}

/// Public profile lookup by username
pub async fn profile(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<UserSummary>, ServerError> {
    let user = state
        .engine
        .find_user_by_username(&username)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
    Ok(Json(views::user_summary(&user)?))
}

/// Public listing of a user's wishes
pub async fn wishes(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<WishSummary>>, ServerError> {
    let user = state
        .engine
        .find_user_by_username(&username)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

    let wishes = state.engine.list_wishes_for_owner(&user.id).await?;
    let mut out = Vec::with_capacity(wishes.len());
    for (wish, owner) in &wishes {
        out.push(views::wish_summary(wish, owner)?);
    }
    Ok(Json(out))
}
