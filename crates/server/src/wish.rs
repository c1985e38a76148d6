//! Wish API endpoints

use api_types::wish::{WishNew, WishSummary, WishUpdate, WishView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{MoneyCents, NewWishCmd, UpdateWishCmd, users};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{MaybeUser, ServerState},
    views,
};

/// Handle requests for publishing a new wish
pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WishNew>,
) -> Result<(StatusCode, Json<WishView>), ServerError> {
    let wish = state
        .engine
        .new_wish(NewWishCmd {
            user_id: user.id.clone(),
            name: payload.name,
            link: payload.link,
            image: payload.image,
            description: payload.description,
            price: MoneyCents::new(payload.price_minor),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(views::wish_view(&wish, &user, &[])?),
    ))
}

/// The 40 most recently published wishes
pub async fn last(State(state): State<ServerState>) -> Result<Json<Vec<WishSummary>>, ServerError> {
    let wishes = state.engine.list_last_wishes().await?;
    collect_summaries(&wishes)
}

/// The 10 most copied wishes
pub async fn top(State(state): State<ServerState>) -> Result<Json<Vec<WishSummary>>, ServerError> {
    let wishes = state.engine.list_top_wishes().await?;
    collect_summaries(&wishes)
}

/// Full wish view with offers, visibility-filtered for the caller
pub async fn detail(
    MaybeUser(viewer): MaybeUser,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WishView>, ServerError> {
    let detail = state
        .engine
        .wish_detail(id, viewer.as_ref().map(|u| u.id.as_str()))
        .await?;
    Ok(Json(views::wish_view(
        &detail.wish,
        &detail.owner,
        &detail.offers,
    )?))
}

/// Edit a wish's mutable fields; the price is locked once funded
pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WishUpdate>,
) -> Result<Json<WishView>, ServerError> {
    let cmd = UpdateWishCmd {
        wish_id: id,
        user_id: user.id.clone(),
        name: payload.name,
        link: payload.link,
        image: payload.image,
        description: payload.description,
        price: payload.price_minor.map(MoneyCents::new),
    };
    state.engine.update_wish(cmd).await?;

    let detail = state.engine.wish_detail(id, Some(user.id.as_str())).await?;
    Ok(Json(views::wish_view(
        &detail.wish,
        &detail.owner,
        &detail.offers,
    )?))
}

/// Delete a wish; its offers go with it
pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WishSummary>, ServerError> {
    let wish = state.engine.delete_wish(id, &user.id).await?;
    Ok(Json(views::wish_summary(&wish, &user)?))
}

/// Copy a wish's descriptive fields into a new wish owned by the caller
pub async fn copy(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<WishView>), ServerError> {
    let copy = state.engine.copy_wish(id, &user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(views::wish_view(&copy, &user, &[])?),
    ))
}

fn collect_summaries(
    wishes: &[(engine::Wish, users::Model)],
) -> Result<Json<Vec<WishSummary>>, ServerError> {
    let mut out = Vec::with_capacity(wishes.len());
    for (wish, owner) in wishes {
        out.push(views::wish_summary(wish, owner)?);
    }
    Ok(Json(out))
}
