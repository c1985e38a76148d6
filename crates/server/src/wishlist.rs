//! Wishlist API endpoints

use api_types::wishlist::{WishlistNew, WishlistSummary, WishlistUpdate, WishlistView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewWishlistCmd, UpdateWishlistCmd, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Handle requests for creating a new wishlist
pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WishlistNew>,
) -> Result<(StatusCode, Json<WishlistView>), ServerError> {
    let (wishlist, items) = state
        .engine
        .new_wishlist(NewWishlistCmd {
            user_id: user.id.clone(),
            name: payload.name,
            image: payload.image,
            item_ids: payload.item_ids,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(views::wishlist_view(&wishlist, &user, &items)?),
    ))
}

/// All wishlists
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<WishlistSummary>>, ServerError> {
    let wishlists = state.engine.list_wishlists().await?;
    let mut out = Vec::with_capacity(wishlists.len());
    for (wishlist, owner) in &wishlists {
        out.push(views::wishlist_summary(wishlist, owner)?);
    }
    Ok(Json(out))
}

/// A wishlist with its resolved member wishes
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WishlistView>, ServerError> {
    let (wishlist, owner, items) = state.engine.wishlist_detail(id).await?;
    Ok(Json(views::wishlist_view(&wishlist, &owner, &items)?))
}

/// Edit a wishlist; `item_ids` replaces the member set wholesale
pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WishlistUpdate>,
) -> Result<Json<WishlistView>, ServerError> {
    let cmd = UpdateWishlistCmd {
        wishlist_id: id,
        user_id: user.id.clone(),
        name: payload.name,
        image: payload.image,
        item_ids: payload.item_ids,
    };
    let (wishlist, items) = state.engine.update_wishlist(cmd).await?;
    Ok(Json(views::wishlist_view(&wishlist, &user, &items)?))
}

/// Delete a wishlist
pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WishlistSummary>, ServerError> {
    let wishlist = state.engine.delete_wishlist(id, &user.id).await?;
    Ok(Json(views::wishlist_summary(&wishlist, &user)?))
}
