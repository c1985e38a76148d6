//! Offer API endpoints

use api_types::offer::{OfferDetail, OfferNew};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{ContributeCmd, MoneyCents, users};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Handle requests for pledging toward a wish
pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<OfferNew>,
) -> Result<(StatusCode, Json<OfferDetail>), ServerError> {
    let cmd = ContributeCmd::new(
        payload.item_id,
        user.id.clone(),
        MoneyCents::new(payload.amount_minor),
    )
    .hidden(payload.hidden.unwrap_or(false));

    let offer = state.engine.contribute(cmd).await?;
    let (offer, item, contributor) = state.engine.offer_detail(offer.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(views::offer_detail_view(&offer, &item, &contributor)?),
    ))
}

/// Contributions made by the authenticated caller
pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<OfferDetail>>, ServerError> {
    let offers = state.engine.list_offers_for_user(&user.id).await?;
    let mut out = Vec::with_capacity(offers.len());
    for (offer, item) in &offers {
        out.push(views::offer_detail_view(offer, item, &user)?);
    }
    Ok(Json(out))
}

/// A single offer with its item and contributor
pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferDetail>, ServerError> {
    let (offer, item, contributor) = state.engine.offer_detail(id).await?;
    Ok(Json(views::offer_detail_view(&offer, &item, &contributor)?))
}
