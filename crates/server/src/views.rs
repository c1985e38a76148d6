//! Explicit view projection into `api_types` shapes.
//!
//! Every response is built field by field from engine output; nothing leaks
//! by accident (passwords, emails on public surfaces).

use api_types::offer::{ItemSummary, OfferDetail, OfferView};
use api_types::user::{ProfileView, UserSummary};
use api_types::wish::{WishSummary, WishView};
use api_types::wishlist::{WishlistSummary, WishlistView};
use engine::{Offer, Wish, users, wishes, wishlists};
use uuid::Uuid;

use crate::ServerError;

fn parse_id(value: &str, label: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(value).map_err(|_| ServerError::Generic(format!("invalid {label} id")))
}

pub(crate) fn user_summary(user: &users::Model) -> Result<UserSummary, ServerError> {
    Ok(UserSummary {
        id: parse_id(&user.id, "user")?,
        username: user.username.clone(),
        avatar: user.avatar.clone(),
    })
}

pub(crate) fn profile_view(user: &users::Model) -> Result<ProfileView, ServerError> {
    Ok(ProfileView {
        id: parse_id(&user.id, "user")?,
        username: user.username.clone(),
        email: user.email.clone(),
        about: user.about.clone(),
        avatar: user.avatar.clone(),
        created_at: user.created_at,
    })
}

pub(crate) fn wish_summary(wish: &Wish, owner: &users::Model) -> Result<WishSummary, ServerError> {
    Ok(WishSummary {
        id: wish.id,
        created_at: wish.created_at,
        name: wish.name.clone(),
        link: wish.link.clone(),
        image: wish.image.clone(),
        price_minor: wish.price_minor,
        raised_minor: wish.raised_minor,
        copied: wish.copied,
        description: wish.description.clone(),
        owner: user_summary(owner)?,
    })
}

pub(crate) fn wish_view(
    wish: &Wish,
    owner: &users::Model,
    offers: &[(Offer, users::Model)],
) -> Result<WishView, ServerError> {
    let mut offer_views = Vec::with_capacity(offers.len());
    for (offer, contributor) in offers {
        offer_views.push(offer_view(offer, contributor)?);
    }

    Ok(WishView {
        id: wish.id,
        created_at: wish.created_at,
        name: wish.name.clone(),
        link: wish.link.clone(),
        image: wish.image.clone(),
        price_minor: wish.price_minor,
        raised_minor: wish.raised_minor,
        copied: wish.copied,
        description: wish.description.clone(),
        owner: user_summary(owner)?,
        offers: offer_views,
    })
}

pub(crate) fn offer_view(
    offer: &Offer,
    contributor: &users::Model,
) -> Result<OfferView, ServerError> {
    Ok(OfferView {
        id: offer.id,
        created_at: offer.created_at,
        amount_minor: offer.amount_minor,
        hidden: offer.hidden,
        user: user_summary(contributor)?,
    })
}

pub(crate) fn item_summary(item: &wishes::Model) -> Result<ItemSummary, ServerError> {
    Ok(ItemSummary {
        id: parse_id(&item.id, "wish")?,
        name: item.name.clone(),
        image: item.image.clone(),
        price_minor: item.price_minor,
        raised_minor: item.raised_minor,
    })
}

pub(crate) fn offer_detail_view(
    offer: &Offer,
    item: &wishes::Model,
    contributor: &users::Model,
) -> Result<OfferDetail, ServerError> {
    Ok(OfferDetail {
        id: offer.id,
        created_at: offer.created_at,
        amount_minor: offer.amount_minor,
        hidden: offer.hidden,
        user: user_summary(contributor)?,
        item: item_summary(item)?,
    })
}

pub(crate) fn wishlist_summary(
    wishlist: &wishlists::Model,
    owner: &users::Model,
) -> Result<WishlistSummary, ServerError> {
    Ok(WishlistSummary {
        id: parse_id(&wishlist.id, "wishlist")?,
        created_at: wishlist.created_at,
        name: wishlist.name.clone(),
        image: wishlist.image.clone(),
        owner: user_summary(owner)?,
    })
}

pub(crate) fn wishlist_view(
    wishlist: &wishlists::Model,
    owner: &users::Model,
    items: &[(wishes::Model, users::Model)],
) -> Result<WishlistView, ServerError> {
    let mut item_views = Vec::with_capacity(items.len());
    for (model, item_owner) in items {
        let wish = Wish::try_from(model.clone())?;
        item_views.push(wish_summary(&wish, item_owner)?);
    }

    Ok(WishlistView {
        id: parse_id(&wishlist.id, "wishlist")?,
        created_at: wishlist.created_at,
        name: wishlist.name.clone(),
        image: wishlist.image.clone(),
        owner: user_summary(owner)?,
        items: item_views,
    })
}
