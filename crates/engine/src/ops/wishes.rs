use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, NewWishCmd, Offer, ResultEngine, UpdateWishCmd, Wish, offers, users, util, wishes,
    wishlist_items,
};

use super::{Engine, with_tx};

/// `/wishes/last` window.
const LAST_WISHES_LIMIT: u64 = 40;
/// `/wishes/top` window.
const TOP_WISHES_LIMIT: u64 = 10;

/// A wish with its owner and contributions, ready for view projection.
///
/// Offer amounts are already visibility-filtered for the viewer the detail
/// was fetched for.
#[derive(Debug)]
pub struct WishDetail {
    pub wish: Wish,
    pub owner: users::Model,
    pub offers: Vec<(Offer, users::Model)>,
}

impl Engine {
    /// Publish a new wish owned by `cmd.user_id`.
    pub async fn new_wish(&self, cmd: NewWishCmd) -> ResultEngine<Wish> {
        let wish = Wish::new(
            cmd.user_id.clone(),
            cmd.name.trim().to_string(),
            cmd.link.trim().to_string(),
            cmd.image.trim().to_string(),
            cmd.description.trim().to_string(),
            cmd.price,
            Utc::now(),
        )?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &cmd.user_id).await?;
            wishes::ActiveModel::from(&wish).insert(&db_tx).await?;
            Ok::<(), EngineError>(())
        })?;

        Ok(wish)
    }

    /// Return a wish with owner and offers, visibility-filtered for `viewer`.
    ///
    /// `viewer` is the authenticated user id, or `None` for anonymous
    /// callers. Hidden offer amounts are zeroed unless the viewer owns the
    /// wish.
    pub async fn wish_detail(&self, wish_id: Uuid, viewer: Option<&str>) -> ResultEngine<WishDetail> {
        let (wish_model, owner) = wishes::Entity::find_by_id(wish_id.to_string())
            .find_also_related(users::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wish not exists".to_string()))?;
        let owner = owner.ok_or_else(|| EngineError::KeyNotFound("wish owner not exists".to_string()))?;

        let rows = offers::Entity::find()
            .filter(offers::Column::ItemId.eq(wish_id.to_string()))
            .order_by_asc(offers::Column::CreatedAt)
            .find_also_related(users::Entity)
            .all(&self.database)
            .await?;

        let mut offer_rows = Vec::with_capacity(rows.len());
        for (offer_model, contributor) in rows {
            let contributor = contributor
                .ok_or_else(|| EngineError::KeyNotFound("offer user not exists".to_string()))?;
            offer_rows.push((Offer::try_from(offer_model)?, contributor));
        }

        offers::redact_amounts(offer_rows.iter_mut().map(|(o, _)| o), viewer, &owner.id);

        Ok(WishDetail {
            wish: Wish::try_from(wish_model)?,
            owner,
            offers: offer_rows,
        })
    }

    /// The 40 most recently published wishes, newest first.
    pub async fn list_last_wishes(&self) -> ResultEngine<Vec<(Wish, users::Model)>> {
        let rows = wishes::Entity::find()
            .order_by_desc(wishes::Column::CreatedAt)
            .limit(LAST_WISHES_LIMIT)
            .find_also_related(users::Entity)
            .all(&self.database)
            .await?;
        collect_wishes_with_owners(rows)
    }

    /// The 10 most copied wishes.
    pub async fn list_top_wishes(&self) -> ResultEngine<Vec<(Wish, users::Model)>> {
        let rows = wishes::Entity::find()
            .order_by_desc(wishes::Column::Copied)
            .limit(TOP_WISHES_LIMIT)
            .find_also_related(users::Entity)
            .all(&self.database)
            .await?;
        collect_wishes_with_owners(rows)
    }

    /// Every wish owned by `owner_id`, newest first.
    pub async fn list_wishes_for_owner(&self, owner_id: &str) -> ResultEngine<Vec<(Wish, users::Model)>> {
        let rows = wishes::Entity::find()
            .filter(wishes::Column::OwnerId.eq(owner_id.to_string()))
            .order_by_desc(wishes::Column::CreatedAt)
            .find_also_related(users::Entity)
            .all(&self.database)
            .await?;
        collect_wishes_with_owners(rows)
    }

    /// Edit a wish's mutable fields.
    ///
    /// Only the owner may edit. A price change is rejected once anything has
    /// been raised; submitting the current price again is a no-op and stays
    /// allowed.
    pub async fn update_wish(&self, cmd: UpdateWishCmd) -> ResultEngine<Wish> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_wish_model(&db_tx, &cmd.wish_id.to_string())
                .await?;
            if model.owner_id != cmd.user_id {
                return Err(EngineError::Forbidden(
                    "cannot update someone else's wish".to_string(),
                ));
            }
            let current = Wish::try_from(model)?;

            let mut active = wishes::ActiveModel {
                id: ActiveValue::Set(cmd.wish_id.to_string()),
                ..Default::default()
            };
            let mut dirty = false;

            if let Some(name) = cmd.name.as_deref() {
                let name = name.trim().to_string();
                util::validate_text_len(&name, "name", 1, 250)?;
                active.name = ActiveValue::Set(name);
                dirty = true;
            }
            if let Some(link) = cmd.link.as_deref() {
                let link = link.trim().to_string();
                util::validate_url(&link, "link")?;
                active.link = ActiveValue::Set(link);
                dirty = true;
            }
            if let Some(image) = cmd.image.as_deref() {
                let image = image.trim().to_string();
                util::validate_url(&image, "image")?;
                active.image = ActiveValue::Set(image);
                dirty = true;
            }
            if let Some(description) = cmd.description.as_deref() {
                let description = description.trim().to_string();
                util::validate_text_len(&description, "description", 1, 1024)?;
                active.description = ActiveValue::Set(description);
                dirty = true;
            }
            if let Some(price) = cmd.price {
                if price.cents() != current.price_minor {
                    if current.price_locked() {
                        return Err(EngineError::Forbidden(
                            "price locked once funding has started".to_string(),
                        ));
                    }
                    if !price.is_at_least_unit() {
                        return Err(EngineError::InvalidAmount(
                            "price must be at least one unit".to_string(),
                        ));
                    }
                    active.price_minor = ActiveValue::Set(price.cents());
                    dirty = true;
                }
            }

            if !dirty {
                return Ok(current);
            }

            let updated = active.update(&db_tx).await?;
            Ok(Wish::try_from(updated)?)
        })
    }

    /// Delete a wish and everything hanging off it.
    ///
    /// Offers and wishlist memberships go in the same transaction; a wish
    /// never outlives its contributions and vice versa.
    pub async fn delete_wish(&self, wish_id: Uuid, user_id: &str) -> ResultEngine<Wish> {
        with_tx!(self, |db_tx| {
            let model = self.require_wish_model(&db_tx, &wish_id.to_string()).await?;
            if model.owner_id != user_id {
                return Err(EngineError::Forbidden(
                    "cannot remove someone else's wish".to_string(),
                ));
            }
            let wish = Wish::try_from(model)?;

            offers::Entity::delete_many()
                .filter(offers::Column::ItemId.eq(wish_id.to_string()))
                .exec(&db_tx)
                .await?;
            wishlist_items::Entity::delete_many()
                .filter(wishlist_items::Column::WishId.eq(wish_id.to_string()))
                .exec(&db_tx)
                .await?;
            wishes::Entity::delete_by_id(wish_id.to_string())
                .exec(&db_tx)
                .await?;

            Ok(wish)
        })
    }

    /// Clone a wish's descriptive fields into a new wish owned by the caller.
    ///
    /// The new wish starts unfunded. The source's `copied` counter is bumped
    /// with an atomic increment in the same transaction as the insert, so
    /// the counter never drifts from the copies that actually exist.
    pub async fn copy_wish(&self, wish_id: Uuid, user_id: &str) -> ResultEngine<Wish> {
        with_tx!(self, |db_tx| {
            let model = self.require_wish_model(&db_tx, &wish_id.to_string()).await?;
            if model.owner_id == user_id {
                return Err(EngineError::Forbidden("cannot copy own wish".to_string()));
            }
            self.require_user(&db_tx, user_id).await?;

            let source = Wish::try_from(model)?;
            let copy = source.copy_for(user_id.to_string(), Utc::now());
            wishes::ActiveModel::from(&copy).insert(&db_tx).await?;

            let backend = self.database.get_database_backend();
            let result = db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "UPDATE wishes SET copied = copied + 1 WHERE id = ?",
                    vec![source.id.to_string().into()],
                ))
                .await?;
            if result.rows_affected() == 0 {
                return Err(EngineError::KeyNotFound("wish not exists".to_string()));
            }

            Ok(copy)
        })
    }
}

fn collect_wishes_with_owners(
    rows: Vec<(wishes::Model, Option<users::Model>)>,
) -> ResultEngine<Vec<(Wish, users::Model)>> {
    let mut out = Vec::with_capacity(rows.len());
    for (wish_model, owner) in rows {
        let owner =
            owner.ok_or_else(|| EngineError::KeyNotFound("wish owner not exists".to_string()))?;
        out.push((Wish::try_from(wish_model)?, owner));
    }
    Ok(out)
}
