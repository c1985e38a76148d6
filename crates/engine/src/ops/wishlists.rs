use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewWishlistCmd, ResultEngine, UpdateWishlistCmd, users, util, wishes,
    wishlist_items, wishlists,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a wishlist from a requested set of wish ids.
    ///
    /// Unknown ids are dropped silently, not an error: a shared link may
    /// reference wishes deleted since.
    pub async fn new_wishlist(
        &self,
        cmd: NewWishlistCmd,
    ) -> ResultEngine<(wishlists::Model, Vec<(wishes::Model, users::Model)>)> {
        let name = cmd.name.trim().to_string();
        util::validate_text_len(&name, "name", 1, 250)?;
        let image = cmd.image.trim().to_string();
        util::validate_url(&image, "image")?;

        let wishlist_id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &cmd.user_id).await?;

            let wishlist = wishlists::ActiveModel {
                id: ActiveValue::Set(wishlist_id.to_string()),
                owner_id: ActiveValue::Set(cmd.user_id.clone()),
                name: ActiveValue::Set(name.clone()),
                image: ActiveValue::Set(image.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let wishlist = wishlist.insert(&db_tx).await?;

            let items = self
                .replace_wishlist_items(&db_tx, &wishlist.id, &cmd.item_ids)
                .await?;
            Ok((wishlist, items))
        })
    }

    /// All wishlists with their owners.
    pub async fn list_wishlists(&self) -> ResultEngine<Vec<(wishlists::Model, users::Model)>> {
        let rows = wishlists::Entity::find()
            .order_by_desc(wishlists::Column::CreatedAt)
            .find_also_related(users::Entity)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (wishlist, owner) in rows {
            let owner = owner
                .ok_or_else(|| EngineError::KeyNotFound("wishlist owner not exists".to_string()))?;
            out.push((wishlist, owner));
        }
        Ok(out)
    }

    /// A wishlist with its owner and resolved member wishes.
    pub async fn wishlist_detail(
        &self,
        wishlist_id: Uuid,
    ) -> ResultEngine<(wishlists::Model, users::Model, Vec<(wishes::Model, users::Model)>)> {
        let (wishlist, owner) = wishlists::Entity::find_by_id(wishlist_id.to_string())
            .find_also_related(users::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wishlist not exists".to_string()))?;
        let owner = owner
            .ok_or_else(|| EngineError::KeyNotFound("wishlist owner not exists".to_string()))?;

        let items = self.load_wishlist_items(&self.database, &wishlist.id).await?;
        Ok((wishlist, owner, items))
    }

    /// Edit a wishlist. `item_ids`, when present, replaces the member set
    /// wholesale.
    pub async fn update_wishlist(
        &self,
        cmd: UpdateWishlistCmd,
    ) -> ResultEngine<(wishlists::Model, Vec<(wishes::Model, users::Model)>)> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_wishlist_model(&db_tx, &cmd.wishlist_id.to_string())
                .await?;
            if model.owner_id != cmd.user_id {
                return Err(EngineError::Forbidden(
                    "cannot update someone else's wishlist".to_string(),
                ));
            }

            let mut active = wishlists::ActiveModel {
                id: ActiveValue::Set(cmd.wishlist_id.to_string()),
                ..Default::default()
            };
            let mut dirty = false;

            if let Some(name) = cmd.name.as_deref() {
                let name = name.trim().to_string();
                util::validate_text_len(&name, "name", 1, 250)?;
                active.name = ActiveValue::Set(name);
                dirty = true;
            }
            if let Some(image) = cmd.image.as_deref() {
                let image = image.trim().to_string();
                util::validate_url(&image, "image")?;
                active.image = ActiveValue::Set(image);
                dirty = true;
            }

            let wishlist = if dirty {
                active.update(&db_tx).await?
            } else {
                model
            };

            let items = if let Some(item_ids) = cmd.item_ids.as_deref() {
                wishlist_items::Entity::delete_many()
                    .filter(wishlist_items::Column::WishlistId.eq(wishlist.id.clone()))
                    .exec(&db_tx)
                    .await?;
                self.replace_wishlist_items(&db_tx, &wishlist.id, item_ids)
                    .await?
            } else {
                self.load_wishlist_items(&db_tx, &wishlist.id).await?
            };

            Ok((wishlist, items))
        })
    }

    /// Delete a wishlist; its membership rows go with it.
    pub async fn delete_wishlist(
        &self,
        wishlist_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<wishlists::Model> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_wishlist_model(&db_tx, &wishlist_id.to_string())
                .await?;
            if model.owner_id != user_id {
                return Err(EngineError::Forbidden(
                    "cannot delete someone else's wishlist".to_string(),
                ));
            }

            wishlist_items::Entity::delete_many()
                .filter(wishlist_items::Column::WishlistId.eq(wishlist_id.to_string()))
                .exec(&db_tx)
                .await?;
            wishlists::Entity::delete_by_id(wishlist_id.to_string())
                .exec(&db_tx)
                .await?;

            Ok(model)
        })
    }

    /// Resolve the requested ids against existing wishes and persist the
    /// membership rows. Returns the resolved members with their owners.
    async fn replace_wishlist_items<C: ConnectionTrait>(
        &self,
        db: &C,
        wishlist_id: &str,
        item_ids: &[Uuid],
    ) -> ResultEngine<Vec<(wishes::Model, users::Model)>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = item_ids.iter().map(ToString::to_string).collect();
        let rows = wishes::Entity::find()
            .filter(wishes::Column::Id.is_in(ids))
            .find_also_related(users::Entity)
            .all(db)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (wish, owner) in rows {
            let owner = owner
                .ok_or_else(|| EngineError::KeyNotFound("wish owner not exists".to_string()))?;
            let membership = wishlist_items::ActiveModel {
                wishlist_id: ActiveValue::Set(wishlist_id.to_string()),
                wish_id: ActiveValue::Set(wish.id.clone()),
            };
            membership.insert(db).await?;
            items.push((wish, owner));
        }
        Ok(items)
    }

    /// Load a wishlist's current members with their owners.
    async fn load_wishlist_items<C: ConnectionTrait>(
        &self,
        db: &C,
        wishlist_id: &str,
    ) -> ResultEngine<Vec<(wishes::Model, users::Model)>> {
        let memberships = wishlist_items::Entity::find()
            .filter(wishlist_items::Column::WishlistId.eq(wishlist_id.to_string()))
            .all(db)
            .await?;
        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = memberships.into_iter().map(|m| m.wish_id).collect();
        let rows = wishes::Entity::find()
            .filter(wishes::Column::Id.is_in(ids))
            .find_also_related(users::Entity)
            .all(db)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (wish, owner) in rows {
            let owner = owner
                .ok_or_else(|| EngineError::KeyNotFound("wish owner not exists".to_string()))?;
            items.push((wish, owner));
        }
        Ok(items)
    }
}
