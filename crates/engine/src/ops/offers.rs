use chrono::Utc;
use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{ContributeCmd, EngineError, Offer, ResultEngine, Wish, offers, users, wishes};

use super::{Engine, with_tx};

impl Engine {
    /// Apply a contribution against a wish.
    ///
    /// Validation order: the wish must exist, the contributor must not be its
    /// owner, the amount must be at least one unit and fit the remaining
    /// headroom. All checks run before any write.
    ///
    /// The commit itself is one DB transaction holding the offer insert and a
    /// guarded increment of `raised_minor`:
    ///
    /// ```sql
    /// UPDATE wishes SET raised_minor = raised_minor + ?
    /// WHERE id = ? AND raised_minor + ? <= price_minor
    /// ```
    ///
    /// The fast-path check above can be stale the moment it passes — another
    /// contribution may land between the read and the write — so the affected
    /// row count of this statement is the authority. Zero rows means the
    /// headroom is gone: the transaction rolls back, no offer row survives,
    /// and the caller gets the same rejection the early check would have
    /// produced. Contributions to different wishes never contend on this
    /// statement.
    pub async fn contribute(&self, cmd: ContributeCmd) -> ResultEngine<Offer> {
        with_tx!(self, |db_tx| {
            let wish_model = self
                .require_wish_model(&db_tx, &cmd.item_id.to_string())
                .await?;
            if wish_model.owner_id == cmd.user_id {
                return Err(EngineError::Forbidden(
                    "cannot offer to own wish".to_string(),
                ));
            }
            self.require_user(&db_tx, &cmd.user_id).await?;

            let wish = Wish::try_from(wish_model)?;
            wish.check_contribution(cmd.amount)?;

            let offer = Offer::new(
                cmd.item_id,
                cmd.user_id.clone(),
                cmd.amount,
                cmd.hidden,
                Utc::now(),
            );
            offers::ActiveModel::from(&offer).insert(&db_tx).await?;

            let backend = self.database.get_database_backend();
            let result = db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "UPDATE wishes SET raised_minor = raised_minor + ? \
                     WHERE id = ? AND raised_minor + ? <= price_minor",
                    vec![
                        cmd.amount.cents().into(),
                        cmd.item_id.to_string().into(),
                        cmd.amount.cents().into(),
                    ],
                ))
                .await?;
            if result.rows_affected() == 0 {
                return Err(EngineError::OfferExceedsPrice(wish.name.clone()));
            }

            Ok(offer)
        })
    }

    /// Contributions made by `user_id`, newest first, with the funded item.
    ///
    /// No redaction here: these are the caller's own pledges.
    pub async fn list_offers_for_user(
        &self,
        user_id: &str,
    ) -> ResultEngine<Vec<(Offer, wishes::Model)>> {
        let rows = offers::Entity::find()
            .filter(offers::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(offers::Column::CreatedAt)
            .find_also_related(wishes::Entity)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (offer_model, item) in rows {
            let item =
                item.ok_or_else(|| EngineError::KeyNotFound("wish not exists".to_string()))?;
            out.push((Offer::try_from(offer_model)?, item));
        }
        Ok(out)
    }

    /// A single offer with its item and contributor.
    pub async fn offer_detail(
        &self,
        offer_id: Uuid,
    ) -> ResultEngine<(Offer, wishes::Model, users::Model)> {
        let offer_model = self
            .require_offer_model(&self.database, &offer_id.to_string())
            .await?;
        let item = self
            .require_wish_model(&self.database, &offer_model.item_id)
            .await?;
        let contributor = self.require_user(&self.database, &offer_model.user_id).await?;
        Ok((Offer::try_from(offer_model)?, item, contributor))
    }
}
