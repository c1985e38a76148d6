use sea_orm::{ConnectionTrait, prelude::*};

use crate::{EngineError, ResultEngine, offers, users, wishes, wishlists};

use super::Engine;

/// Generates a `require_*` lookup returning the model or `KeyNotFound`.
macro_rules! impl_require_model {
    ($require_fn:ident, $entity:path, $model:ty, $err_msg:literal) => {
        pub(super) async fn $require_fn<C: ConnectionTrait>(
            &self,
            db: &C,
            id: &str,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_require_model!(
        require_wish_model,
        wishes::Entity,
        wishes::Model,
        "wish not exists"
    );

    impl_require_model!(
        require_wishlist_model,
        wishlists::Entity,
        wishlists::Model,
        "wishlist not exists"
    );

    impl_require_model!(require_user, users::Entity, users::Model, "user not exists");

    impl_require_model!(
        require_offer_model,
        offers::Entity,
        offers::Model,
        "offer not exists"
    );
}
