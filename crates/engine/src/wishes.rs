//! The module contains the representation of a wish.
use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, util};

/// A published wish: a desired item with a funding target.
///
/// `price_minor` is the target, `raised_minor` the sum of all accepted
/// contributions. The invariant `0 <= raised_minor <= price_minor` holds at
/// all times; the final word on it belongs to the guarded increment in the
/// offers op, this struct only carries the fast-path check.
///
/// Amounts are stored as integer cents (`i64`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wish {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub link: String,
    pub image: String,
    pub description: String,
    pub price_minor: i64,
    pub raised_minor: i64,
    pub copied: i64,
    pub created_at: DateTime<Utc>,
}

impl Wish {
    pub fn new(
        owner_id: String,
        name: String,
        link: String,
        image: String,
        description: String,
        price: MoneyCents,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        util::validate_text_len(&name, "name", 1, 250)?;
        util::validate_text_len(&description, "description", 1, 1024)?;
        util::validate_url(&link, "link")?;
        util::validate_url(&image, "image")?;
        if !price.is_at_least_unit() {
            return Err(EngineError::InvalidAmount(
                "price must be at least one unit".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            link,
            image,
            description,
            price_minor: price.cents(),
            raised_minor: 0,
            copied: 0,
            created_at,
        })
    }

    /// Fast-path cap check for an incoming contribution.
    ///
    /// Rejects amounts below one unit and amounts that would push `raised`
    /// above `price`. A concurrent writer can still consume the headroom
    /// between this check and the commit; the guarded increment decides.
    pub fn check_contribution(&self, amount: MoneyCents) -> ResultEngine<()> {
        if !amount.is_at_least_unit() {
            return Err(EngineError::InvalidAmount(
                "offer must be at least one unit".to_string(),
            ));
        }

        let headroom = MoneyCents::new(self.price_minor) - MoneyCents::new(self.raised_minor);
        if amount > headroom {
            return Err(EngineError::OfferExceedsPrice(self.name.clone()));
        }
        Ok(())
    }

    /// The price becomes immutable as soon as anyone has pledged.
    pub fn price_locked(&self) -> bool {
        self.raised_minor > 0
    }

    /// Clone of the descriptive fields for a new owner.
    ///
    /// Funding state starts from scratch: `raised_minor = 0`, `copied = 0`,
    /// no offers.
    pub fn copy_for(&self, owner_id: String, created_at: DateTime<Utc>) -> Wish {
        Wish {
            id: Uuid::new_v4(),
            owner_id,
            name: self.name.clone(),
            link: self.link.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
            price_minor: self.price_minor,
            raised_minor: 0,
            copied: 0,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wishes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub link: String,
    pub image: String,
    pub description: String,
    pub price_minor: i64,
    pub raised_minor: i64,
    pub copied: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::offers::Entity")]
    Offers,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wish> for ActiveModel {
    fn from(wish: &Wish) -> Self {
        Self {
            id: ActiveValue::Set(wish.id.to_string()),
            owner_id: ActiveValue::Set(wish.owner_id.clone()),
            name: ActiveValue::Set(wish.name.clone()),
            link: ActiveValue::Set(wish.link.clone()),
            image: ActiveValue::Set(wish.image.clone()),
            description: ActiveValue::Set(wish.description.clone()),
            price_minor: ActiveValue::Set(wish.price_minor),
            raised_minor: ActiveValue::Set(wish.raised_minor),
            copied: ActiveValue::Set(wish.copied),
            created_at: ActiveValue::Set(wish.created_at),
        }
    }
}

impl TryFrom<Model> for Wish {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "wish")?,
            owner_id: model.owner_id,
            name: model.name,
            link: model.link,
            image: model.image,
            description: model.description,
            price_minor: model.price_minor,
            raised_minor: model.raised_minor,
            copied: model.copied,
            created_at: model.created_at,
        })
    }
}
