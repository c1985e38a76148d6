//! The module contains the representation of an offer (a contribution).
//!
//! Offers are append-only pledges: created once through the ledger, never
//! edited or retracted, deleted only as a cascade of wish deletion.
use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, util};

/// A single user's pledge of a monetary amount toward a wish.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub item_id: Uuid,
    pub user_id: String,
    pub amount_minor: i64,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    pub fn new(
        item_id: Uuid,
        user_id: String,
        amount: MoneyCents,
        hidden: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            user_id,
            amount_minor: amount.cents(),
            hidden,
            created_at,
        }
    }
}

/// View-time redaction of hidden amounts.
///
/// Any offer flagged `hidden` reports an amount of `0` to every caller except
/// the owner of the funded wish. Existence, contributor and the flag itself
/// stay visible. This never touches persisted state.
pub fn redact_amounts<'a, I>(offers: I, viewer_id: Option<&str>, owner_id: &str)
where
    I: IntoIterator<Item = &'a mut Offer>,
{
    if viewer_id == Some(owner_id) {
        return;
    }
    for offer in offers.into_iter().filter(|o| o.hidden) {
        offer.amount_minor = 0;
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub item_id: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub hidden: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wishes::Entity",
        from = "Column::ItemId",
        to = "super::wishes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Wishes,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::wishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wishes.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Offer> for ActiveModel {
    fn from(offer: &Offer) -> Self {
        Self {
            id: ActiveValue::Set(offer.id.to_string()),
            item_id: ActiveValue::Set(offer.item_id.to_string()),
            user_id: ActiveValue::Set(offer.user_id.clone()),
            amount_minor: ActiveValue::Set(offer.amount_minor),
            hidden: ActiveValue::Set(offer.hidden),
            created_at: ActiveValue::Set(offer.created_at),
        }
    }
}

impl TryFrom<Model> for Offer {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: util::parse_uuid(&model.id, "offer")?,
            item_id: util::parse_uuid(&model.item_id, "wish")?,
            user_id: model.user_id,
            amount_minor: model.amount_minor,
            hidden: model.hidden,
            created_at: model.created_at,
        })
    }
}
