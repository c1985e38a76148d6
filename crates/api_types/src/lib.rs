use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Request body for registering a new user.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignupNew {
        pub username: String,
        pub email: String,
        pub password: String,
        pub about: Option<String>,
        pub avatar: Option<String>,
    }

    /// Profile returned to the account owner.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileView {
        pub id: Uuid,
        pub username: String,
        pub email: String,
        pub about: Option<String>,
        pub avatar: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Public identity attached to wishes, offers and wishlists.
    ///
    /// Never carries the email.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserSummary {
        pub id: Uuid,
        pub username: String,
        pub avatar: Option<String>,
    }
}

pub mod wish {
    use super::*;

    /// Request body for publishing a wish.
    ///
    /// Monetary values are integer cents.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishNew {
        pub name: String,
        pub link: String,
        pub image: String,
        pub price_minor: i64,
        pub description: String,
    }

    /// Partial update of a wish's editable fields.
    ///
    /// `price_minor` is rejected by the server once funding has started.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WishUpdate {
        pub name: Option<String>,
        pub link: Option<String>,
        pub image: Option<String>,
        pub price_minor: Option<i64>,
        pub description: Option<String>,
    }

    /// Full wish view, offers included.
    ///
    /// Offer amounts are already visibility-filtered for the requesting
    /// caller.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishView {
        pub id: Uuid,
        pub created_at: DateTime<Utc>,
        pub name: String,
        pub link: String,
        pub image: String,
        pub price_minor: i64,
        pub raised_minor: i64,
        pub copied: i64,
        pub description: String,
        pub owner: super::user::UserSummary,
        pub offers: Vec<super::offer::OfferView>,
    }

    /// Wish without its offer list (feeds `/wishes/last` and `/wishes/top`).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishSummary {
        pub id: Uuid,
        pub created_at: DateTime<Utc>,
        pub name: String,
        pub link: String,
        pub image: String,
        pub price_minor: i64,
        pub raised_minor: i64,
        pub copied: i64,
        pub description: String,
        pub owner: super::user::UserSummary,
    }
}

pub mod offer {
    use super::*;

    /// Request body for pledging toward a wish.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfferNew {
        pub item_id: Uuid,
        pub amount_minor: i64,
        pub hidden: Option<bool>,
    }

    /// A single contribution as seen by the requesting caller.
    ///
    /// `amount_minor` is `0` for hidden offers when the caller is not the
    /// owner of the funded wish.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfferView {
        pub id: Uuid,
        pub created_at: DateTime<Utc>,
        pub amount_minor: i64,
        pub hidden: bool,
        pub user: super::user::UserSummary,
    }

    /// Contribution plus the funded item, returned by the offer endpoints.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OfferDetail {
        pub id: Uuid,
        pub created_at: DateTime<Utc>,
        pub amount_minor: i64,
        pub hidden: bool,
        pub user: super::user::UserSummary,
        pub item: ItemSummary,
    }

    /// Funding state of the wish an offer points at.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemSummary {
        pub id: Uuid,
        pub name: String,
        pub image: String,
        pub price_minor: i64,
        pub raised_minor: i64,
    }
}

pub mod wishlist {
    use super::*;

    /// Request body for creating a wishlist.
    ///
    /// Unknown wish ids are dropped silently.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistNew {
        pub name: String,
        pub image: String,
        pub item_ids: Vec<Uuid>,
    }

    /// Partial update; `item_ids`, when present, replaces the member set
    /// wholesale.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WishlistUpdate {
        pub name: Option<String>,
        pub image: Option<String>,
        pub item_ids: Option<Vec<Uuid>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistView {
        pub id: Uuid,
        pub created_at: DateTime<Utc>,
        pub name: String,
        pub image: String,
        pub owner: super::user::UserSummary,
        pub items: Vec<super::wish::WishSummary>,
    }

    /// Wishlist without its member set (feeds the listing endpoint).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistSummary {
        pub id: Uuid,
        pub created_at: DateTime<Utc>,
        pub name: String,
        pub image: String,
        pub owner: super::user::UserSummary,
    }
}
