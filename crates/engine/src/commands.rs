//! Command structs for engine operations.
//!
//! These types group parameters for write operations (signup, wish and
//! wishlist writes, contributions), keeping call sites readable and avoiding
//! long argument lists.

use uuid::Uuid;

use crate::MoneyCents;

/// Register a new user.
#[derive(Clone, Debug)]
pub struct SignupCmd {
    pub username: String,
    pub email: String,
    pub password: String,
    pub about: Option<String>,
    pub avatar: Option<String>,
}

impl SignupCmd {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            about: None,
            avatar: None,
        }
    }

    #[must_use]
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Publish a new wish.
#[derive(Clone, Debug)]
pub struct NewWishCmd {
    pub user_id: String,
    pub name: String,
    pub link: String,
    pub image: String,
    pub description: String,
    pub price: MoneyCents,
}

/// Edit a wish's mutable fields.
///
/// `price` is accepted only while nothing has been raised.
#[derive(Clone, Debug)]
pub struct UpdateWishCmd {
    pub wish_id: Uuid,
    pub user_id: String,
    pub name: Option<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<MoneyCents>,
}

impl UpdateWishCmd {
    #[must_use]
    pub fn new(wish_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            wish_id,
            user_id: user_id.into(),
            name: None,
            link: None,
            image: None,
            description: None,
            price: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn price(mut self, price: MoneyCents) -> Self {
        self.price = Some(price);
        self
    }
}

/// Pledge an amount toward a wish.
#[derive(Clone, Debug)]
pub struct ContributeCmd {
    pub item_id: Uuid,
    pub user_id: String,
    pub amount: MoneyCents,
    pub hidden: bool,
}

impl ContributeCmd {
    #[must_use]
    pub fn new(item_id: Uuid, user_id: impl Into<String>, amount: MoneyCents) -> Self {
        Self {
            item_id,
            user_id: user_id.into(),
            amount,
            hidden: false,
        }
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Create a wishlist from a set of wish ids.
#[derive(Clone, Debug)]
pub struct NewWishlistCmd {
    pub user_id: String,
    pub name: String,
    pub image: String,
    pub item_ids: Vec<Uuid>,
}

/// Edit a wishlist; `item_ids` replaces the member set wholesale.
#[derive(Clone, Debug)]
pub struct UpdateWishlistCmd {
    pub wishlist_id: Uuid,
    pub user_id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub item_ids: Option<Vec<Uuid>>,
}

impl UpdateWishlistCmd {
    #[must_use]
    pub fn new(wishlist_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            wishlist_id,
            user_id: user_id.into(),
            name: None,
            image: None,
            item_ids: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn item_ids(mut self, item_ids: Vec<Uuid>) -> Self {
        self.item_ids = Some(item_ids);
        self
    }
}
