pub use commands::{ContributeCmd, NewWishCmd, NewWishlistCmd, SignupCmd, UpdateWishCmd, UpdateWishlistCmd};
pub use error::EngineError;
pub use money::MoneyCents;
pub use offers::Offer;
pub use ops::{Engine, EngineBuilder, WishDetail};
pub use wishes::Wish;

pub mod offers;
pub mod users;
pub mod wishes;
pub mod wishlist_items;
pub mod wishlists;

mod commands;
mod error;
mod money;
mod ops;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
