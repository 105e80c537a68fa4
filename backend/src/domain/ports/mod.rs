//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod gift_handoff;
mod user_resolver;
mod wishlist_command;
mod wishlist_query;
mod wishlist_repository;

#[cfg(test)]
pub use gift_handoff::MockGiftHandoff;
pub use gift_handoff::{FixtureGiftHandoff, GiftHandoff, GiftHandoffError};
#[cfg(test)]
pub use user_resolver::MockUserResolver;
pub use user_resolver::{FixtureUserResolver, UserResolver, UserResolverError};
#[cfg(test)]
pub use wishlist_command::MockWishlistCommand;
pub use wishlist_command::{
    CreateWishlistRequest, DeleteWishlistRequest, DeleteWishlistResponse, UpdateWishlistRequest,
    WishlistCommand, WishlistPatch, WishlistPayload,
};
#[cfg(test)]
pub use wishlist_query::MockWishlistQuery;
pub use wishlist_query::{GetWishlistRequest, ListWishlistsRequest, WishlistQuery};
#[cfg(test)]
pub use wishlist_repository::MockWishlistRepository;
pub use wishlist_repository::{
    FixtureWishlistRepository, WishlistRepository, WishlistRepositoryError,
};
