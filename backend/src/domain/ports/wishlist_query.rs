//! Driving port for wishlist reads.
//!
//! Reads never distinguish "missing" from "not yours": both surface as
//! `not_found`.

use async_trait::async_trait;

use crate::domain::{CallerContext, Error, WishlistId};

use super::wishlist_command::WishlistPayload;

/// Request to list readable wishlists.
#[derive(Debug, Clone)]
pub struct ListWishlistsRequest {
    pub caller: CallerContext,
    /// Restrict to these ids; `None` lists everything readable.
    pub ids: Option<Vec<WishlistId>>,
}

/// Request to fetch one wishlist.
#[derive(Debug, Clone)]
pub struct GetWishlistRequest {
    pub caller: CallerContext,
    pub wishlist_id: WishlistId,
}

/// Driving port for wishlist read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WishlistQuery: Send + Sync {
    /// Wishlists the caller may read, in no particular order.
    async fn list_wishlists(
        &self,
        request: ListWishlistsRequest,
    ) -> Result<Vec<WishlistPayload>, Error>;

    /// One wishlist the caller may read.
    async fn get_wishlist(&self, request: GetWishlistRequest) -> Result<WishlistPayload, Error>;
}
