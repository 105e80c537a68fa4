//! Driving port for wishlist mutations.
//!
//! Creation also hands any attached gifts to the gift collaborator after the
//! wishlist itself is committed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    CallerContext, EmailAddress, Error, GiftDraft, UserId, Wishlist, WishlistId, WishlistStatus,
    WishlistVisibility,
};

/// Public representation of a wishlist returned by driving ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistPayload {
    pub id: WishlistId,
    pub title: String,
    pub description: String,
    pub status: WishlistStatus,
    pub visibility: WishlistVisibility,
    pub owner_user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub allowed_user_ids: Vec<UserId>,
}

impl From<Wishlist> for WishlistPayload {
    fn from(value: Wishlist) -> Self {
        Self {
            id: value.id(),
            title: value.title().to_owned(),
            description: value.description().to_owned(),
            status: value.status(),
            visibility: value.visibility(),
            owner_user_id: value.owner_id().clone(),
            created_at: value.created_at(),
            allowed_user_ids: value.allowed_user_ids().iter().cloned().collect(),
        }
    }
}

/// Request to create a wishlist and its initial gifts.
#[derive(Debug, Clone)]
pub struct CreateWishlistRequest {
    pub caller: CallerContext,
    pub title: String,
    pub description: String,
    pub visibility: Option<WishlistVisibility>,
    pub allowed_user_emails: Vec<EmailAddress>,
    pub gifts: Vec<GiftDraft>,
}

/// Owner patch expressed in request terms; grantees still as emails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<WishlistStatus>,
    pub visibility: Option<WishlistVisibility>,
    /// `Some(vec![])` revokes every grantee; `None` leaves them alone.
    pub allowed_user_emails: Option<Vec<EmailAddress>>,
}

/// Request to patch a wishlist.
#[derive(Debug, Clone)]
pub struct UpdateWishlistRequest {
    pub caller: CallerContext,
    pub wishlist_id: WishlistId,
    pub patch: WishlistPatch,
}

/// Request to delete a wishlist.
#[derive(Debug, Clone)]
pub struct DeleteWishlistRequest {
    pub caller: CallerContext,
    pub wishlist_id: WishlistId,
}

/// Outcome of a delete; `deleted` is `false` when the id was unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWishlistResponse {
    pub deleted: bool,
}

/// Driving port for wishlist write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WishlistCommand: Send + Sync {
    /// Create a wishlist owned by the caller, then hand off its gifts.
    ///
    /// The wishlist stays committed when a gift fails; the error still
    /// reaches the caller with `wishlistId` and `giftIndex` details.
    async fn create_wishlist(&self, request: CreateWishlistRequest)
    -> Result<WishlistPayload, Error>;

    /// Apply an owner patch.
    ///
    /// Unreadable wishlists fail with `not_found`; readable ones the caller
    /// does not own fail with `forbidden`.
    async fn update_wishlist(&self, request: UpdateWishlistRequest)
    -> Result<WishlistPayload, Error>;

    /// Delete a wishlist owned by the caller.
    async fn delete_wishlist(
        &self,
        request: DeleteWishlistRequest,
    ) -> Result<DeleteWishlistResponse, Error>;
}
