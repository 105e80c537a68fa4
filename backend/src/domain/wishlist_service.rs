//! Wishlist domain service.
//!
//! Implements the wishlist driving ports on top of the repository, user
//! resolver and gift handoff ports. Creation is two units of work: the
//! wishlist commits first, gifts follow, and the response is a fresh read. A
//! failing gift therefore never rolls the wishlist back.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CreateWishlistRequest, DeleteWishlistRequest, DeleteWishlistResponse, GetWishlistRequest,
    GiftHandoff, GiftHandoffError, ListWishlistsRequest, UpdateWishlistRequest, UserResolver,
    UserResolverError, WishlistCommand, WishlistPayload, WishlistQuery, WishlistRepository,
    WishlistRepositoryError,
};
use crate::domain::{
    AccessDenied, CallerContext, EmailAddress, Error, GiftDraft, NewWishlist, User, UserId,
    Wishlist, WishlistChanges, WishlistDraft, WishlistId, WishlistScope, WishlistValidationError,
    access_grant, require_owner,
};

fn map_repository_error(error: WishlistRepositoryError) -> Error {
    match error {
        WishlistRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("wishlist repository unavailable: {message}"))
        }
        WishlistRepositoryError::Query { message } => {
            Error::internal(format!("wishlist repository error: {message}"))
        }
        WishlistRepositoryError::WriteConflict { wishlist_id } => {
            Error::conflict(format!("wishlist {wishlist_id} was changed concurrently"))
                .with_details(json!({ "wishlistId": wishlist_id }))
        }
    }
}

fn map_resolver_error(error: UserResolverError) -> Error {
    match error {
        UserResolverError::Unauthenticated => Error::unauthorized("login required"),
        UserResolverError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserResolverError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

fn map_gift_error(error: GiftHandoffError, wishlist_id: WishlistId, gift_index: usize) -> Error {
    let details = json!({ "wishlistId": wishlist_id, "giftIndex": gift_index });
    let error = match error {
        GiftHandoffError::Rejected { message } => {
            Error::invalid_request(format!("gift {gift_index} rejected: {message}"))
        }
        GiftHandoffError::Connection { message } => {
            Error::service_unavailable(format!("gift store unavailable: {message}"))
        }
        GiftHandoffError::Query { message } => {
            Error::internal(format!("gift store error: {message}"))
        }
    };
    error.with_details(details)
}

fn map_validation_error(error: WishlistValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "blank_field",
    }))
}

fn map_access_denied(denied: &AccessDenied) -> Error {
    info!(wishlist_id = %denied.wishlist_id(), "non-owner mutation refused");
    Error::forbidden(denied.to_string())
}

fn not_found(id: WishlistId) -> Error {
    Error::not_found(format!("wishlist {id} not found"))
}

/// Wishlist service implementing both command and query driving ports.
#[derive(Clone)]
pub struct WishlistService<R, U, G> {
    wishlists: Arc<R>,
    users: Arc<U>,
    gifts: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<R, U, G> WishlistService<R, U, G> {
    /// Create a new service from its collaborators.
    pub fn new(wishlists: Arc<R>, users: Arc<U>, gifts: Arc<G>, clock: Arc<dyn Clock>) -> Self {
        Self {
            wishlists,
            users,
            gifts,
            clock,
        }
    }
}

impl<R, U, G> WishlistService<R, U, G>
where
    R: WishlistRepository,
    U: UserResolver,
    G: GiftHandoff,
{
    async fn acting_user(&self, caller: &CallerContext) -> Result<User, Error> {
        self.users
            .authenticated_user(caller)
            .await
            .map_err(map_resolver_error)
    }

    /// Unknown emails are dropped and duplicates collapse.
    async fn resolve_grantees(&self, emails: &[EmailAddress]) -> Result<BTreeSet<UserId>, Error> {
        if emails.is_empty() {
            return Ok(BTreeSet::new());
        }
        let users = self
            .users
            .users_by_emails(emails)
            .await
            .map_err(map_resolver_error)?;
        if users.len() < emails.len() {
            debug!(
                requested = emails.len(),
                resolved = users.len(),
                "some grantee emails matched no user"
            );
        }
        Ok(users.into_iter().map(|user| user.id().clone()).collect())
    }

    async fn find_readable(&self, viewer: &UserId, id: WishlistId) -> Result<Wishlist, Error> {
        let scope = WishlistScope::within(viewer.clone(), [id]);
        let wishlist = self
            .wishlists
            .find_accessible(&scope)
            .await
            .map_err(map_repository_error)?
            .into_iter()
            .find(|wishlist| wishlist.id() == id)
            .ok_or_else(|| not_found(id))?;
        if let Some(rule) = access_grant(&wishlist, viewer) {
            debug!(wishlist_id = %id, ?rule, "wishlist read granted");
        }
        Ok(wishlist)
    }

    async fn hand_off_gift(
        &self,
        wishlist_id: WishlistId,
        gift_index: usize,
        gift: GiftDraft,
    ) -> Result<(), Error> {
        let GiftDraft { spec, file } = gift;
        let attachment = file.unwrap_or_default().decode().map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "code": "invalid_file_encoding",
                "wishlistId": wishlist_id,
                "giftIndex": gift_index,
            }))
        })?;
        self.gifts
            .create_gift(&wishlist_id, &spec, attachment)
            .await
            .map_err(|err| map_gift_error(err, wishlist_id, gift_index))
    }
}

#[async_trait]
impl<R, U, G> WishlistCommand for WishlistService<R, U, G>
where
    R: WishlistRepository,
    U: UserResolver,
    G: GiftHandoff,
{
    async fn create_wishlist(
        &self,
        request: CreateWishlistRequest,
    ) -> Result<WishlistPayload, Error> {
        let CreateWishlistRequest {
            caller,
            title,
            description,
            visibility,
            allowed_user_emails,
            gifts,
        } = request;

        let owner = self.acting_user(&caller).await?;
        let allowed_user_ids = self.resolve_grantees(&allowed_user_emails).await?;
        let draft = NewWishlist::new(WishlistDraft {
            title,
            description,
            visibility,
            owner_id: owner.id().clone(),
            allowed_user_ids,
            created_at: self.clock.utc(),
        })
        .map_err(map_validation_error)?;

        let created = self
            .wishlists
            .create(&draft)
            .await
            .map_err(map_repository_error)?;
        let wishlist_id = created.id();
        info!(%wishlist_id, owner_id = %owner.id(), "wishlist created");

        for (gift_index, gift) in gifts.into_iter().enumerate() {
            if let Err(error) = self.hand_off_gift(wishlist_id, gift_index, gift).await {
                warn!(%wishlist_id, gift_index, %error, "gift handoff failed; wishlist kept");
                return Err(error);
            }
        }

        let stored = self
            .wishlists
            .find_by_id(&wishlist_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(wishlist_id))?;
        Ok(stored.into())
    }

    async fn update_wishlist(
        &self,
        request: UpdateWishlistRequest,
    ) -> Result<WishlistPayload, Error> {
        let UpdateWishlistRequest {
            caller,
            wishlist_id,
            patch,
        } = request;

        let actor = self.acting_user(&caller).await?;
        let mut wishlist = self.find_readable(actor.id(), wishlist_id).await?;
        require_owner(&wishlist, &actor).map_err(|denied| map_access_denied(&denied))?;

        let allowed_user_ids = match patch.allowed_user_emails {
            Some(emails) => Some(self.resolve_grantees(&emails).await?),
            None => None,
        };
        wishlist
            .apply(WishlistChanges {
                title: patch.title,
                description: patch.description,
                status: patch.status,
                visibility: patch.visibility,
                allowed_user_ids,
            })
            .map_err(map_validation_error)?;

        self.wishlists
            .update(&wishlist)
            .await
            .map_err(map_repository_error)?;
        info!(%wishlist_id, "wishlist updated");
        Ok(wishlist.into())
    }

    async fn delete_wishlist(
        &self,
        request: DeleteWishlistRequest,
    ) -> Result<DeleteWishlistResponse, Error> {
        let DeleteWishlistRequest {
            caller,
            wishlist_id,
        } = request;

        let actor = self.acting_user(&caller).await?;
        let Some(wishlist) = self
            .wishlists
            .find_by_id(&wishlist_id)
            .await
            .map_err(map_repository_error)?
        else {
            return Ok(DeleteWishlistResponse { deleted: false });
        };
        require_owner(&wishlist, &actor).map_err(|denied| map_access_denied(&denied))?;

        let deleted = self
            .wishlists
            .delete(&wishlist_id, actor.id())
            .await
            .map_err(map_repository_error)?;
        info!(%wishlist_id, deleted, "wishlist delete processed");
        Ok(DeleteWishlistResponse { deleted })
    }
}

#[async_trait]
impl<R, U, G> WishlistQuery for WishlistService<R, U, G>
where
    R: WishlistRepository,
    U: UserResolver,
    G: GiftHandoff,
{
    async fn list_wishlists(
        &self,
        request: ListWishlistsRequest,
    ) -> Result<Vec<WishlistPayload>, Error> {
        let actor = self.acting_user(&request.caller).await?;
        let viewer = actor.id().clone();
        let scope = match request.ids {
            Some(ids) => WishlistScope::within(viewer, ids),
            None => WishlistScope::all_for(viewer),
        };

        let wishlists = self
            .wishlists
            .find_accessible(&scope)
            .await
            .map_err(map_repository_error)?;
        Ok(wishlists.into_iter().map(Into::into).collect())
    }

    async fn get_wishlist(&self, request: GetWishlistRequest) -> Result<WishlistPayload, Error> {
        let actor = self.acting_user(&request.caller).await?;
        self.find_readable(actor.id(), request.wishlist_id)
            .await
            .map(Into::into)
    }
}

#[cfg(test)]
#[path = "wishlist_service_tests.rs"]
mod tests;
