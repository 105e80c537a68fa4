//! Shared fixtures for wishlist integration tests.
//!
//! Every world runs the real `WishlistService` over the in-memory adapters,
//! seeded with three users: an owner, a friend and a stranger.

#![allow(
    dead_code,
    reason = "each integration test binary uses a different subset of helpers"
)]

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use wishlist_backend::domain::ports::{
    CreateWishlistRequest, GetWishlistRequest, WishlistCommand, WishlistPayload, WishlistQuery,
};
use wishlist_backend::domain::{
    CallerContext, EmailAddress, Error, User, UserId, WishlistId, WishlistService,
    WishlistVisibility,
};
use wishlist_backend::outbound::memory::{
    InMemoryGiftHandoff, InMemoryUserDirectory, InMemoryWishlistRepository,
};

pub type MemoryWishlistService =
    WishlistService<InMemoryWishlistRepository, InMemoryUserDirectory, InMemoryGiftHandoff>;

/// Clock pinned to 2026-03-14 09:00 UTC.
pub struct FixedClock;

impl FixedClock {
    pub fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .expect("fixture timestamp")
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        Self::instant().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Self::instant()
    }
}

fn user(email: &str) -> User {
    User::new(
        UserId::random(),
        EmailAddress::new(email).expect("fixture email"),
    )
}

/// Service plus handles on its adapters and seeded users.
pub struct World {
    pub service: Arc<MemoryWishlistService>,
    pub wishlists: Arc<InMemoryWishlistRepository>,
    pub gifts: Arc<InMemoryGiftHandoff>,
    pub owner: User,
    pub friend: User,
    pub stranger: User,
}

impl World {
    pub fn caller(user: &User) -> CallerContext {
        CallerContext::authenticated(user.id().clone())
    }

    pub fn create_request(&self, title: &str) -> CreateWishlistRequest {
        CreateWishlistRequest {
            caller: Self::caller(&self.owner),
            title: title.to_owned(),
            description: "Things I would like".to_owned(),
            visibility: None,
            allowed_user_emails: Vec::new(),
            gifts: Vec::new(),
        }
    }

    /// Create a wishlist owned by `owner`, shared with `grantees`.
    pub async fn create_owned(
        &self,
        visibility: WishlistVisibility,
        grantees: &[&User],
    ) -> WishlistPayload {
        let request = CreateWishlistRequest {
            visibility: Some(visibility),
            allowed_user_emails: grantees
                .iter()
                .map(|grantee| grantee.email().clone())
                .collect(),
            ..self.create_request("Birthday")
        };
        self.service
            .create_wishlist(request)
            .await
            .expect("owner creates wishlist")
    }

    pub async fn get_as(&self, user: &User, wishlist_id: WishlistId) -> Result<WishlistPayload, Error> {
        self.service
            .get_wishlist(GetWishlistRequest {
                caller: Self::caller(user),
                wishlist_id,
            })
            .await
    }
}

#[fixture]
pub fn world() -> World {
    let owner = user("owner@example.com");
    let friend = user("friend@example.com");
    let stranger = user("stranger@example.com");
    let wishlists = Arc::new(InMemoryWishlistRepository::new());
    let gifts = Arc::new(InMemoryGiftHandoff::new());
    let directory = Arc::new(InMemoryUserDirectory::with_users([
        owner.clone(),
        friend.clone(),
        stranger.clone(),
    ]));
    let service = Arc::new(WishlistService::new(
        wishlists.clone(),
        directory,
        gifts.clone(),
        Arc::new(FixedClock),
    ));
    World {
        service,
        wishlists,
        gifts,
        owner,
        friend,
        stranger,
    }
}
