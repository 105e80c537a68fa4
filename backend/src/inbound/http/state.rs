//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{WishlistCommand, WishlistQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub wishlists: Arc<dyn WishlistCommand>,
    pub wishlists_query: Arc<dyn WishlistQuery>,
}

impl HttpState {
    /// Construct state from the wishlist driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use wishlist_backend::domain::WishlistService;
    /// use wishlist_backend::domain::ports::{
    ///     FixtureGiftHandoff, FixtureUserResolver, FixtureWishlistRepository,
    /// };
    /// use wishlist_backend::inbound::http::state::HttpState;
    ///
    /// let service = Arc::new(WishlistService::new(
    ///     Arc::new(FixtureWishlistRepository),
    ///     Arc::new(FixtureUserResolver),
    ///     Arc::new(FixtureGiftHandoff),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(service.clone(), service);
    /// let _wishlists = state.wishlists.clone();
    /// ```
    pub fn new(wishlists: Arc<dyn WishlistCommand>, wishlists_query: Arc<dyn WishlistQuery>) -> Self {
        Self {
            wishlists,
            wishlists_query,
        }
    }
}
