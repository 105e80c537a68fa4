//! Builders wiring the wishlist workflow onto storage adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use wishlist_backend::domain::WishlistService;
use wishlist_backend::domain::ports::{WishlistCommand, WishlistQuery};
use wishlist_backend::inbound::http::state::HttpState;
use wishlist_backend::outbound::memory::{
    InMemoryGiftHandoff, InMemoryUserDirectory, InMemoryWishlistRepository,
};
use wishlist_backend::outbound::persistence::{
    DbPool, DieselGiftHandoff, DieselUserResolver, DieselWishlistRepository,
};

use super::ServerConfig;

type WishlistPorts = (Arc<dyn WishlistCommand>, Arc<dyn WishlistQuery>);

/// Expose one service through both driving ports.
fn as_ports<S>(service: Arc<S>) -> WishlistPorts
where
    S: WishlistCommand + WishlistQuery + 'static,
{
    (service.clone(), service)
}

fn diesel_service(pool: &DbPool, clock: Arc<dyn Clock>) -> WishlistPorts {
    as_ports(Arc::new(WishlistService::new(
        Arc::new(DieselWishlistRepository::new(pool.clone())),
        Arc::new(DieselUserResolver::new(pool.clone())),
        Arc::new(DieselGiftHandoff::new(pool.clone(), clock.clone())),
        clock,
    )))
}

fn in_memory_service(clock: Arc<dyn Clock>) -> WishlistPorts {
    as_ports(Arc::new(WishlistService::new(
        Arc::new(InMemoryWishlistRepository::new()),
        Arc::new(InMemoryUserDirectory::new()),
        Arc::new(InMemoryGiftHandoff::new()),
        clock,
    )))
}

/// Use `make_service` when a pool is available, otherwise the in-memory
/// adapters.
fn build_wishlist_ports_with_pool<Pool>(
    pool: &Option<Pool>,
    clock: Arc<dyn Clock>,
    make_service: impl FnOnce(&Pool, Arc<dyn Clock>) -> WishlistPorts,
) -> WishlistPorts {
    match pool {
        Some(pool) => {
            info!("wishlists backed by PostgreSQL");
            make_service(pool, clock)
        }
        None => {
            warn!("no database configured; wishlists are kept in memory");
            in_memory_service(clock)
        }
    }
}

/// Build the shared HTTP state for the configured storage.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (wishlists, wishlists_query) =
        build_wishlist_ports_with_pool(&config.db_pool, Arc::new(DefaultClock), diesel_service);
    web::Data::new(HttpState::new(wishlists, wishlists_query))
}
