//! In-memory adapters for running without PostgreSQL.
//!
//! They back the server when no database URL is configured and back the
//! workflow integration tests. State lives behind `tokio::sync::RwLock` and
//! is lost on restart.

mod gift_handoff;
mod user_directory;
mod wishlist_repository;

pub use gift_handoff::{InMemoryGiftHandoff, StoredGift};
pub use user_directory::InMemoryUserDirectory;
pub use wishlist_repository::InMemoryWishlistRepository;
