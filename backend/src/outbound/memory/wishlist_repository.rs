//! `WishlistRepository` over a map keyed by wishlist id.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{WishlistRepository, WishlistRepositoryError};
use crate::domain::{NewWishlist, UserId, Wishlist, WishlistId, WishlistScope};

/// Wishlists held in process memory.
///
/// `find_accessible` filters with [`WishlistScope::admits`], the same rule
/// set the SQL adapter compiles into its `WHERE` clause.
#[derive(Debug, Default)]
pub struct InMemoryWishlistRepository {
    wishlists: RwLock<HashMap<WishlistId, Wishlist>>,
}

impl InMemoryWishlistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored wishlists.
    pub async fn len(&self) -> usize {
        self.wishlists.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.wishlists.read().await.is_empty()
    }
}

#[async_trait]
impl WishlistRepository for InMemoryWishlistRepository {
    async fn create(&self, wishlist: &NewWishlist) -> Result<Wishlist, WishlistRepositoryError> {
        let persisted = wishlist.clone().into_persisted(WishlistId::random());
        self.wishlists
            .write()
            .await
            .insert(persisted.id(), persisted.clone());
        Ok(persisted)
    }

    async fn find_by_id(
        &self,
        id: &WishlistId,
    ) -> Result<Option<Wishlist>, WishlistRepositoryError> {
        Ok(self.wishlists.read().await.get(id).cloned())
    }

    async fn find_accessible(
        &self,
        scope: &WishlistScope,
    ) -> Result<Vec<Wishlist>, WishlistRepositoryError> {
        if scope.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .wishlists
            .read()
            .await
            .values()
            .filter(|wishlist| scope.admits(wishlist))
            .cloned()
            .collect())
    }

    async fn update(&self, wishlist: &Wishlist) -> Result<(), WishlistRepositoryError> {
        let mut guard = self.wishlists.write().await;
        match guard.get_mut(&wishlist.id()) {
            Some(stored) if stored.owner_id() == wishlist.owner_id() => {
                *stored = wishlist.clone();
                Ok(())
            }
            _ => Err(WishlistRepositoryError::write_conflict(wishlist.id())),
        }
    }

    async fn delete(
        &self,
        id: &WishlistId,
        owner: &UserId,
    ) -> Result<bool, WishlistRepositoryError> {
        let mut guard = self.wishlists.write().await;
        let owned = guard
            .get(id)
            .is_some_and(|stored| stored.owner_id() == owner);
        Ok(owned && guard.remove(id).is_some())
    }
}
