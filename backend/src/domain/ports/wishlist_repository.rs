//! Port for durable wishlist storage.

use async_trait::async_trait;

use crate::domain::{NewWishlist, UserId, Wishlist, WishlistId, WishlistScope};

use super::define_port_error;

define_port_error! {
    /// Errors raised by wishlist repository adapters.
    pub enum WishlistRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "wishlist repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "wishlist repository query failed: {message}",
        /// The guarded write matched no row: the wishlist vanished or changed
        /// owner since it was read.
        WriteConflict { wishlist_id: WishlistId } =>
            "wishlist {wishlist_id} changed concurrently",
    }
}

/// Port for wishlist persistence.
///
/// Every method is its own unit of work. `find_accessible` must admit exactly
/// the rows [`WishlistScope::admits`] would.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// Insert a wishlist with its grantees and return it with its new id.
    async fn create(&self, wishlist: &NewWishlist) -> Result<Wishlist, WishlistRepositoryError>;

    /// Look a wishlist up by id without any access filtering.
    async fn find_by_id(
        &self,
        id: &WishlistId,
    ) -> Result<Option<Wishlist>, WishlistRepositoryError>;

    /// Wishlists readable within `scope`. No ordering is guaranteed.
    async fn find_accessible(
        &self,
        scope: &WishlistScope,
    ) -> Result<Vec<Wishlist>, WishlistRepositoryError>;

    /// Rewrite a wishlist and replace its grantees, provided its stored owner
    /// still matches `wishlist.owner_id()`.
    async fn update(&self, wishlist: &Wishlist) -> Result<(), WishlistRepositoryError>;

    /// Delete a wishlist owned by `owner`; `false` when nothing matched.
    async fn delete(
        &self,
        id: &WishlistId,
        owner: &UserId,
    ) -> Result<bool, WishlistRepositoryError>;
}

/// Fixture implementation for tests that never reach storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWishlistRepository;

#[async_trait]
impl WishlistRepository for FixtureWishlistRepository {
    async fn create(&self, wishlist: &NewWishlist) -> Result<Wishlist, WishlistRepositoryError> {
        Ok(wishlist.clone().into_persisted(WishlistId::random()))
    }

    async fn find_by_id(
        &self,
        _id: &WishlistId,
    ) -> Result<Option<Wishlist>, WishlistRepositoryError> {
        Ok(None)
    }

    async fn find_accessible(
        &self,
        _scope: &WishlistScope,
    ) -> Result<Vec<Wishlist>, WishlistRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(&self, wishlist: &Wishlist) -> Result<(), WishlistRepositoryError> {
        Err(WishlistRepositoryError::write_conflict(wishlist.id()))
    }

    async fn delete(
        &self,
        _id: &WishlistId,
        _owner: &UserId,
    ) -> Result<bool, WishlistRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::WishlistDraft;

    fn new_wishlist() -> NewWishlist {
        NewWishlist::new(WishlistDraft {
            title: "Gifts".to_owned(),
            description: "For the holidays".to_owned(),
            visibility: None,
            owner_id: UserId::random(),
            allowed_user_ids: BTreeSet::new(),
            created_at: Utc::now(),
        })
        .expect("valid draft")
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_create_assigns_an_id_and_keeps_fields() {
        let draft = new_wishlist();
        let created = FixtureWishlistRepository
            .create(&draft)
            .await
            .expect("fixture create succeeds");
        assert_eq!(created.title(), draft.title());
        assert_eq!(created.owner_id(), draft.owner_id());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_reads_are_empty() {
        let repo = FixtureWishlistRepository;
        let id = WishlistId::random();
        assert!(repo.find_by_id(&id).await.expect("lookup").is_none());
        let scope = WishlistScope::all_for(UserId::random());
        assert!(repo.find_accessible(&scope).await.expect("query").is_empty());
        assert!(!repo.delete(&id, &UserId::random()).await.expect("delete"));
    }

    #[rstest]
    fn write_conflict_names_the_wishlist() {
        let id = WishlistId::random();
        let err = WishlistRepositoryError::write_conflict(id);
        assert_eq!(err.to_string(), format!("wishlist {id} changed concurrently"));
    }
}
