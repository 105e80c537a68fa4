//! `GiftHandoff` recording gifts in process memory.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{GiftHandoff, GiftHandoffError};
use crate::domain::{FileAttachment, GiftSpec, WishlistId};

/// A gift as handed off, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredGift {
    pub wishlist_id: WishlistId,
    pub spec: GiftSpec,
    pub file: FileAttachment,
}

/// Accepts every gift and keeps it for inspection.
#[derive(Debug, Default)]
pub struct InMemoryGiftHandoff {
    gifts: RwLock<Vec<StoredGift>>,
}

impl InMemoryGiftHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gifts handed off for `wishlist_id`, oldest first.
    pub async fn gifts_for(&self, wishlist_id: &WishlistId) -> Vec<StoredGift> {
        self.gifts
            .read()
            .await
            .iter()
            .filter(|gift| &gift.wishlist_id == wishlist_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GiftHandoff for InMemoryGiftHandoff {
    async fn create_gift(
        &self,
        wishlist_id: &WishlistId,
        gift: &GiftSpec,
        file: FileAttachment,
    ) -> Result<(), GiftHandoffError> {
        debug!(%wishlist_id, title = %gift.title, "gift recorded");
        self.gifts.write().await.push(StoredGift {
            wishlist_id: *wishlist_id,
            spec: gift.clone(),
            file,
        });
        Ok(())
    }
}
