//! Port handing new gifts to the gift collaborator.

use async_trait::async_trait;

use crate::domain::{FileAttachment, GiftSpec, WishlistId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by gift handoff adapters.
    pub enum GiftHandoffError {
        /// The collaborator refused the gift.
        Rejected { message: String } => "gift rejected: {message}",
        /// Backing store could not be reached.
        Connection { message: String } =>
            "gift handoff connection failed: {message}",
        /// Write failed during execution.
        Query { message: String } => "gift handoff failed: {message}",
    }
}

/// Port for persisting one gift of an existing wishlist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GiftHandoff: Send + Sync {
    /// Persist `gift` under `wishlist_id` with its decoded attachment.
    async fn create_gift(
        &self,
        wishlist_id: &WishlistId,
        gift: &GiftSpec,
        file: FileAttachment,
    ) -> Result<(), GiftHandoffError>;
}

/// Fixture that accepts and discards every gift.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGiftHandoff;

#[async_trait]
impl GiftHandoff for FixtureGiftHandoff {
    async fn create_gift(
        &self,
        _wishlist_id: &WishlistId,
        _gift: &GiftSpec,
        _file: FileAttachment,
    ) -> Result<(), GiftHandoffError> {
        Ok(())
    }
}
