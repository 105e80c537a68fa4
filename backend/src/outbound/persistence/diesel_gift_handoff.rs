//! Diesel-backed `GiftHandoff` storing gifts and their attachments.
//!
//! A missing wishlist surfaces as a foreign-key violation and is reported as
//! a rejection.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{GiftHandoff, GiftHandoffError};
use crate::domain::{FileAttachment, GiftSpec, WishlistId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewGiftRow;
use super::pool::DbPool;
use super::schema::gifts;

/// Persists gifts into the `gifts` table.
#[derive(Clone)]
pub struct DieselGiftHandoff {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselGiftHandoff {
    /// Create a handoff stamping gifts with `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_insert_error(error: DieselError, wishlist_id: &WishlistId) -> GiftHandoffError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            GiftHandoffError::rejected(format!("wishlist {wishlist_id} does not exist"))
        }
        other => map_diesel_error(other, GiftHandoffError::query, GiftHandoffError::connection),
    }
}

#[async_trait]
impl GiftHandoff for DieselGiftHandoff {
    async fn create_gift(
        &self,
        wishlist_id: &WishlistId,
        gift: &GiftSpec,
        file: FileAttachment,
    ) -> Result<(), GiftHandoffError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, GiftHandoffError::connection))?;
        let row = NewGiftRow {
            id: Uuid::new_v4(),
            wishlist_id: *wishlist_id.as_uuid(),
            title: gift.title.as_str(),
            description: gift.description.as_deref(),
            link: gift.link.as_deref(),
            file_name: file.file_name.as_deref(),
            file_content: file.content.as_slice(),
            file_content_type: file.content_type.as_deref(),
            created_at: self.clock.utc(),
        };

        diesel::insert_into(gifts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, wishlist_id))?;

        debug!(
            %wishlist_id,
            gift_id = %row.id,
            attachment_bytes = row.file_content.len(),
            "gift stored"
        );
        Ok(())
    }
}
