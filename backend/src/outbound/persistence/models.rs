//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Enumerations travel as their canonical
//! upper-case strings and are parsed back through `FromStr`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{gifts, users, wishlist_allowed_users, wishlists};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
}

/// Row struct for reading from the wishlists table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wishlists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WishlistRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub visibility: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable wishlist; the id comes from the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = wishlists)]
pub(crate) struct NewWishlistRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub visibility: &'a str,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Mutable wishlist columns. Owner and creation time never change.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = wishlists)]
pub(crate) struct WishlistUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub visibility: &'a str,
}

/// One grantee link.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = wishlist_allowed_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AllowedUserRow {
    pub wishlist_id: Uuid,
    pub user_id: Uuid,
}

/// Insertable gift record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = gifts)]
pub(crate) struct NewGiftRow<'a> {
    pub id: Uuid,
    pub wishlist_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub link: Option<&'a str>,
    pub file_name: Option<&'a str>,
    pub file_content: &'a [u8],
    pub file_content_type: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
