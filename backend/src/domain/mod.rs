//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed wishlist entities, the access rules that
//! guard them and the workflow service the HTTP layer drives. Keep types
//! immutable outside their validating constructors and document invariants
//! and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - TraceId: per-request correlation identifier.
//! - User / UserId / EmailAddress / CallerContext: identities.
//! - Wishlist and friends: the aggregate and its lifecycle types.
//! - access rules: `can_access`, `access_grant`, `require_owner`,
//!   `WishlistScope`.
//! - gift payloads handed off during creation.
//! - WishlistService: implements the wishlist driving ports.

pub mod caller;
pub mod error;
pub mod gift;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod wishlist;
mod wishlist_service;

pub use self::caller::CallerContext;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gift::{
    FileAttachment, FileEncodingError, FilePayload, GiftDraft, GiftSpec, decode_file_content,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, User, UserId, UserValidationError};
pub use self::wishlist::access::{
    AccessDenied, AccessRule, WishlistScope, access_grant, can_access, require_owner,
};
pub use self::wishlist::{
    NewWishlist, ParseWishlistEnumError, Wishlist, WishlistChanges, WishlistDraft, WishlistId,
    WishlistRecord, WishlistStatus, WishlistValidationError, WishlistVisibility,
};
pub use self::wishlist_service::WishlistService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use wishlist_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
