//! Wishlist aggregate.
//!
//! A wishlist is owned by exactly one user, carries a visibility flag and an
//! explicit grantee set. Who may see it is decided by [`access`]; who may
//! change it is always the owner alone.

pub mod access;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Opaque wishlist identifier assigned by the store on first persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistId(Uuid);

impl WishlistId {
    /// Wrap a UUID produced by storage.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for WishlistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for WishlistId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Error returned when a status or visibility string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseWishlistEnumError {
    kind: &'static str,
    value: String,
}

/// Lifecycle status. Gift reservation rules key off this downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WishlistStatus {
    #[default]
    Opened,
    Closed,
}

impl WishlistStatus {
    /// Canonical wire and storage form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "OPENED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for WishlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WishlistStatus {
    type Err = ParseWishlistEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPENED" => Ok(Self::Opened),
            "CLOSED" => Ok(Self::Closed),
            other => Err(ParseWishlistEnumError {
                kind: "status",
                value: other.to_owned(),
            }),
        }
    }
}

/// Visibility flag feeding the access predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WishlistVisibility {
    /// Readable by any authenticated user.
    #[default]
    Public,
    /// Readable by the owner and grantees only.
    Private,
}

impl WishlistVisibility {
    /// Canonical wire and storage form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for WishlistVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WishlistVisibility {
    type Err = ParseWishlistEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            other => Err(ParseWishlistEnumError {
                kind: "visibility",
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation failures for wishlist text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WishlistValidationError {
    #[error("title must not be blank")]
    BlankTitle,
    #[error("description must not be blank")]
    BlankDescription,
}

impl WishlistValidationError {
    /// Name of the offending request field.
    pub const fn field(self) -> &'static str {
        match self {
            Self::BlankTitle => "title",
            Self::BlankDescription => "description",
        }
    }
}

fn normalise_title(raw: &str) -> Result<String, WishlistValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WishlistValidationError::BlankTitle);
    }
    Ok(trimmed.to_owned())
}

fn normalise_description(raw: &str) -> Result<String, WishlistValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WishlistValidationError::BlankDescription);
    }
    Ok(trimmed.to_owned())
}

/// Unvalidated input for [`NewWishlist::new`].
#[derive(Debug, Clone)]
pub struct WishlistDraft {
    pub title: String,
    pub description: String,
    pub visibility: Option<WishlistVisibility>,
    pub owner_id: UserId,
    pub allowed_user_ids: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

/// A validated wishlist that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWishlist {
    title: String,
    description: String,
    status: WishlistStatus,
    visibility: WishlistVisibility,
    owner_id: UserId,
    allowed_user_ids: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
}

impl NewWishlist {
    /// Trim and validate a draft. New wishlists always start `OPENED` and
    /// default to `PUBLIC`.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeSet;
    ///
    /// use chrono::Utc;
    /// use wishlist_backend::domain::{
    ///     NewWishlist, UserId, WishlistDraft, WishlistStatus, WishlistVisibility,
    /// };
    ///
    /// let wishlist = NewWishlist::new(WishlistDraft {
    ///     title: "  Birthday ".to_owned(),
    ///     description: "Things I like".to_owned(),
    ///     visibility: None,
    ///     owner_id: UserId::random(),
    ///     allowed_user_ids: BTreeSet::new(),
    ///     created_at: Utc::now(),
    /// })
    /// .expect("valid draft");
    /// assert_eq!(wishlist.title(), "Birthday");
    /// assert_eq!(wishlist.status(), WishlistStatus::Opened);
    /// assert_eq!(wishlist.visibility(), WishlistVisibility::Public);
    /// ```
    pub fn new(draft: WishlistDraft) -> Result<Self, WishlistValidationError> {
        Ok(Self {
            title: normalise_title(&draft.title)?,
            description: normalise_description(&draft.description)?,
            status: WishlistStatus::Opened,
            visibility: draft.visibility.unwrap_or_default(),
            owner_id: draft.owner_id,
            allowed_user_ids: draft.allowed_user_ids,
            created_at: draft.created_at,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> WishlistStatus {
        self.status
    }

    pub fn visibility(&self) -> WishlistVisibility {
        self.visibility
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn allowed_user_ids(&self) -> &BTreeSet<UserId> {
        &self.allowed_user_ids
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attach the store-assigned identifier.
    pub fn into_persisted(self, id: WishlistId) -> Wishlist {
        Wishlist {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            visibility: self.visibility,
            owner_id: self.owner_id,
            allowed_user_ids: self.allowed_user_ids,
            created_at: self.created_at,
        }
    }
}

/// Field values read back from storage, fed to [`Wishlist::restore`].
#[derive(Debug, Clone)]
pub struct WishlistRecord {
    pub id: WishlistId,
    pub title: String,
    pub description: String,
    pub status: WishlistStatus,
    pub visibility: WishlistVisibility,
    pub owner_id: UserId,
    pub allowed_user_ids: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Owner-supplied patch. `None` leaves a field unchanged; for grantees
/// `Some(empty)` revokes everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<WishlistStatus>,
    pub visibility: Option<WishlistVisibility>,
    pub allowed_user_ids: Option<BTreeSet<UserId>>,
}

/// Persisted wishlist aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wishlist {
    id: WishlistId,
    title: String,
    description: String,
    status: WishlistStatus,
    visibility: WishlistVisibility,
    owner_id: UserId,
    allowed_user_ids: BTreeSet<UserId>,
    created_at: DateTime<Utc>,
}

impl Wishlist {
    /// Rebuild an aggregate from stored values, re-checking text invariants.
    pub fn restore(record: WishlistRecord) -> Result<Self, WishlistValidationError> {
        Ok(Self {
            id: record.id,
            title: normalise_title(&record.title)?,
            description: normalise_description(&record.description)?,
            status: record.status,
            visibility: record.visibility,
            owner_id: record.owner_id,
            allowed_user_ids: record.allowed_user_ids,
            created_at: record.created_at,
        })
    }

    pub fn id(&self) -> WishlistId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> WishlistStatus {
        self.status
    }

    pub fn visibility(&self) -> WishlistVisibility {
        self.visibility
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn allowed_user_ids(&self) -> &BTreeSet<UserId> {
        &self.allowed_user_ids
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a patch. Either every present field is applied or, on a
    /// validation failure, none is.
    pub fn apply(&mut self, changes: WishlistChanges) -> Result<(), WishlistValidationError> {
        let title = changes.title.as_deref().map(normalise_title).transpose()?;
        let description = changes
            .description
            .as_deref()
            .map(normalise_description)
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(visibility) = changes.visibility {
            self.visibility = visibility;
        }
        if let Some(allowed) = changes.allowed_user_ids {
            self.allowed_user_ids = allowed;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
