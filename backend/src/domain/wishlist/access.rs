//! Wishlist access rules.
//!
//! A viewer may read a wishlist when any [`AccessRule`] admits them. The rule
//! set is enumerable so storage adapters can translate each rule into a
//! filter clause instead of re-deriving the predicate; see
//! [`WishlistScope`] for the query contract.

use std::collections::BTreeSet;

use crate::domain::{EmailAddress, User, UserId};

use super::{Wishlist, WishlistId, WishlistVisibility};

/// One disjunct of the read-access predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessRule {
    /// The viewer owns the wishlist.
    Owner,
    /// The wishlist is public.
    Public,
    /// The viewer is in the grantee set.
    Grantee,
}

impl AccessRule {
    /// Every rule; a viewer is admitted when any of them holds.
    pub const ALL: [Self; 3] = [Self::Owner, Self::Public, Self::Grantee];

    /// Whether this rule alone admits `viewer`.
    pub fn admits(self, wishlist: &Wishlist, viewer: &UserId) -> bool {
        match self {
            Self::Owner => wishlist.owner_id() == viewer,
            Self::Public => wishlist.visibility() == WishlistVisibility::Public,
            Self::Grantee => wishlist.allowed_user_ids().contains(viewer),
        }
    }
}

/// First rule admitting `viewer`, if any.
pub fn access_grant(wishlist: &Wishlist, viewer: &UserId) -> Option<AccessRule> {
    AccessRule::ALL
        .into_iter()
        .find(|rule| rule.admits(wishlist, viewer))
}

/// Whether `viewer` may read `wishlist`.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
///
/// use chrono::Utc;
/// use wishlist_backend::domain::{
///     can_access, NewWishlist, UserId, WishlistDraft, WishlistId, WishlistVisibility,
/// };
///
/// let owner = UserId::random();
/// let wishlist = NewWishlist::new(WishlistDraft {
///     title: "Private".to_owned(),
///     description: "Owner only".to_owned(),
///     visibility: Some(WishlistVisibility::Private),
///     owner_id: owner.clone(),
///     allowed_user_ids: BTreeSet::new(),
///     created_at: Utc::now(),
/// })
/// .expect("valid draft")
/// .into_persisted(WishlistId::random());
///
/// assert!(can_access(&wishlist, &owner));
/// assert!(!can_access(&wishlist, &UserId::random()));
/// ```
pub fn can_access(wishlist: &Wishlist, viewer: &UserId) -> bool {
    access_grant(wishlist, viewer).is_some()
}

/// Raised when someone other than the owner tries to change a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{actor_email} is not the owner of wishlist {wishlist_id}")]
pub struct AccessDenied {
    actor_email: EmailAddress,
    wishlist_id: WishlistId,
}

impl AccessDenied {
    pub fn actor_email(&self) -> &EmailAddress {
        &self.actor_email
    }

    pub fn wishlist_id(&self) -> WishlistId {
        self.wishlist_id
    }
}

/// Fail unless `actor` owns `wishlist`.
pub fn require_owner(wishlist: &Wishlist, actor: &User) -> Result<(), AccessDenied> {
    if wishlist.owner_id() == actor.id() {
        Ok(())
    } else {
        Err(AccessDenied {
            actor_email: actor.email().clone(),
            wishlist_id: wishlist.id(),
        })
    }
}

/// The accessible-query contract: wishlists the viewer may read, optionally
/// narrowed to an id subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistScope {
    viewer: UserId,
    ids: Option<BTreeSet<WishlistId>>,
}

impl WishlistScope {
    /// Everything `viewer` may read.
    pub fn all_for(viewer: UserId) -> Self {
        Self { viewer, ids: None }
    }

    /// The readable members of `ids`.
    pub fn within(viewer: UserId, ids: impl IntoIterator<Item = WishlistId>) -> Self {
        Self {
            viewer,
            ids: Some(ids.into_iter().collect()),
        }
    }

    pub fn viewer(&self) -> &UserId {
        &self.viewer
    }

    /// The id restriction, `None` meaning unrestricted.
    pub fn ids(&self) -> Option<&BTreeSet<WishlistId>> {
        self.ids.as_ref()
    }

    /// True when the scope is restricted to no ids at all; stores can answer
    /// without a round trip.
    pub fn is_empty(&self) -> bool {
        self.ids.as_ref().is_some_and(BTreeSet::is_empty)
    }

    /// In-memory form of the accessible query.
    pub fn admits(&self, wishlist: &Wishlist) -> bool {
        let in_subset = self
            .ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&wishlist.id()));
        in_subset && can_access(wishlist, &self.viewer)
    }
}
