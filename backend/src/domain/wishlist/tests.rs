//! Tests for the wishlist aggregate and access rules.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::access::{AccessRule, WishlistScope, access_grant, can_access, require_owner};
use super::*;
use crate::domain::{EmailAddress, User};

#[fixture]
fn owner() -> UserId {
    UserId::random()
}

fn draft(owner_id: UserId) -> WishlistDraft {
    WishlistDraft {
        title: "Birthday".to_owned(),
        description: "Things for March".to_owned(),
        visibility: None,
        owner_id,
        allowed_user_ids: BTreeSet::new(),
        created_at: Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("fixed timestamp"),
    }
}

fn persisted(
    owner_id: UserId,
    visibility: WishlistVisibility,
    grantees: impl IntoIterator<Item = UserId>,
) -> Wishlist {
    let mut d = draft(owner_id);
    d.visibility = Some(visibility);
    d.allowed_user_ids = grantees.into_iter().collect();
    NewWishlist::new(d)
        .expect("valid draft")
        .into_persisted(WishlistId::random())
}

#[rstest]
fn new_wishlist_defaults_to_opened_and_public(owner: UserId) {
    let wishlist = NewWishlist::new(draft(owner)).expect("valid draft");
    assert_eq!(wishlist.status(), WishlistStatus::Opened);
    assert_eq!(wishlist.visibility(), WishlistVisibility::Public);
}

#[rstest]
fn new_wishlist_trims_text(owner: UserId) {
    let mut d = draft(owner);
    d.title = "  Birthday \n".to_owned();
    d.description = "\tThings ".to_owned();

    let wishlist = NewWishlist::new(d).expect("valid draft");
    assert_eq!(wishlist.title(), "Birthday");
    assert_eq!(wishlist.description(), "Things");
}

#[rstest]
#[case("   ", "desc", WishlistValidationError::BlankTitle)]
#[case("", "desc", WishlistValidationError::BlankTitle)]
#[case("title", " \t", WishlistValidationError::BlankDescription)]
fn new_wishlist_rejects_blank_text(
    owner: UserId,
    #[case] title: &str,
    #[case] description: &str,
    #[case] expected: WishlistValidationError,
) {
    let mut d = draft(owner);
    d.title = title.to_owned();
    d.description = description.to_owned();
    assert_eq!(NewWishlist::new(d), Err(expected));
}

#[rstest]
fn validation_errors_name_their_field() {
    assert_eq!(WishlistValidationError::BlankTitle.field(), "title");
    assert_eq!(
        WishlistValidationError::BlankDescription.field(),
        "description"
    );
}

#[rstest]
#[case("OPENED", WishlistStatus::Opened)]
#[case("CLOSED", WishlistStatus::Closed)]
fn status_parses_canonical_form(#[case] raw: &str, #[case] expected: WishlistStatus) {
    assert_eq!(raw.parse::<WishlistStatus>(), Ok(expected));
    assert_eq!(expected.to_string(), raw);
}

#[rstest]
fn visibility_rejects_unknown_values() {
    let err = "FRIENDS".parse::<WishlistVisibility>().expect_err("unknown");
    assert_eq!(err.to_string(), "unknown visibility value: FRIENDS");
}

#[rstest]
fn enums_serialise_in_upper_case() {
    let json = serde_json::to_string(&(WishlistStatus::Opened, WishlistVisibility::Private))
        .expect("serialise");
    assert_eq!(json, r#"["OPENED","PRIVATE"]"#);
}

#[rstest]
fn empty_patch_leaves_wishlist_unchanged(owner: UserId) {
    let original = persisted(owner, WishlistVisibility::Private, [UserId::random()]);
    let mut patched = original.clone();

    patched
        .apply(WishlistChanges::default())
        .expect("empty patch applies");
    assert_eq!(patched, original);
}

#[rstest]
fn patch_replaces_grantees_rather_than_merging(owner: UserId) {
    let kept = UserId::random();
    let mut wishlist = persisted(owner, WishlistVisibility::Private, [UserId::random()]);

    wishlist
        .apply(WishlistChanges {
            allowed_user_ids: Some(BTreeSet::from([kept.clone()])),
            ..WishlistChanges::default()
        })
        .expect("patch applies");
    assert_eq!(wishlist.allowed_user_ids(), &BTreeSet::from([kept]));

    wishlist
        .apply(WishlistChanges {
            allowed_user_ids: Some(BTreeSet::new()),
            ..WishlistChanges::default()
        })
        .expect("patch applies");
    assert!(wishlist.allowed_user_ids().is_empty());
}

#[rstest]
fn invalid_patch_is_all_or_nothing(owner: UserId) {
    let original = persisted(owner, WishlistVisibility::Public, []);
    let mut patched = original.clone();

    let result = patched.apply(WishlistChanges {
        title: Some("New title".to_owned()),
        description: Some("   ".to_owned()),
        status: Some(WishlistStatus::Closed),
        ..WishlistChanges::default()
    });

    assert_eq!(result, Err(WishlistValidationError::BlankDescription));
    assert_eq!(patched, original);
}

#[rstest]
fn patch_updates_status_and_visibility(owner: UserId) {
    let mut wishlist = persisted(owner, WishlistVisibility::Public, []);
    wishlist
        .apply(WishlistChanges {
            status: Some(WishlistStatus::Closed),
            visibility: Some(WishlistVisibility::Private),
            title: Some(" Renamed ".to_owned()),
            ..WishlistChanges::default()
        })
        .expect("patch applies");

    assert_eq!(wishlist.status(), WishlistStatus::Closed);
    assert_eq!(wishlist.visibility(), WishlistVisibility::Private);
    assert_eq!(wishlist.title(), "Renamed");
}

#[rstest]
fn restore_rejects_blank_stored_title(owner: UserId) {
    let wishlist = persisted(owner, WishlistVisibility::Public, []);
    let record = WishlistRecord {
        id: wishlist.id(),
        title: " ".to_owned(),
        description: wishlist.description().to_owned(),
        status: wishlist.status(),
        visibility: wishlist.visibility(),
        owner_id: wishlist.owner_id().clone(),
        allowed_user_ids: BTreeSet::new(),
        created_at: wishlist.created_at(),
    };
    assert_eq!(
        Wishlist::restore(record),
        Err(WishlistValidationError::BlankTitle)
    );
}

#[rstest]
#[case::owner_private(true, WishlistVisibility::Private, false, Some(AccessRule::Owner))]
#[case::stranger_public(false, WishlistVisibility::Public, false, Some(AccessRule::Public))]
#[case::grantee_private(false, WishlistVisibility::Private, true, Some(AccessRule::Grantee))]
#[case::stranger_private(false, WishlistVisibility::Private, false, None)]
fn access_follows_owner_visibility_and_grantees(
    owner: UserId,
    #[case] viewer_is_owner: bool,
    #[case] visibility: WishlistVisibility,
    #[case] viewer_is_grantee: bool,
    #[case] expected: Option<AccessRule>,
) {
    let viewer = if viewer_is_owner {
        owner.clone()
    } else {
        UserId::random()
    };
    let grantees = viewer_is_grantee.then(|| viewer.clone());
    let wishlist = persisted(owner, visibility, grantees);

    assert_eq!(access_grant(&wishlist, &viewer), expected);
    assert_eq!(can_access(&wishlist, &viewer), expected.is_some());
}

#[rstest]
fn access_equals_disjunction_of_rules_for_every_combination() {
    let owner = UserId::random();
    let viewers = [owner.clone(), UserId::random()];
    for viewer in &viewers {
        for visibility in [WishlistVisibility::Public, WishlistVisibility::Private] {
            for granted in [false, true] {
                let grantees = granted.then(|| viewer.clone());
                let wishlist = persisted(owner.clone(), visibility, grantees);
                let expected = viewer == &owner
                    || visibility == WishlistVisibility::Public
                    || granted;
                assert_eq!(can_access(&wishlist, viewer), expected);
                assert_eq!(
                    AccessRule::ALL.iter().any(|r| r.admits(&wishlist, viewer)),
                    expected
                );
            }
        }
    }
}

#[rstest]
fn require_owner_reports_actor_and_wishlist(owner: UserId) {
    let wishlist = persisted(owner.clone(), WishlistVisibility::Public, []);
    let stranger = User::new(
        UserId::random(),
        EmailAddress::new("eve@example.com").expect("valid email"),
    );
    let owner_user = User::new(
        owner,
        EmailAddress::new("ada@example.com").expect("valid email"),
    );

    assert!(require_owner(&wishlist, &owner_user).is_ok());
    let denied = require_owner(&wishlist, &stranger).expect_err("stranger is denied");
    assert_eq!(denied.wishlist_id(), wishlist.id());
    assert_eq!(denied.actor_email().as_ref(), "eve@example.com");
    assert_eq!(
        denied.to_string(),
        format!("eve@example.com is not the owner of wishlist {}", wishlist.id())
    );
}

#[rstest]
fn scope_restricts_to_ids_and_access(owner: UserId) {
    let viewer = UserId::random();
    let public = persisted(owner.clone(), WishlistVisibility::Public, []);
    let hidden = persisted(owner.clone(), WishlistVisibility::Private, []);
    let shared = persisted(owner, WishlistVisibility::Private, [viewer.clone()]);

    let all = WishlistScope::all_for(viewer.clone());
    assert!(all.admits(&public));
    assert!(!all.admits(&hidden));
    assert!(all.admits(&shared));

    let subset = WishlistScope::within(viewer.clone(), [public.id(), hidden.id()]);
    assert!(subset.admits(&public));
    assert!(!subset.admits(&hidden));
    assert!(!subset.admits(&shared));

    let empty = WishlistScope::within(viewer, []);
    assert!(empty.is_empty());
    assert!(!empty.admits(&public));
    assert!(!all.is_empty());
}
