//! Tests for user identity primitives.

use super::*;
use rstest::rstest;

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn user_id_round_trips_through_serde() {
    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    let json = serde_json::to_string(&id).expect("serialise");
    assert_eq!(json, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
    let back: UserId = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(back, id);
}

#[rstest]
fn from_uuid_matches_parsed_form() {
    let uuid = Uuid::new_v4();
    let parsed = UserId::new(uuid.to_string()).expect("valid id");
    assert_eq!(UserId::from_uuid(uuid), parsed);
}

#[rstest]
#[case("ada@example.com", "ada@example.com")]
#[case("  Ada@Example.COM\t", "ada@example.com")]
#[case("grace.hopper+gifts@navy.mil", "grace.hopper+gifts@navy.mil")]
fn email_is_trimmed_and_lower_cased(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("ada", UserValidationError::InvalidEmail)]
#[case("ada@", UserValidationError::InvalidEmail)]
#[case("ada@example", UserValidationError::InvalidEmail)]
#[case("a da@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(raw), Err(expected));
}

#[rstest]
#[case("admin@localhost")]
#[case("Bob@Example.com")]
fn stored_addresses_keep_their_spelling(#[case] raw: &str) {
    assert_eq!(EmailAddress::from_stored(raw).as_ref(), raw);
}

#[rstest]
#[case("Bob@Example.com", "bob@example.com", true)]
#[case("BOB@EXAMPLE.COM", " Bob@example.com ", true)]
#[case("bob@example.com", "rob@example.com", false)]
fn matching_ignores_case(#[case] stored: &str, #[case] requested: &str, #[case] expected: bool) {
    let requested = EmailAddress::new(requested).expect("valid email");
    assert_eq!(EmailAddress::from_stored(stored).matches(&requested), expected);
}

#[rstest]
fn user_exposes_parts() {
    let id = UserId::random();
    let email = EmailAddress::new("ada@example.com").expect("valid email");
    let user = User::new(id.clone(), email.clone());
    assert_eq!(user.id(), &id);
    assert_eq!(user.email(), &email);
}
