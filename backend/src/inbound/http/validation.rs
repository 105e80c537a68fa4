//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become `invalid_request` errors whose details name the offending
//! `field`, a machine-readable `code`, and (for list items) the `index`.

use std::str::FromStr;

use serde_json::json;
use tracing::debug;

use crate::domain::{EmailAddress, Error, WishlistId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidEnum,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEnum => "invalid_enum",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.0,
            message: message.into(),
        }
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn parse_wishlist_id(value: &str, field: FieldName) -> Result<WishlistId, Error> {
    value.parse().map_err(|_| {
        ValidationError::new(field, format!("{} must be a valid UUID", field.as_str()))
            .with_value(ErrorCode::InvalidUuid, value)
    })
}

/// Parse a comma-separated id list. Blank segments are skipped.
pub(crate) fn parse_wishlist_id_list(
    value: &str,
    field: FieldName,
) -> Result<Vec<WishlistId>, Error> {
    value
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| {
            segment.parse().map_err(|_| {
                ValidationError::new(
                    field,
                    format!("{} must contain valid UUIDs", field.as_str()),
                )
                .with_index(ErrorCode::InvalidUuid, index, segment)
            })
        })
        .collect()
}

/// Parse grantee emails. Entries that are not email addresses cannot match a
/// user, so they are dropped like any other unknown address.
pub(crate) fn parse_email_list(values: Vec<String>, field: FieldName) -> Vec<EmailAddress> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match EmailAddress::new(&value) {
            Ok(email) => Some(email),
            Err(error) => {
                debug!(field = field.as_str(), index, %error, "dropping unparseable email");
                None
            }
        })
        .collect()
}

/// Parse an optional enumeration value such as a status or visibility.
pub(crate) fn parse_optional_enum<T: FromStr>(
    value: Option<String>,
    field: FieldName,
    allowed: &str,
) -> Result<Option<T>, Error> {
    value
        .map(|raw| {
            raw.parse().map_err(|_| {
                ValidationError::new(
                    field,
                    format!("{} must be one of {allowed}", field.as_str()),
                )
                .with_value(ErrorCode::InvalidEnum, &raw)
            })
        })
        .transpose()
}
