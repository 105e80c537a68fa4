//! HTTP inbound adapter exposing the wishlist REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod wishlists;

pub use error::ApiResult;
