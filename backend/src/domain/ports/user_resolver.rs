//! Port resolving callers and grantees to users.

use async_trait::async_trait;

use crate::domain::{CallerContext, EmailAddress, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user resolver adapters.
    pub enum UserResolverError {
        /// No caller identity, or it does not match a known user.
        Unauthenticated => "caller is not authenticated",
        /// Backing user store could not be reached.
        Connection { message: String } =>
            "user resolver connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "user resolver query failed: {message}",
    }
}

/// Port for identity lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// The user behind `caller`.
    async fn authenticated_user(&self, caller: &CallerContext) -> Result<User, UserResolverError>;

    /// Users matching `emails`; emails with no match are left out.
    async fn users_by_emails(&self, emails: &[EmailAddress]) -> Result<Vec<User>, UserResolverError>;
}

/// Fixture resolver that knows nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserResolver;

#[async_trait]
impl UserResolver for FixtureUserResolver {
    async fn authenticated_user(&self, _caller: &CallerContext) -> Result<User, UserResolverError> {
        Err(UserResolverError::unauthenticated())
    }

    async fn users_by_emails(&self, _emails: &[EmailAddress]) -> Result<Vec<User>, UserResolverError> {
        Ok(Vec::new())
    }
}
