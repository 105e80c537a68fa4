//! Identity of whoever invoked a driving port.

use super::UserId;

/// Caller identity handed from inbound adapters to the domain.
///
/// Adapters only report what the transport proved (a session cookie, for
/// HTTP); turning that into a [`User`](super::User) is the
/// [`UserResolver`](super::ports::UserResolver)'s job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    user_id: Option<UserId>,
}

impl CallerContext {
    /// A caller with no established identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A caller whose session carries `user_id`.
    pub fn authenticated(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Session user id, when present.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }
}

impl From<Option<UserId>> for CallerContext {
    fn from(user_id: Option<UserId>) -> Self {
        Self { user_id }
    }
}
