//! `UserResolver` over a seeded set of users.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserResolver, UserResolverError};
use crate::domain::{CallerContext, EmailAddress, User, UserId};

/// Users registered in process memory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory holding `users`.
    ///
    /// # Examples
    /// ```
    /// use wishlist_backend::domain::{EmailAddress, User, UserId};
    /// use wishlist_backend::outbound::memory::InMemoryUserDirectory;
    ///
    /// let ada = User::new(UserId::random(), EmailAddress::new("ada@example.com").unwrap());
    /// let _directory = InMemoryUserDirectory::with_users([ada]);
    /// ```
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(
                users
                    .into_iter()
                    .map(|user| (user.id().clone(), user))
                    .collect(),
            ),
        }
    }

    /// Register or replace a user.
    pub async fn register(&self, user: User) {
        self.users.write().await.insert(user.id().clone(), user);
    }
}

#[async_trait]
impl UserResolver for InMemoryUserDirectory {
    async fn authenticated_user(&self, caller: &CallerContext) -> Result<User, UserResolverError> {
        let user_id = caller
            .user_id()
            .ok_or_else(UserResolverError::unauthenticated)?;
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(UserResolverError::unauthenticated)
    }

    async fn users_by_emails(
        &self,
        emails: &[EmailAddress],
    ) -> Result<Vec<User>, UserResolverError> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|user| emails.iter().any(|email| user.email().matches(email)))
            .cloned()
            .collect())
    }
}
