//! Diesel-backed `UserResolver` reading the shared `users` table.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserResolver, UserResolverError};
use crate::domain::{CallerContext, EmailAddress, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Resolves callers and grantee emails against PostgreSQL.
#[derive(Clone)]
pub struct DieselUserResolver {
    pool: DbPool,
}

impl DieselUserResolver {
    /// Create a new resolver with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserResolverError {
    map_pool_error(error, UserResolverError::connection)
}

fn map_diesel(error: diesel::result::Error) -> UserResolverError {
    map_diesel_error(error, UserResolverError::query, UserResolverError::connection)
}

diesel::define_sql_function! {
    /// PostgreSQL `lower(text)`.
    fn lower(value: Text) -> Text;
}

/// Stored addresses are taken as written.
fn row_to_user(row: UserRow) -> User {
    User::new(UserId::from_uuid(row.id), EmailAddress::from_stored(row.email))
}

/// Users whose stored address matches any of `emails`, ignoring case.
fn users_matching(emails: &[EmailAddress]) -> users::BoxedQuery<'static, Pg> {
    let keys: Vec<String> = emails.iter().map(EmailAddress::lookup_key).collect();
    users::table
        .filter(lower(users::email).eq_any(keys))
        .into_boxed()
}

#[async_trait]
impl UserResolver for DieselUserResolver {
    async fn authenticated_user(&self, caller: &CallerContext) -> Result<User, UserResolverError> {
        let Some(user_id) = caller.user_id() else {
            return Err(UserResolverError::unauthenticated());
        };
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_user)
            .ok_or_else(UserResolverError::unauthenticated)
    }

    async fn users_by_emails(
        &self,
        emails: &[EmailAddress],
    ) -> Result<Vec<User>, UserResolverError> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<UserRow> = users_matching(emails)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(row_to_user).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;
    use rstest::rstest;
    use std::time::Duration;
    use uuid::Uuid;

    use crate::outbound::persistence::PoolConfig;

    #[rstest]
    #[case("ada@example.com")]
    #[case("Bob@Example.com")]
    #[case("admin@localhost")]
    fn stored_rows_become_users_verbatim(#[case] email: &str) {
        let id = Uuid::new_v4();
        let user = row_to_user(UserRow {
            id,
            email: email.to_owned(),
        });
        assert_eq!(user.id().as_uuid(), &id);
        assert_eq!(user.email().as_ref(), email);
    }

    #[rstest]
    fn email_lookup_compares_lower_cased_addresses() {
        let emails = [
            EmailAddress::new("Bob@Example.com").expect("valid email"),
            EmailAddress::new("grace@example.com").expect("valid email"),
        ];
        let query = users_matching(&emails).select(users::id);
        let rendered = debug_query::<Pg, _>(&query).to_string();
        assert!(
            rendered.contains(r#"lower("users"."email") = ANY($1)"#),
            "{rendered}"
        );
        assert!(rendered.contains("bob@example.com"), "{rendered}");
        assert!(rendered.contains("grace@example.com"), "{rendered}");
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_caller_never_reaches_the_pool() {
        // No idle minimum, so building the pool opens no connection.
        let pool = DbPool::new(
            PoolConfig::new("postgres://127.0.0.1:1/unreachable")
                .with_min_idle(None)
                .with_connection_timeout(Duration::from_millis(50)),
        )
        .await
        .expect("lazy pool builds");
        let err = DieselUserResolver::new(pool)
            .authenticated_user(&CallerContext::anonymous())
            .await
            .expect_err("anonymous rejected");
        assert_eq!(err, UserResolverError::Unauthenticated);
    }
}
