//! PostgreSQL-backed `WishlistRepository` implementation using Diesel ORM.
//!
//! The read-access predicate is assembled from [`AccessRule::ALL`], one SQL
//! clause per rule, so the database filters exactly the rows `can_access`
//! would admit. Updates and deletes carry `owner_id` in their `WHERE` clause;
//! ownership is therefore re-checked atomically with the write.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{WishlistRepository, WishlistRepositoryError};
use crate::domain::{
    AccessRule, NewWishlist, UserId, Wishlist, WishlistId, WishlistRecord, WishlistScope,
    WishlistVisibility,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AllowedUserRow, NewWishlistRow, WishlistRow, WishlistUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{wishlist_allowed_users, wishlists};

type AccessPredicate = Box<dyn BoxableExpression<wishlists::table, Pg, SqlType = Bool>>;

/// Diesel-backed implementation of the wishlist repository port.
#[derive(Clone)]
pub struct DieselWishlistRepository {
    pool: DbPool,
}

impl DieselWishlistRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    /// ```rust,no_run
    /// use wishlist_backend::outbound::persistence::{
    ///     DbPool, DieselWishlistRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/wishlists")).await?;
    /// let _repo = DieselWishlistRepository::new(pool);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> WishlistRepositoryError {
    map_pool_error(error, WishlistRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> WishlistRepositoryError {
    map_diesel_error(
        error,
        WishlistRepositoryError::query,
        WishlistRepositoryError::connection,
    )
}

fn rule_clause(rule: AccessRule, viewer: Uuid) -> AccessPredicate {
    match rule {
        AccessRule::Owner => Box::new(wishlists::owner_id.eq(viewer)),
        AccessRule::Public => {
            Box::new(wishlists::visibility.eq(WishlistVisibility::Public.as_str()))
        }
        AccessRule::Grantee => Box::new(
            wishlists::id.eq_any(
                wishlist_allowed_users::table
                    .filter(wishlist_allowed_users::user_id.eq(viewer))
                    .select(wishlist_allowed_users::wishlist_id),
            ),
        ),
    }
}

/// SQL form of `can_access`: the disjunction of every access rule.
fn access_predicate(viewer: &UserId) -> AccessPredicate {
    let viewer = *viewer.as_uuid();
    AccessRule::ALL
        .into_iter()
        .map(|rule| rule_clause(rule, viewer))
        .reduce(|acc, clause| Box::new(acc.or(clause)))
        .unwrap_or_else(|| Box::new(sql::<Bool>("FALSE")))
}

fn row_to_wishlist(
    row: WishlistRow,
    allowed_user_ids: BTreeSet<UserId>,
) -> Result<Wishlist, WishlistRepositoryError> {
    let WishlistRow {
        id,
        title,
        description,
        status,
        visibility,
        owner_id,
        created_at,
    } = row;
    let status = status
        .parse()
        .map_err(|err| WishlistRepositoryError::query(format!("decode status: {err}")))?;
    let visibility = visibility
        .parse()
        .map_err(|err| WishlistRepositoryError::query(format!("decode visibility: {err}")))?;

    Wishlist::restore(WishlistRecord {
        id: WishlistId::from_uuid(id),
        title,
        description,
        status,
        visibility,
        owner_id: UserId::from_uuid(owner_id),
        allowed_user_ids,
        created_at,
    })
    .map_err(|err| WishlistRepositoryError::query(format!("stored wishlist {id}: {err}")))
}

async fn load_grantees(
    conn: &mut AsyncPgConnection,
    wishlist_ids: &[Uuid],
) -> Result<HashMap<Uuid, BTreeSet<UserId>>, diesel::result::Error> {
    if wishlist_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<AllowedUserRow> = wishlist_allowed_users::table
        .filter(wishlist_allowed_users::wishlist_id.eq_any(wishlist_ids))
        .select(AllowedUserRow::as_select())
        .load(conn)
        .await?;

    let mut grouped: HashMap<Uuid, BTreeSet<UserId>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.wishlist_id)
            .or_default()
            .insert(UserId::from_uuid(row.user_id));
    }
    Ok(grouped)
}

fn grantee_rows(wishlist_id: Uuid, grantees: &BTreeSet<UserId>) -> Vec<AllowedUserRow> {
    grantees
        .iter()
        .map(|user_id| AllowedUserRow {
            wishlist_id,
            user_id: *user_id.as_uuid(),
        })
        .collect()
}

fn assemble(
    rows: Vec<WishlistRow>,
    mut grantees: HashMap<Uuid, BTreeSet<UserId>>,
) -> Result<Vec<Wishlist>, WishlistRepositoryError> {
    rows.into_iter()
        .map(|row| {
            let allowed = grantees.remove(&row.id).unwrap_or_default();
            row_to_wishlist(row, allowed)
        })
        .collect()
}

enum UpdateOutcome {
    Applied,
    OwnerMismatch,
}

#[async_trait]
impl WishlistRepository for DieselWishlistRepository {
    async fn create(&self, wishlist: &NewWishlist) -> Result<Wishlist, WishlistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_row = NewWishlistRow {
            title: wishlist.title(),
            description: wishlist.description(),
            status: wishlist.status().as_str(),
            visibility: wishlist.visibility().as_str(),
            owner_id: *wishlist.owner_id().as_uuid(),
            created_at: wishlist.created_at(),
        };
        let grantees = wishlist.allowed_user_ids();

        let id = conn
            .transaction(|conn| {
                async move {
                    let id: Uuid = diesel::insert_into(wishlists::table)
                        .values(&new_row)
                        .returning(wishlists::id)
                        .get_result(conn)
                        .await?;
                    let links = grantee_rows(id, grantees);
                    if !links.is_empty() {
                        diesel::insert_into(wishlist_allowed_users::table)
                            .values(&links)
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, diesel::result::Error>(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        debug!(wishlist_id = %id, "wishlist row inserted");
        Ok(wishlist.clone().into_persisted(WishlistId::from_uuid(id)))
    }

    async fn find_by_id(
        &self,
        id: &WishlistId,
    ) -> Result<Option<Wishlist>, WishlistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let Some(row) = wishlists::table
            .filter(wishlists::id.eq(id.as_uuid()))
            .select(WishlistRow::as_select())
            .first::<WishlistRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?
        else {
            return Ok(None);
        };
        let grantees = load_grantees(&mut conn, &[row.id])
            .await
            .map_err(map_diesel)?;
        assemble(vec![row], grantees).map(|mut found| found.pop())
    }

    async fn find_accessible(
        &self,
        scope: &WishlistScope,
    ) -> Result<Vec<Wishlist>, WishlistRepositoryError> {
        if scope.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = wishlists::table
            .filter(access_predicate(scope.viewer()))
            .select(WishlistRow::as_select())
            .into_boxed();
        if let Some(ids) = scope.ids() {
            let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
            query = query.filter(wishlists::id.eq_any(ids));
        }
        let rows: Vec<WishlistRow> = query.load(&mut conn).await.map_err(map_diesel)?;

        let row_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let grantees = load_grantees(&mut conn, &row_ids)
            .await
            .map_err(map_diesel)?;
        assemble(rows, grantees)
    }

    async fn update(&self, wishlist: &Wishlist) -> Result<(), WishlistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let wishlist_id = *wishlist.id().as_uuid();
        let owner_id = *wishlist.owner_id().as_uuid();
        let changes = WishlistUpdate {
            title: wishlist.title(),
            description: wishlist.description(),
            status: wishlist.status().as_str(),
            visibility: wishlist.visibility().as_str(),
        };
        let links = grantee_rows(wishlist_id, wishlist.allowed_user_ids());

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let touched = diesel::update(
                        wishlists::table
                            .filter(wishlists::id.eq(wishlist_id))
                            .filter(wishlists::owner_id.eq(owner_id)),
                    )
                    .set(&changes)
                    .execute(conn)
                    .await?;
                    if touched == 0 {
                        return Ok(UpdateOutcome::OwnerMismatch);
                    }

                    diesel::delete(
                        wishlist_allowed_users::table
                            .filter(wishlist_allowed_users::wishlist_id.eq(wishlist_id)),
                    )
                    .execute(conn)
                    .await?;
                    if !links.is_empty() {
                        diesel::insert_into(wishlist_allowed_users::table)
                            .values(&links)
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, diesel::result::Error>(UpdateOutcome::Applied)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        match outcome {
            UpdateOutcome::Applied => Ok(()),
            UpdateOutcome::OwnerMismatch => {
                Err(WishlistRepositoryError::write_conflict(wishlist.id()))
            }
        }
    }

    async fn delete(
        &self,
        id: &WishlistId,
        owner_id: &UserId,
    ) -> Result<bool, WishlistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let removed = diesel::delete(
            wishlists::table
                .filter(wishlists::id.eq(id.as_uuid()))
                .filter(wishlists::owner_id.eq(owner_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;
        Ok(removed > 0)
    }
}
