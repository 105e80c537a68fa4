//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users; the directory grantee emails resolve against.
    users (id) {
        id -> Uuid,
        /// Normalised (trimmed, lower-case) address, unique.
        email -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Wishlists. `id` defaults to `gen_random_uuid()`.
    wishlists (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        /// `OPENED` or `CLOSED`.
        status -> Varchar,
        /// `PUBLIC` or `PRIVATE`.
        visibility -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Grantee set of each wishlist. Cascades with the wishlist.
    wishlist_allowed_users (wishlist_id, user_id) {
        wishlist_id -> Uuid,
        user_id -> Uuid,
    }
}

diesel::table! {
    /// Gifts handed off during wishlist creation. Cascades with the wishlist.
    gifts (id) {
        id -> Uuid,
        wishlist_id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        link -> Nullable<Text>,
        file_name -> Nullable<Varchar>,
        file_content -> Bytea,
        file_content_type -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(wishlists -> users (owner_id));
diesel::joinable!(wishlist_allowed_users -> wishlists (wishlist_id));
diesel::joinable!(wishlist_allowed_users -> users (user_id));
diesel::joinable!(gifts -> wishlists (wishlist_id));

diesel::allow_tables_to_appear_in_same_query!(users, wishlists, wishlist_allowed_users, gifts);
