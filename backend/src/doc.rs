//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the wishlist and health endpoints, the schema
//! wrappers for domain errors, and the session cookie security scheme. The
//! document backs Swagger UI in debug builds and the `openapi-dump` binary.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::wishlists::{
    CreateWishlistRequestBody, FileBody, GiftBody, UpdateWishlistRequestBody,
    WishlistResponseBody,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the authenticated user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Wishlist backend API",
        description = "Wishlist creation, access-controlled reads and owner-only mutations.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::wishlists::create_wishlist,
        crate::inbound::http::wishlists::list_wishlists,
        crate::inbound::http::wishlists::get_wishlist,
        crate::inbound::http::wishlists::update_wishlist,
        crate::inbound::http::wishlists::delete_wishlist,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateWishlistRequestBody,
        UpdateWishlistRequestBody,
        GiftBody,
        FileBody,
        WishlistResponseBody,
    )),
    tags(
        (name = "wishlists", description = "Wishlist lifecycle and sharing"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
