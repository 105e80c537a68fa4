//! Wishlist HTTP handlers.
//!
//! ```text
//! POST   /api/v1/wishlists
//! GET    /api/v1/wishlists[?ids=<uuid>,<uuid>]
//! GET    /api/v1/wishlists/{id}
//! PUT    /api/v1/wishlists/{id}
//! DELETE /api/v1/wishlists/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreateWishlistRequest, DeleteWishlistRequest, GetWishlistRequest, ListWishlistsRequest,
    UpdateWishlistRequest, WishlistPatch, WishlistPayload,
};
use crate::domain::{
    Error, FilePayload, GiftDraft, GiftSpec, WishlistId, WishlistStatus, WishlistVisibility,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_email_list, parse_optional_enum, parse_wishlist_id, parse_wishlist_id_list,
};

const STATUS_VALUES: &str = "OPENED, CLOSED";
const VISIBILITY_VALUES: &str = "PUBLIC, PRIVATE";

/// Attachment sent inline with a gift.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileBody {
    pub file_name: Option<String>,
    /// Plain base64 or a `data:<type>;base64,<payload>` URI.
    pub file_content: Option<String>,
    pub content_type: Option<String>,
}

/// Gift created alongside a new wishlist.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GiftBody {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub file: Option<FileBody>,
}

/// Request payload for creating a wishlist.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWishlistRequestBody {
    pub title: String,
    pub description: String,
    #[schema(example = "PUBLIC")]
    pub visibility: Option<String>,
    #[serde(default)]
    pub allowed_user_emails: Vec<String>,
    #[serde(default)]
    pub gifts: Vec<GiftBody>,
}

/// Request payload for patching a wishlist. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWishlistRequestBody {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "CLOSED")]
    pub status: Option<String>,
    #[schema(example = "PRIVATE")]
    pub visibility: Option<String>,
    /// Replaces the grantee set; `[]` revokes everyone.
    pub allowed_user_emails: Option<Vec<String>>,
}

/// Wishlist as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[schema(example = "OPENED")]
    pub status: String,
    #[schema(example = "PUBLIC")]
    pub visibility: String,
    #[schema(format = "uuid")]
    pub owner_user_id: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub allowed_user_ids: Vec<String>,
}

impl From<WishlistPayload> for WishlistResponseBody {
    fn from(value: WishlistPayload) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            description: value.description,
            status: value.status.to_string(),
            visibility: value.visibility.to_string(),
            owner_user_id: value.owner_user_id.to_string(),
            created_at: value.created_at.to_rfc3339(),
            allowed_user_ids: value
                .allowed_user_ids
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

/// Query parameters for listing wishlists.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListWishlistsQuery {
    /// Comma-separated wishlist ids restricting the listing.
    pub ids: Option<String>,
}

impl From<FileBody> for FilePayload {
    fn from(value: FileBody) -> Self {
        Self {
            file_name: value.file_name,
            file_content: value.file_content,
            content_type: value.content_type,
        }
    }
}

impl From<GiftBody> for GiftDraft {
    fn from(value: GiftBody) -> Self {
        Self {
            spec: GiftSpec {
                title: value.title,
                description: value.description,
                link: value.link,
            },
            file: value.file.map(FilePayload::from),
        }
    }
}

fn parse_patch(body: UpdateWishlistRequestBody) -> Result<WishlistPatch, Error> {
    Ok(WishlistPatch {
        title: body.title,
        description: body.description,
        status: parse_optional_enum::<WishlistStatus>(
            body.status,
            FieldName::new("status"),
            STATUS_VALUES,
        )?,
        visibility: parse_optional_enum::<WishlistVisibility>(
            body.visibility,
            FieldName::new("visibility"),
            VISIBILITY_VALUES,
        )?,
        allowed_user_emails: body
            .allowed_user_emails
            .map(|emails| parse_email_list(emails, FieldName::new("allowedUserEmails"))),
    })
}

fn path_id(raw: &str) -> Result<WishlistId, Error> {
    parse_wishlist_id(raw, FieldName::new("id"))
}

/// Create a wishlist owned by the caller, with optional gifts.
///
/// Gifts are stored after the wishlist commits; a failing gift returns an
/// error naming `wishlistId` and `giftIndex` while the wishlist remains.
#[utoipa::path(
    post,
    path = "/api/v1/wishlists",
    request_body = CreateWishlistRequestBody,
    responses(
        (status = 201, description = "Wishlist created", body = WishlistResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["wishlists"],
    operation_id = "createWishlist",
    security(("SessionCookie" = []))
)]
#[post("/wishlists")]
pub async fn create_wishlist(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateWishlistRequestBody>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let body = payload.into_inner();
    let request = CreateWishlistRequest {
        caller,
        title: body.title,
        description: body.description,
        visibility: parse_optional_enum(
            body.visibility,
            FieldName::new("visibility"),
            VISIBILITY_VALUES,
        )?,
        allowed_user_emails: parse_email_list(
            body.allowed_user_emails,
            FieldName::new("allowedUserEmails"),
        ),
        gifts: body.gifts.into_iter().map(GiftDraft::from).collect(),
    };

    let created = state.wishlists.create_wishlist(request).await?;
    Ok(HttpResponse::Created().json(WishlistResponseBody::from(created)))
}

/// List wishlists the caller may read.
#[utoipa::path(
    get,
    path = "/api/v1/wishlists",
    params(ListWishlistsQuery),
    responses(
        (status = 200, description = "Readable wishlists", body = [WishlistResponseBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["wishlists"],
    operation_id = "listWishlists",
    security(("SessionCookie" = []))
)]
#[get("/wishlists")]
pub async fn list_wishlists(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListWishlistsQuery>,
) -> ApiResult<web::Json<Vec<WishlistResponseBody>>> {
    let caller = session.caller()?;
    let ids = query
        .into_inner()
        .ids
        .map(|raw| parse_wishlist_id_list(&raw, FieldName::new("ids")))
        .transpose()?;

    let wishlists = state
        .wishlists_query
        .list_wishlists(ListWishlistsRequest { caller, ids })
        .await?;
    Ok(web::Json(
        wishlists.into_iter().map(WishlistResponseBody::from).collect(),
    ))
}

/// Fetch one wishlist.
///
/// Wishlists the caller cannot read answer `404` like missing ones.
#[utoipa::path(
    get,
    path = "/api/v1/wishlists/{id}",
    params(("id" = String, Path, description = "Wishlist id", format = "uuid")),
    responses(
        (status = 200, description = "Wishlist", body = WishlistResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["wishlists"],
    operation_id = "getWishlist",
    security(("SessionCookie" = []))
)]
#[get("/wishlists/{id}")]
pub async fn get_wishlist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<WishlistResponseBody>> {
    let caller = session.caller()?;
    let wishlist_id = path_id(&path)?;
    let wishlist = state
        .wishlists_query
        .get_wishlist(GetWishlistRequest {
            caller,
            wishlist_id,
        })
        .await?;
    Ok(web::Json(wishlist.into()))
}

/// Patch a wishlist owned by the caller.
#[utoipa::path(
    put,
    path = "/api/v1/wishlists/{id}",
    params(("id" = String, Path, description = "Wishlist id", format = "uuid")),
    request_body = UpdateWishlistRequestBody,
    responses(
        (status = 200, description = "Wishlist updated", body = WishlistResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Caller is not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Concurrent modification", body = ErrorSchema)
    ),
    tags = ["wishlists"],
    operation_id = "updateWishlist",
    security(("SessionCookie" = []))
)]
#[put("/wishlists/{id}")]
pub async fn update_wishlist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateWishlistRequestBody>,
) -> ApiResult<web::Json<WishlistResponseBody>> {
    let caller = session.caller()?;
    let wishlist_id = path_id(&path)?;
    let patch = parse_patch(payload.into_inner())?;
    let updated = state
        .wishlists
        .update_wishlist(UpdateWishlistRequest {
            caller,
            wishlist_id,
            patch,
        })
        .await?;
    Ok(web::Json(updated.into()))
}

/// Delete a wishlist owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/wishlists/{id}",
    params(("id" = String, Path, description = "Wishlist id", format = "uuid")),
    responses(
        (status = 204, description = "Wishlist deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Caller is not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["wishlists"],
    operation_id = "deleteWishlist",
    security(("SessionCookie" = []))
)]
#[delete("/wishlists/{id}")]
pub async fn delete_wishlist(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let wishlist_id = path_id(&path)?;
    let response = state
        .wishlists
        .delete_wishlist(DeleteWishlistRequest {
            caller,
            wishlist_id,
        })
        .await?;
    if response.deleted {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::not_found(format!("wishlist {wishlist_id} not found")))
    }
}

/// Register every wishlist route on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_wishlist)
        .service(list_wishlists)
        .service(get_wishlist)
        .service(update_wishlist)
        .service(delete_wishlist);
}

#[cfg(test)]
#[path = "wishlists_tests.rs"]
mod tests;
