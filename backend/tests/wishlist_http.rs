//! HTTP round trips through the wishlist endpoints with in-memory storage.

mod support;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use rstest::rstest;
use serde_json::{Value, json};
use wishlist_backend::Trace;
use wishlist_backend::domain::{Error, User, UserId, WishlistVisibility};
use wishlist_backend::inbound::http::error::json_error_handler;
use wishlist_backend::inbound::http::session::SessionContext;
use wishlist_backend::inbound::http::state::HttpState;
use wishlist_backend::inbound::http::wishlists;

use support::{World, world};

async fn sign_in(session: SessionContext, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

async fn app(
    world: &World,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let state = HttpState::new(world.service.clone(), world.service.clone());
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .route("/test/sign-in/{id}", web::post().to(sign_in))
                    .configure(wishlists::configure),
            ),
    )
    .await
}

async fn cookie_for(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user: &User,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/test/sign-in/{}", user.id()))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie issued")
}

#[rstest]
#[actix_web::test]
async fn owner_creates_shares_and_deletes(world: World) {
    let app = app(&world).await;
    let owner = cookie_for(&app, &world.owner).await;
    let friend = cookie_for(&app, &world.friend).await;
    let stranger = cookie_for(&app, &world.stranger).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/wishlists")
            .cookie(owner.clone())
            .set_json(json!({
                "title": "Birthday",
                "description": "Things I would like",
                "visibility": "PRIVATE",
                "allowedUserEmails": ["Friend@Example.com"],
                "gifts": [{"title": "Kite", "file": {"fileContent": "data:text/plain;base64,QUJD"}}]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let id = created["id"].as_str().expect("id").to_owned();
    assert_eq!(created["allowedUserIds"], json!([world.friend.id().to_string()]));
    let uri = format!("/api/v1/wishlists/{id}");

    let as_friend = test::call_service(
        &app,
        test::TestRequest::get().uri(&uri).cookie(friend.clone()).to_request(),
    )
    .await;
    assert_eq!(as_friend.status(), StatusCode::OK);

    let as_stranger = test::call_service(
        &app,
        test::TestRequest::get().uri(&uri).cookie(stranger).to_request(),
    )
    .await;
    assert_eq!(as_stranger.status(), StatusCode::NOT_FOUND);

    let friend_delete = test::call_service(
        &app,
        test::TestRequest::delete().uri(&uri).cookie(friend).to_request(),
    )
    .await;
    assert_eq!(friend_delete.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(friend_delete).await;
    assert_eq!(body["code"], "forbidden");
    assert!(body["traceId"].is_string());

    let owner_delete = test::call_service(
        &app,
        test::TestRequest::delete().uri(&uri).cookie(owner.clone()).to_request(),
    )
    .await;
    assert_eq!(owner_delete.status(), StatusCode::NO_CONTENT);

    let again = test::call_service(
        &app,
        test::TestRequest::delete().uri(&uri).cookie(owner).to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn update_replaces_fields_and_grantees(world: World) {
    let app = app(&world).await;
    let owner = cookie_for(&app, &world.owner).await;
    let created = world
        .create_owned(WishlistVisibility::Private, &[&world.friend])
        .await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/wishlists/{}", created.id))
            .cookie(owner)
            .set_json(json!({"title": "  Renamed ", "status": "CLOSED", "allowedUserEmails": []}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["status"], "CLOSED");
    assert_eq!(body["visibility"], "PRIVATE");
    assert_eq!(body["allowedUserIds"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn invalid_attachment_reports_gift_index_and_keeps_wishlist(world: World) {
    let app = app(&world).await;
    let owner = cookie_for(&app, &world.owner).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/wishlists")
            .cookie(owner.clone())
            .set_json(json!({
                "title": "Birthday",
                "description": "Things",
                "gifts": [{"title": "Kite", "file": {"fileContent": "not base64!"}}]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "invalid_file_encoding");
    assert_eq!(body["details"]["giftIndex"], 0);
    let kept = body["details"]["wishlistId"].as_str().expect("wishlist id").to_owned();

    let listed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/wishlists?ids={kept}"))
            .cookie(owner)
            .to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let listed: Value = test::read_body_json(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn unparseable_grantee_emails_are_dropped(world: World) {
    let app = app(&world).await;
    let owner = cookie_for(&app, &world.owner).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/wishlists")
            .cookie(owner)
            .set_json(json!({
                "title": "Birthday",
                "description": "Things",
                "visibility": "PRIVATE",
                "allowedUserEmails": ["bob", "friend@example.com", ""]
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["allowedUserIds"], json!([world.friend.id().to_string()]));
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_an_invalid_request(world: World) {
    let app = app(&world).await;
    let owner = cookie_for(&app, &world.owner).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/wishlists")
            .cookie(owner)
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"title\": 42")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "malformed_body");
}

#[rstest]
#[actix_web::test]
async fn anonymous_requests_are_unauthorised(world: World) {
    let app = app(&world).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/wishlists").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key("trace-id"));
}
