//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The session cookie is issued by the authentication service that shares
//! the session key; this adapter only reads the `user_id` it carries and
//! turns it into a [`CallerContext`]. A tampered or malformed id is treated
//! as anonymous so the domain answers with `401`.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{CallerContext, Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present and valid.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
        else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                tracing::warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Describe the caller for domain ports.
    pub fn caller(&self) -> Result<CallerContext, Error> {
        self.user_id().map(CallerContext::from)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new(FIXTURE_ID).expect("fixture id");
                    session.persist_user(&id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/set-invalid",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-a-uuid")
                        .expect("set invalid user id");
                    HttpResponse::Ok()
                }),
            )
            .route(
                "/caller",
                web::get().to(|session: SessionContext| async move {
                    let caller = session.caller()?;
                    let body = caller
                        .user_id()
                        .map_or_else(|| "anonymous".to_owned(), ToString::to_string);
                    Ok::<_, Error>(HttpResponse::Ok().body(body))
                }),
            )
    }

    async fn caller_after(path: Option<&str>) -> String {
        let app = test::init_service(session_test_app()).await;
        let mut request = test::TestRequest::get().uri("/caller");
        if let Some(path) = path {
            let set_res =
                test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
            assert_eq!(set_res.status(), StatusCode::OK);
            request = request.cookie(session_cookie(&set_res));
        }
        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        String::from_utf8(body.to_vec()).expect("utf8 body")
    }

    #[actix_web::test]
    async fn persisted_user_becomes_authenticated_caller() {
        assert_eq!(caller_after(Some("/set")).await, FIXTURE_ID);
    }

    #[actix_web::test]
    async fn missing_cookie_is_anonymous() {
        assert_eq!(caller_after(None).await, "anonymous");
    }

    #[actix_web::test]
    async fn tampered_user_id_is_anonymous() {
        assert_eq!(caller_after(Some("/set-invalid")).await, "anonymous");
    }
}
