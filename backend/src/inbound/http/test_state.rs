//! Test doubles and session fixtures for HTTP handler tests.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};
use uuid::Uuid;

use crate::domain::ports::{
    MockBidCommand, MockBidQuery, MockGigCommand, MockGigQuery, MockHireCommand, MockIdentityGate,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Build an [`HttpState`] whose ports all panic when called, then let the
/// test override the ones it exercises.
pub fn test_http_state(configure: impl FnOnce(&mut HttpState)) -> HttpState {
    let mut state = HttpState {
        identity: Arc::new(MockIdentityGate::new()),
        gigs: Arc::new(MockGigCommand::new()),
        gig_query: Arc::new(MockGigQuery::new()),
        bids: Arc::new(MockBidCommand::new()),
        bid_query: Arc::new(MockBidQuery::new()),
        hiring: Arc::new(MockHireCommand::new()),
    };
    configure(&mut state);
    state
}

/// Route that stamps the requested user id into the session, standing in for
/// a full login round-trip.
pub fn login_route() -> actix_web::Resource {
    web::resource("/__test/login/{user_id}").route(web::get().to(
        |session: SessionContext, path: web::Path<Uuid>| async move {
            session.persist_user(UserId::from(path.into_inner()))?;
            Ok::<_, Error>(HttpResponse::Ok())
        },
    ))
}

/// Obtain a session cookie for `user_id` from an app that mounts
/// [`login_route`].
pub async fn logged_in_cookie<S, B>(app: &S, user_id: UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/__test/login/{user_id}"))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
