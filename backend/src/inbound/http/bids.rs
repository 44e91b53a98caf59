//! Bid handlers, including the hire endpoint.
//!
//! ```text
//! POST /api/v1/bids {"gigId":"...","message":"I can do it"}
//! GET /api/v1/bids/{gigId}
//! PUT /api/v1/bids/hire/{bidId}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{HireConfirmation, HireRequest, ListBidsRequest, PlaceBidRequest};
use crate::domain::{Bid, BidId, Error, GigId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Bid creation body for `POST /api/v1/bids`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidBody {
    /// Gig the bid targets.
    #[schema(value_type = String)]
    pub gig_id: Uuid,
    /// Free-text pitch; must be non-empty.
    pub message: String,
}

/// Place a bid on an open gig.
#[utoipa::path(
    post,
    path = "/api/v1/bids",
    request_body = PlaceBidBody,
    responses(
        (status = 201, description = "Bid created", body = Bid),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Gig not found", body = Error),
        (status = 409, description = "Gig no longer open", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bids"],
    operation_id = "placeBid"
)]
#[post("/bids")]
pub async fn place_bid(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PlaceBidBody>,
) -> ApiResult<HttpResponse> {
    let freelancer_id = session.require_user_id()?;
    let PlaceBidBody { gig_id, message } = payload.into_inner();
    let bid = state
        .bids
        .place_bid(PlaceBidRequest {
            freelancer_id,
            gig_id: GigId::from(gig_id),
            message,
        })
        .await?;
    Ok(HttpResponse::Created().json(bid))
}

/// List the bids on a gig. Only the gig's owner may call this.
#[utoipa::path(
    get,
    path = "/api/v1/bids/{gigId}",
    params(("gigId" = String, Path, description = "Gig identifier")),
    responses(
        (status = 200, description = "Bids for the gig", body = [Bid]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the gig", body = Error),
        (status = 404, description = "Gig not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bids"],
    operation_id = "listBids"
)]
#[get("/bids/{gig_id}")]
pub async fn list_bids(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Bid>>> {
    let requesting_user_id = session.require_user_id()?;
    let bids = state
        .bid_query
        .list_bids(ListBidsRequest {
            requesting_user_id,
            gig_id: GigId::from(path.into_inner()),
        })
        .await?;
    Ok(web::Json(bids))
}

/// Hire a bid: assign the gig and reject pending siblings, atomically.
#[utoipa::path(
    put,
    path = "/api/v1/bids/hire/{bidId}",
    params(("bidId" = String, Path, description = "Bid identifier")),
    responses(
        (status = 200, description = "Hire committed", body = HireConfirmation),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Caller does not own the gig", body = Error),
        (status = 404, description = "Bid not found", body = Error),
        (status = 409, description = "Gig or bid already resolved", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable; retry the call", body = Error)
    ),
    tags = ["bids"],
    operation_id = "hireBid"
)]
#[put("/bids/hire/{bid_id}")]
pub async fn hire_bid(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<HireConfirmation>> {
    let requesting_user_id = session.require_user_id()?;
    let confirmation = state
        .hiring
        .hire(HireRequest {
            requesting_user_id,
            bid_id: BidId::from(path.into_inner()),
        })
        .await?;
    Ok(web::Json(confirmation))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use actix_web::{App, test as actix_test, web};
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{MockBidCommand, MockBidQuery, MockHireCommand};
    use crate::domain::{DisplayName, UserId};
    use crate::inbound::http::test_state::{logged_in_cookie, test_http_state};

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(crate::inbound::http::test_state::login_route())
            .service(
                web::scope("/api/v1")
                    .service(place_bid)
                    .service(list_bids)
                    .service(hire_bid),
            )
    }

    #[actix_web::test]
    async fn place_bid_requires_a_session() {
        let state = test_http_state(|_| {});
        let app = actix_test::init_service(test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/bids")
                .set_json(&PlaceBidBody {
                    gig_id: Uuid::new_v4(),
                    message: "Me too".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn place_bid_returns_the_created_bid() {
        let freelancer = UserId::random();
        let mut bids = MockBidCommand::new();
        bids.expect_place_bid()
            .withf(move |req| req.freelancer_id == freelancer)
            .returning(|req| {
                Ok(Bid::place(
                    req.gig_id,
                    req.freelancer_id,
                    DisplayName::new("Grace").expect("valid name"),
                    req.message,
                )
                .expect("valid bid"))
            });
        let state = test_http_state(|state| state.bids = Arc::new(bids));
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = logged_in_cookie(&app, freelancer).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/bids")
                .cookie(cookie)
                .set_json(&PlaceBidBody {
                    gig_id: Uuid::new_v4(),
                    message: "Me too".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("bid payload");
        assert_eq!(value.get("status").and_then(Value::as_str), Some("Pending"));
        assert_eq!(
            value.get("freelancerName").and_then(Value::as_str),
            Some("Grace")
        );
    }

    #[actix_web::test]
    async fn list_bids_passes_the_caller_for_the_ownership_check() {
        let owner = UserId::random();
        let gig_id = Uuid::new_v4();
        let mut bid_query = MockBidQuery::new();
        bid_query
            .expect_list_bids()
            .withf(move |req| {
                req.requesting_user_id == owner && req.gig_id == GigId::from(gig_id)
            })
            .returning(|_| Ok(Vec::new()));
        let state = test_http_state(|state| state.bid_query = Arc::new(bid_query));
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = logged_in_cookie(&app, owner).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/bids/{gig_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
    }

    #[actix_web::test]
    async fn hire_returns_the_confirmation_payload() {
        let owner = UserId::random();
        let gig_id = GigId::random();
        let bid_id = BidId::random();
        let mut hiring = MockHireCommand::new();
        hiring
            .expect_hire()
            .withf(move |req| req.requesting_user_id == owner && req.bid_id == bid_id)
            .returning(move |req| {
                Ok(HireConfirmation {
                    gig_id,
                    hired_bid_id: req.bid_id,
                    rejected_bids: 1,
                })
            });
        let state = test_http_state(|state| state.hiring = Arc::new(hiring));
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = logged_in_cookie(&app, owner).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/bids/hire/{bid_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(res).await).expect("confirmation");
        assert_eq!(
            value.get("hiredBidId").and_then(Value::as_str),
            Some(bid_id.to_string().as_str())
        );
        assert_eq!(value.get("rejectedBids").and_then(Value::as_u64), Some(1));
    }

    #[actix_web::test]
    async fn hire_conflict_maps_to_409() {
        let owner = UserId::random();
        let mut hiring = MockHireCommand::new();
        hiring
            .expect_hire()
            .returning(|req| Err(Error::conflict(format!("bid {} is already resolved", req.bid_id))));
        let state = test_http_state(|state| state.hiring = Arc::new(hiring));
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = logged_in_cookie(&app, owner).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/bids/hire/{}", BidId::random()))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::CONFLICT);
    }
}
