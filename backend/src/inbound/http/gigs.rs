//! Gig handlers.
//!
//! ```text
//! POST /api/v1/gigs {"title":"...","description":"...","budget":500}
//! GET /api/v1/gigs
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::PostGigRequest;
use crate::domain::{Error, Gig};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Gig creation body for `POST /api/v1/gigs`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostGigBody {
    /// Gig title; must be non-empty.
    pub title: String,
    /// Free-text description of the work.
    #[serde(default)]
    pub description: String,
    /// Offered budget in minor units; must be non-negative.
    pub budget: i64,
}

/// Post a new gig.
#[utoipa::path(
    post,
    path = "/api/v1/gigs",
    request_body = PostGigBody,
    responses(
        (status = 201, description = "Gig created", body = Gig),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["gigs"],
    operation_id = "postGig"
)]
#[post("/gigs")]
pub async fn post_gig(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostGigBody>,
) -> ApiResult<HttpResponse> {
    let owner_id = session.require_user_id()?;
    let PostGigBody {
        title,
        description,
        budget,
    } = payload.into_inner();
    let gig = state
        .gigs
        .post_gig(PostGigRequest {
            owner_id,
            title,
            description,
            budget,
        })
        .await?;
    Ok(HttpResponse::Created().json(gig))
}

/// List gigs that are still accepting bids.
#[utoipa::path(
    get,
    path = "/api/v1/gigs",
    responses(
        (status = 200, description = "Open gigs", body = [Gig]),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["gigs"],
    operation_id = "listOpenGigs",
    security([])
)]
#[get("/gigs")]
pub async fn list_gigs(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Gig>>> {
    let gigs = state.gig_query.list_open_gigs().await?;
    Ok(web::Json(gigs))
}
