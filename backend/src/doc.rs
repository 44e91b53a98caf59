//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the specification served by Swagger UI in debug
//! builds. Handlers carry their own `utoipa::path` annotations; this module
//! registers them together with the session cookie security scheme.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::HireConfirmation;
use crate::domain::{Bid, Error, ErrorCode, Gig, User};
use crate::inbound::http::auth::{LoginBody, RegisterBody};
use crate::inbound::http::bids::PlaceBidBody;
use crate::inbound::http::gigs::PostGigBody;

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
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace backend API",
        description = "Gig posting, bidding, and atomic hiring over session-authenticated HTTP."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::gigs::post_gig,
        crate::inbound::http::gigs::list_gigs,
        crate::inbound::http::bids::place_bid,
        crate::inbound::http::bids::list_bids,
        crate::inbound::http::bids::hire_bid,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Gig,
        Bid,
        Error,
        ErrorCode,
        HireConfirmation,
        RegisterBody,
        LoginBody,
        PostGigBody,
        PlaceBidBody,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "gigs", description = "Gig posting and discovery"),
        (name = "bids", description = "Bidding and hiring"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
