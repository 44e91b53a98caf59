//! Registration and login handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Ada","email":"ada@example.com","password":"..."}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"..."}
//! ```
//!
//! The handlers only shape requests and responses; credential checks live
//! behind the identity gate port.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{Credentials, CredentialsValidationError, RegisterRequest};
use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    /// Desired display name.
    pub name: String,
    /// Login email; must be unique.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    /// Registered email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

fn map_credentials_validation_error(err: CredentialsValidationError) -> Error {
    let field = match err {
        CredentialsValidationError::InvalidEmail(_) => "email",
        CredentialsValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Create a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let RegisterBody {
        name,
        email,
        password,
    } = payload.into_inner();
    let user = state
        .identity
        .register(RegisterRequest {
            name,
            email,
            password,
        })
        .await?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let LoginBody { email, password } = payload.into_inner();
    let credentials =
        Credentials::try_from_parts(email, password).map_err(map_credentials_validation_error)?;
    let user_id = state.identity.authenticate(&credentials).await?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::Ok().finish())
}
