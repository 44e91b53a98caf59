//! Store-backed identity gate.
//!
//! Registration hashes the password with Argon2 before anything touches the
//! store; authentication verifies against the stored hash and deliberately
//! collapses "unknown email" and "wrong password" into one failure.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as ParsedHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    Credentials, IdentityGate, MarketplaceStore, PASSWORD_MIN, PasswordHash, RegisterRequest,
    StoreError, UserInsert,
};
use crate::domain::{DisplayName, EmailAddress, Error, User, UserId, UserValidationError};

fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Connection { message } | StoreError::Timeout { message } => {
            Error::service_unavailable(format!("entity store unavailable: {message}"))
        }
        StoreError::Query { message } => Error::internal(format!("entity store error: {message}")),
    }
}

fn map_user_validation_error(error: UserValidationError, field: &str) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// Identity gate backed by the marketplace store.
#[derive(Clone)]
pub struct PasswordIdentityGate<S> {
    store: Arc<S>,
}

impl<S> PasswordIdentityGate<S> {
    /// Create a new gate over the given entity store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn hash_password(password: &str) -> Result<PasswordHash, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
        Ok(PasswordHash::new(hash.to_string()))
    }
}

#[async_trait]
impl<S> IdentityGate for PasswordIdentityGate<S>
where
    S: MarketplaceStore,
{
    async fn register(&self, request: RegisterRequest) -> Result<User, Error> {
        let name = DisplayName::new(request.name)
            .map_err(|err| map_user_validation_error(err, "name"))?;
        let email = EmailAddress::new(request.email)
            .map_err(|err| map_user_validation_error(err, "email"))?;
        if request.password.chars().count() < PASSWORD_MIN {
            return Err(Error::invalid_request(format!(
                "password must be at least {PASSWORD_MIN} characters"
            ))
            .with_details(json!({ "field": "password" })));
        }

        let credential = Self::hash_password(&request.password)?;
        let user = User::new(UserId::random(), name, email);

        match self
            .store
            .insert_user(user.clone(), credential)
            .await
            .map_err(map_store_error)?
        {
            UserInsert::Inserted => {
                tracing::info!(user_id = %user.id(), "user registered");
                Ok(user)
            }
            UserInsert::EmailTaken => Err(Error::conflict("email address is already registered")),
        }
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<UserId, Error> {
        let Some((user, stored)) = self
            .store
            .user_by_email(credentials.email())
            .await
            .map_err(map_store_error)?
        else {
            return Err(Error::unauthorized("invalid credentials"));
        };

        let parsed = ParsedHash::new(stored.as_str())
            .map_err(|err| Error::internal(format!("stored credential is malformed: {err}")))?;
        Argon2::default()
            .verify_password(credentials.password().as_bytes(), &parsed)
            .map_err(|_| Error::unauthorized("invalid credentials"))?;

        Ok(user.id())
    }
}
