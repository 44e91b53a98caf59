//! Identity gate boundary consumed by the core.
//!
//! The core never sees raw credential storage; it hands credentials to this
//! port and receives a resolved identity or a typed failure.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, User, UserId, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;

/// Validation errors raised when shaping login credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email fails the shape check.
    #[error(transparent)]
    InvalidEmail(#[from] UserValidationError),
    /// Password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Login credentials with a validated email shape.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: String,
}

impl Credentials {
    /// Validate and construct [`Credentials`] from raw request parts.
    pub fn try_from_parts(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsValidationError> {
        let password = password.into();
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: EmailAddress::new(email)?,
            password,
        })
    }

    /// Email the caller claims to own.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password; only ever read by the identity gate.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log the password.
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Typed request to register a new account.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Desired display name.
    pub name: String,
    /// Login email; must be unique.
    pub email: String,
    /// Plaintext password; hashed by the gate, never stored.
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Use-case port for registration and authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGate: Send + Sync {
    /// Validate the request, hash the password, and create the account.
    async fn register(&self, request: RegisterRequest) -> Result<User, Error>;

    /// Verify credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &Credentials) -> Result<UserId, Error>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn credentials_reject_empty_password() {
        assert_eq!(
            Credentials::try_from_parts("ada@example.com", "").expect_err("should fail"),
            CredentialsValidationError::EmptyPassword
        );
    }

    #[rstest]
    fn credentials_reject_malformed_email() {
        assert!(matches!(
            Credentials::try_from_parts("not-an-email", "hunter22"),
            Err(CredentialsValidationError::InvalidEmail(_))
        ));
    }

    #[rstest]
    fn debug_output_redacts_password() {
        let creds =
            Credentials::try_from_parts("ada@example.com", "hunter22").expect("valid creds");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter22"));
    }
}
