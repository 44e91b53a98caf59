//! Gig aggregate: a job posting with a single irreversible assignment.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Maximum allowed length for a gig title.
pub const GIG_TITLE_MAX: usize = 120;

/// Validation errors raised when constructing a [`Gig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GigValidationError {
    /// Title is empty after trimming.
    #[error("gig title must not be empty")]
    EmptyTitle,
    /// Title exceeds the permitted length.
    #[error("gig title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Budget is negative.
    #[error("gig budget must not be negative")]
    NegativeBudget,
}

/// Stable gig identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GigId(Uuid);

impl GigId {
    /// Validate and construct a [`GigId`] from string input.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.as_ref()).map(Self)
    }

    /// Generate a new random [`GigId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for GigId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for GigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-negative budget in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Budget(i64);

impl Budget {
    /// Validate and construct a [`Budget`].
    pub fn new(amount: i64) -> Result<Self, GigValidationError> {
        if amount < 0 {
            return Err(GigValidationError::NegativeBudget);
        }
        Ok(Self(amount))
    }

    /// Budget amount in minor units.
    pub fn amount(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Budget {
    type Error = GigValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Budget> for i64 {
    fn from(value: Budget) -> Self {
        value.0
    }
}

/// Lifecycle state of a gig.
///
/// `Open → Assigned` exactly once, only via a successful hire; the
/// transition never reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GigStatus {
    /// Accepting bids.
    Open,
    /// A bid has been hired; terminal.
    Assigned,
}

/// Attempted transition on a gig that is not open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("gig is already assigned")]
pub struct GigAlreadyAssigned;

/// A posted job offer owned by one user.
///
/// ## Invariants
/// - `status` moves `Open → Assigned` at most once and never back.
/// - Mutated only by the hiring coordinator after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    #[schema(value_type = String, example = "7b7a4f8e-01a7-44a9-9c4b-6f1b1f3c2ad1")]
    id: GigId,
    #[schema(example = "Build a landing page")]
    title: String,
    #[schema(example = "Responsive page with a contact form")]
    description: String,
    #[schema(value_type = i64, example = 500)]
    budget: Budget,
    #[schema(value_type = String)]
    owner_id: UserId,
    status: GigStatus,
}

impl Gig {
    /// Create a new open gig, validating title and budget.
    pub fn post(
        owner_id: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        budget: i64,
    ) -> Result<Self, GigValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GigValidationError::EmptyTitle);
        }
        if title.chars().count() > GIG_TITLE_MAX {
            return Err(GigValidationError::TitleTooLong { max: GIG_TITLE_MAX });
        }
        Ok(Self {
            id: GigId::random(),
            title,
            description: description.into(),
            budget: Budget::new(budget)?,
            owner_id,
            status: GigStatus::Open,
        })
    }

    /// Mark the gig as assigned. Fails unless the gig is currently open.
    pub fn assign(&mut self) -> Result<(), GigAlreadyAssigned> {
        if self.status != GigStatus::Open {
            return Err(GigAlreadyAssigned);
        }
        self.status = GigStatus::Assigned;
        Ok(())
    }

    /// Stable gig identifier.
    pub fn id(&self) -> GigId {
        self.id
    }

    /// Title shown in listings.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-text description of the work.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Offered budget.
    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// User who posted the gig.
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Current lifecycle state.
    pub fn status(&self) -> GigStatus {
        self.status
    }

    /// Whether the gig is still accepting bids.
    pub fn is_open(&self) -> bool {
        self.status == GigStatus::Open
    }

    /// Rehydrate a gig from trusted storage fields, bypassing creation
    /// validation. Adapters only.
    pub fn from_storage(
        id: GigId,
        title: String,
        description: String,
        budget: Budget,
        owner_id: UserId,
        status: GigStatus,
    ) -> Self {
        Self {
            id,
            title,
            description,
            budget,
            owner_id,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn open_gig() -> Gig {
        Gig::post(UserId::random(), "Paint the fence", "White, two coats", 500)
            .expect("valid gig")
    }

    #[rstest]
    fn post_starts_open() {
        let gig = open_gig();
        assert_eq!(gig.status(), GigStatus::Open);
        assert!(gig.is_open());
    }

    #[rstest]
    #[case("", 10, GigValidationError::EmptyTitle)]
    #[case("   ", 10, GigValidationError::EmptyTitle)]
    #[case("ok", -1, GigValidationError::NegativeBudget)]
    fn post_rejects_invalid_input(
        #[case] title: &str,
        #[case] budget: i64,
        #[case] expected: GigValidationError,
    ) {
        let result = Gig::post(UserId::random(), title, "", budget);
        assert_eq!(result.expect_err("should fail"), expected);
    }

    #[rstest]
    fn post_rejects_overlong_title() {
        let title = "x".repeat(GIG_TITLE_MAX + 1);
        assert!(matches!(
            Gig::post(UserId::random(), title, "", 0),
            Err(GigValidationError::TitleTooLong { .. })
        ));
    }

    #[rstest]
    fn assign_is_irreversible_and_single_shot() {
        let mut gig = open_gig();
        gig.assign().expect("first assignment succeeds");
        assert_eq!(gig.status(), GigStatus::Assigned);
        assert_eq!(gig.assign(), Err(GigAlreadyAssigned));
        assert_eq!(gig.status(), GigStatus::Assigned);
    }

    #[rstest]
    fn zero_budget_is_permitted() {
        assert!(Budget::new(0).is_ok());
    }
}
