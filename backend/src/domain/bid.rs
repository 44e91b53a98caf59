//! Bid aggregate: a freelancer's proposal against one gig.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{DisplayName, GigId, UserId};

/// Validation errors raised when constructing a [`Bid`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BidValidationError {
    /// Message is empty after trimming.
    #[error("bid message must not be empty")]
    EmptyMessage,
}

/// Stable bid identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidId(Uuid);

impl BidId {
    /// Validate and construct a [`BidId`] from string input.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.as_ref()).map(Self)
    }

    /// Generate a new random [`BidId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BidId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for BidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a bid.
///
/// `Pending → Hired` or `Pending → Rejected`; both terminal. At most one bid
/// per gig ever reaches `Hired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BidStatus {
    /// Awaiting the gig owner's decision.
    Pending,
    /// Selected by the gig owner; terminal.
    Hired,
    /// Passed over when a sibling was hired; terminal.
    Rejected,
}

/// Attempted transition on a bid that is no longer pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bid is already resolved")]
pub struct BidAlreadyResolved;

/// A proposal submitted by a freelancer against one gig.
///
/// ## Invariants
/// - `gig_id` never changes after creation.
/// - `status` leaves `Pending` at most once and never returns to it.
/// - `freelancer_name` is denormalised at creation time for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    #[schema(value_type = String, example = "9f0c1d2e-3b4a-45c6-87d8-e9f0a1b2c3d4")]
    id: BidId,
    #[schema(value_type = String)]
    gig_id: GigId,
    #[schema(value_type = String)]
    freelancer_id: UserId,
    #[schema(value_type = String, example = "Grace Hopper")]
    freelancer_name: DisplayName,
    #[schema(example = "I can do it")]
    message: String,
    status: BidStatus,
}

impl Bid {
    /// Create a new pending bid, validating the message.
    pub fn place(
        gig_id: GigId,
        freelancer_id: UserId,
        freelancer_name: DisplayName,
        message: impl Into<String>,
    ) -> Result<Self, BidValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(BidValidationError::EmptyMessage);
        }
        Ok(Self {
            id: BidId::random(),
            gig_id,
            freelancer_id,
            freelancer_name,
            message,
            status: BidStatus::Pending,
        })
    }

    /// Mark the bid as hired. Fails unless the bid is currently pending.
    pub fn hire(&mut self) -> Result<(), BidAlreadyResolved> {
        if self.status != BidStatus::Pending {
            return Err(BidAlreadyResolved);
        }
        self.status = BidStatus::Hired;
        Ok(())
    }

    /// Mark the bid as rejected. Fails unless the bid is currently pending;
    /// stores treat rejection of an already-resolved sibling as a no-op.
    pub fn reject(&mut self) -> Result<(), BidAlreadyResolved> {
        if self.status != BidStatus::Pending {
            return Err(BidAlreadyResolved);
        }
        self.status = BidStatus::Rejected;
        Ok(())
    }

    /// Stable bid identifier.
    pub fn id(&self) -> BidId {
        self.id
    }

    /// Gig this bid targets; fixed at creation.
    pub fn gig_id(&self) -> GigId {
        self.gig_id
    }

    /// Freelancer who placed the bid.
    pub fn freelancer_id(&self) -> UserId {
        self.freelancer_id
    }

    /// Freelancer display label captured at creation time.
    pub fn freelancer_name(&self) -> &DisplayName {
        &self.freelancer_name
    }

    /// Free-text pitch.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Current lifecycle state.
    pub fn status(&self) -> BidStatus {
        self.status
    }

    /// Whether the bid is still awaiting a decision.
    pub fn is_pending(&self) -> bool {
        self.status == BidStatus::Pending
    }

    /// Rehydrate a bid from trusted storage fields, bypassing creation
    /// validation. Adapters only.
    pub fn from_storage(
        id: BidId,
        gig_id: GigId,
        freelancer_id: UserId,
        freelancer_name: DisplayName,
        message: String,
        status: BidStatus,
    ) -> Self {
        Self {
            id,
            gig_id,
            freelancer_id,
            freelancer_name,
            message,
            status,
        }
    }
}
