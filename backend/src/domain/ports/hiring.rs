//! Driving port for the hiring coordinator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BidId, Error, GigId, UserId};

/// Typed request to hire a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HireRequest {
    /// Authenticated caller; must own the bid's gig.
    pub requesting_user_id: UserId,
    /// Bid being hired.
    pub bid_id: BidId,
}

/// Confirmation of a committed hire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HireConfirmation {
    /// Gig that is now assigned.
    #[schema(value_type = String)]
    pub gig_id: GigId,
    /// Bid that is now hired.
    #[schema(value_type = String)]
    pub hired_bid_id: BidId,
    /// Number of sibling bids rejected as part of the same transition.
    pub rejected_bids: u64,
}

/// Use-case port for hiring exactly one bid per gig.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HireCommand: Send + Sync {
    /// Atomically hire the bid, assign its gig, and reject pending siblings.
    ///
    /// Fails with a typed error on any precondition violation and leaves all
    /// records unchanged; see the error taxonomy on [`Error`].
    async fn hire(&self, request: HireRequest) -> Result<HireConfirmation, Error>;
}
