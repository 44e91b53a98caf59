//! Driving ports for gig posting, bid submission, and listings.
//!
//! Inbound adapters call these use-cases with already-typed requests; raw
//! request bodies are validated and converted at the HTTP boundary before
//! they reach the domain.

use async_trait::async_trait;

use crate::domain::{Bid, Error, Gig, GigId, UserId};

/// Typed request to post a new gig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostGigRequest {
    /// Authenticated user posting the gig.
    pub owner_id: UserId,
    /// Gig title; must be non-empty.
    pub title: String,
    /// Free-text description of the work.
    pub description: String,
    /// Offered budget in minor units; must be non-negative.
    pub budget: i64,
}

/// Typed request to place a bid against a gig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceBidRequest {
    /// Authenticated freelancer placing the bid.
    pub freelancer_id: UserId,
    /// Gig the bid targets.
    pub gig_id: GigId,
    /// Free-text pitch; must be non-empty.
    pub message: String,
}

/// Typed request to list the bids on a gig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBidsRequest {
    /// Authenticated caller; must own the gig.
    pub requesting_user_id: UserId,
    /// Gig whose bids are listed.
    pub gig_id: GigId,
}

/// Use-case port for creating gigs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GigCommand: Send + Sync {
    /// Validate and create an open gig.
    async fn post_gig(&self, request: PostGigRequest) -> Result<Gig, Error>;
}

/// Use-case port for reading gigs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GigQuery: Send + Sync {
    /// List gigs still accepting bids.
    async fn list_open_gigs(&self) -> Result<Vec<Gig>, Error>;
}

/// Use-case port for creating bids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BidCommand: Send + Sync {
    /// Validate and create a pending bid on an open gig.
    async fn place_bid(&self, request: PlaceBidRequest) -> Result<Bid, Error>;
}

/// Use-case port for reading bids.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BidQuery: Send + Sync {
    /// List the bids on a gig, restricted to the gig's owner.
    async fn list_bids(&self, request: ListBidsRequest) -> Result<Vec<Bid>, Error>;
}
