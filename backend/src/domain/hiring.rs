//! Hiring coordinator: the one place that closes a gig.
//!
//! A hire moves exactly one bid to hired, its gig to assigned, and every
//! pending sibling to rejected, atomically. Preconditions are checked in a
//! fixed order against fresh reads, then re-validated inside the store's
//! transaction so two racing hire calls on the same gig resolve to one
//! success and one conflict, never partial state.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::ports::{
    HireCommand, HireCommit, HireCommitOutcome, HireConfirmation, HireRequest, MarketplaceStore,
    StoreError,
};

/// Map store failures on precondition reads.
fn map_read_error(error: StoreError) -> Error {
    match error {
        StoreError::Connection { message } | StoreError::Timeout { message } => {
            Error::service_unavailable(format!("entity store unavailable: {message}"))
        }
        StoreError::Query { message } => Error::internal(format!("entity store error: {message}")),
    }
}

/// Map store failures on the commit itself.
///
/// The transaction either committed or rolled back in full, so every
/// infrastructure failure here is safe to retry as a whole new `hire` call;
/// preconditions are re-evaluated on the next attempt.
fn map_commit_error(error: StoreError) -> Error {
    Error::service_unavailable(format!("hire transaction failed: {error}"))
}

/// Hiring coordinator implementing the [`HireCommand`] driving port.
#[derive(Clone)]
pub struct HiringService<S> {
    store: Arc<S>,
}

impl<S> HiringService<S> {
    /// Create a new coordinator over the given entity store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> HireCommand for HiringService<S>
where
    S: MarketplaceStore,
{
    async fn hire(&self, request: HireRequest) -> Result<HireConfirmation, Error> {
        let bid = self
            .store
            .bid(request.bid_id)
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| Error::not_found(format!("bid {} not found", request.bid_id)))?;

        let gig = self
            .store
            .gig(bid.gig_id())
            .await
            .map_err(map_read_error)?
            .ok_or_else(|| {
                Error::inconsistent_state(format!(
                    "bid {} references missing gig {}",
                    bid.id(),
                    bid.gig_id()
                ))
            })?;

        // Ownership is re-resolved from the gig record itself, never from
        // caller-supplied or cached state.
        if gig.owner_id() != request.requesting_user_id {
            return Err(Error::forbidden("only the gig owner may hire a bid"));
        }

        if !gig.is_open() {
            return Err(Error::conflict(format!("gig {} is already assigned", gig.id())));
        }

        if !bid.is_pending() {
            return Err(Error::conflict(format!("bid {} is already resolved", bid.id())));
        }

        let outcome = self
            .store
            .commit_hire(HireCommit {
                gig_id: gig.id(),
                bid_id: bid.id(),
            })
            .await
            .map_err(map_commit_error)?;

        match outcome {
            HireCommitOutcome::Committed { rejected_siblings } => {
                tracing::info!(
                    gig_id = %gig.id(),
                    bid_id = %bid.id(),
                    rejected_siblings,
                    "hire committed"
                );
                Ok(HireConfirmation {
                    gig_id: gig.id(),
                    hired_bid_id: bid.id(),
                    rejected_bids: rejected_siblings,
                })
            }
            // Lost the race between the precondition read and the commit.
            HireCommitOutcome::GigClosed => Err(Error::conflict(format!(
                "gig {} was assigned concurrently",
                gig.id()
            ))),
            HireCommitOutcome::BidResolved => Err(Error::conflict(format!(
                "bid {} was resolved concurrently",
                bid.id()
            ))),
            HireCommitOutcome::GigMissing => Err(Error::inconsistent_state(format!(
                "gig {} vanished during hire",
                gig.id()
            ))),
            HireCommitOutcome::BidMissing => Err(Error::inconsistent_state(format!(
                "bid {} vanished during hire",
                bid.id()
            ))),
        }
    }
}
