//! In-memory store for tests and single-process development runs.
//!
//! One mutex guards all three maps, so every store call is a serialised
//! critical section with no await points inside it. `commit_hire` therefore
//! observes and writes the three records as a single atomic step, which is
//! exactly the contract the hiring coordinator needs.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    BidPlacement, HireCommit, HireCommitOutcome, MarketplaceStore, PasswordHash, StoreError,
    UserInsert,
};
use crate::domain::{Bid, BidId, EmailAddress, Gig, GigId, User, UserId};

#[derive(Default)]
struct State {
    users: HashMap<UserId, (User, PasswordHash)>,
    gigs: HashMap<GigId, Gig>,
    bids: HashMap<BidId, Bid>,
}

/// Marketplace store backed by process memory.
#[derive(Default)]
pub struct InMemoryMarketplaceStore {
    state: Mutex<State>,
}

impl InMemoryMarketplaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means another test panicked mid-write; the
        // data is still usable for the assertions that follow.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MarketplaceStore for InMemoryMarketplaceStore {
    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.locked().users.get(&id).map(|(user, _)| user.clone()))
    }

    async fn user_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<(User, PasswordHash)>, StoreError> {
        Ok(self
            .locked()
            .users
            .values()
            .find(|(user, _)| user.email() == email)
            .cloned())
    }

    async fn insert_user(
        &self,
        user: User,
        credential: PasswordHash,
    ) -> Result<UserInsert, StoreError> {
        let mut state = self.locked();
        if state
            .users
            .values()
            .any(|(existing, _)| existing.email() == user.email())
        {
            return Ok(UserInsert::EmailTaken);
        }
        state.users.insert(user.id(), (user, credential));
        Ok(UserInsert::Inserted)
    }

    async fn gig(&self, id: GigId) -> Result<Option<Gig>, StoreError> {
        Ok(self.locked().gigs.get(&id).cloned())
    }

    async fn open_gigs(&self) -> Result<Vec<Gig>, StoreError> {
        Ok(self
            .locked()
            .gigs
            .values()
            .filter(|gig| gig.is_open())
            .cloned()
            .collect())
    }

    async fn insert_gig(&self, gig: Gig) -> Result<(), StoreError> {
        self.locked().gigs.insert(gig.id(), gig);
        Ok(())
    }

    async fn bid(&self, id: BidId) -> Result<Option<Bid>, StoreError> {
        Ok(self.locked().bids.get(&id).cloned())
    }

    async fn bids_for_gig(&self, gig_id: GigId) -> Result<Vec<Bid>, StoreError> {
        Ok(self
            .locked()
            .bids
            .values()
            .filter(|bid| bid.gig_id() == gig_id)
            .cloned()
            .collect())
    }

    async fn insert_bid(&self, bid: Bid) -> Result<BidPlacement, StoreError> {
        let mut state = self.locked();
        match state.gigs.get(&bid.gig_id()) {
            None => Ok(BidPlacement::GigMissing),
            Some(gig) if !gig.is_open() => Ok(BidPlacement::GigClosed),
            Some(_) => {
                state.bids.insert(bid.id(), bid);
                Ok(BidPlacement::Placed)
            }
        }
    }

    async fn commit_hire(&self, commit: HireCommit) -> Result<HireCommitOutcome, StoreError> {
        let mut state = self.locked();

        // Re-validate preconditions on current state before mutating anything.
        let outcome = match (state.gigs.get(&commit.gig_id), state.bids.get(&commit.bid_id)) {
            (None, _) => Some(HireCommitOutcome::GigMissing),
            (Some(gig), _) if !gig.is_open() => Some(HireCommitOutcome::GigClosed),
            (_, None) => Some(HireCommitOutcome::BidMissing),
            (_, Some(bid)) if !bid.is_pending() || bid.gig_id() != commit.gig_id => {
                Some(HireCommitOutcome::BidResolved)
            }
            _ => None,
        };
        if let Some(outcome) = outcome {
            return Ok(outcome);
        }

        if let Some(gig) = state.gigs.get_mut(&commit.gig_id) {
            gig.assign()
                .map_err(|e| StoreError::query(e.to_string()))?;
        }
        if let Some(bid) = state.bids.get_mut(&commit.bid_id) {
            bid.hire().map_err(|e| StoreError::query(e.to_string()))?;
        }
        let mut rejected_siblings = 0_u64;
        for bid in state.bids.values_mut() {
            if bid.gig_id() == commit.gig_id && bid.is_pending() {
                bid.reject().map_err(|e| StoreError::query(e.to_string()))?;
                rejected_siblings += 1;
            }
        }
        Ok(HireCommitOutcome::Committed { rejected_siblings })
    }
}
