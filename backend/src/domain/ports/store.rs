//! Port for the marketplace entity store.
//!
//! The store holds users, gigs, and bids, and exposes the one transactional
//! primitive the hiring coordinator depends on: [`MarketplaceStore::commit_hire`],
//! an all-or-nothing three-record transition. Adapters must make that call
//! the serialization point for every hire attempt on the same gig.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Bid, BidId, EmailAddress, Gig, GigId, User, UserId};

/// Errors raised by entity store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Store connection could not be established.
    #[error("entity store connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("entity store query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// The store did not acknowledge the operation within the bounded
    /// interval; the outcome is unknown and the whole call may be retried.
    #[error("entity store timed out: {message}")]
    Timeout {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl StoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a timeout error with the given message.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }
}

/// Opaque password credential hash owned by the identity gate.
///
/// The domain never inspects the contents; only the identity gate's chosen
/// hasher can produce or verify one.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string produced by the identity gate.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string for verification or storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never log credential material.
        f.write_str("PasswordHash(..)")
    }
}

/// Outcome of inserting a user with a unique-email constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInsert {
    /// The user record was created.
    Inserted,
    /// Another user already holds this email address.
    EmailTaken,
}

/// Outcome of the atomic check-open-and-insert for a new bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidPlacement {
    /// The bid record was created against an open gig.
    Placed,
    /// The referenced gig does not exist.
    GigMissing,
    /// The referenced gig is no longer open.
    GigClosed,
}

/// Parameters for the atomic hire transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HireCommit {
    /// Gig being closed.
    pub gig_id: GigId,
    /// Bid being hired.
    pub bid_id: BidId,
}

/// Outcome of [`MarketplaceStore::commit_hire`].
///
/// Non-`Committed` variants mean the transaction observed a precondition
/// failure and wrote nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HireCommitOutcome {
    /// Bid hired, gig assigned, and pending siblings rejected, atomically.
    Committed {
        /// Number of sibling bids moved from pending to rejected.
        rejected_siblings: u64,
    },
    /// The gig vanished between the coordinator's read and the commit.
    GigMissing,
    /// The gig was no longer open at commit time.
    GigClosed,
    /// The bid vanished between the coordinator's read and the commit.
    BidMissing,
    /// The bid was no longer pending at commit time.
    BidResolved,
}

/// Port for marketplace persistence.
///
/// `commit_hire` must be all-or-nothing: either the hired bid, the gig, and
/// every pending sibling are updated together, or no record changes. The
/// precondition re-checks happen *inside* the adapter's transaction scope, so
/// a caller that raced another hire observes a clean non-committed outcome
/// rather than partial state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Find a user by id.
    async fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Find a user and credential hash by email.
    async fn user_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<(User, PasswordHash)>, StoreError>;

    /// Insert a user, enforcing email uniqueness.
    async fn insert_user(
        &self,
        user: User,
        credential: PasswordHash,
    ) -> Result<UserInsert, StoreError>;

    /// Find a gig by id.
    async fn gig(&self, id: GigId) -> Result<Option<Gig>, StoreError>;

    /// List gigs that are still accepting bids. Ordering is unspecified.
    async fn open_gigs(&self) -> Result<Vec<Gig>, StoreError>;

    /// Insert a newly posted gig.
    async fn insert_gig(&self, gig: Gig) -> Result<(), StoreError>;

    /// Find a bid by id.
    async fn bid(&self, id: BidId) -> Result<Option<Bid>, StoreError>;

    /// List all bids referencing a gig. Ordering is unspecified.
    async fn bids_for_gig(&self, gig_id: GigId) -> Result<Vec<Bid>, StoreError>;

    /// Insert a bid if and only if its gig is still open, as one atomic
    /// operation. A hire committing concurrently can therefore never orphan
    /// a just-placed bid.
    async fn insert_bid(&self, bid: Bid) -> Result<BidPlacement, StoreError>;

    /// Atomically hire one bid: bid to hired, gig to assigned, pending
    /// siblings to rejected. Re-validates that the gig is open and the bid
    /// pending inside the transaction.
    async fn commit_hire(&self, commit: HireCommit) -> Result<HireCommitOutcome, StoreError>;
}
