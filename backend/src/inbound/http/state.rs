//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BidCommand, BidQuery, GigCommand, GigQuery, HireCommand, IdentityGate,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login use-cases.
    pub identity: Arc<dyn IdentityGate>,
    /// Gig creation use-case.
    pub gigs: Arc<dyn GigCommand>,
    /// Gig listing use-case.
    pub gig_query: Arc<dyn GigQuery>,
    /// Bid creation use-case.
    pub bids: Arc<dyn BidCommand>,
    /// Bid listing use-case.
    pub bid_query: Arc<dyn BidQuery>,
    /// Hiring coordinator use-case.
    pub hiring: Arc<dyn HireCommand>,
}

impl HttpState {
    /// Wire every port to services sharing one marketplace store.
    ///
    /// This is the production wiring: the identity gate, the marketplace
    /// services, and the hiring coordinator all observe the same records.
    pub fn for_store<S>(store: Arc<S>) -> Self
    where
        S: crate::domain::ports::MarketplaceStore + 'static,
    {
        let marketplace = Arc::new(crate::domain::MarketplaceService::new(Arc::clone(&store)));
        Self {
            identity: Arc::new(crate::domain::PasswordIdentityGate::new(Arc::clone(&store))),
            gigs: Arc::clone(&marketplace) as Arc<dyn GigCommand>,
            gig_query: Arc::clone(&marketplace) as Arc<dyn GigQuery>,
            bids: Arc::clone(&marketplace) as Arc<dyn BidCommand>,
            bid_query: marketplace,
            hiring: Arc::new(crate::domain::HiringService::new(store)),
        }
    }
}
