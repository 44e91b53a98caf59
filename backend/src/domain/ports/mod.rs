//! Domain ports and supporting types for the hexagonal boundary.

mod hiring;
mod identity;
mod marketplace;
mod store;

#[cfg(test)]
pub use hiring::MockHireCommand;
pub use hiring::{HireCommand, HireConfirmation, HireRequest};
#[cfg(test)]
pub use identity::MockIdentityGate;
pub use identity::{
    Credentials, CredentialsValidationError, IdentityGate, PASSWORD_MIN, RegisterRequest,
};
#[cfg(test)]
pub use marketplace::{MockBidCommand, MockBidQuery, MockGigCommand, MockGigQuery};
pub use marketplace::{
    BidCommand, BidQuery, GigCommand, GigQuery, ListBidsRequest, PlaceBidRequest, PostGigRequest,
};
#[cfg(test)]
pub use store::MockMarketplaceStore;
pub use store::{
    BidPlacement, HireCommit, HireCommitOutcome, MarketplaceStore, PasswordHash, StoreError,
    UserInsert,
};
