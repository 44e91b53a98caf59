//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entity lifecycle for users, gigs, and
//! bids, plus the hiring coordinator that closes a gig atomically. Keep types
//! validated at construction and document invariants in each type's Rustdoc.
//! Transport and persistence concerns live in the inbound/outbound adapters.

pub mod bid;
pub mod error;
pub mod gig;
mod hiring;
mod identity;
mod marketplace;
pub mod ports;
pub mod user;

pub use self::bid::{Bid, BidAlreadyResolved, BidId, BidStatus, BidValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::gig::{
    Budget, GIG_TITLE_MAX, Gig, GigAlreadyAssigned, GigId, GigStatus, GigValidationError,
};
pub use self::hiring::HiringService;
pub use self::identity::PasswordIdentityGate;
pub use self::marketplace::MarketplaceService;
pub use self::user::{DISPLAY_NAME_MAX, DisplayName, EmailAddress, User, UserId, UserValidationError};
