//! HTTP adapter: handlers, session plumbing, and error translation.

pub mod auth;
pub mod bids;
pub mod error;
pub mod gigs;
pub mod health;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod test_state;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiResult, TRACE_ID_HEADER};
