//! Store adapters: in-memory for tests and development, Diesel/PostgreSQL
//! for deployments.

pub mod diesel_store;
pub mod memory;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_store::DieselMarketplaceStore;
pub use memory::InMemoryMarketplaceStore;
pub use pool::{DbPool, PoolConfig, PoolError};
