//! Outbound adapters the domain drives through its ports.

pub mod persistence;
