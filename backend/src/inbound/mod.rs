//! Inbound adapters drive the domain from the outside world.

pub mod http;
