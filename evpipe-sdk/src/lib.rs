//! Shared wire types for the evpipe event pipeline.
//!
//! The `client` feature adds a small `reqwest`-based client for the
//! consumer's ingestion endpoint.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
