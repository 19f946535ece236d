//! Core engine for the RealEstateHub marketplace.
//!
//! The crate owns the pieces of the marketplace with real invariants: the
//! offer state machine and its property-status cascade, the listing filter,
//! and the queries that compute a buyer's or seller's view of the market.
//! Persistence and notification delivery stay behind traits so the HTTP
//! service (and the tests) can supply their own implementations.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
