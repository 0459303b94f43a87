//! Core business logic - framework-agnostic operations over the store.
//!
//! Nothing in this module knows about Discord; the bot layer passes in plain
//! identifiers and renders the returned data. All functions are async and
//! return Result types for error handling.

/// Guild configuration upserts and the admin authorization check
pub mod guild;
/// Inventory ledger - quantity mutations and stock categorization
pub mod inventory;
/// Free-text item input parsing
pub mod parser;
/// Game-server region policy, stored per guild
pub mod region;
/// Request lifecycle state machine - create, approve, deny
pub mod request;
