//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as button
//! clicks, modal submissions, and autocomplete.

/// Autocomplete handlers for item names
pub mod autocomplete;
/// Button and modal routing for the request approval workflow
pub mod interactions;
/// Inventory-admin authorization against live member data
pub mod permissions;
