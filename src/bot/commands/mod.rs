//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Inventory administration commands
pub mod admin;

/// Member-facing inventory and request commands
pub mod inventory;

// Export commands
pub use admin::*;
pub use inventory::*;
