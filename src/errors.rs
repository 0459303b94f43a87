//! Unified error types for the whole crate.
//!
//! Validation failures, integrity conflicts, and not-found conditions each get
//! their own variant so command handlers can report them to the invoking user
//! without touching any state.

use crate::entities::item_request::RequestStatus;
use thiserror::Error;

/// All errors that can occur within the application.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or input validation error with a human-readable message
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Environment variable lookup error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization error for the `items` / `admin_role_ids` columns
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// String formatting error while building a response
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// An inventory item was not found in the guild's inventory
    #[error("Item '{name}' not found in inventory")]
    ItemNotFound {
        /// Name of the missing item
        name: String,
    },

    /// An item with this name already exists for the guild
    #[error("Item '{name}' already exists in inventory")]
    DuplicateItem {
        /// Name of the conflicting item
        name: String,
    },

    /// A quantity argument violated the non-negative stock invariant
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: i64,
    },

    /// A request referenced item names the guild does not stock
    #[error("Unknown items: {}", names.join(", "))]
    UnknownItems {
        /// The unmatched names, as the user typed them
        names: Vec<String>,
    },

    /// A request resolved to zero valid items
    #[error("No valid items in request")]
    EmptyRequest,

    /// An item request was not found
    #[error("Request #{id} not found")]
    RequestNotFound {
        /// ID of the missing request
        id: i64,
    },

    /// A transition was attempted on a request that is no longer pending
    #[error("Request #{id} is already {status}")]
    RequestAlreadyResolved {
        /// ID of the request
        id: i64,
        /// The terminal status the request already holds
        status: RequestStatus,
    },

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
