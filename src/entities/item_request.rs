//! Item request entity - Represents one member's request for inventory items.
//!
//! The `items` column holds a JSON object mapping item name to positive
//! quantity. `status` is the request lifecycle state machine: `pending` is the
//! only non-terminal state; `approved` and `denied` are terminal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle state of an item request.
///
/// Valid transitions are `Pending -> Approved` and `Pending -> Denied`; both
/// targets are terminal and a request never reverts to pending.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RequestStatus {
    /// Awaiting an admin decision
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Granted; inventory has been deducted (terminal)
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected; inventory untouched (terminal)
    #[sea_orm(string_value = "denied")]
    Denied,
}

impl RequestStatus {
    /// The lowercase wire/database representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item request database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item_requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild (server) ID the request was made in
    pub guild_id: String,
    /// Discord user ID of the requester
    pub user_id: String,
    /// Display name of the requester at creation time
    pub user_name: String,
    /// JSON object mapping item name to requested quantity
    pub items: String,
    /// Current lifecycle state
    pub status: RequestStatus,
    /// When the request was created
    pub created_at: DateTimeUtc,
    /// When the request was last transitioned, if ever
    pub updated_at: Option<DateTimeUtc>,
}

impl Model {
    /// Decodes the `items` JSON column into a name-to-quantity map.
    pub fn requested_items(&self) -> crate::errors::Result<BTreeMap<String, i64>> {
        serde_json::from_str(&self.items).map_err(Into::into)
    }
}

/// Requests reference items by name only; no foreign keys.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
