//! Item entity - Represents one stocked material in a guild's inventory.
//!
//! Items are scoped by guild and unique per `(guild_id, name)`; the quantity
//! invariant (never negative) is enforced by the ledger operations in
//! [`crate::core::inventory`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild (server) ID this item belongs to
    pub guild_id: String,
    /// Human-readable item name, unique within the guild
    pub name: String,
    /// Units currently in stock; never negative
    pub quantity: i64,
    /// Optional free-text description shown in the inventory display
    pub description: Option<String>,
}

/// Items have no relations to other entities; requests reference them by name.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
