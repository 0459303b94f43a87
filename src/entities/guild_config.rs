//! Guild configuration entity - One row per served Discord guild.
//!
//! Holds the inventory display location (channel + message), the extra admin
//! roles allowed to manage the inventory, and the guild's game-server region.
//! Updated with partial-update semantics by [`crate::core::guild`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild configuration database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guild_configs")]
pub struct Model {
    /// Discord guild (server) ID; one config row per guild
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Channel where the persistent inventory display lives
    pub inventory_channel_id: Option<String>,
    /// Message ID of the current inventory display artifact
    pub inventory_message_id: Option<String>,
    /// JSON array of role IDs allowed to manage the inventory
    pub admin_role_ids: String,
    /// Game-server region for this guild (`"US"`, `"EU"`, or `"OCE"`)
    pub region: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
