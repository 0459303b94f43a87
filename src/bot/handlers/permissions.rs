//! Inventory-admin authorization.
//!
//! The decision itself lives in [`crate::core::guild::is_inventory_admin`];
//! this module adapts live serenity member data (resolved permissions and role
//! IDs) into that check. Authorization is evaluated fresh on every transition
//! attempt so role changes take effect immediately.

use crate::{core::guild, errors::Result};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;

/// Decides whether a member may manage this guild's inventory.
///
/// `permissions` is the member's resolved permission set, present on
/// interaction payloads; when absent only the configured admin roles grant
/// access.
pub async fn member_is_inventory_admin(
    db: &DatabaseConnection,
    guild_id: &str,
    permissions: Option<serenity::Permissions>,
    role_ids: &[serenity::RoleId],
) -> Result<bool> {
    let config = guild::get_guild_config(db, guild_id).await?;
    let has_administrator = permissions.is_some_and(|p| p.administrator());
    let member_roles: Vec<String> = role_ids.iter().map(ToString::to_string).collect();

    Ok(guild::is_inventory_admin(
        config.as_ref(),
        has_administrator,
        &member_roles,
    ))
}
