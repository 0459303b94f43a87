//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for item name parameters,
//! improving the user experience by suggesting stocked items as the user
//! types.

use crate::{bot::BotData, core::inventory, errors::Error};

/// Provides autocomplete suggestions for item names in the invoking guild.
///
/// Queries the guild's inventory for items matching the user's partial input
/// and returns up to 25 matching names. Outside a guild, or on a query
/// failure, suggests nothing rather than erroring the interaction.
pub async fn autocomplete_item_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };
    let db = &ctx.data().database;

    let Ok(items) = inventory::get_all_items(db, &guild_id.to_string()).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();

    // Already alphabetically ordered by the query
    items
        .into_iter()
        .filter(|item| item.name.to_lowercase().contains(&partial_lower))
        .map(|item| item.name)
        .take(25) // Discord autocomplete limit
        .collect()
}
