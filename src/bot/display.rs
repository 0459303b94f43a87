//! Persistent inventory display and announcement synchronization.
//!
//! The inventory display is a single bot-owned embed in the configured
//! channel, edited in place after every stock mutation. If the stored message
//! was deleted the display is recreated and the new message ID stored.
//! Pending request announcements in the same channel are refreshed so their
//! availability lines track current stock; the sweep identifies them by
//! button custom ID, never by message text.

use crate::{
    bot::{embeds, handlers::interactions::RequestAction},
    core::{guild, inventory, request},
    entities::RequestStatus,
    errors::Result,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{debug, warn};

/// Announcement sweep window; older announcements go stale by design.
const ANNOUNCEMENT_SWEEP_LIMIT: u8 = 100;

/// Brings the guild's inventory display and pending announcements in line
/// with current stock. Call after every mutation.
pub async fn sync_guild_displays(
    ctx: &serenity::Context,
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<()> {
    sync_inventory_display(ctx, db, guild_id).await?;
    refresh_pending_announcements(ctx, db, guild_id).await
}

/// Edits the persistent inventory embed in place, recreating it if the
/// stored message no longer exists. A guild without a configured inventory
/// channel has no display to sync.
pub async fn sync_inventory_display(
    ctx: &serenity::Context,
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<()> {
    let Some(config) = guild::get_guild_config(db, guild_id).await? else {
        return Ok(());
    };
    let Some(channel_id) = parse_channel(config.inventory_channel_id.as_deref()) else {
        return Ok(());
    };

    let summary = inventory::build_inventory_summary(db, guild_id).await?;
    let embed = embeds::inventory_embed(&summary);

    if let Some(message_id) = config
        .inventory_message_id
        .as_deref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(serenity::MessageId::new)
    {
        let edit = serenity::EditMessage::new().embed(embed.clone());
        if channel_id
            .edit_message(&ctx.http, message_id, edit)
            .await
            .is_ok()
        {
            return Ok(());
        }
        debug!(guild_id, "stored inventory message gone, recreating");
    }

    let message = channel_id
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await?;

    guild::update_guild_config(
        db,
        guild_id,
        guild::GuildConfigPatch {
            inventory_message_id: Some(message.id.to_string()),
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}

/// Re-renders the availability lines of every pending announcement in the
/// sweep window, and strips live buttons from announcements whose request has
/// since been resolved elsewhere. Best effort per message.
pub async fn refresh_pending_announcements(
    ctx: &serenity::Context,
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<()> {
    let Some(config) = guild::get_guild_config(db, guild_id).await? else {
        return Ok(());
    };
    let Some(channel_id) = parse_channel(config.inventory_channel_id.as_deref()) else {
        return Ok(());
    };

    let bot_id = ctx.cache.current_user().id;
    let messages = channel_id
        .messages(
            &ctx.http,
            serenity::GetMessages::new().limit(ANNOUNCEMENT_SWEEP_LIMIT),
        )
        .await?;

    for message in messages {
        if message.author.id != bot_id {
            continue;
        }
        let Some(request_id) = announcement_request_id(&message) else {
            continue;
        };
        if let Err(err) = refresh_announcement(ctx, db, guild_id, channel_id, &message, request_id)
            .await
        {
            warn!(request_id, "failed to refresh announcement: {err}");
        }
    }
    Ok(())
}

async fn refresh_announcement(
    ctx: &serenity::Context,
    db: &DatabaseConnection,
    guild_id: &str,
    channel_id: serenity::ChannelId,
    message: &serenity::Message,
    request_id: i64,
) -> Result<()> {
    let Some(stored) = request::get_request(db, guild_id, request_id).await? else {
        return Ok(());
    };

    let edit = if stored.status == RequestStatus::Pending {
        let availability =
            request::check_availability(db, guild_id, &stored.requested_items()?).await?;
        serenity::EditMessage::new()
            .embed(embeds::request_announcement_embed(&stored, &availability))
            .components(vec![embeds::request_buttons(stored.id)])
    } else {
        // Resolved through a slash command; the announcement still has buttons
        serenity::EditMessage::new()
            .embed(embeds::request_resolved_embed(&stored))
            .components(Vec::new())
    };

    channel_id.edit_message(&ctx.http, message.id, edit).await?;
    Ok(())
}

/// Extracts the request ID from a message's Approve button, identifying bot
/// announcements structurally.
fn announcement_request_id(message: &serenity::Message) -> Option<i64> {
    message
        .components
        .iter()
        .flat_map(|row| &row.components)
        .find_map(|component| match component {
            serenity::ActionRowComponent::Button(button) => match &button.data {
                serenity::ButtonKind::NonLink { custom_id, .. } => {
                    match RequestAction::parse(custom_id) {
                        Some(RequestAction::Approve(id)) => Some(id),
                        _ => None,
                    }
                }
                _ => None,
            },
            _ => None,
        })
}

fn parse_channel(channel_id: Option<&str>) -> Option<serenity::ChannelId> {
    channel_id
        .and_then(|id| id.parse::<u64>().ok())
        .map(serenity::ChannelId::new)
}
