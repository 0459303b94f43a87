//! Member-facing commands - browsing stock and requesting materials.
//!
//! These commands are open to every guild member; administration and request
//! resolution live in the `admin` command group.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, embeds, notify},
        core::{guild, inventory, request},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Shows the guild's current inventory, grouped by stock level.
    #[poise::command(slash_command, guild_only)]
    pub async fn inventory(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };

        let summary = inventory::build_inventory_summary(db, &guild_id.to_string()).await?;
        ctx.send(poise::CreateReply::default().embed(embeds::inventory_embed(&summary)))
            .await?;
        Ok(())
    }

    /// Requests crafting materials from the guild bank.
    ///
    /// Accepts a comma-separated list in any of three formats: `Iron Ore: 50`,
    /// `Iron Ore x50`, or `Iron Ore 50`. Item names are matched against the
    /// inventory case-insensitively; a single unknown name rejects the whole
    /// request so typos never create half-valid requests.
    #[poise::command(slash_command, guild_only)]
    pub async fn request(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Items to request, e.g. `Iron Ore: 50, Heavy Leather x20`"] items: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();

        let created = match request::create_request(
            db,
            &guild_id,
            &ctx.author().id.to_string(),
            &ctx.author().name,
            &items,
        )
        .await
        {
            Ok(created) => created,
            Err(err @ (Error::UnknownItems { .. } | Error::EmptyRequest)) => {
                ctx.send(
                    poise::CreateReply::default()
                        .content(format!(
                            "❌ {err}\nCheck `/inventory` for what is stocked, and format \
                             entries like `Iron Ore: 50, Heavy Leather x20`."
                        ))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let availability =
            request::check_availability(db, &guild_id, &created.requested_items()?).await?;

        // Announce in the configured inventory channel so admins see it, or
        // right here if the guild has not run setup yet.
        let config = guild::get_guild_config(db, &guild_id).await?;
        let announce_channel = config
            .and_then(|c| c.inventory_channel_id)
            .and_then(|id| id.parse::<u64>().ok())
            .map_or_else(|| ctx.channel_id(), serenity::ChannelId::new);

        let announcement = embeds::request_announcement_embed(&created, &availability);
        announce_channel
            .send_message(
                ctx.serenity_context(),
                serenity::CreateMessage::new()
                    .embed(announcement.clone())
                    .components(vec![embeds::request_buttons(created.id)]),
            )
            .await?;

        ctx.send(
            poise::CreateReply::default()
                .content(format!(
                    "✅ Request **#{}** submitted. You'll get a DM when it is resolved.",
                    created.id
                ))
                .ephemeral(true),
        )
        .await?;

        // Confirmation copy for the requester's own records
        notify::notify_requester(ctx.serenity_context(), &created.user_id, announcement).await;
        Ok(())
    }

    /// Shows your own requests and their current status.
    #[poise::command(slash_command, guild_only)]
    pub async fn my_requests(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };

        let mut requests = request::get_requests_for_user(
            db,
            &guild_id.to_string(),
            &ctx.author().id.to_string(),
        )
        .await?;

        if requests.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content("You have no requests yet. Submit one with `/request`.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        // Most recent first, capped to keep the reply readable
        requests.reverse();
        let lines: Vec<String> = requests
            .iter()
            .take(10)
            .map(embeds::format_request_line)
            .collect();

        ctx.send(
            poise::CreateReply::default()
                .content(format!("📋 **Your Requests**\n\n{}", lines.join("\n")))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
