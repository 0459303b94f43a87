//! Inventory administration commands - `/admin` and its subcommands.
//!
//! Every subcommand re-checks authorization against live member data before
//! touching state: the Administrator permission always qualifies, otherwise
//! one of the guild's configured admin roles is required.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, display, embeds,
            handlers::{autocomplete, permissions},
            notify,
        },
        core::{
            guild::{self, GuildConfigPatch},
            inventory,
            region::Region,
            request,
        },
        entities::RequestStatus,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Game-server region choices for `/admin setup`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum RegionChoice {
        #[name = "US - Pacific Time"]
        Us,
        #[name = "EU - Central European Time"]
        Eu,
        #[name = "OCE - Australian Eastern Time"]
        Oce,
    }

    impl From<RegionChoice> for Region {
        fn from(choice: RegionChoice) -> Self {
            match choice {
                RegionChoice::Us => Self::Us,
                RegionChoice::Eu => Self::Eu,
                RegionChoice::Oce => Self::Oce,
            }
        }
    }

    /// Status filter choices for `/admin requests`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StatusFilter {
        #[name = "pending"]
        Pending,
        #[name = "approved"]
        Approved,
        #[name = "denied"]
        Denied,
        #[name = "all"]
        All,
    }

    /// Replies with an ephemeral denial and returns false when the invoker
    /// may not manage the inventory.
    async fn ensure_admin(
        ctx: &poise::Context<'_, BotData, Error>,
        guild_id: &str,
    ) -> Result<bool> {
        let member = ctx.author_member().await;
        let member_permissions = member.as_ref().and_then(|m| m.permissions);
        let role_ids = member.as_ref().map(|m| m.roles.clone()).unwrap_or_default();

        let allowed = permissions::member_is_inventory_admin(
            &ctx.data().database,
            guild_id,
            member_permissions,
            &role_ids,
        )
        .await?;

        if !allowed {
            ctx.send(
                poise::CreateReply::default()
                    .content(
                        "❌ You need the Administrator permission or a configured \
                         inventory-admin role to do that.",
                    )
                    .ephemeral(true),
            )
            .await?;
        }
        Ok(allowed)
    }

    /// Replies ephemerally with a user-caused failure.
    async fn reply_user_error(
        ctx: &poise::Context<'_, BotData, Error>,
        err: &Error,
    ) -> Result<()> {
        ctx.send(
            poise::CreateReply::default()
                .content(format!("❌ {err}"))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Inventory administration.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands(
            "setup",
            "add_item",
            "set_quantity",
            "add_quantity",
            "remove_item",
            "requests",
            "approve",
            "deny"
        ),
        subcommand_required
    )]
    pub async fn admin(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Configures the inventory channel, admin role, and region for this guild.
    #[poise::command(slash_command, guild_only)]
    pub async fn setup(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Channel for the persistent inventory display"]
        #[channel_types("Text")]
        channel: serenity::GuildChannel,
        #[description = "Role allowed to manage the inventory (besides administrators)"]
        admin_role: Option<serenity::Role>,
        #[description = "Game-server region"] region: Option<RegionChoice>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();

        // Setup can change who counts as an admin, so it takes the Discord
        // Administrator permission specifically, not a configured role.
        let is_administrator = ctx
            .author_member()
            .await
            .and_then(|m| m.permissions)
            .is_some_and(|p| p.administrator());
        if !is_administrator {
            ctx.send(
                poise::CreateReply::default()
                    .content("❌ Setup requires the Administrator permission.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        let config = guild::update_guild_config(
            db,
            &guild_id,
            GuildConfigPatch {
                inventory_channel_id: Some(channel.id.to_string()),
                admin_role_ids: admin_role.as_ref().map(|role| vec![role.id.to_string()]),
                region: region.map(Into::into),
                ..Default::default()
            },
        )
        .await?;
        info!(guild_id, channel = %channel.id, "guild inventory configured");

        // Creates (or moves) the persistent display right away
        display::sync_inventory_display(ctx.serenity_context(), db, &guild_id).await?;

        let role_line = admin_role.map_or_else(
            || "administrators only".to_string(),
            |role| format!("<@&{}>", role.id),
        );
        ctx.send(
            poise::CreateReply::default().content(format!(
                "✅ Inventory display set to <#{}>. Admin role: {}. Region: {}.",
                channel.id,
                role_line,
                Region::from_stored(config.region.as_deref()).display_name()
            )),
        )
        .await?;
        Ok(())
    }

    /// Adds a new item to the inventory.
    #[poise::command(slash_command, guild_only)]
    pub async fn add_item(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name"] name: String,
        #[description = "Initial quantity"]
        #[min = 0]
        quantity: i64,
        #[description = "Short description shown on the display"] description: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();
        if !ensure_admin(&ctx, &guild_id).await? {
            return Ok(());
        }

        match inventory::create_item(db, &guild_id, &name, quantity, description).await {
            Ok(item) => {
                display::sync_guild_displays(ctx.serenity_context(), db, &guild_id).await?;
                ctx.say(format!("✅ Added **{}** x{}.", item.name, item.quantity))
                    .await?;
            }
            Err(
                err @ (Error::DuplicateItem { .. }
                | Error::InvalidQuantity { .. }
                | Error::Config { .. }),
            ) => reply_user_error(&ctx, &err).await?,
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Sets an item's quantity to an absolute value.
    #[poise::command(slash_command, guild_only)]
    pub async fn set_quantity(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        name: String,
        #[description = "New quantity"]
        #[min = 0]
        quantity: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();
        if !ensure_admin(&ctx, &guild_id).await? {
            return Ok(());
        }

        match inventory::set_quantity(db, &guild_id, &name, quantity).await {
            Ok(()) => {
                display::sync_guild_displays(ctx.serenity_context(), db, &guild_id).await?;
                ctx.say(format!("✅ **{name}** set to {quantity}.")).await?;
            }
            Err(err @ (Error::ItemNotFound { .. } | Error::InvalidQuantity { .. })) => {
                reply_user_error(&ctx, &err).await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Adds stock to an existing item.
    #[poise::command(slash_command, guild_only)]
    pub async fn add_quantity(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        name: String,
        #[description = "Amount to add"]
        #[min = 1]
        amount: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();
        if !ensure_admin(&ctx, &guild_id).await? {
            return Ok(());
        }

        match inventory::add_quantity(db, &guild_id, &name, amount).await {
            Ok(()) => {
                display::sync_guild_displays(ctx.serenity_context(), db, &guild_id).await?;
                ctx.say(format!("✅ Added {amount} to **{name}**.")).await?;
            }
            Err(err @ (Error::ItemNotFound { .. } | Error::InvalidQuantity { .. })) => {
                reply_user_error(&ctx, &err).await?;
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Removes an item from the inventory entirely.
    #[poise::command(slash_command, guild_only)]
    pub async fn remove_item(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name"]
        #[autocomplete = "autocomplete::autocomplete_item_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();
        if !ensure_admin(&ctx, &guild_id).await? {
            return Ok(());
        }

        match inventory::delete_item(db, &guild_id, &name).await {
            Ok(()) => {
                display::sync_guild_displays(ctx.serenity_context(), db, &guild_id).await?;
                ctx.say(format!("✅ Removed **{name}** from the inventory."))
                    .await?;
            }
            Err(err @ Error::ItemNotFound { .. }) => reply_user_error(&ctx, &err).await?,
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Lists requests, pending ones by default.
    #[poise::command(slash_command, guild_only)]
    pub async fn requests(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Which requests to show (default: pending)"] filter: Option<StatusFilter>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();
        if !ensure_admin(&ctx, &guild_id).await? {
            return Ok(());
        }

        let status = match filter.unwrap_or(StatusFilter::Pending) {
            StatusFilter::Pending => Some(RequestStatus::Pending),
            StatusFilter::Approved => Some(RequestStatus::Approved),
            StatusFilter::Denied => Some(RequestStatus::Denied),
            StatusFilter::All => None,
        };

        let listed = request::get_requests(db, &guild_id, status).await?;
        if listed.is_empty() {
            ctx.send(
                poise::CreateReply::default()
                    .content("No matching requests.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        let lines: Vec<String> = listed
            .iter()
            .take(20)
            .map(embeds::format_request_line)
            .collect();
        ctx.send(
            poise::CreateReply::default()
                .content(format!("📋 **Requests**\n\n{}", lines.join("\n")))
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Approves a request by ID, deducting its items from stock.
    #[poise::command(slash_command, guild_only)]
    pub async fn approve(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Request ID"]
        #[min = 1]
        request_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();
        if !ensure_admin(&ctx, &guild_id).await? {
            return Ok(());
        }

        match request::approve_request(db, &guild_id, request_id).await {
            Ok((approved, reports)) => {
                info!(request_id, admin = %ctx.author().id, "request approved via command");
                let embed = embeds::request_approved_embed(&approved, &reports);
                ctx.send(poise::CreateReply::default().embed(embed.clone()))
                    .await?;
                display::sync_guild_displays(ctx.serenity_context(), db, &guild_id).await?;
                notify::notify_requester(ctx.serenity_context(), &approved.user_id, embed).await;
            }
            Err(
                err @ (Error::RequestNotFound { .. } | Error::RequestAlreadyResolved { .. }),
            ) => reply_user_error(&ctx, &err).await?,
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Denies a request by ID with an optional reason.
    #[poise::command(slash_command, guild_only)]
    pub async fn deny(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Request ID"]
        #[min = 1]
        request_id: i64,
        #[description = "Reason passed on to the requester"] reason: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let guild_id = guild_id.to_string();
        if !ensure_admin(&ctx, &guild_id).await? {
            return Ok(());
        }

        match request::deny_request(db, &guild_id, request_id).await {
            Ok(denied) => {
                info!(request_id, admin = %ctx.author().id, "request denied via command");
                let embed = embeds::request_denied_embed(&denied, reason.as_deref());
                ctx.send(poise::CreateReply::default().embed(embed.clone()))
                    .await?;
                display::sync_guild_displays(ctx.serenity_context(), db, &guild_id).await?;
                notify::notify_requester(ctx.serenity_context(), &denied.user_id, embed).await;
            }
            Err(
                err @ (Error::RequestNotFound { .. } | Error::RequestAlreadyResolved { .. }),
            ) => reply_user_error(&ctx, &err).await?,
            Err(err) => return Err(err),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
