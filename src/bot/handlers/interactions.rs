//! Button and modal handlers for the request approval workflow.
//!
//! Every actionable component carries a [`RequestAction`] encoded in its
//! custom ID, so the request being acted on is identified by ID alone and
//! never recovered by parsing rendered message text. Authorization is checked
//! here on every click, independently of who could see the button.

use crate::{
    bot::{BotData, display, embeds, handlers::permissions, notify},
    core::request,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// An action encoded into a component or modal custom ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    /// Approve button on a request announcement
    Approve(i64),
    /// Deny button on a request announcement; opens the reason modal
    Deny(i64),
    /// Denial-reason modal submission
    SubmitDenial(i64),
}

impl RequestAction {
    /// Encodes this action as a component custom ID.
    #[must_use]
    pub fn custom_id(self) -> String {
        match self {
            Self::Approve(id) => format!("request_approve:{id}"),
            Self::Deny(id) => format!("request_deny:{id}"),
            Self::SubmitDenial(id) => format!("request_denial:{id}"),
        }
    }

    /// Decodes a custom ID, returning None for components this bot does not
    /// own.
    #[must_use]
    pub fn parse(custom_id: &str) -> Option<Self> {
        let (prefix, id) = custom_id.split_once(':')?;
        let id: i64 = id.parse().ok()?;
        match prefix {
            "request_approve" => Some(Self::Approve(id)),
            "request_deny" => Some(Self::Deny(id)),
            "request_denial" => Some(Self::SubmitDenial(id)),
            _ => None,
        }
    }
}

/// Routes gateway events to the interaction handlers.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Connected as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::InteractionCreate { interaction } => match interaction {
            serenity::Interaction::Component(component) => {
                handle_component(ctx, data, component).await?;
            }
            serenity::Interaction::Modal(modal) => {
                handle_modal(ctx, data, modal).await?;
            }
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

async fn handle_component(
    ctx: &serenity::Context,
    data: &BotData,
    component: &serenity::ComponentInteraction,
) -> Result<()> {
    let Some(action) = RequestAction::parse(&component.data.custom_id) else {
        return Ok(());
    };
    let Some(guild_id) = component.guild_id else {
        return Ok(());
    };
    let guild_id = guild_id.to_string();
    let db = &data.database;

    let permissions = component.member.as_ref().and_then(|m| m.permissions);
    let role_ids = component
        .member
        .as_ref()
        .map(|m| m.roles.clone())
        .unwrap_or_default();
    if !permissions::member_is_inventory_admin(db, &guild_id, permissions, &role_ids).await? {
        respond_ephemeral(
            ctx,
            component,
            "❌ Only inventory admins can resolve requests.",
        )
        .await?;
        return Ok(());
    }

    match action {
        RequestAction::Approve(request_id) => {
            match request::approve_request(db, &guild_id, request_id).await {
                Ok((approved, reports)) => {
                    info!(
                        request_id,
                        admin = %component.user.id,
                        "request approved via button"
                    );
                    let embed = embeds::request_approved_embed(&approved, &reports);
                    component
                        .create_response(
                            &ctx.http,
                            serenity::CreateInteractionResponse::UpdateMessage(
                                serenity::CreateInteractionResponseMessage::new()
                                    .embed(embed.clone())
                                    .components(Vec::new()),
                            ),
                        )
                        .await?;
                    display::sync_guild_displays(ctx, db, &guild_id).await?;
                    notify::notify_requester(ctx, &approved.user_id, embed).await;
                }
                Err(err) => resolve_failure(ctx, db, component, &guild_id, request_id, err).await?,
            }
        }
        RequestAction::Deny(request_id) => {
            let modal = serenity::CreateModal::new(
                RequestAction::SubmitDenial(request_id).custom_id(),
                format!("Deny Request #{request_id}"),
            )
            .components(vec![serenity::CreateActionRow::InputText(
                serenity::CreateInputText::new(
                    serenity::InputTextStyle::Paragraph,
                    "Reason (optional)",
                    "denial_reason",
                )
                .placeholder("Why is this request being denied?")
                .max_length(500)
                .required(false),
            )]);
            component
                .create_response(&ctx.http, serenity::CreateInteractionResponse::Modal(modal))
                .await?;
        }
        // Modal submissions arrive as Interaction::Modal, never as a button
        RequestAction::SubmitDenial(_) => {}
    }
    Ok(())
}

async fn handle_modal(
    ctx: &serenity::Context,
    data: &BotData,
    modal: &serenity::ModalInteraction,
) -> Result<()> {
    let Some(RequestAction::SubmitDenial(request_id)) = RequestAction::parse(&modal.data.custom_id)
    else {
        return Ok(());
    };
    let Some(guild_id) = modal.guild_id else {
        return Ok(());
    };
    let guild_id = guild_id.to_string();
    let db = &data.database;

    let permissions = modal.member.as_ref().and_then(|m| m.permissions);
    let role_ids = modal
        .member
        .as_ref()
        .map(|m| m.roles.clone())
        .unwrap_or_default();
    if !permissions::member_is_inventory_admin(db, &guild_id, permissions, &role_ids).await? {
        modal
            .create_response(
                &ctx.http,
                serenity::CreateInteractionResponse::Message(
                    serenity::CreateInteractionResponseMessage::new()
                        .content("❌ Only inventory admins can resolve requests.")
                        .ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    }

    let reason = extract_denial_reason(modal);

    match request::deny_request(db, &guild_id, request_id).await {
        Ok(denied) => {
            info!(request_id, admin = %modal.user.id, "request denied via modal");
            let embed = embeds::request_denied_embed(&denied, reason.as_deref());
            modal
                .create_response(
                    &ctx.http,
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .embed(embed.clone())
                            .components(Vec::new()),
                    ),
                )
                .await?;
            display::sync_guild_displays(ctx, db, &guild_id).await?;
            notify::notify_requester(ctx, &denied.user_id, embed).await;
        }
        Err(
            err @ (Error::RequestNotFound { .. } | Error::RequestAlreadyResolved { .. }),
        ) => {
            debug!(request_id, "denial modal hit a stale request: {err}");
            modal
                .create_response(
                    &ctx.http,
                    serenity::CreateInteractionResponse::Message(
                        serenity::CreateInteractionResponseMessage::new()
                            .content(format!("❌ {err}"))
                            .ephemeral(true),
                    ),
                )
                .await?;
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

/// Handles approve-button failures: stale buttons on an already-resolved
/// request rewrite the announcement to its terminal state, everything else
/// surfaces as an ephemeral error.
async fn resolve_failure(
    ctx: &serenity::Context,
    db: &sea_orm::DatabaseConnection,
    component: &serenity::ComponentInteraction,
    guild_id: &str,
    request_id: i64,
    err: Error,
) -> Result<()> {
    match err {
        Error::RequestAlreadyResolved { .. } => {
            debug!(request_id, "stale approve button: {err}");
            if let Some(request) = request::get_request(db, guild_id, request_id).await? {
                component
                    .create_response(
                        &ctx.http,
                        serenity::CreateInteractionResponse::UpdateMessage(
                            serenity::CreateInteractionResponseMessage::new()
                                .embed(embeds::request_resolved_embed(&request))
                                .components(Vec::new()),
                        ),
                    )
                    .await?;
                component
                    .create_followup(
                        &ctx.http,
                        serenity::CreateInteractionResponseFollowup::new()
                            .content(format!("❌ {err}"))
                            .ephemeral(true),
                    )
                    .await?;
            } else {
                respond_ephemeral(ctx, component, &format!("❌ {err}")).await?;
            }
            Ok(())
        }
        Error::RequestNotFound { .. } => {
            respond_ephemeral(ctx, component, &format!("❌ {err}")).await
        }
        err => Err(err),
    }
}

async fn respond_ephemeral(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    content: &str,
) -> Result<()> {
    component
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}

/// Pulls the optional denial reason out of the modal's text input.
fn extract_denial_reason(modal: &serenity::ModalInteraction) -> Option<String> {
    modal
        .data
        .components
        .iter()
        .flat_map(|row| &row.components)
        .find_map(|component| match component {
            serenity::ActionRowComponent::InputText(input) => input.value.clone(),
            _ => None,
        })
        .filter(|reason| !reason.trim().is_empty())
}
