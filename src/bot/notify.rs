//! Best-effort direct-message notifications to requesters.
//!
//! Many users block DMs from server bots; a failed delivery must never fail
//! the approval or denial that triggered it, so failures are logged and
//! swallowed here.

use poise::serenity_prelude as serenity;
use tracing::warn;

/// DMs the requester with the outcome embed. Never fails the caller.
pub async fn notify_requester(
    ctx: &serenity::Context,
    user_id: &str,
    embed: serenity::CreateEmbed,
) {
    let Ok(id) = user_id.parse::<u64>() else {
        warn!(user_id, "stored requester ID is not a valid snowflake");
        return;
    };

    let user = match serenity::UserId::new(id).to_user(&ctx.http).await {
        Ok(user) => user,
        Err(err) => {
            warn!(user_id, "could not resolve requester for DM: {err}");
            return;
        }
    };

    if let Err(err) = user
        .direct_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        warn!(user_id, "could not DM requester (DMs likely closed): {err}");
    }
}
