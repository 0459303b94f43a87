//! Embed and button builders for the inventory display and request workflow.
//!
//! Everything here is pure rendering: builders take already-loaded models and
//! produce serenity types, so commands and interaction handlers share one
//! visual vocabulary.

use crate::{
    core::{
        inventory::InventorySummary,
        request::{Fulfillment, FulfillmentReport, ItemAvailability},
    },
    bot::handlers::interactions::RequestAction,
    entities::{RequestStatus, item, item_request},
};
use poise::serenity_prelude as serenity;

/// Inventory display color (blue)
const INVENTORY_COLOR: u32 = 0x0034_98DB;
/// Pending request color (gold)
const PENDING_COLOR: u32 = 0x00F1_C40F;
/// Approved request color (green)
const APPROVED_COLOR: u32 = 0x002E_CC71;
/// Denied request color (red)
const DENIED_COLOR: u32 = 0x00E7_4C3C;

/// Maximum item lines rendered per stock section before eliding.
const SECTION_LINE_LIMIT: usize = 10;

fn section_value(items: &[item::Model]) -> String {
    let mut lines: Vec<String> = items
        .iter()
        .take(SECTION_LINE_LIMIT)
        .map(|item| match &item.description {
            Some(desc) => format!("• **{}**: {} — {desc}", item.name, item.quantity),
            None => format!("• **{}**: {}", item.name, item.quantity),
        })
        .collect();
    if items.len() > SECTION_LINE_LIMIT {
        lines.push(format!("…and {} more", items.len() - SECTION_LINE_LIMIT));
    }
    lines.join("\n")
}

/// Builds the persistent inventory display embed.
#[must_use]
pub fn inventory_embed(summary: &InventorySummary) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::default()
        .title("📦 Guild Inventory")
        .color(INVENTORY_COLOR)
        .timestamp(serenity::Timestamp::now());

    if summary.is_empty() {
        return embed.description(
            "No items stocked yet. Admins can add some with `/admin add_item`.",
        );
    }

    embed = embed.description("Request materials with `/request`.");
    if !summary.available.is_empty() {
        embed = embed.field("✅ Available", section_value(&summary.available), false);
    }
    if !summary.low_stock.is_empty() {
        embed = embed.field("⚠️ Low Stock", section_value(&summary.low_stock), false);
    }
    if !summary.out_of_stock.is_empty() {
        embed = embed.field("❌ Out of Stock", section_value(&summary.out_of_stock), false);
    }
    embed
}

fn availability_line(availability: &ItemAvailability) -> String {
    match availability.in_stock {
        None => format!(
            "• **{}** x{} — ⚠️ no longer stocked",
            availability.name, availability.requested
        ),
        Some(stock) if stock >= availability.requested => format!(
            "• **{}** x{} — {stock} in stock",
            availability.name, availability.requested
        ),
        Some(stock) => format!(
            "• **{}** x{} — ⚠️ only {stock} in stock",
            availability.name, availability.requested
        ),
    }
}

/// Builds the announcement embed for a pending request, including the current
/// stock standing of each requested item.
#[must_use]
pub fn request_announcement_embed(
    request: &item_request::Model,
    availability: &[ItemAvailability],
) -> serenity::CreateEmbed {
    let lines: Vec<String> = availability.iter().map(availability_line).collect();

    serenity::CreateEmbed::default()
        .title(format!("📋 Material Request #{}", request.id))
        .color(PENDING_COLOR)
        .description(format!(
            "<@{}> ({}) requested <t:{}:R>:\n\n{}",
            request.user_id,
            request.user_name,
            request.created_at.timestamp(),
            lines.join("\n")
        ))
}

fn fulfillment_line(report: &FulfillmentReport) -> String {
    match report.outcome {
        Fulfillment::Full { remaining } => format!(
            "• **{}** x{} — fulfilled ({remaining} left in stock)",
            report.name, report.requested
        ),
        Fulfillment::Partial { removed, .. } => format!(
            "• **{}** — ⚠️ only {removed} of {} available",
            report.name, report.requested
        ),
        Fulfillment::NotFound => format!(
            "• **{}** x{} — ⚠️ no longer stocked",
            report.name, report.requested
        ),
    }
}

/// Builds the embed for a freshly approved request, detailing per-item
/// fulfillment.
#[must_use]
pub fn request_approved_embed(
    request: &item_request::Model,
    reports: &[FulfillmentReport],
) -> serenity::CreateEmbed {
    let lines: Vec<String> = reports.iter().map(fulfillment_line).collect();

    serenity::CreateEmbed::default()
        .title(format!("✅ Request #{} Approved", request.id))
        .color(APPROVED_COLOR)
        .description(format!(
            "Request by <@{}> ({}) was approved:\n\n{}",
            request.user_id,
            request.user_name,
            lines.join("\n")
        ))
}

/// Builds the embed for a denied request.
#[must_use]
pub fn request_denied_embed(
    request: &item_request::Model,
    reason: Option<&str>,
) -> serenity::CreateEmbed {
    let items = requested_items_summary(request);
    let reason_line = match reason {
        Some(reason) if !reason.trim().is_empty() => format!("**Reason:** {}", reason.trim()),
        _ => "No reason given.".to_string(),
    };

    serenity::CreateEmbed::default()
        .title(format!("❌ Request #{} Denied", request.id))
        .color(DENIED_COLOR)
        .description(format!(
            "Request by <@{}> ({}) for {items} was denied.\n\n{reason_line}",
            request.user_id, request.user_name
        ))
}

/// Builds a terminal embed for an already-resolved request, used when the
/// per-item fulfillment detail is no longer at hand.
#[must_use]
pub fn request_resolved_embed(request: &item_request::Model) -> serenity::CreateEmbed {
    let (title, color) = match request.status {
        RequestStatus::Approved => (format!("✅ Request #{} Approved", request.id), APPROVED_COLOR),
        RequestStatus::Denied => (format!("❌ Request #{} Denied", request.id), DENIED_COLOR),
        RequestStatus::Pending => (format!("📋 Material Request #{}", request.id), PENDING_COLOR),
    };

    serenity::CreateEmbed::default()
        .title(title)
        .color(color)
        .description(format!(
            "Request by <@{}> ({}) for {}.",
            request.user_id,
            request.user_name,
            requested_items_summary(request)
        ))
}

/// Builds the Approve/Deny button row attached to a pending announcement.
#[must_use]
pub fn request_buttons(request_id: i64) -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(RequestAction::Approve(request_id).custom_id())
            .label("Approve")
            .style(serenity::ButtonStyle::Success),
        serenity::CreateButton::new(RequestAction::Deny(request_id).custom_id())
            .label("Deny")
            .style(serenity::ButtonStyle::Danger),
    ])
}

/// Formats one request as a single listing line for `/my_requests` and
/// `/admin requests`.
#[must_use]
pub fn format_request_line(request: &item_request::Model) -> String {
    let status = match request.status {
        RequestStatus::Pending => "🕐 pending",
        RequestStatus::Approved => "✅ approved",
        RequestStatus::Denied => "❌ denied",
    };
    format!(
        "**#{}** {status} — {} — by {} <t:{}:R>",
        request.id,
        requested_items_summary(request),
        request.user_name,
        request.created_at.timestamp()
    )
}

/// Renders the stored item map as `Name x N, ...`, falling back to the raw
/// column value if the JSON is unreadable.
fn requested_items_summary(request: &item_request::Model) -> String {
    request.requested_items().map_or_else(
        |_| request.items.clone(),
        |items| {
            items
                .iter()
                .map(|(name, quantity)| format!("**{name}** x{quantity}"))
                .collect::<Vec<_>>()
                .join(", ")
        },
    )
}
