//! Request lifecycle - create, validate, approve, and deny item requests.
//!
//! The state machine is `pending -> approved` or `pending -> denied`, both
//! terminal. Each transition runs inside a single database transaction that
//! spans the status read, the status write, and (for approvals) the ledger
//! mutation, so two concurrent approvals cannot both pass the pending check.

use crate::{
    core::{inventory, parser},
    entities::{ItemRequest, RequestStatus, item_request},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::BTreeMap;

/// How one requested item was fulfilled during approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fulfillment {
    /// The full requested amount was removed from stock
    Full {
        /// Stock remaining after removal
        remaining: i64,
    },
    /// Stock ran short; only part of the requested amount was removed
    Partial {
        /// Amount actually removed
        removed: i64,
        /// Stock remaining after removal (always zero for a shortfall)
        remaining: i64,
    },
    /// The item no longer exists in the inventory
    NotFound,
}

/// Per-item result of processing an approved request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentReport {
    /// Canonical item name
    pub name: String,
    /// Amount the request asked for
    pub requested: i64,
    /// What actually happened
    pub outcome: Fulfillment,
}

/// Current stock standing against one requested item, for announcement embeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAvailability {
    /// Canonical item name
    pub name: String,
    /// Amount requested
    pub requested: i64,
    /// Units currently stocked, or None if the item has since been removed
    pub in_stock: Option<i64>,
}

/// Matches parsed item names against the guild's inventory, case-insensitively,
/// and maps them to the canonical stored names.
///
/// Validation is all-or-nothing: any unmatched name rejects the whole request
/// with [`Error::UnknownItems`]; zero validated items rejects it with
/// [`Error::EmptyRequest`]. Nothing is persisted on rejection.
pub async fn validate_requested_items(
    db: &DatabaseConnection,
    guild_id: &str,
    requested: &BTreeMap<String, i64>,
) -> Result<BTreeMap<String, i64>> {
    if requested.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let canonical: BTreeMap<String, String> = inventory::get_all_items(db, guild_id)
        .await?
        .into_iter()
        .map(|item| (item.name.to_lowercase(), item.name))
        .collect();

    let mut validated = BTreeMap::new();
    let mut unknown = Vec::new();

    for (name, quantity) in requested {
        match canonical.get(&name.to_lowercase()) {
            Some(stored_name) => {
                validated.insert(stored_name.clone(), *quantity);
            }
            None => unknown.push(name.clone()),
        }
    }

    if !unknown.is_empty() {
        return Err(Error::UnknownItems { names: unknown });
    }
    if validated.is_empty() {
        return Err(Error::EmptyRequest);
    }
    Ok(validated)
}

/// Parses free-text item input, validates it against the guild's inventory,
/// and persists a new pending request.
pub async fn create_request(
    db: &DatabaseConnection,
    guild_id: &str,
    user_id: &str,
    user_name: &str,
    input_text: &str,
) -> Result<item_request::Model> {
    let parsed = parser::parse_item_input(input_text);
    let validated = validate_requested_items(db, guild_id, &parsed).await?;

    let request = item_request::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        user_id: Set(user_id.to_string()),
        user_name: Set(user_name.to_string()),
        items: Set(serde_json::to_string(&validated)?),
        status: Set(RequestStatus::Pending),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    request.insert(db).await.map_err(Into::into)
}

/// Retrieves a request by ID, scoped to the given guild.
pub async fn get_request(
    db: &DatabaseConnection,
    guild_id: &str,
    request_id: i64,
) -> Result<Option<item_request::Model>> {
    ItemRequest::find_by_id(request_id)
        .filter(item_request::Column::GuildId.eq(guild_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a guild's requests, optionally filtered by status, oldest first.
pub async fn get_requests(
    db: &DatabaseConnection,
    guild_id: &str,
    status: Option<RequestStatus>,
) -> Result<Vec<item_request::Model>> {
    let mut query = ItemRequest::find().filter(item_request::Column::GuildId.eq(guild_id));
    if let Some(status) = status {
        query = query.filter(item_request::Column::Status.eq(status));
    }
    query
        .order_by_asc(item_request::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one user's requests within a guild, oldest first.
pub async fn get_requests_for_user(
    db: &DatabaseConnection,
    guild_id: &str,
    user_id: &str,
) -> Result<Vec<item_request::Model>> {
    ItemRequest::find()
        .filter(item_request::Column::GuildId.eq(guild_id))
        .filter(item_request::Column::UserId.eq(user_id))
        .order_by_asc(item_request::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Approves a pending request and deducts its items from the ledger.
///
/// The whole sequence runs in one transaction: the pending check, the status
/// write, and every ledger mutation commit together. Fulfillment itself is
/// best effort per item - a missing item or a shortfall is reported in the
/// returned [`FulfillmentReport`]s, never rolls back the approval, and never
/// blocks the other items. Stock removal clamps at zero.
///
/// A request that is not pending fails with [`Error::RequestAlreadyResolved`]
/// and nothing is mutated.
pub async fn approve_request(
    db: &DatabaseConnection,
    guild_id: &str,
    request_id: i64,
) -> Result<(item_request::Model, Vec<FulfillmentReport>)> {
    let txn = db.begin().await?;

    let request = ItemRequest::find_by_id(request_id)
        .filter(item_request::Column::GuildId.eq(guild_id))
        .one(&txn)
        .await?
        .ok_or(Error::RequestNotFound { id: request_id })?;

    if request.status != RequestStatus::Pending {
        return Err(Error::RequestAlreadyResolved {
            id: request_id,
            status: request.status,
        });
    }

    let requested = request.requested_items()?;

    // Status write precedes the ledger mutation
    let mut active: item_request::ActiveModel = request.into();
    active.status = Set(RequestStatus::Approved);
    active.updated_at = Set(Some(chrono::Utc::now()));
    let updated = active.update(&txn).await?;

    let mut reports = Vec::with_capacity(requested.len());
    for (name, quantity) in requested {
        let outcome = match inventory::remove_quantity(&txn, guild_id, &name, quantity).await {
            Ok(removal) if removal.is_full() => Fulfillment::Full {
                remaining: removal.remaining,
            },
            Ok(removal) => Fulfillment::Partial {
                removed: removal.removed,
                remaining: removal.remaining,
            },
            Err(Error::ItemNotFound { .. }) => Fulfillment::NotFound,
            Err(err) => return Err(err),
        };
        reports.push(FulfillmentReport {
            name,
            requested: quantity,
            outcome,
        });
    }

    txn.commit().await?;
    Ok((updated, reports))
}

/// Denies a pending request. No ledger mutation occurs.
///
/// The denial reason, when given, travels with the notification surface only;
/// it is not persisted. A request that is not pending fails with
/// [`Error::RequestAlreadyResolved`] and nothing is mutated.
pub async fn deny_request(
    db: &DatabaseConnection,
    guild_id: &str,
    request_id: i64,
) -> Result<item_request::Model> {
    let txn = db.begin().await?;

    let request = ItemRequest::find_by_id(request_id)
        .filter(item_request::Column::GuildId.eq(guild_id))
        .one(&txn)
        .await?
        .ok_or(Error::RequestNotFound { id: request_id })?;

    if request.status != RequestStatus::Pending {
        return Err(Error::RequestAlreadyResolved {
            id: request_id,
            status: request.status,
        });
    }

    let mut active: item_request::ActiveModel = request.into();
    active.status = Set(RequestStatus::Denied);
    active.updated_at = Set(Some(chrono::Utc::now()));
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Checks current stock against each requested item, for announcement embeds.
pub async fn check_availability(
    db: &DatabaseConnection,
    guild_id: &str,
    requested: &BTreeMap<String, i64>,
) -> Result<Vec<ItemAvailability>> {
    let mut availability = Vec::with_capacity(requested.len());
    for (name, quantity) in requested {
        let in_stock = inventory::get_item(db, guild_id, name)
            .await?
            .map(|item| item.quantity);
        availability.push(ItemAvailability {
            name: name.clone(),
            requested: *quantity,
            in_stock,
        });
    }
    Ok(availability)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_request_persists_pending() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        let request =
            create_request(&db, TEST_GUILD, "user1", "Thrall", "Iron Ore: 50").await?;

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.user_name, "Thrall");
        assert!(request.updated_at.is_none());
        let items = request.requested_items()?;
        assert_eq!(items.get("Iron Ore"), Some(&50));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_request_matches_names_case_insensitively() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        let request =
            create_request(&db, TEST_GUILD, "user1", "Thrall", "iron ORE: 10").await?;

        // Canonical stored name, not the user's casing
        let items = request.requested_items()?;
        assert_eq!(items.get("Iron Ore"), Some(&10));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_item_rejects_whole_request() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        let result = create_request(
            &db,
            TEST_GUILD,
            "user1",
            "Thrall",
            "Iron Ore: 10, Mithril Bar: 5",
        )
        .await;

        match result.unwrap_err() {
            Error::UnknownItems { names } => assert_eq!(names, vec!["Mithril Bar"]),
            other => panic!("unexpected error: {other}"),
        }

        // All-or-nothing: no row persisted
        assert!(get_requests(&db, TEST_GUILD, None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_valid_items_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        let result = create_request(&db, TEST_GUILD, "user1", "Thrall", "garbage").await;
        assert!(matches!(result.unwrap_err(), Error::EmptyRequest));
        assert!(get_requests(&db, TEST_GUILD, None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_full_fulfillment() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;
        let request = create_test_request(&db, "user1", "Iron Ore: 40").await?;

        let (updated, reports) = approve_request(&db, TEST_GUILD, request.id).await?;

        assert_eq!(updated.status, RequestStatus::Approved);
        assert!(updated.updated_at.is_some());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "Iron Ore");
        assert_eq!(reports[0].outcome, Fulfillment::Full { remaining: 60 });

        let item = crate::core::inventory::get_item(&db, TEST_GUILD, "Iron Ore")
            .await?
            .unwrap();
        assert_eq!(item.quantity, 60);

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_partial_fulfillment_clamps_and_still_approves() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;
        let request = create_test_request(&db, "user1", "Iron Ore: 150").await?;

        let (updated, reports) = approve_request(&db, TEST_GUILD, request.id).await?;

        // Shortfall: 100 of 150 removed, stock clamped at zero, still approved
        assert_eq!(updated.status, RequestStatus::Approved);
        assert_eq!(
            reports[0].outcome,
            Fulfillment::Partial {
                removed: 100,
                remaining: 0,
            }
        );

        let item = crate::core::inventory::get_item(&db, TEST_GUILD, "Iron Ore")
            .await?
            .unwrap();
        assert_eq!(item.quantity, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_missing_item_does_not_block_others() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;
        create_test_item(&db, "Copper Ore", 30).await?;
        let request =
            create_test_request(&db, "user1", "Iron Ore: 10, Copper Ore: 5").await?;

        // Item deleted between request creation and approval
        crate::core::inventory::delete_item(&db, TEST_GUILD, "Copper Ore").await?;

        let (updated, reports) = approve_request(&db, TEST_GUILD, request.id).await?;
        assert_eq!(updated.status, RequestStatus::Approved);

        let copper = reports.iter().find(|r| r.name == "Copper Ore").unwrap();
        assert_eq!(copper.outcome, Fulfillment::NotFound);
        let iron = reports.iter().find(|r| r.name == "Iron Ore").unwrap();
        assert_eq!(iron.outcome, Fulfillment::Full { remaining: 90 });

        Ok(())
    }

    #[tokio::test]
    async fn test_status_is_monotonic() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;
        let request = create_test_request(&db, "user1", "Iron Ore: 10").await?;

        let (approved, _) = approve_request(&db, TEST_GUILD, request.id).await?;

        // Repeat approve fails with "already approved" and mutates nothing
        let result = approve_request(&db, TEST_GUILD, request.id).await;
        match result.unwrap_err() {
            Error::RequestAlreadyResolved { id, status } => {
                assert_eq!(id, request.id);
                assert_eq!(status, RequestStatus::Approved);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Deny after approve also fails
        let result = deny_request(&db, TEST_GUILD, request.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::RequestAlreadyResolved { .. }
        ));

        // Neither ledger nor timestamps moved
        let stored = get_request(&db, TEST_GUILD, request.id).await?.unwrap();
        assert_eq!(stored.status, RequestStatus::Approved);
        assert_eq!(stored.updated_at, approved.updated_at);
        let item = crate::core::inventory::get_item(&db, TEST_GUILD, "Iron Ore")
            .await?
            .unwrap();
        assert_eq!(item.quantity, 90);

        Ok(())
    }

    #[tokio::test]
    async fn test_deny_leaves_ledger_untouched() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;
        let request = create_test_request(&db, "user1", "Iron Ore: 40").await?;

        let denied = deny_request(&db, TEST_GUILD, request.id).await?;
        assert_eq!(denied.status, RequestStatus::Denied);
        assert!(denied.updated_at.is_some());

        let item = crate::core::inventory::get_item(&db, TEST_GUILD, "Iron Ore")
            .await?
            .unwrap();
        assert_eq!(item.quantity, 100);

        Ok(())
    }

    #[tokio::test]
    async fn test_request_not_found_and_wrong_guild() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;
        let request = create_test_request(&db, "user1", "Iron Ore: 10").await?;

        let result = approve_request(&db, TEST_GUILD, 999).await;
        assert!(matches!(result.unwrap_err(), Error::RequestNotFound { .. }));

        // A request belonging to another guild is invisible here
        let result = approve_request(&db, "other_guild", request.id).await;
        assert!(matches!(result.unwrap_err(), Error::RequestNotFound { .. }));

        let stored = get_request(&db, TEST_GUILD, request.id).await?.unwrap();
        assert_eq!(stored.status, RequestStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_requests_status_filter_and_order() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        let first = create_test_request(&db, "user1", "Iron Ore: 1").await?;
        let second = create_test_request(&db, "user2", "Iron Ore: 2").await?;
        deny_request(&db, TEST_GUILD, second.id).await?;

        let pending = get_requests(&db, TEST_GUILD, Some(RequestStatus::Pending)).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, first.id);

        let all = get_requests(&db, TEST_GUILD, None).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);

        let mine = get_requests_for_user(&db, TEST_GUILD, "user2").await?;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, second.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_check_availability() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 30).await?;

        let mut requested = BTreeMap::new();
        requested.insert("Iron Ore".to_string(), 50);
        requested.insert("Ghost Mushroom".to_string(), 5);

        let availability = check_availability(&db, TEST_GUILD, &requested).await?;
        assert_eq!(availability.len(), 2);

        let iron = availability.iter().find(|a| a.name == "Iron Ore").unwrap();
        assert_eq!(iron.in_stock, Some(30));
        let ghost = availability
            .iter()
            .find(|a| a.name == "Ghost Mushroom")
            .unwrap();
        assert_eq!(ghost.in_stock, None);

        Ok(())
    }
}
