//! Inventory ledger - Handles all item quantity operations for a guild.
//!
//! Enforces the stock invariants: quantities are never negative (removals
//! clamp at zero) and item names are unique per guild. Also produces the
//! categorized stock view used by the inventory display.

use crate::{
    entities::{Item, item},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, QueryOrder, Set, SqlErr, prelude::*};

/// Items at or above this quantity count as available; below it, low stock.
/// Fixed policy constant, not configurable.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Display category an item falls into based on its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// Quantity at or above [`LOW_STOCK_THRESHOLD`]
    Available,
    /// Quantity between 1 and [`LOW_STOCK_THRESHOLD`] - 1
    LowStock,
    /// Quantity of exactly zero
    OutOfStock,
}

impl StockLevel {
    /// Categorizes a quantity.
    #[must_use]
    pub const fn of(quantity: i64) -> Self {
        if quantity == 0 {
            Self::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::Available
        }
    }
}

/// A guild's items partitioned by stock level, each bucket ordered by name.
#[derive(Debug, Default)]
pub struct InventorySummary {
    /// Items with healthy stock
    pub available: Vec<item::Model>,
    /// Items running low
    pub low_stock: Vec<item::Model>,
    /// Items with nothing left
    pub out_of_stock: Vec<item::Model>,
}

impl InventorySummary {
    /// True when the guild stocks no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.available.is_empty() && self.low_stock.is_empty() && self.out_of_stock.is_empty()
    }
}

/// Outcome of a clamped removal: callers must not assume full fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// Amount the caller asked to remove
    pub requested: i64,
    /// Amount actually removed (`min(requested, stock)`)
    pub removed: i64,
    /// Stock remaining after the removal
    pub remaining: i64,
}

impl RemovalOutcome {
    /// True when the full requested amount was removed.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.removed == self.requested
    }
}

/// Retrieves all items for a guild, ordered alphabetically by name.
pub async fn get_all_items(db: &DatabaseConnection, guild_id: &str) -> Result<Vec<item::Model>> {
    Item::find()
        .filter(item::Column::GuildId.eq(guild_id))
        .order_by_asc(item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an item by its exact stored name, returning None if not found.
///
/// Name matching here is case-sensitive; case-insensitive resolution happens
/// only at the request validation boundary.
pub async fn get_item<C>(db: &C, guild_id: &str, name: &str) -> Result<Option<item::Model>>
where
    C: ConnectionTrait,
{
    Item::find()
        .filter(item::Column::GuildId.eq(guild_id))
        .filter(item::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new inventory item.
///
/// Validates that the trimmed name is non-empty and the initial quantity is
/// non-negative. A duplicate `(guild_id, name)` pair is an integrity conflict,
/// not a fault: it surfaces as [`Error::DuplicateItem`] and the existing row
/// is left unchanged.
pub async fn create_item(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    quantity: i64,
    description: Option<String>,
) -> Result<item::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Item name cannot be empty".to_string(),
        });
    }
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let item = item::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        name: Set(name.to_string()),
        quantity: Set(quantity),
        description: Set(description),
        ..Default::default()
    };

    match item.insert(db).await {
        Ok(model) => Ok(model),
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(Error::DuplicateItem {
                name: name.to_string(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Sets an item's quantity to an absolute non-negative value.
pub async fn set_quantity(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    quantity: i64,
) -> Result<()> {
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let result = Item::update_many()
        .col_expr(item::Column::Quantity, Expr::value(quantity))
        .filter(item::Column::GuildId.eq(guild_id))
        .filter(item::Column::Name.eq(name))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ItemNotFound {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Atomically adds a positive amount to an item's quantity.
///
/// Uses a single `UPDATE items SET quantity = quantity + ?` statement so
/// concurrent additions cannot lose updates.
pub async fn add_quantity(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    amount: i64,
) -> Result<()> {
    if amount <= 0 {
        return Err(Error::InvalidQuantity { quantity: amount });
    }

    let result = Item::update_many()
        .col_expr(
            item::Column::Quantity,
            Expr::col(item::Column::Quantity).add(amount),
        )
        .filter(item::Column::GuildId.eq(guild_id))
        .filter(item::Column::Name.eq(name))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ItemNotFound {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Removes up to `amount` units from an item, clamping the floor at zero.
///
/// Reports the amount actually removed versus requested; a shortfall is not
/// an error. For multi-step workflows (request approval) pass the enclosing
/// database transaction so the read and write commit together.
pub async fn remove_quantity<C>(
    db: &C,
    guild_id: &str,
    name: &str,
    amount: i64,
) -> Result<RemovalOutcome>
where
    C: ConnectionTrait,
{
    if amount < 0 {
        return Err(Error::InvalidQuantity { quantity: amount });
    }

    let item = get_item(db, guild_id, name)
        .await?
        .ok_or_else(|| Error::ItemNotFound {
            name: name.to_string(),
        })?;

    let removed = amount.min(item.quantity);
    let remaining = item.quantity - removed;

    let mut active: item::ActiveModel = item.into();
    active.quantity = Set(remaining);
    active.update(db).await?;

    Ok(RemovalOutcome {
        requested: amount,
        removed,
        remaining,
    })
}

/// Deletes an item from the inventory entirely.
pub async fn delete_item(db: &DatabaseConnection, guild_id: &str, name: &str) -> Result<()> {
    let result = Item::delete_many()
        .filter(item::Column::GuildId.eq(guild_id))
        .filter(item::Column::Name.eq(name))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ItemNotFound {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Partitions a guild's items into available / low-stock / out-of-stock
/// buckets for display.
pub async fn build_inventory_summary(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<InventorySummary> {
    let mut summary = InventorySummary::default();
    for item in get_all_items(db, guild_id).await? {
        match StockLevel::of(item.quantity) {
            StockLevel::Available => summary.available.push(item),
            StockLevel::LowStock => summary.low_stock.push(item),
            StockLevel::OutOfStock => summary.out_of_stock.push(item),
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_stock_level_boundaries() {
        assert_eq!(StockLevel::of(0), StockLevel::OutOfStock);
        assert_eq!(StockLevel::of(1), StockLevel::LowStock);
        assert_eq!(StockLevel::of(9), StockLevel::LowStock);
        assert_eq!(StockLevel::of(10), StockLevel::Available);
        assert_eq!(StockLevel::of(1_000_000), StockLevel::Available);
    }

    #[tokio::test]
    async fn test_create_item_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_item(&db, TEST_GUILD, "", 0, None).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result = create_item(&db, TEST_GUILD, "   ", 0, None).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result = create_item(&db, TEST_GUILD, "Iron Ore", -5, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidQuantity { quantity: -5 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_item_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let item = create_item(
            &db,
            TEST_GUILD,
            "  Iron Ore  ",
            100,
            Some("smelting material".to_string()),
        )
        .await?;

        assert_eq!(item.name, "Iron Ore"); // trimmed
        assert_eq!(item.quantity, 100);
        assert_eq!(item.description.as_deref(), Some("smelting material"));
        assert_eq!(item.guild_id, TEST_GUILD);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_item_rejected_first_unchanged() -> Result<()> {
        let db = setup_test_db().await?;

        create_item(&db, TEST_GUILD, "Iron Ore", 100, None).await?;
        let result = create_item(&db, TEST_GUILD, "Iron Ore", 5, None).await;
        assert!(matches!(result.unwrap_err(), Error::DuplicateItem { .. }));

        // First item's quantity unchanged
        let item = get_item(&db, TEST_GUILD, "Iron Ore").await?.unwrap();
        assert_eq!(item.quantity, 100);

        Ok(())
    }

    #[tokio::test]
    async fn test_same_name_allowed_across_guilds() -> Result<()> {
        let db = setup_test_db().await?;

        create_item(&db, "guild_a", "Iron Ore", 10, None).await?;
        create_item(&db, "guild_b", "Iron Ore", 20, None).await?;

        assert_eq!(
            get_item(&db, "guild_a", "Iron Ore").await?.unwrap().quantity,
            10
        );
        assert_eq!(
            get_item(&db, "guild_b", "Iron Ore").await?.unwrap().quantity,
            20
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_items_ordered() -> Result<()> {
        let db = setup_test_db().await?;

        create_item(&db, TEST_GUILD, "Copper Ore", 5, None).await?;
        create_item(&db, TEST_GUILD, "Arcanite Bar", 2, None).await?;
        create_item(&db, TEST_GUILD, "Iron Ore", 50, None).await?;

        let items = get_all_items(&db, TEST_GUILD).await?;
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Arcanite Bar", "Copper Ore", "Iron Ore"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_quantity() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        set_quantity(&db, TEST_GUILD, "Iron Ore", 42).await?;
        assert_eq!(
            get_item(&db, TEST_GUILD, "Iron Ore").await?.unwrap().quantity,
            42
        );

        let result = set_quantity(&db, TEST_GUILD, "Iron Ore", -1).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidQuantity { .. }));

        let result = set_quantity(&db, TEST_GUILD, "Missing", 1).await;
        assert!(matches!(result.unwrap_err(), Error::ItemNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_quantity() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        add_quantity(&db, TEST_GUILD, "Iron Ore", 25).await?;
        assert_eq!(
            get_item(&db, TEST_GUILD, "Iron Ore").await?.unwrap().quantity,
            125
        );

        // Non-positive amounts would let stock go negative through the back door
        let result = add_quantity(&db, TEST_GUILD, "Iron Ore", 0).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidQuantity { .. }));
        let result = add_quantity(&db, TEST_GUILD, "Iron Ore", -10).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidQuantity { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_quantity_clamps_at_zero() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        // Removing more than stocked removes only what exists
        let outcome = remove_quantity(&db, TEST_GUILD, "Iron Ore", 150).await?;
        assert_eq!(outcome.requested, 150);
        assert_eq!(outcome.removed, 100);
        assert_eq!(outcome.remaining, 0);
        assert!(!outcome.is_full());

        // Never negative, even when already empty
        let outcome = remove_quantity(&db, TEST_GUILD, "Iron Ore", 7).await?;
        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.remaining, 0);

        assert_eq!(
            get_item(&db, TEST_GUILD, "Iron Ore").await?.unwrap().quantity,
            0
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_quantity_full_fulfillment() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        let outcome = remove_quantity(&db, TEST_GUILD, "Iron Ore", 40).await?;
        assert_eq!(outcome.removed, 40);
        assert_eq!(outcome.remaining, 60);
        assert!(outcome.is_full());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_item() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "Iron Ore", 100).await?;

        delete_item(&db, TEST_GUILD, "Iron Ore").await?;
        assert!(get_item(&db, TEST_GUILD, "Iron Ore").await?.is_none());

        let result = delete_item(&db, TEST_GUILD, "Iron Ore").await;
        assert!(matches!(result.unwrap_err(), Error::ItemNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_inventory_summary_partition() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_item(&db, "Iron Ore", 50).await?;
        create_test_item(&db, "Copper Ore", 9).await?;
        create_test_item(&db, "Arcanite Bar", 0).await?;

        let summary = build_inventory_summary(&db, TEST_GUILD).await?;
        assert_eq!(summary.available.len(), 1);
        assert_eq!(summary.available[0].name, "Iron Ore");
        assert_eq!(summary.low_stock.len(), 1);
        assert_eq!(summary.low_stock[0].name, "Copper Ore");
        assert_eq!(summary.out_of_stock.len(), 1);
        assert_eq!(summary.out_of_stock[0].name, "Arcanite Bar");
        assert!(!summary.is_empty());

        let empty = build_inventory_summary(&db, "other_guild").await?;
        assert!(empty.is_empty());

        Ok(())
    }
}
