//! Database connection and schema creation using `SeaORM`.
//!
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without hand-written SQL. The one piece the
//! entity derives cannot express is the composite uniqueness of
//! `items(guild_id, name)`, which is added as a unique index afterwards.

use crate::entities::{GuildConfig, Item, ItemRequest, item};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at the given URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all database tables (if missing) from the entity definitions,
/// plus the unique index enforcing one item name per guild.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut guild_config_table = schema.create_table_from_entity(GuildConfig);
    let mut item_table = schema.create_table_from_entity(Item);
    let mut item_request_table = schema.create_table_from_entity(ItemRequest);

    db.execute(builder.build(guild_config_table.if_not_exists()))
        .await?;
    db.execute(builder.build(item_table.if_not_exists())).await?;
    db.execute(builder.build(item_request_table.if_not_exists()))
        .await?;

    // Uniqueness on (guild_id, name) is enforced by the store itself.
    let items_unique = Index::create()
        .name("idx_items_guild_id_name")
        .table(Item)
        .col(item::Column::GuildId)
        .col(item::Column::Name)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&items_unique)).await?;

    Ok(())
}
