//! Shared test utilities for Quartermaster.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{inventory, request},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Guild ID used throughout the test suite.
pub const TEST_GUILD: &str = "guild_1";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test item in [`TEST_GUILD`] with no description.
pub async fn create_test_item(
    db: &DatabaseConnection,
    name: &str,
    quantity: i64,
) -> Result<entities::item::Model> {
    inventory::create_item(db, TEST_GUILD, name, quantity, None).await
}

/// Creates a pending test request in [`TEST_GUILD`].
///
/// # Defaults
/// * `user_name`: `"Tester"`
pub async fn create_test_request(
    db: &DatabaseConnection,
    user_id: &str,
    input_text: &str,
) -> Result<entities::item_request::Model> {
    request::create_request(db, TEST_GUILD, user_id, "Tester", input_text).await
}
