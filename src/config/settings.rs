//! Process settings sourced from environment variables.
//!
//! The Discord bot token is deliberately not part of [`AppSettings`]; it is
//! read in `main` directly before use and never stored.

use crate::errors::Result;

/// Default `SQLite` database location when `DATABASE_URL` is unset.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/quartermaster.sqlite?mode=rwc";

/// Settings that configure the process, independent of any guild.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// `SeaORM` connection string for the backing database
    pub database_url: String,
    /// Whether to synchronize slash-command definitions with Discord on startup
    pub should_sync: bool,
}

/// Loads process settings from the environment.
///
/// `DATABASE_URL` falls back to a local `SQLite` file; `SHOULD_SYNC` defaults
/// to `true` and treats anything other than (case-insensitive) `"true"` as
/// false, matching how the flag is commonly toggled off with `SHOULD_SYNC=false`.
pub fn load() -> Result<AppSettings> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let should_sync = std::env::var("SHOULD_SYNC")
        .map_or(true, |value| value.eq_ignore_ascii_case("true"));

    Ok(AppSettings {
        database_url,
        should_sync,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_unset() -> Result<()> {
        // Note: relies on the test environment not defining these variables.
        let settings = load()?;
        assert!(settings.should_sync || std::env::var("SHOULD_SYNC").is_ok());
        assert!(!settings.database_url.is_empty());
        Ok(())
    }
}
