//! Guild configuration operations and the inventory-admin authorization check.
//!
//! Config updates use partial-update semantics: only fields supplied in the
//! patch change, everything else keeps its stored value. The authorization
//! check is a pure function so it can be evaluated fresh at the moment of
//! every transition attempt.

use crate::{
    core::region::Region,
    entities::{GuildConfig, guild_config},
    errors::Result,
};
use sea_orm::{Set, prelude::*};

/// A partial update to a guild's configuration; `None` fields are untouched.
#[derive(Debug, Default, Clone)]
pub struct GuildConfigPatch {
    /// Channel hosting the persistent inventory display
    pub inventory_channel_id: Option<String>,
    /// Message ID of the current inventory display artifact
    pub inventory_message_id: Option<String>,
    /// Role IDs allowed to manage the inventory
    pub admin_role_ids: Option<Vec<String>>,
    /// Game-server region
    pub region: Option<Region>,
}

/// Retrieves a guild's configuration, if it has one.
pub async fn get_guild_config(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Option<guild_config::Model>> {
    GuildConfig::find_by_id(guild_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Upserts a guild's configuration, changing only the supplied fields.
pub async fn update_guild_config(
    db: &DatabaseConnection,
    guild_id: &str,
    patch: GuildConfigPatch,
) -> Result<guild_config::Model> {
    let admin_role_ids = patch
        .admin_role_ids
        .map(|ids| serde_json::to_string(&ids))
        .transpose()?;

    if let Some(existing) = get_guild_config(db, guild_id).await? {
        let mut active: guild_config::ActiveModel = existing.into();
        if let Some(channel_id) = patch.inventory_channel_id {
            active.inventory_channel_id = Set(Some(channel_id));
        }
        if let Some(message_id) = patch.inventory_message_id {
            active.inventory_message_id = Set(Some(message_id));
        }
        if let Some(role_ids) = admin_role_ids {
            active.admin_role_ids = Set(role_ids);
        }
        if let Some(region) = patch.region {
            active.region = Set(Some(region.as_str().to_string()));
        }
        active.update(db).await.map_err(Into::into)
    } else {
        let config = guild_config::ActiveModel {
            guild_id: Set(guild_id.to_string()),
            inventory_channel_id: Set(patch.inventory_channel_id),
            inventory_message_id: Set(patch.inventory_message_id),
            admin_role_ids: Set(admin_role_ids.unwrap_or_else(|| "[]".to_string())),
            region: Set(patch.region.map(|r| r.as_str().to_string())),
        };
        config.insert(db).await.map_err(Into::into)
    }
}

/// Decodes the configured admin role IDs.
///
/// Malformed JSON degrades to "no extra admin roles" rather than failing the
/// authorization check outright.
#[must_use]
pub fn admin_role_ids(config: &guild_config::Model) -> Vec<String> {
    serde_json::from_str(&config.admin_role_ids).unwrap_or_default()
}

/// Decides whether a member may manage the inventory.
///
/// Members holding the guild administrator permission always may; otherwise
/// they need one of the configured admin roles. Evaluated from live member
/// data at each transition attempt, never cached.
#[must_use]
pub fn is_inventory_admin(
    config: Option<&guild_config::Model>,
    has_administrator: bool,
    member_role_ids: &[String],
) -> bool {
    if has_administrator {
        return true;
    }
    let Some(config) = config else {
        return false;
    };
    let allowed = admin_role_ids(config);
    member_role_ids.iter().any(|role| allowed.contains(role))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn config_with_roles(roles: &str) -> guild_config::Model {
        guild_config::Model {
            guild_id: TEST_GUILD.to_string(),
            inventory_channel_id: None,
            inventory_message_id: None,
            admin_role_ids: roles.to_string(),
            region: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_row_when_absent() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(get_guild_config(&db, TEST_GUILD).await?.is_none());

        let config = update_guild_config(
            &db,
            TEST_GUILD,
            GuildConfigPatch {
                inventory_channel_id: Some("111".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(config.inventory_channel_id.as_deref(), Some("111"));
        assert_eq!(config.admin_role_ids, "[]");
        assert!(config.inventory_message_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields_unchanged() -> Result<()> {
        let db = setup_test_db().await?;

        update_guild_config(
            &db,
            TEST_GUILD,
            GuildConfigPatch {
                inventory_channel_id: Some("111".to_string()),
                ..Default::default()
            },
        )
        .await?;

        // Updating only the admin roles must not disturb the channel
        let config = update_guild_config(
            &db,
            TEST_GUILD,
            GuildConfigPatch {
                admin_role_ids: Some(vec!["222".to_string(), "333".to_string()]),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(config.inventory_channel_id.as_deref(), Some("111"));
        assert_eq!(admin_role_ids(&config), vec!["222", "333"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_region_persisted() -> Result<()> {
        let db = setup_test_db().await?;

        let config = update_guild_config(
            &db,
            TEST_GUILD,
            GuildConfigPatch {
                region: Some(Region::Eu),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(config.region.as_deref(), Some("EU"));
        assert_eq!(Region::from_stored(config.region.as_deref()), Region::Eu);

        Ok(())
    }

    #[test]
    fn test_is_inventory_admin_administrator_always_allowed() {
        assert!(is_inventory_admin(None, true, &[]));
        let config = config_with_roles("[]");
        assert!(is_inventory_admin(Some(&config), true, &[]));
    }

    #[test]
    fn test_is_inventory_admin_role_match() {
        let config = config_with_roles(r#"["222","333"]"#);
        let roles = vec!["999".to_string(), "333".to_string()];
        assert!(is_inventory_admin(Some(&config), false, &roles));

        let no_match = vec!["999".to_string()];
        assert!(!is_inventory_admin(Some(&config), false, &no_match));
    }

    #[test]
    fn test_is_inventory_admin_without_config_or_roles() {
        assert!(!is_inventory_admin(None, false, &["1".to_string()]));
    }

    #[test]
    fn test_malformed_role_json_degrades_to_empty() {
        let config = config_with_roles("not json");
        assert!(admin_role_ids(&config).is_empty());
        assert!(!is_inventory_admin(
            Some(&config),
            false,
            &["222".to_string()]
        ));
    }
}
