//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod guild_config;
pub mod item;
pub mod item_request;

// Re-export specific types to avoid conflicts
pub use guild_config::{
    Column as GuildConfigColumn, Entity as GuildConfig, Model as GuildConfigModel,
};
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use item_request::{
    Column as ItemRequestColumn, Entity as ItemRequest, Model as ItemRequestModel, RequestStatus,
};
