/// Database configuration and connection management
pub mod database;

/// Process settings loaded from the environment
pub mod settings;
