/// Database connections and table creation
pub mod database;

/// Portal settings loaded from config.toml
pub mod portal;

/// Admin email allow-list from environment variables
pub mod admins;

/// Auth service endpoint settings from environment variables
pub mod auth;
