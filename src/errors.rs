//! Unified error type for the portal.
//!
//! Every fallible operation in the crate returns [`Result`]. Backend, HTTP and
//! serialization failures convert automatically so callers can use `?` throughout.

use crate::{core::withdraw::WithdrawStep, entities::WithdrawalStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Withdrawals can only be started between {open:02}:00 and {close:02}:00")]
    OutsideBusinessHours { open: u32, close: u32 },

    #[error("Cannot {action} while at step {from}")]
    InvalidTransition {
        from: WithdrawStep,
        action: &'static str,
    },

    #[error("Withdrawal request '{id}' is {status}; only pending requests can be paid")]
    WithdrawalNotPending {
        id: String,
        status: WithdrawalStatus,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
