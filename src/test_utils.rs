//! Shared test utilities for the portal.
//!
//! Helpers for in-memory databases and for creating rows with sensible defaults.

use crate::{
    core::{
        influencer::{self, NewInfluencer},
        sale::{self, NewSale},
        user::{self, NewUser},
        withdrawal::{self, NewWithdrawalRequest},
    },
    entities::{self, Role, WithdrawalMethod},
    errors::Result,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with the backend tables.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_backend_tables(&db).await?;
    Ok(db)
}

/// Creates an in-memory `SQLite` database with the local state table.
pub async fn setup_local_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_local_tables(&db).await?;
    Ok(db)
}

pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        NewUser {
            email: email.to_string(),
            name: None,
            role: Some(role),
        },
    )
    .await
}

/// Creates an influencer with zero totals.
///
/// # Defaults
/// * `email`: `"{username}@example.com"`
/// * `full_name`, `affiliate_link`: None
pub async fn create_test_influencer(
    db: &DatabaseConnection,
    id: &str,
    username: &str,
) -> Result<entities::influencer::Model> {
    create_custom_influencer(db, id, username, None).await
}

pub async fn create_custom_influencer(
    db: &DatabaseConnection,
    id: &str,
    username: &str,
    full_name: Option<&str>,
) -> Result<entities::influencer::Model> {
    influencer::create_influencer(
        db,
        NewInfluencer {
            id: id.to_string(),
            email: format!("{username}@example.com"),
            username: username.to_string(),
            full_name: full_name.map(str::to_string),
            affiliate_link: None,
        },
    )
    .await
}

/// Registers a sale of `"Curso"` to `"Cliente Teste"`.
pub async fn create_test_sale(
    db: &DatabaseConnection,
    influencer_id: &str,
    commission: f64,
    date: DateTime<Utc>,
) -> Result<entities::sale::Model> {
    sale::create_sale(
        db,
        NewSale {
            influencer_id: influencer_id.to_string(),
            product: "Curso".to_string(),
            customer: "Cliente Teste".to_string(),
            commission,
            date: Some(date),
        },
    )
    .await
}

/// Creates a pending PIX request due one hour after `created_at`.
pub async fn create_test_withdrawal(
    db: &DatabaseConnection,
    user_id: &str,
    amount: f64,
    created_at: DateTime<Utc>,
) -> Result<entities::withdrawal_request::Model> {
    withdrawal::create_withdrawal_request(
        db,
        NewWithdrawalRequest {
            user_id: Some(user_id.to_string()),
            method: WithdrawalMethod::Pix,
            amount,
            pix_key: Some(format!("{user_id}@example.com")),
            status: None,
            deadline_at: Some(created_at + Duration::hours(1)),
        },
        created_at,
    )
    .await
}
