//! Database configuration module.
//!
//! The portal talks to two databases: the hosted backend that owns users, influencers,
//! sales and withdrawal requests, and a small local `SQLite` file that holds per-user
//! client state. Both are reached through `SeaORM`. Table creation is only used for local
//! development and tests; the hosted backend schema is managed outside this crate.

use crate::entities::{ClientState, Influencer, Sale, User, WithdrawalRequest};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

const DEFAULT_BACKEND_URL: &str = "sqlite://data/portal_backend.sqlite?mode=rwc";
const DEFAULT_LOCAL_STATE_URL: &str = "sqlite://data/portal_state.sqlite?mode=rwc";

/// Gets the backend database URL from `DATABASE_URL`, falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string())
}

/// Gets the local client state URL from `LOCAL_STATE_URL`.
#[must_use]
pub fn get_local_state_url() -> String {
    std::env::var("LOCAL_STATE_URL").unwrap_or_else(|_| DEFAULT_LOCAL_STATE_URL.to_string())
}

/// Connects to the backend database.
pub async fn connect_backend() -> Result<DatabaseConnection> {
    let url = get_database_url();
    tracing::debug!("Connecting to backend database");
    Database::connect(&url).await.map_err(Into::into)
}

/// Connects to the local client state database and makes sure its table exists.
pub async fn connect_local_state() -> Result<DatabaseConnection> {
    let url = get_local_state_url();
    tracing::debug!("Connecting to local state database at {url}");
    let db = Database::connect(&url).await?;
    create_local_tables(&db).await?;
    Ok(db)
}

async fn create_table_for<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates the backend tables from the entity definitions.
///
/// Order matters: `sales` references `influencers`.
pub async fn create_backend_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    create_table_for(db, User).await?;
    create_table_for(db, Influencer).await?;
    create_table_for(db, Sale).await?;
    create_table_for(db, WithdrawalRequest).await?;
    Ok(())
}

/// Creates the `client_state` table.
pub async fn create_local_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    create_table_for(db, ClientState).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        ClientStateModel, InfluencerModel, SaleModel, UserModel, WithdrawalRequestModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_backend_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_backend_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<InfluencerModel> = Influencer::find().limit(1).all(&db).await?;
        let _: Vec<SaleModel> = Sale::find().limit(1).all(&db).await?;
        let _: Vec<WithdrawalRequestModel> = WithdrawalRequest::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_backend_tables(&db).await?;
        create_backend_tables(&db).await?;
        create_local_tables(&db).await?;
        create_local_tables(&db).await?;

        let _: Vec<ClientStateModel> = ClientState::find().limit(1).all(&db).await?;
        Ok(())
    }
}
