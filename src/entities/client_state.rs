//! Client state entity - per-user key/value pairs that stand in for browser local storage.
//! Used for the session markers and the in-progress withdrawal flow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client state database model - one row per (owner, key)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Discord user ID that owns this entry
    pub owner: String,
    /// Storage key (e.g., `"withdrawFlow"`)
    pub key: String,
    /// Stored value, usually JSON
    pub value: String,
    /// When this entry was last written
    pub updated_at: DateTime,
}

/// `ClientState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
