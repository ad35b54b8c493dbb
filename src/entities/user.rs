//! User entity - accounts known to the backend, with their portal role.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Portal role of an account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Affiliate with access to their own dashboard
    #[sea_orm(string_value = "influencer")]
    Influencer,
    /// Operator with access to the admin console
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Influencer => f.write_str("influencer"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Auth user id (UUID string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Login email
    #[sea_orm(unique)]
    pub email: String,
    /// Optional display name
    pub name: Option<String>,
    pub role: Role,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
