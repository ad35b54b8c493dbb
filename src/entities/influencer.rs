//! Influencer entity - affiliate profile with the running totals shown on the dashboard.
//!
//! The totals are maintained by the backend (or edited by admins); the portal never
//! recomputes them from sales.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Influencer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "influencers")]
pub struct Model {
    /// Same id as the auth user this profile belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    /// Referral link handed out by the influencer
    pub affiliate_link: Option<String>,
    /// Gross value of all attributed sales
    pub total_sales: f64,
    pub total_commissions: f64,
    pub total_clicks: i64,
    pub total_sales_count: i64,
    /// Commission available for withdrawal
    pub pending_payment: f64,
}

/// Defines relationships between Influencer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One influencer has many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Model {
    /// Best available display name: full name, then username, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| Some(self.username.as_str()).filter(|u| !u.is_empty()))
            .unwrap_or(&self.email)
    }
}

impl ActiveModelBehavior for ActiveModel {}
