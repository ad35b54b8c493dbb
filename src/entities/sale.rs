//! Sale entity - a purchase attributed to an influencer.
//!
//! Sales are entered manually by admins and are never edited from the portal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Influencer the sale is attributed to
    pub influencer_id: String,
    pub product: String,
    pub customer: String,
    /// Sale value in BRL
    pub value: f64,
    /// Commission earned by the influencer in BRL
    pub commission: f64,
    /// When the sale happened
    pub date: DateTimeUtc,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale belongs to one influencer
    #[sea_orm(
        belongs_to = "super::influencer::Entity",
        from = "Column::InfluencerId",
        to = "super::influencer::Column::Id"
    )]
    Influencer,
}

impl Related<super::influencer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Influencer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
