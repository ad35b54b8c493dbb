//! Withdrawal request entity - a payout asked for by an influencer.
//!
//! Requests start as `pending` with a one hour deadline and are moved to `paid` by an
//! admin. `canceled` is modelled but not reachable from the portal UI.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payout rail requested
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum WithdrawalMethod {
    /// Brazilian instant payment
    #[sea_orm(string_value = "PIX")]
    #[serde(rename = "PIX")]
    Pix,
    #[sea_orm(string_value = "bank_transfer")]
    #[serde(rename = "bank_transfer")]
    BankTransfer,
}

impl std::fmt::Display for WithdrawalMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pix => f.write_str("PIX"),
            Self::BankTransfer => f.write_str("bank_transfer"),
        }
    }
}

/// Lifecycle of a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Paid => f.write_str("paid"),
            Self::Canceled => f.write_str("canceled"),
        }
    }
}

/// Withdrawal request database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawal_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Auth user who asked for the payout, if known at submission time
    pub user_id: Option<String>,
    pub method: WithdrawalMethod,
    /// Amount in BRL
    pub amount: f64,
    pub pix_key: Option<String>,
    pub status: WithdrawalStatus,
    pub created_at: DateTimeUtc,
    /// Deadline promised to the influencer
    pub deadline_at: Option<DateTimeUtc>,
    /// Set when an admin marks the request as paid
    pub paid_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Model {
    /// Only pending requests can be marked as paid.
    #[must_use]
    pub fn can_mark_paid(&self) -> bool {
        self.status == WithdrawalStatus::Pending
    }
}

impl ActiveModelBehavior for ActiveModel {}
