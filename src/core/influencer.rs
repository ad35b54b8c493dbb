//! Influencer data access - profiles and the running totals shown on dashboards.
//!
//! Admins edit two groups of fields separately: the public profile (name, username,
//! link) and the financial figures. Influencers only ever read their own row.

use crate::{
    entities::{Influencer, influencer},
    errors::{Error, Result},
};
use sea_orm::{
    ConnectionTrait, QueryOrder, Set,
    prelude::*,
    sea_query::{NullOrdering, Order},
};

/// Profile fields editable by admins
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub affiliate_link: Option<String>,
}

/// Financial fields editable by admins; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct MetricsUpdate {
    pub affiliate_link: Option<String>,
    pub pending_payment: Option<f64>,
    pub total_sales: Option<f64>,
    pub total_commissions: Option<f64>,
    pub total_clicks: Option<i64>,
    pub total_sales_count: Option<i64>,
}

/// Fields needed to create a profile for an existing auth user
#[derive(Debug, Clone)]
pub struct NewInfluencer {
    /// Auth user id the profile belongs to
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub affiliate_link: Option<String>,
}

pub async fn get_influencer<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<influencer::Model>> {
    Influencer::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an influencer by username (exact match).
pub async fn get_influencer_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<influencer::Model>> {
    Influencer::find()
        .filter(influencer::Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all influencers by full name, unnamed profiles first.
pub async fn list_influencers<C: ConnectionTrait>(db: &C) -> Result<Vec<influencer::Model>> {
    Influencer::find()
        .order_by_with_nulls(influencer::Column::FullName, Order::Asc, NullOrdering::First)
        .order_by_asc(influencer::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a profile with zeroed totals.
pub async fn create_influencer<C: ConnectionTrait>(
    db: &C,
    new_influencer: NewInfluencer,
) -> Result<influencer::Model> {
    let username = new_influencer.username.trim().to_string();
    if username.is_empty() {
        return Err(Error::Validation {
            message: "Username cannot be empty".to_string(),
        });
    }
    if new_influencer.id.trim().is_empty() {
        return Err(Error::Validation {
            message: "An influencer profile needs the id of an existing account".to_string(),
        });
    }

    let model = influencer::ActiveModel {
        id: Set(new_influencer.id.trim().to_string()),
        email: Set(new_influencer.email.trim().to_lowercase()),
        username: Set(username),
        full_name: Set(non_blank(new_influencer.full_name)),
        affiliate_link: Set(non_blank(new_influencer.affiliate_link)),
        total_sales: Set(0.0),
        total_commissions: Set(0.0),
        total_clicks: Set(0),
        total_sales_count: Set(0),
        pending_payment: Set(0.0),
    };

    model.insert(db).await.map_err(Into::into)
}

async fn find_active<C: ConnectionTrait>(db: &C, id: &str) -> Result<influencer::ActiveModel> {
    Ok(get_influencer(db, id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Influencer",
            id: id.to_string(),
        })?
        .into())
}

/// Saves profile fields. Blank strings clear optional fields.
pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    id: &str,
    update: ProfileUpdate,
) -> Result<influencer::Model> {
    let mut model = find_active(db, id).await?;

    if let Some(full_name) = update.full_name {
        model.full_name = Set(non_blank(Some(full_name)));
    }
    if let Some(username) = update.username {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(Error::Validation {
                message: "Username cannot be empty".to_string(),
            });
        }
        model.username = Set(username);
    }
    if let Some(link) = update.affiliate_link {
        model.affiliate_link = Set(non_blank(Some(link)));
    }

    model.update(db).await.map_err(Into::into)
}

/// Saves financial fields. Amounts and counters must be finite and non-negative.
pub async fn update_metrics<C: ConnectionTrait>(
    db: &C,
    id: &str,
    update: MetricsUpdate,
) -> Result<influencer::Model> {
    for amount in [
        update.pending_payment,
        update.total_sales,
        update.total_commissions,
    ]
    .into_iter()
    .flatten()
    {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
    }
    for count in [update.total_clicks, update.total_sales_count]
        .into_iter()
        .flatten()
    {
        if count < 0 {
            return Err(Error::Validation {
                message: format!("Counters cannot be negative (got {count})"),
            });
        }
    }

    let mut model = find_active(db, id).await?;

    if let Some(link) = update.affiliate_link {
        model.affiliate_link = Set(non_blank(Some(link)));
    }
    if let Some(value) = update.pending_payment {
        model.pending_payment = Set(value);
    }
    if let Some(value) = update.total_sales {
        model.total_sales = Set(value);
    }
    if let Some(value) = update.total_commissions {
        model.total_commissions = Set(value);
    }
    if let Some(value) = update.total_clicks {
        model.total_clicks = Set(value);
    }
    if let Some(value) = update.total_sales_count {
        model.total_sales_count = Set(value);
    }

    model.update(db).await.map_err(Into::into)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
