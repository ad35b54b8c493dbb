//! Sale data access - manual sale entry by admins and per-influencer history.

use crate::{
    entities::{Sale, sale},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};

/// Commission rate used to estimate a sale's value from its commission.
pub const COMMISSION_RATE: f64 = 0.15;

/// Fields entered by an admin when registering a sale
#[derive(Debug, Clone)]
pub struct NewSale {
    pub influencer_id: String,
    pub product: String,
    pub customer: String,
    /// Commission in BRL; `0` when not known yet
    pub commission: f64,
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
}

/// Estimates the gross sale value from a commission, rounded to cents.
#[must_use]
pub fn estimate_value(commission: f64) -> f64 {
    if commission > 0.0 {
        (commission / COMMISSION_RATE * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Registers a sale. Product and customer are required.
pub async fn create_sale<C: ConnectionTrait>(db: &C, new_sale: NewSale) -> Result<sale::Model> {
    let product = new_sale.product.trim().to_string();
    let customer = new_sale.customer.trim().to_string();
    if product.is_empty() || customer.is_empty() {
        return Err(Error::Validation {
            message: "Product and customer are required".to_string(),
        });
    }
    if !new_sale.commission.is_finite() || new_sale.commission < 0.0 {
        return Err(Error::InvalidAmount {
            amount: new_sale.commission,
        });
    }

    let model = sale::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        influencer_id: Set(new_sale.influencer_id),
        product: Set(product),
        customer: Set(customer),
        value: Set(estimate_value(new_sale.commission)),
        commission: Set(new_sale.commission),
        date: Set(new_sale.date.unwrap_or_else(Utc::now)),
    };

    let created = model.insert(db).await?;
    tracing::info!(
        sale_id = %created.id,
        influencer_id = %created.influencer_id,
        "Registered sale"
    );
    Ok(created)
}

/// Lists an influencer's sales, most recent first.
pub async fn list_sales_for_influencer<C: ConnectionTrait>(
    db: &C,
    influencer_id: &str,
) -> Result<Vec<sale::Model>> {
    Sale::find()
        .filter(sale::Column::InfluencerId.eq(influencer_id))
        .order_by_desc(sale::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists sales on or after `since`, across all influencers.
pub async fn list_sales_since<C: ConnectionTrait>(
    db: &C,
    since: DateTime<Utc>,
) -> Result<Vec<sale::Model>> {
    Sale::find()
        .filter(sale::Column::Date.gte(since))
        .order_by_desc(sale::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
