//! Admin read models and the withdrawal console actions.

use crate::{
    core::{influencer, sale, withdrawal},
    entities::{WithdrawalStatus, withdrawal_request},
    errors::Result,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::ConnectionTrait;
use std::collections::HashSet;

/// Window used to count an influencer as active
pub const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Figures shown at the top of the admin view
#[derive(Debug, Clone, PartialEq)]
pub struct AdminOverview {
    /// Sum of every influencer's `total_sales`
    pub total_revenue: f64,
    /// Sum of paid withdrawal amounts
    pub total_commissions_paid: f64,
    /// Influencers with a sale inside [`ACTIVE_WINDOW_DAYS`]
    pub active_influencers: usize,
    /// Requests still waiting for payment
    pub pending_withdrawals: usize,
}

/// Every withdrawal request, newest first.
pub async fn withdrawal_console<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<withdrawal_request::Model>> {
    withdrawal::list_withdrawal_requests(db).await
}

/// Marks a request as paid and returns the console list read back from the backend.
///
/// Nothing is updated locally before the write succeeds. A request that is no longer
/// pending is refused with [`crate::errors::Error::WithdrawalNotPending`].
pub async fn mark_paid_and_refetch<C: ConnectionTrait>(
    db: &C,
    id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<withdrawal_request::Model>> {
    withdrawal::mark_withdrawal_as_paid(db, id, now).await?;
    withdrawal_console(db).await
}

/// Revenue, paid commissions, active influencers and pending requests as of `now`.
pub async fn admin_overview<C: ConnectionTrait>(
    db: &C,
    now: DateTime<Utc>,
) -> Result<AdminOverview> {
    let influencers = influencer::list_influencers(db).await?;
    let requests = withdrawal::list_withdrawal_requests(db).await?;
    let recent_sales = sale::list_sales_since(db, now - Duration::days(ACTIVE_WINDOW_DAYS)).await?;

    let total_revenue = influencers.iter().map(|i| i.total_sales).sum();
    let total_commissions_paid = requests
        .iter()
        .filter(|r| r.status == WithdrawalStatus::Paid)
        .map(|r| r.amount)
        .sum();
    let pending_withdrawals = requests
        .iter()
        .filter(|r| r.status == WithdrawalStatus::Pending)
        .count();
    let active_influencers = recent_sales
        .iter()
        .map(|s| s.influencer_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    Ok(AdminOverview {
        total_revenue,
        total_commissions_paid,
        active_influencers,
        pending_withdrawals,
    })
}
