//! Withdrawal request data access - the `withdrawal_requests` collection.
//!
//! Requests are created by the influencer wizard and moved to `paid` by admins. Only a
//! `pending` request can be marked paid; other updates are plain last-write-wins.

use crate::{
    entities::{WithdrawalMethod, WithdrawalRequest, WithdrawalStatus, withdrawal_request},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};

/// Fields sent when creating a request
#[derive(Debug, Clone)]
pub struct NewWithdrawalRequest {
    /// Requesting user, when signed in
    pub user_id: Option<String>,
    /// How the money is sent
    pub method: WithdrawalMethod,
    /// Requested amount in BRL
    pub amount: f64,
    /// PIX key for [`WithdrawalMethod::Pix`]
    pub pix_key: Option<String>,
    /// Defaults to [`WithdrawalStatus::Pending`]
    pub status: Option<WithdrawalStatus>,
    /// Promised payment deadline
    pub deadline_at: Option<DateTime<Utc>>,
}

/// Partial update of a request; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct WithdrawalRequestUpdate {
    /// New method
    pub method: Option<WithdrawalMethod>,
    /// New amount, must be positive
    pub amount: Option<f64>,
    /// New PIX key; `Some(None)` clears it
    pub pix_key: Option<Option<String>>,
    /// New status
    pub status: Option<WithdrawalStatus>,
    /// New deadline; `Some(None)` clears it
    pub deadline_at: Option<Option<DateTime<Utc>>>,
    /// New payment time; `Some(None)` clears it
    pub paid_at: Option<Option<DateTime<Utc>>>,
}

/// Inserts a request stamped with `created_at = now`.
pub async fn create_withdrawal_request<C: ConnectionTrait>(
    db: &C,
    request: NewWithdrawalRequest,
    now: DateTime<Utc>,
) -> Result<withdrawal_request::Model> {
    if !request.amount.is_finite() || request.amount <= 0.0 {
        return Err(Error::InvalidAmount {
            amount: request.amount,
        });
    }

    let model = withdrawal_request::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(request.user_id),
        method: Set(request.method),
        amount: Set(request.amount),
        pix_key: Set(request.pix_key),
        status: Set(request.status.unwrap_or(WithdrawalStatus::Pending)),
        created_at: Set(now),
        deadline_at: Set(request.deadline_at),
        paid_at: Set(None),
    };

    model.insert(db).await.map_err(Into::into)
}

/// Fetches one request by id.
pub async fn get_withdrawal_request<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<withdrawal_request::Model>> {
    WithdrawalRequest::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every request, newest first.
pub async fn list_withdrawal_requests<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<withdrawal_request::Model>> {
    WithdrawalRequest::find()
        .order_by_desc(withdrawal_request::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists requests with the given status, newest first.
pub async fn list_withdrawal_requests_by_status<C: ConnectionTrait>(
    db: &C,
    status: WithdrawalStatus,
) -> Result<Vec<withdrawal_request::Model>> {
    WithdrawalRequest::find()
        .filter(withdrawal_request::Column::Status.eq(status))
        .order_by_desc(withdrawal_request::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists one user's requests, newest first.
pub async fn get_user_withdrawal_requests<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<Vec<withdrawal_request::Model>> {
    WithdrawalRequest::find()
        .filter(withdrawal_request::Column::UserId.eq(user_id))
        .order_by_desc(withdrawal_request::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists one user's paid requests, most recently paid first.
pub async fn get_user_paid_withdrawals<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<Vec<withdrawal_request::Model>> {
    WithdrawalRequest::find()
        .filter(withdrawal_request::Column::UserId.eq(user_id))
        .filter(withdrawal_request::Column::Status.eq(WithdrawalStatus::Paid))
        .order_by_desc(withdrawal_request::Column::PaidAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update and returns the stored row.
pub async fn update_withdrawal_request<C: ConnectionTrait>(
    db: &C,
    id: &str,
    update: WithdrawalRequestUpdate,
) -> Result<withdrawal_request::Model> {
    if let Some(amount) = update.amount {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
    }

    let mut model: withdrawal_request::ActiveModel = get_withdrawal_request(db, id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Withdrawal request",
            id: id.to_string(),
        })?
        .into();

    if let Some(method) = update.method {
        model.method = Set(method);
    }
    if let Some(amount) = update.amount {
        model.amount = Set(amount);
    }
    if let Some(pix_key) = update.pix_key {
        model.pix_key = Set(pix_key);
    }
    if let Some(status) = update.status {
        model.status = Set(status);
    }
    if let Some(deadline_at) = update.deadline_at {
        model.deadline_at = Set(deadline_at);
    }
    if let Some(paid_at) = update.paid_at {
        model.paid_at = Set(paid_at);
    }

    model.update(db).await.map_err(Into::into)
}

/// Sets `status = paid` and stamps `paid_at`.
///
/// Returns [`Error::WithdrawalNotPending`] without writing anything when the request is
/// already paid or canceled.
pub async fn mark_withdrawal_as_paid<C: ConnectionTrait>(
    db: &C,
    id: &str,
    now: DateTime<Utc>,
) -> Result<withdrawal_request::Model> {
    let existing = get_withdrawal_request(db, id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Withdrawal request",
            id: id.to_string(),
        })?;
    if !existing.can_mark_paid() {
        tracing::warn!(withdrawal_id = %existing.id, status = %existing.status, "Refused to mark withdrawal as paid");
        return Err(Error::WithdrawalNotPending {
            id: existing.id,
            status: existing.status,
        });
    }

    let updated = update_withdrawal_request(
        db,
        id,
        WithdrawalRequestUpdate {
            status: Some(WithdrawalStatus::Paid),
            paid_at: Some(Some(now)),
            ..Default::default()
        },
    )
    .await?;
    tracing::info!(withdrawal_id = %updated.id, amount = updated.amount, "Marked withdrawal as paid");
    Ok(updated)
}

/// Sets `status = canceled`.
pub async fn cancel_withdrawal_request<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<withdrawal_request::Model> {
    update_withdrawal_request(
        db,
        id,
        WithdrawalRequestUpdate {
            status: Some(WithdrawalStatus::Canceled),
            ..Default::default()
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_withdrawal_request_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = create_withdrawal_request(
                &db,
                NewWithdrawalRequest {
                    user_id: Some("inf-1".to_string()),
                    method: WithdrawalMethod::Pix,
                    amount,
                    pix_key: Some("ana@example.com".to_string()),
                    status: None,
                    deadline_at: None,
                },
                Utc::now(),
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_create_defaults_to_pending() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        let request = create_test_withdrawal(&db, "inf-1", 150.0, now).await?;
        assert_eq!(request.status, WithdrawalStatus::Pending);
        assert_eq!(request.method, WithdrawalMethod::Pix);
        assert_eq!(request.created_at, now);
        assert!(request.paid_at.is_none());
        assert!(request.can_mark_paid());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let first = create_test_withdrawal(&db, "inf-1", 100.0, now - Duration::minutes(10)).await?;
        let second = create_test_withdrawal(&db, "inf-2", 200.0, now - Duration::minutes(5)).await?;
        let third = create_test_withdrawal(&db, "inf-1", 300.0, now).await?;

        let all = list_withdrawal_requests(&db).await?;
        assert_eq!(all, vec![third.clone(), second, first.clone()]);

        let mine = get_user_withdrawal_requests(&db, "inf-1").await?;
        assert_eq!(mine, vec![third, first]);
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_sets_status_and_paid_at() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let request = create_test_withdrawal(&db, "inf-1", 150.0, now).await?;

        let paid = mark_withdrawal_as_paid(&db, &request.id, now + Duration::minutes(20)).await?;
        assert_eq!(paid.status, WithdrawalStatus::Paid);
        assert_eq!(paid.paid_at, Some(now + Duration::minutes(20)));
        assert!(!paid.can_mark_paid());

        let stored = get_withdrawal_request(&db, &request.id).await?.unwrap();
        assert_eq!(stored, paid);
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_missing_request() -> Result<()> {
        let db = setup_test_db().await?;
        let result = mark_withdrawal_as_paid(&db, "missing", Utc::now()).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_paid_history_and_cancel() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let a = create_test_withdrawal(&db, "inf-1", 100.0, now - Duration::hours(3)).await?;
        let b = create_test_withdrawal(&db, "inf-1", 200.0, now - Duration::hours(2)).await?;
        let c = create_test_withdrawal(&db, "inf-1", 300.0, now - Duration::hours(1)).await?;

        // Paid in reverse creation order
        mark_withdrawal_as_paid(&db, &b.id, now - Duration::minutes(30)).await?;
        mark_withdrawal_as_paid(&db, &a.id, now).await?;
        let canceled = cancel_withdrawal_request(&db, &c.id).await?;
        assert_eq!(canceled.status, WithdrawalStatus::Canceled);

        let paid: Vec<String> = get_user_paid_withdrawals(&db, "inf-1")
            .await?
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(paid, vec![a.id, b.id]);

        let pending =
            list_withdrawal_requests_by_status(&db, WithdrawalStatus::Pending).await?;
        assert!(pending.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_refuses_canceled_request() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let request = create_test_withdrawal(&db, "inf-1", 150.0, now).await?;
        let canceled = cancel_withdrawal_request(&db, &request.id).await?;

        let result = mark_withdrawal_as_paid(&db, &request.id, now + Duration::minutes(5)).await;
        assert!(matches!(
            result,
            Err(Error::WithdrawalNotPending {
                status: WithdrawalStatus::Canceled,
                ..
            })
        ));

        let stored = get_withdrawal_request(&db, &request.id).await?.unwrap();
        assert_eq!(stored, canceled);
        assert!(stored.paid_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_paid_twice_keeps_first_paid_at() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let request = create_test_withdrawal(&db, "inf-1", 150.0, now).await?;
        let paid = mark_withdrawal_as_paid(&db, &request.id, now + Duration::minutes(5)).await?;

        let result = mark_withdrawal_as_paid(&db, &request.id, now + Duration::minutes(10)).await;
        assert!(matches!(
            result,
            Err(Error::WithdrawalNotPending {
                status: WithdrawalStatus::Paid,
                ..
            })
        ));

        let stored = get_withdrawal_request(&db, &request.id).await?.unwrap();
        assert_eq!(stored, paid);
        assert_eq!(stored.paid_at, Some(now + Duration::minutes(5)));
        Ok(())
    }
}
