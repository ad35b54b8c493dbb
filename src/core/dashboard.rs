//! Influencer dashboard read models.

use crate::{
    config::portal::SupportSettings,
    core::{influencer, sale, withdraw::WithdrawPolicy, withdrawal},
    entities::{sale as sale_entity, withdrawal_request},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;

/// Cards at the top of the influencer dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct InfluencerOverview {
    pub display_name: String,
    pub email: String,
    pub affiliate_link: Option<String>,
    pub sales_count: i64,
    pub total_commissions: f64,
    /// Amount the influencer can currently withdraw (`pending_payment`)
    pub available_balance: f64,
    pub clicks: i64,
    /// Whether the withdrawal wizard would start right now
    pub withdrawals_open: bool,
}

pub async fn influencer_overview<C: ConnectionTrait>(
    db: &C,
    influencer_id: &str,
    policy: &WithdrawPolicy,
    now: DateTime<Utc>,
) -> Result<InfluencerOverview> {
    let me = influencer::get_influencer(db, influencer_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Influencer",
            id: influencer_id.to_string(),
        })?;

    Ok(InfluencerOverview {
        display_name: me.display_name().to_string(),
        email: me.email.clone(),
        affiliate_link: me.affiliate_link.clone().filter(|l| !l.trim().is_empty()),
        sales_count: me.total_sales_count,
        total_commissions: me.total_commissions,
        available_balance: me.pending_payment,
        clicks: me.total_clicks,
        withdrawals_open: policy.hours.contains(now),
    })
}

/// The influencer's sales, most recent first.
pub async fn sales_history<C: ConnectionTrait>(
    db: &C,
    influencer_id: &str,
) -> Result<Vec<sale_entity::Model>> {
    sale::list_sales_for_influencer(db, influencer_id).await
}

/// The influencer's paid withdrawals, most recently paid first.
pub async fn paid_withdrawals<C: ConnectionTrait>(
    db: &C,
    influencer_id: &str,
) -> Result<Vec<withdrawal_request::Model>> {
    withdrawal::get_user_paid_withdrawals(db, influencer_id).await
}

/// WhatsApp chat link with the support message prefilled.
pub fn support_link(support: &SupportSettings) -> Result<String> {
    let base = format!("https://wa.me/{}", support.whatsapp_number.trim());
    reqwest::Url::parse_with_params(&base, &[("text", support.message.as_str())])
        .map(String::from)
        .map_err(|e| Error::Config {
            message: format!("Invalid support WhatsApp number '{}': {e}", support.whatsapp_number),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        config::portal::PortalSettings,
        core::influencer::{MetricsUpdate, update_metrics},
        test_utils::*,
    };
    use chrono::{Duration, TimeZone};

    fn policy() -> WithdrawPolicy {
        WithdrawPolicy::from_settings(&PortalSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_influencer_overview() -> Result<()> {
        let db = setup_test_db().await?;
        create_custom_influencer(&db, "inf-1", "ana", Some("Ana Souza")).await?;
        update_metrics(
            &db,
            "inf-1",
            MetricsUpdate {
                affiliate_link: Some("https://loja.example.com/?ref=ana".to_string()),
                pending_payment: Some(320.5),
                total_commissions: Some(900.0),
                total_clicks: Some(1200),
                total_sales_count: Some(42),
                ..Default::default()
            },
        )
        .await?;

        // 15:00 UTC is 12:00 in São Paulo
        let open = Utc.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap();
        let overview = influencer_overview(&db, "inf-1", &policy(), open).await?;
        assert_eq!(overview.display_name, "Ana Souza");
        assert_eq!(overview.sales_count, 42);
        assert_eq!(overview.total_commissions, 900.0);
        assert_eq!(overview.available_balance, 320.5);
        assert_eq!(overview.clicks, 1200);
        assert_eq!(
            overview.affiliate_link.as_deref(),
            Some("https://loja.example.com/?ref=ana")
        );
        assert!(overview.withdrawals_open);

        // 02:00 UTC is 23:00 the previous day locally
        let closed = Utc.with_ymd_and_hms(2026, 3, 2, 2, 0, 0).unwrap();
        let overview = influencer_overview(&db, "inf-1", &policy(), closed).await?;
        assert!(!overview.withdrawals_open);
        Ok(())
    }

    #[tokio::test]
    async fn test_overview_for_missing_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let result = influencer_overview(&db, "ghost", &policy(), Utc::now()).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "Influencer", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_history_views() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_influencer(&db, "inf-1", "ana").await?;
        let now = Utc::now();
        let old_sale = create_test_sale(&db, "inf-1", 10.0, now - Duration::days(5)).await?;
        let new_sale = create_test_sale(&db, "inf-1", 12.0, now - Duration::days(1)).await?;

        let sales = sales_history(&db, "inf-1").await?;
        assert_eq!(sales, vec![new_sale, old_sale]);

        let pending = create_test_withdrawal(&db, "inf-1", 100.0, now).await?;
        let paid = create_test_withdrawal(&db, "inf-1", 80.0, now - Duration::days(2)).await?;
        withdrawal::mark_withdrawal_as_paid(&db, &paid.id, now).await?;

        let history = paid_withdrawals(&db, "inf-1").await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, paid.id);
        assert_ne!(history[0].id, pending.id);
        Ok(())
    }

    #[test]
    fn test_support_link_encodes_message() -> Result<()> {
        let support = SupportSettings {
            whatsapp_number: "5511988887777".to_string(),
            message: "Olá! Preciso de ajuda & suporte".to_string(),
        };
        let link = support_link(&support)?;
        assert_eq!(
            link,
            "https://wa.me/5511988887777?text=Ol%C3%A1%21+Preciso+de+ajuda+%26+suporte"
        );

        let parsed = reqwest::Url::parse(&link).unwrap();
        assert_eq!(parsed.host_str(), Some("wa.me"));
        assert_eq!(parsed.path(), "/5511988887777");
        let text: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(
            text,
            vec![("text".to_string(), "Olá! Preciso de ajuda & suporte".to_string())]
        );
        Ok(())
    }
}
