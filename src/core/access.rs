//! Route admission. Every view asks here before rendering anything.

use crate::{
    config::admins::AdminAllowList,
    core::session::{self, Identity},
    entities::Role,
    errors::Result,
    store::LocalStore,
};
use sea_orm::ConnectionTrait;

/// Views the portal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Who-am-I view after sign-in
    Landing,
    /// Influencer dashboard and histories
    Dashboard,
    /// Wizard: start
    WithdrawStart,
    /// Wizard: method choice
    WithdrawMethod,
    /// Wizard: PIX key and amount
    WithdrawPix,
    /// Wizard: receipt
    WithdrawConfirmed,
    /// Admin overview
    Admin,
    /// Withdrawal console
    AdminFinancial,
    /// Influencer management
    AdminInfluencers,
}

impl Route {
    /// Routes gated by the admin allow-list.
    #[must_use]
    pub const fn is_admin_route(self) -> bool {
        matches!(self, Self::Admin | Self::AdminFinancial | Self::AdminInfluencers)
    }

    /// Routes open to any signed-in role.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Landing)
    }
}

/// Result of [`admit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The caller may see the route as this identity
    Admitted(Identity),
    /// The caller has to sign in (again) first
    RedirectToLogin,
}

impl Admission {
    /// True for [`Admission::Admitted`].
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }
}

/// Decides whether the store's owner may see `route`.
///
/// The session is read fresh on every call and a missing session always redirects.
/// Admin routes only look at the allow-list, so an influencer marker never opens them.
pub async fn admit<C: ConnectionTrait>(
    store: &LocalStore<'_, C>,
    admins: &AdminAllowList,
    route: Route,
) -> Result<Admission> {
    let Some(session) = session::current_session(store).await? else {
        return Ok(Admission::RedirectToLogin);
    };

    if route.is_public() {
        // The landing view only needs to know who is signed in
        let role = if admins.is_admin(session.email.as_deref()) {
            Role::Admin
        } else {
            Role::Influencer
        };
        return Ok(Admission::Admitted(Identity {
            id: session.user_id,
            email: session.email.unwrap_or_default(),
            role,
        }));
    }

    if route.is_admin_route() {
        if !admins.is_admin(session.email.as_deref()) {
            tracing::debug!(owner = %store.owner(), ?route, "Not on the admin allow-list");
            return Ok(Admission::RedirectToLogin);
        }
        return Ok(Admission::Admitted(Identity {
            id: session.user_id,
            email: session.email.unwrap_or_default(),
            role: Role::Admin,
        }));
    }

    Ok(session::influencer_marker(store)
        .await?
        .map_or(Admission::RedirectToLogin, |(id, email)| {
            Admission::Admitted(Identity {
                id,
                email,
                role: Role::Influencer,
            })
        }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::session::{ADMIN_EMAIL_KEY, sign_in, sign_out, tests::FakeAuth};
    use crate::test_utils::setup_local_db;

    const INFLUENCER_ROUTES: [Route; 5] = [
        Route::Dashboard,
        Route::WithdrawStart,
        Route::WithdrawMethod,
        Route::WithdrawPix,
        Route::WithdrawConfirmed,
    ];
    const ADMIN_ROUTES: [Route; 3] = [Route::Admin, Route::AdminFinancial, Route::AdminInfluencers];

    #[tokio::test]
    async fn test_no_session_redirects_everywhere() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let admins = AdminAllowList::parse("ops@example.com");

        for route in INFLUENCER_ROUTES.into_iter().chain(ADMIN_ROUTES) {
            assert_eq!(admit(&store, &admins, route).await?, Admission::RedirectToLogin);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_influencer_routes_need_marker() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let admins = AdminAllowList::default();
        let auth = FakeAuth::new("secret");

        sign_in(&store, &auth, "ana@example.com", "secret", Role::Influencer).await?;
        for route in INFLUENCER_ROUTES {
            let admission = admit(&store, &admins, route).await?;
            let Admission::Admitted(identity) = admission else {
                unreachable!("influencer should be admitted to {route:?}");
            };
            assert_eq!(identity.id, "id-ana@example.com");
            assert_eq!(identity.role, Role::Influencer);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_influencer_marker_never_opens_admin_routes() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let admins = AdminAllowList::parse("ops@example.com");
        let auth = FakeAuth::new("secret");

        sign_in(&store, &auth, "ana@example.com", "secret", Role::Influencer).await?;
        // Even a forged admin marker does not help
        store
            .set_raw(ADMIN_EMAIL_KEY, "ana@example.com".to_string())
            .await?;

        for route in ADMIN_ROUTES {
            assert_eq!(admit(&store, &admins, route).await?, Admission::RedirectToLogin);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_allow_listed_admin_is_admitted_case_insensitively() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let admins = AdminAllowList::parse("Ops@Example.com");
        let auth = FakeAuth::new("secret");

        sign_in(&store, &auth, "OPS@example.com", "secret", Role::Admin).await?;
        for route in ADMIN_ROUTES {
            let Admission::Admitted(identity) = admit(&store, &admins, route).await? else {
                unreachable!("admin should be admitted to {route:?}");
            };
            assert_eq!(identity.role, Role::Admin);
        }
        // No influencer marker was written for an admin sign-in
        assert!(!admit(&store, &admins, Route::Dashboard).await?.is_admitted());
        Ok(())
    }

    #[tokio::test]
    async fn test_admission_rereads_session() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let admins = AdminAllowList::default();
        let auth = FakeAuth::new("secret");

        sign_in(&store, &auth, "ana@example.com", "secret", Role::Influencer).await?;
        assert!(admit(&store, &admins, Route::Dashboard).await?.is_admitted());

        sign_out(&store).await?;
        assert_eq!(
            admit(&store, &admins, Route::Dashboard).await?,
            Admission::RedirectToLogin
        );
        Ok(())
    }

    #[test]
    fn test_route_kinds() {
        assert!(ADMIN_ROUTES.iter().all(|r| r.is_admin_route()));
        assert!(INFLUENCER_ROUTES.iter().all(|r| !r.is_admin_route()));
        assert!(Route::Landing.is_public());
    }
}
