//! Session markers - who is signed in, as seen from the user's local store.
//!
//! Sign-in asks the auth service to verify credentials and then writes markers:
//!
//! - `auth_session`: the authenticated account (`{"user_id", "email"}`), written for
//!   every successful sign-in;
//! - `current_influencer_id` / `current_influencer_email`: influencer sign-ins;
//! - `current_admin_email`: admin sign-ins.
//!
//! Markers are only a convenience for the views. Nothing here grants access to data.

use crate::{
    auth::AuthProvider,
    entities::Role,
    errors::{Error, Result},
    store::LocalStore,
};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

/// Store key of the authenticated account
pub const AUTH_SESSION_KEY: &str = "auth_session";
/// Store key of the influencer id marker
pub const INFLUENCER_ID_KEY: &str = "current_influencer_id";
/// Store key of the influencer email marker
pub const INFLUENCER_EMAIL_KEY: &str = "current_influencer_email";
/// Store key of the admin email marker
pub const ADMIN_EMAIL_KEY: &str = "current_admin_email";

/// The signed-in principal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Auth user id; also the influencer id
    pub id: String,
    /// Email the user signed in with
    pub email: String,
    /// Role the current view runs as
    pub role: Role,
}

/// Account the auth service vouched for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Auth user id
    pub user_id: String,
    /// Account email, when the auth service returned one
    pub email: Option<String>,
}

/// Verifies credentials and writes the session markers for `role`.
///
/// The requested role is not checked against the allow-list here; admin views do that
/// on every visit.
pub async fn sign_in<C, A>(
    store: &LocalStore<'_, C>,
    auth: &A,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Identity>
where
    C: ConnectionTrait,
    A: AuthProvider,
{
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(Error::Validation {
            message: "Por favor, preencha todos os campos.".to_string(),
        });
    }

    let user = auth.sign_in_with_password(email, password).await?;
    let account_email = user.email.clone().unwrap_or_else(|| email.to_string());

    // Start from a clean slate so a previous role's markers do not linger
    clear_markers(store).await?;

    let session = AuthSession {
        user_id: user.id.clone(),
        email: Some(account_email.clone()),
    };
    store
        .set_raw(AUTH_SESSION_KEY, serde_json::to_string(&session)?)
        .await?;

    match role {
        Role::Influencer => {
            store.set_raw(INFLUENCER_ID_KEY, user.id.clone()).await?;
            store
                .set_raw(INFLUENCER_EMAIL_KEY, account_email.clone())
                .await?;
        }
        Role::Admin => {
            store.set_raw(ADMIN_EMAIL_KEY, account_email.clone()).await?;
        }
    }

    tracing::info!(owner = %store.owner(), user_id = %user.id, %role, "Signed in");
    Ok(Identity {
        id: user.id,
        email: account_email,
        role,
    })
}

async fn clear_markers<C: ConnectionTrait>(store: &LocalStore<'_, C>) -> Result<()> {
    for key in [
        AUTH_SESSION_KEY,
        INFLUENCER_ID_KEY,
        INFLUENCER_EMAIL_KEY,
        ADMIN_EMAIL_KEY,
    ] {
        store.remove(key).await?;
    }
    Ok(())
}

/// Removes every session marker. The withdrawal draft is left alone.
pub async fn sign_out<C: ConnectionTrait>(store: &LocalStore<'_, C>) -> Result<()> {
    clear_markers(store).await?;
    tracing::info!(owner = %store.owner(), "Signed out");
    Ok(())
}

/// Reads the authenticated account, if any. An unreadable marker counts as signed out.
pub async fn current_session<C: ConnectionTrait>(
    store: &LocalStore<'_, C>,
) -> Result<Option<AuthSession>> {
    let Some(raw) = store.get_raw(AUTH_SESSION_KEY).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(session) => Ok(Some(session)),
        Err(e) => {
            tracing::warn!(owner = %store.owner(), "Ignoring unreadable auth session: {e}");
            Ok(None)
        }
    }
}

/// Influencer marker `(id, email)`, if present.
pub async fn influencer_marker<C: ConnectionTrait>(
    store: &LocalStore<'_, C>,
) -> Result<Option<(String, String)>> {
    let Some(id) = store.get_raw(INFLUENCER_ID_KEY).await? else {
        return Ok(None);
    };
    let email = store
        .get_raw(INFLUENCER_EMAIL_KEY)
        .await?
        .unwrap_or_default();
    Ok(Some((id, email)))
}

#[cfg(test)]
pub mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{auth::AuthUser, test_utils::setup_local_db};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Auth provider that accepts a single password
    pub struct FakeAuth {
        /// The only password accepted
        pub password: &'static str,
        /// Number of sign-in attempts seen
        pub calls: AtomicUsize,
    }

    impl FakeAuth {
        /// Accepts `password` for any email.
        pub const fn new(password: &'static str) -> Self {
            Self {
                password,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AuthProvider for FakeAuth {
        async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthUser> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if password == self.password {
                Ok(AuthUser {
                    id: format!("id-{email}"),
                    email: Some(email.to_lowercase()),
                })
            } else {
                Err(Error::Authentication {
                    message: "Invalid login credentials".to_string(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_sign_in_requires_both_fields() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let auth = FakeAuth::new("secret");

        let result = sign_in(&store, &auth, "  ", "secret", Role::Influencer).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        let result = sign_in(&store, &auth, "ana@example.com", "", Role::Influencer).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_password_writes_nothing() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let auth = FakeAuth::new("secret");

        let result = sign_in(&store, &auth, "ana@example.com", "nope", Role::Influencer).await;
        assert!(matches!(result, Err(Error::Authentication { .. })));
        assert!(current_session(&store).await?.is_none());
        assert!(influencer_marker(&store).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_influencer_sign_in_writes_markers() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let auth = FakeAuth::new("secret");

        let identity = sign_in(&store, &auth, "Ana@Example.com", "secret", Role::Influencer).await?;
        assert_eq!(identity.id, "id-Ana@Example.com");
        assert_eq!(identity.email, "ana@example.com");
        assert_eq!(identity.role, Role::Influencer);

        let session = current_session(&store).await?.unwrap();
        assert_eq!(session.user_id, identity.id);
        assert_eq!(
            influencer_marker(&store).await?,
            Some((identity.id.clone(), identity.email.clone()))
        );
        assert!(store.get_raw(ADMIN_EMAIL_KEY).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_switching_role_clears_old_markers() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let auth = FakeAuth::new("secret");

        sign_in(&store, &auth, "ana@example.com", "secret", Role::Influencer).await?;
        sign_in(&store, &auth, "ops@example.com", "secret", Role::Admin).await?;

        assert!(influencer_marker(&store).await?.is_none());
        assert_eq!(
            store.get_raw(ADMIN_EMAIL_KEY).await?.as_deref(),
            Some("ops@example.com")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_out_clears_markers() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        let auth = FakeAuth::new("secret");

        sign_in(&store, &auth, "ana@example.com", "secret", Role::Influencer).await?;
        sign_out(&store).await?;

        assert!(current_session(&store).await?.is_none());
        assert!(influencer_marker(&store).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_session_counts_as_signed_out() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "discord-1");
        store.set_raw(AUTH_SESSION_KEY, "garbage".to_string()).await?;
        assert!(current_session(&store).await?.is_none());
        Ok(())
    }
}
