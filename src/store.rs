//! Local client state.
//!
//! Each Discord user gets a private key/value namespace in the local state database.
//! Plain string entries hold session markers; structured values go through
//! [`LocalStore::load`] and [`LocalStore::save`], which wrap the JSON payload as
//! `{"version": N, "data": ...}` and upgrade older payloads through [`Persisted::migrate`].
//! Payloads written before versioning existed are treated as version 0.

use crate::{
    entities::{ClientState, client_state},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, Set, prelude::*};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A value with a fixed storage key and a schema version.
pub trait Persisted: Serialize + DeserializeOwned {
    /// Storage key
    const KEY: &'static str;
    /// Version written by [`LocalStore::save`]
    const VERSION: u32;

    /// Upgrades `data` stored under `version` (always lower than [`Self::VERSION`]).
    fn migrate(version: u32, data: Value) -> Result<Value>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Stored {
    version: u32,
    data: Value,
}

/// Per-user view over the `client_state` table.
pub struct LocalStore<'a, C: ConnectionTrait> {
    db: &'a C,
    owner: String,
}

impl<'a, C: ConnectionTrait> LocalStore<'a, C> {
    /// Opens the namespace belonging to `owner`.
    pub fn new(db: &'a C, owner: impl Into<String>) -> Self {
        Self {
            db,
            owner: owner.into(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    async fn find(&self, key: &str) -> Result<Option<client_state::Model>> {
        ClientState::find()
            .filter(client_state::Column::Owner.eq(self.owner.as_str()))
            .filter(client_state::Column::Key.eq(key))
            .one(self.db)
            .await
            .map_err(Into::into)
    }

    /// Reads the raw string stored under `key`.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.find(key).await?.map(|entry| entry.value))
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn set_raw(&self, key: &str, value: String) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();

        if let Some(entry) = self.find(key).await? {
            let mut active_model: client_state::ActiveModel = entry.into();
            active_model.value = Set(value);
            active_model.updated_at = Set(now);
            active_model.update(self.db).await?;
        } else {
            let entry = client_state::ActiveModel {
                owner: Set(self.owner.clone()),
                key: Set(key.to_string()),
                value: Set(value),
                updated_at: Set(now),
                ..Default::default()
            };
            entry.insert(self.db).await?;
        }

        Ok(())
    }

    /// Deletes `key`. Missing keys are not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        ClientState::delete_many()
            .filter(client_state::Column::Owner.eq(self.owner.as_str()))
            .filter(client_state::Column::Key.eq(key))
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Loads a versioned value, migrating older payloads.
    pub async fn load<T: Persisted>(&self) -> Result<Option<T>> {
        match self.get_raw(T::KEY).await? {
            Some(raw) => decode::<T>(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Loads a value, falling back to `T::default()` when it is missing or unreadable.
    pub async fn load_or_default<T: Persisted + Default>(&self) -> Result<T> {
        match self.load::<T>().await {
            Ok(value) => Ok(value.unwrap_or_default()),
            Err(Error::Database(e)) => Err(Error::Database(e)),
            Err(e) => {
                tracing::warn!(
                    owner = %self.owner,
                    key = T::KEY,
                    "Discarding unreadable stored value: {e}"
                );
                Ok(T::default())
            }
        }
    }

    /// Saves a value at the current version.
    pub async fn save<T: Persisted>(&self, value: &T) -> Result<()> {
        self.set_raw(T::KEY, encode(value)?).await
    }

    /// Saves a value, logging a failure instead of returning it. Returns whether the write
    /// landed.
    pub async fn save_or_log<T: Persisted>(&self, value: &T) -> bool {
        match self.save(value).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(owner = %self.owner, key = T::KEY, "Failed to save local state: {e}");
                false
            }
        }
    }
}

fn encode<T: Persisted>(value: &T) -> Result<String> {
    let stored = Stored {
        version: T::VERSION,
        data: serde_json::to_value(value)?,
    };
    serde_json::to_string(&stored).map_err(Into::into)
}

fn decode<T: Persisted>(raw: &str) -> Result<T> {
    let value: Value = serde_json::from_str(raw)?;

    let versioned = value
        .as_object()
        .is_some_and(|map| map.contains_key("version") && map.contains_key("data"));
    let (version, data) = if versioned {
        let stored: Stored = serde_json::from_value(value)?;
        (stored.version, stored.data)
    } else {
        (0, value)
    };

    if version > T::VERSION {
        return Err(Error::Config {
            message: format!(
                "'{}' was written by a newer version ({version} > {})",
                T::KEY,
                T::VERSION
            ),
        });
    }

    let data = if version < T::VERSION {
        T::migrate(version, data)?
    } else {
        data
    };

    serde_json::from_value(data).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_local_db;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
        label: String,
    }

    impl Persisted for Counter {
        const KEY: &'static str = "counter";
        const VERSION: u32 = 1;

        fn migrate(version: u32, data: Value) -> Result<Value> {
            match version {
                // v0 stored a bare number
                0 => Ok(serde_json::json!({ "count": data, "label": "migrated" })),
                v => Err(Error::Config {
                    message: format!("unknown version {v}"),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_raw_values_are_scoped_per_owner() -> Result<()> {
        let db = setup_local_db().await?;
        let alice = LocalStore::new(&db, "alice");
        let bob = LocalStore::new(&db, "bob");

        alice.set_raw("current_influencer_id", "a-1".to_string()).await?;
        assert_eq!(
            alice.get_raw("current_influencer_id").await?,
            Some("a-1".to_string())
        );
        assert_eq!(bob.get_raw("current_influencer_id").await?, None);

        alice.set_raw("current_influencer_id", "a-2".to_string()).await?;
        assert_eq!(
            alice.get_raw("current_influencer_id").await?,
            Some("a-2".to_string())
        );

        alice.remove("current_influencer_id").await?;
        assert_eq!(alice.get_raw("current_influencer_id").await?, None);

        // Removing twice is fine
        alice.remove("current_influencer_id").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_save_writes_versioned_payload() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "alice");
        let value = Counter {
            count: 3,
            label: "three".to_string(),
        };

        store.save(&value).await?;

        let raw = store.get_raw("counter").await?.unwrap();
        let stored: Value = serde_json::from_str(&raw)?;
        assert_eq!(stored["version"], 1);
        assert_eq!(stored["data"]["count"], 3);
        assert_eq!(store.load::<Counter>().await?, Some(value));
        Ok(())
    }

    #[tokio::test]
    async fn test_unversioned_payload_is_migrated() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "alice");
        store.set_raw("counter", "7".to_string()).await?;

        let loaded = store.load::<Counter>().await?.unwrap();
        assert_eq!(loaded.count, 7);
        assert_eq!(loaded.label, "migrated");
        Ok(())
    }

    #[tokio::test]
    async fn test_newer_version_is_rejected() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "alice");
        store
            .set_raw("counter", r#"{"version":9,"data":{}}"#.to_string())
            .await?;

        assert!(matches!(
            store.load::<Counter>().await,
            Err(Error::Config { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_payload_falls_back_to_default() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "alice");
        store.set_raw("counter", "{not json".to_string()).await?;

        assert!(store.load::<Counter>().await.is_err());
        assert_eq!(store.load_or_default::<Counter>().await?, Counter::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_or_log_reports_failure() -> Result<()> {
        let db = setup_local_db().await?;
        let store = LocalStore::new(&db, "alice");
        let counter = Counter {
            count: 3,
            label: "ok".to_string(),
        };
        assert!(store.save_or_log(&counter).await);
        assert_eq!(store.load::<Counter>().await?, Some(counter));

        let bare = sea_orm::Database::connect("sqlite::memory:").await?;
        let store = LocalStore::new(&bare, "alice");
        assert!(!store.save_or_log(&Counter::default()).await);
        Ok(())
    }
}
