//! User data access - accounts stored in the backend `users` collection.
//!
//! Thin typed wrappers: list, lookup, create, update, delete and count. Lookups return
//! `Ok(None)` for missing rows so callers decide whether absence is an error.

use crate::{
    entities::{Role, User, user},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder, Set, prelude::*};

/// Fields accepted when creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    /// Defaults to [`Role::Influencer`]
    pub role: Option<Role>,
}

/// Fields that can be changed on an existing user; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// Lists all users, newest first.
pub async fn list_users<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_desc(user::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn get_user_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<Option<user::Model>> {
    User::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a user by email (case-insensitive).
pub async fn get_user_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a user with a fresh id. Emails are stored lower-cased.
pub async fn create_user<C: ConnectionTrait>(db: &C, new_user: NewUser) -> Result<user::Model> {
    let email = new_user.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Validation {
            message: format!("'{}' is not a valid email", new_user.email),
        });
    }

    let now = chrono::Utc::now();
    let model = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        email: Set(email),
        name: Set(new_user.name),
        role: Set(new_user.role.unwrap_or(Role::Influencer)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    model.insert(db).await.map_err(Into::into)
}

/// Applies `updates` and stamps `updated_at`.
pub async fn update_user<C: ConnectionTrait>(
    db: &C,
    id: &str,
    updates: UserUpdate,
) -> Result<user::Model> {
    let mut model: user::ActiveModel = get_user_by_id(db, id)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "User",
            id: id.to_string(),
        })?
        .into();

    if let Some(email) = updates.email {
        model.email = Set(email.trim().to_lowercase());
    }
    if let Some(name) = updates.name {
        model.name = Set(Some(name));
    }
    if let Some(role) = updates.role {
        model.role = Set(role);
    }
    model.updated_at = Set(chrono::Utc::now());

    model.update(db).await.map_err(Into::into)
}

pub async fn delete_user<C: ConnectionTrait>(db: &C, id: &str) -> Result<()> {
    let result = User::delete_by_id(id.to_string()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }
    Ok(())
}

pub async fn count_users<C: ConnectionTrait>(db: &C) -> Result<u64> {
    User::find().count(db).await.map_err(Into::into)
}

/// Lists users with the given role, newest first.
pub async fn get_users_by_role<C: ConnectionTrait>(db: &C, role: Role) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Role.eq(role))
        .order_by_desc(user::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
