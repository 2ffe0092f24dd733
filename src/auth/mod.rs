//! Account registration and credential checks.
//!
//! Passwords are stored and compared as plain text. Anyone can create an admin
//! account through `POST /admin`.

pub mod token;

use thiserror::Error;
use tracing::{info, warn};

use crate::db::User;
use crate::DbPool;

pub use token::{Claims, TokenError, TokenService};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Create an account. Usernames are matched case-sensitively.
pub async fn register(
    pool: &DbPool,
    username: &str,
    password: &str,
    is_admin: bool,
) -> Result<User, AuthError> {
    if find_by_username(pool, username).await?.is_some() {
        return Err(AuthError::UsernameTaken);
    }

    let result = sqlx::query("INSERT INTO users (username, password, is_admin) VALUES (?, ?, ?)")
        .bind(username)
        .bind(password)
        .bind(is_admin)
        .execute(pool)
        .await
        .map_err(|e| {
            // Lost a race against a concurrent signup for the same name
            if e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                AuthError::UsernameTaken
            } else {
                AuthError::Database(e)
            }
        })?;

    let user = find_user(pool, result.last_insert_rowid()).await?;

    if is_admin {
        warn!(user_id = user.id, "Created admin user {}", user.username);
    } else {
        info!(user_id = user.id, "Created user {}", user.username);
    }

    Ok(user)
}

/// Look up an account by exact username and password.
pub async fn authenticate(pool: &DbPool, username: &str, password: &str) -> Result<User, AuthError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ? AND password = ?")
        .bind(username)
        .bind(password)
        .fetch_optional(pool)
        .await?
        .ok_or(AuthError::InvalidCredentials)
}

pub async fn find_user(pool: &DbPool, id: i64) -> Result<User, AuthError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AuthError::UserNotFound)
}

/// Seed the configured admin account if it does not exist yet.
pub async fn ensure_admin_user(
    pool: &DbPool,
    username: Option<&str>,
    password: Option<&str>,
) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (username, password) else {
        return Ok(());
    };

    if username.is_empty() || password.is_empty() {
        warn!("Ignoring admin seed with empty username or password");
        return Ok(());
    }

    match register(pool, username, password, true).await {
        Ok(_) => Ok(()),
        Err(AuthError::UsernameTaken) => {
            info!("Admin user {} already exists", username);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn test_register_and_authenticate() {
        let pool = db::init_in_memory().await.unwrap();
        let user = register(&pool, "alice", "hunter2", false).await.unwrap();
        assert!(!user.is_admin);

        let found = authenticate(&pool, "alice", "hunter2").await.unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_taken_username_fails_regardless_of_password() {
        let pool = db::init_in_memory().await.unwrap();
        register(&pool, "alice", "one", false).await.unwrap();

        for password in ["one", "two", ""] {
            let err = register(&pool, "alice", password, false).await.unwrap_err();
            assert!(matches!(err, AuthError::UsernameTaken));
        }
        let err = register(&pool, "alice", "three", true).await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let pool = db::init_in_memory().await.unwrap();
        register(&pool, "alice", "pw", false).await.unwrap();
        assert!(register(&pool, "Alice", "pw", false).await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let pool = db::init_in_memory().await.unwrap();
        register(&pool, "alice", "right", false).await.unwrap();

        let err = authenticate(&pool, "alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = authenticate(&pool, "nobody", "right").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_known_insecure_password_stored_in_plain_text() {
        let pool = db::init_in_memory().await.unwrap();
        let user = register(&pool, "alice", "hunter2", false).await.unwrap();

        let stored: (String,) = sqlx::query_as("SELECT password FROM users WHERE id = ?")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored.0, "hunter2");
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let pool = db::init_in_memory().await.unwrap();
        assert!(matches!(
            find_user(&pool, 999).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_ensure_admin_user_is_idempotent() {
        let pool = db::init_in_memory().await.unwrap();
        ensure_admin_user(&pool, Some("root"), Some("toor")).await.unwrap();
        ensure_admin_user(&pool, Some("root"), Some("other")).await.unwrap();

        let admin = authenticate(&pool, "root", "toor").await.unwrap();
        assert!(admin.is_admin);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_ensure_admin_user_skipped_without_credentials() {
        let pool = db::init_in_memory().await.unwrap();
        ensure_admin_user(&pool, Some("root"), None).await.unwrap();
        ensure_admin_user(&pool, None, None).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
