//! # Operator Repository
//!
//! The credential store: checks an operator's username and password
//! against the `users` table.
//!
//! ## Login Check
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  authenticate("operator1", "password123")                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT password FROM users WHERE username = 'operator1'               │
//! │       │                                                                 │
//! │       ├── no row            → false                                    │
//! │       ├── stored != given   → false                                    │
//! │       └── stored == given   → true                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Passwords are stored and compared as plaintext, with no lockout or
//! rate limiting. Callers depend only on [`CredentialStore`], so a hashed
//! scheme can replace this repository without touching them.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Decides whether a username/password pair may log in.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns `true` only for an exact, case-sensitive match of both
    /// fields. Unknown usernames and empty strings return `false`.
    async fn authenticate(&self, username: &str, password: &str) -> DbResult<bool>;
}

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct OperatorRepository {
    pool: SqlitePool,
}

impl OperatorRepository {
    /// Creates a new OperatorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OperatorRepository { pool }
    }

    /// Counts operators (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl CredentialStore for OperatorRepository {
    async fn authenticate(&self, username: &str, password: &str) -> DbResult<bool> {
        debug!(username = %username, "Checking operator credentials");

        let stored: Option<String> =
            sqlx::query_scalar("SELECT password FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let matched = stored.is_some_and(|stored| stored == password);
        debug!(username = %username, matched, "Credential check complete");

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::schema::SEED_OPERATORS;

    async fn store() -> OperatorRepository {
        Database::open(DbConfig::in_memory())
            .await
            .unwrap()
            .operators()
    }

    #[tokio::test]
    async fn test_seeded_operators_authenticate() {
        let store = store().await;

        for (username, password) in SEED_OPERATORS {
            assert!(store.authenticate(username, password).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_wrong_password_denied() {
        let store = store().await;

        assert!(store.authenticate("operator1", "password123").await.unwrap());
        assert!(!store.authenticate("operator1", "wrong").await.unwrap());
    }

    #[tokio::test]
    async fn test_comparison_is_exact() {
        let store = store().await;

        assert!(!store.authenticate("Operator1", "password123").await.unwrap());
        assert!(!store.authenticate("operator1", "PASSWORD123").await.unwrap());
        assert!(!store.authenticate("operator1", "password123 ").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_and_empty_denied() {
        let store = store().await;

        assert!(!store.authenticate("operator3", "password123").await.unwrap());
        assert!(!store.authenticate("", "").await.unwrap());
        assert!(!store.authenticate("operator1", "").await.unwrap());
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let store: Box<dyn CredentialStore> = Box::new(store().await);

        assert!(store.authenticate("operator2", "password123").await.unwrap());
    }

    #[tokio::test]
    async fn test_count() {
        assert_eq!(store().await.count().await.unwrap(), 2);
    }
}
