//! # Auth Commands
//!
//! Operator login against the credential store.
//!
//! There is no session token: a successful login just names the operator
//! for the rest of the console session.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ApiError, INVALID_CREDENTIALS};
use crate::state::DbState;
use stockroom_db::CredentialStore;

/// The logged-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSession {
    pub username: String,
}

/// Logs an operator in.
///
/// ## Returns
/// * `Ok(OperatorSession)` - Credentials matched
/// * `Err(AUTHENTICATION_DENIED)` - Blank or wrong credentials
/// * `Err(STORAGE_ERROR)` - The store could not be queried
pub async fn login(
    db: &DbState,
    username: &str,
    password: &str,
) -> Result<OperatorSession, ApiError> {
    login_with(&db.inner().operators(), username, password).await
}

/// Logs an operator in against any credential store.
pub async fn login_with(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<OperatorSession, ApiError> {
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::denied("Please enter username and password."));
    }

    if store.authenticate(username, password).await? {
        info!(username = %username, "Operator logged in");
        Ok(OperatorSession {
            username: username.to_string(),
        })
    } else {
        warn!(username = %username, "Login denied");
        Err(ApiError::denied(INVALID_CREDENTIALS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use stockroom_db::{DbError, DbResult};

    struct BrokenStore;

    #[async_trait]
    impl CredentialStore for BrokenStore {
        async fn authenticate(&self, _username: &str, _password: &str) -> DbResult<bool> {
            Err(DbError::QueryFailed("database disk image is malformed".to_string()))
        }
    }

    #[tokio::test]
    async fn test_login_with_seeded_operator() {
        let db = DbState::in_memory().await.unwrap();

        let session = login(&db, "operator1", "password123").await.unwrap();
        assert_eq!(session.username, "operator1");
    }

    #[tokio::test]
    async fn test_wrong_password_denied() {
        let db = DbState::in_memory().await.unwrap();

        let err = login(&db, "operator1", "wrong").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthenticationDenied);
        assert_eq!(err.message, INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_blank_credentials_denied() {
        let db = DbState::in_memory().await.unwrap();

        let err = login(&db, "", "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthenticationDenied);
    }

    #[tokio::test]
    async fn test_store_failure_is_storage_error() {
        let err = login_with(&BrokenStore, "operator1", "password123")
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::StorageError);
    }
}
