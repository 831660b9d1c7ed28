//! OAuth token handling for the calendar service
//!
//! Tokens are provisioned externally (the initial consent flow is not part
//! of a batch job) and stored as JSON on disk. This module loads them,
//! refreshes the access token when it is about to expire and persists the
//! result for the next run.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NotifierError, Result};

/// Google OAuth 2.0 token endpoint.
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Seconds before actual expiry at which a token counts as expired.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// A persisted OAuth token set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// The access token for API requests
    pub access_token: String,
    /// The refresh token for obtaining new access tokens
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Returns true if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + Duration::seconds(EXPIRY_BUFFER_SECS) >= expires_at,
            // Tokens without expiry are assumed valid
            None => false,
        }
    }
}

/// File-backed token storage with refresh support
#[derive(Debug)]
pub struct TokenStore {
    /// Path to the JSON token file
    path: PathBuf,
    /// OAuth token endpoint
    token_endpoint: String,
}

impl TokenStore {
    /// Creates a token store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            token_endpoint: TOKEN_ENDPOINT.to_string(),
        }
    }

    /// Points the store at a different token endpoint (for testing).
    #[cfg(test)]
    fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    /// Loads the token set from disk.
    ///
    /// # Errors
    /// Returns `NotifierError::Auth` if the token file is missing or not
    /// valid JSON.
    pub fn load(&self) -> Result<TokenSet> {
        if !self.path.exists() {
            return Err(NotifierError::Auth(format!(
                "token file {} not found; run the OAuth consent flow and place the token JSON there",
                self.path.display()
            )));
        }

        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| NotifierError::Auth(format!("invalid token file: {}", e)))
    }

    /// Persists the token set to disk.
    pub fn save(&self, tokens: &TokenSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(tokens)
            .map_err(|e| NotifierError::Auth(format!("failed to serialize tokens: {}", e)))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Returns a valid access token, refreshing and re-persisting first if
    /// the stored one is expired.
    ///
    /// # Errors
    /// Returns `NotifierError::Auth` if no usable token can be produced.
    pub async fn access_token(&self, client_id: &str, client_secret: &str) -> Result<String> {
        let mut tokens = self.load()?;

        if tokens.is_expired() {
            let refresh_token = tokens.refresh_token.clone().ok_or_else(|| {
                NotifierError::Auth("access token expired and no refresh token stored".to_string())
            })?;

            debug!("access token expired, refreshing");
            let refreshed = self
                .refresh_access_token(client_id, client_secret, &refresh_token)
                .await?;

            tokens.access_token = refreshed.access_token;
            tokens.expires_at = refreshed
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs));
            self.save(&tokens)?;
        }

        Ok(tokens.access_token)
    }

    /// Exchanges a refresh token for a new access token.
    async fn refresh_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<RefreshResponse> {
        let client = reqwest::Client::new();
        let response = client
            .post(&self.token_endpoint)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifierError::Auth(format!(
                "token refresh failed (HTTP {}): {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| NotifierError::Auth(format!("invalid token refresh response: {}", e)))
    }
}

/// Response from the OAuth token endpoint.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_missing_token_file_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        let result = store.load();
        match result {
            Err(NotifierError::Auth(msg)) => assert!(msg.contains("not found")),
            other => panic!("expected Auth error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        let tokens = TokenSet {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(Utc::now() + Duration::hours(1)),
        };
        store.save(&tokens).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.access_token, "access");
        assert_eq!(loaded.refresh_token.as_deref(), Some("refresh"));
    }

    #[test]
    fn test_token_expiry_buffer() {
        let fresh = TokenSet {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: Some(Utc::now() + Duration::hours(1)),
        };
        assert!(!fresh.is_expired());

        let nearly_expired = TokenSet {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: Some(Utc::now() + Duration::seconds(30)),
        };
        assert!(nearly_expired.is_expired());

        let no_expiry = TokenSet {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: None,
        };
        assert!(!no_expiry.is_expired());
    }

    #[tokio::test]
    async fn test_access_token_refreshes_expired_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=old-refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{ "access_token": "new-access", "expires_in": 3600 }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store =
            TokenStore::new(dir.path().join("token.json")).with_token_endpoint(server.uri());
        store
            .save(&TokenSet {
                access_token: "old-access".to_string(),
                refresh_token: Some("old-refresh".to_string()),
                expires_at: Some(Utc::now() - Duration::hours(1)),
            })
            .unwrap();

        let token = store.access_token("id", "secret").await.unwrap();
        assert_eq!(token, "new-access");

        // The refreshed token was persisted for the next run
        let persisted = store.load().unwrap();
        assert_eq!(persisted.access_token, "new-access");
        assert!(!persisted.is_expired());
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        store
            .save(&TokenSet {
                access_token: "old".to_string(),
                refresh_token: None,
                expires_at: Some(Utc::now() - Duration::hours(1)),
            })
            .unwrap();

        let result = store.access_token("id", "secret").await;
        assert!(matches!(result, Err(NotifierError::Auth(_))));
    }
}
