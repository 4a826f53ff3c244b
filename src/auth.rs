//! OAuth2 service account authentication for the Search Console API.
//!
//! Implements the JWT bearer grant: an RS256-signed assertion is exchanged
//! at the key's `token_uri` for a short-lived access token, which is cached
//! until it comes within the configured buffer of expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{AuthError, ConfigError};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime Google accepts for a signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The fields of a service account key file this server needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Read a key file downloaded from the Google Cloud console.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Claims of the signed assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// OAuth2 token response from Google.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    #[serde(default)]
    token_type: String,
    expires_in: i64,
}

/// Cached token with expiration tracking.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Check if token is expired (with buffer).
    fn is_expired(&self, buffer: Duration) -> bool {
        Utc::now() + buffer >= self.expires_at
    }
}

/// Service account token source.
#[derive(Clone)]
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    scope: String,
    token_buffer: Duration,
    http_client: Client,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountAuth {
    /// Create a new token source for the given key.
    pub fn new(key: ServiceAccountKey, config: &Config) -> Result<Self, AuthError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuthError::HttpClientInit(e.to_string()))?;

        Ok(Self {
            key,
            scope: config.scope.clone(),
            token_buffer: config.token_buffer(),
            http_client,
            token_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        {
            let cache = self.token_cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired(self.token_buffer) {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        self.fetch_token().await
    }

    /// Build and sign the assertion presented to the token endpoint.
    fn signed_assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        if self.key.client_email.is_empty() {
            return Err(AuthError::InvalidKey("client_email is empty".to_string()));
        }
        if self.key.private_key.trim().is_empty() {
            return Err(AuthError::InvalidKey("private_key is empty".to_string()));
        }

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
    }

    /// Exchange a fresh assertion for an access token.
    async fn fetch_token(&self) -> Result<String, AuthError> {
        let assertion = self.signed_assertion(Utc::now())?;

        tracing::debug!(token_uri = %self.key.token_uri, "fetching service account token");

        let body = format!(
            "grant_type={}&assertion={}",
            urlencoding::encode(JWT_BEARER_GRANT),
            urlencoding::encode(&assertion)
        );

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, "token request failed");
            return Err(AuthError::TokenRequestFailed { status, body });
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            AuthError::TokenParse(format!("Failed to parse token response: {}", e))
        })?;

        if token_response.access_token.is_empty() {
            return Err(AuthError::NoToken);
        }

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        tracing::debug!(
            expires_at = %expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
            "service account token acquired"
        );

        let cached = CachedToken {
            access_token: token_response.access_token.clone(),
            expires_at,
        };

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(cached);
        }

        Ok(token_response.access_token)
    }
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.key.client_email)
            .field("scope", &self.scope)
            .finish()
    }
}
