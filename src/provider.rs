//! Backend client provider.
//!
//! Handlers never build API clients themselves; they ask a
//! [`ClientProvider`] for one. The production provider checks that the
//! credential exchange succeeds and memoizes the client for the process
//! lifetime.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;

use crate::api::{SearchConsoleApi, SearchConsoleClient};
use crate::auth::ServiceAccountAuth;
use crate::error::AuthError;
use crate::rest::RestClient;

#[async_trait]
pub trait ClientProvider: Send + Sync {
    /// Hand out an authenticated backend handle.
    async fn client(&self) -> Result<Arc<dyn SearchConsoleApi>, AuthError>;
}

/// Provider backed by a service account.
pub struct GoogleClientProvider {
    auth: ServiceAccountAuth,
    api_base_url: String,
    timeout: std::time::Duration,
    client: OnceLock<Arc<SearchConsoleClient>>,
}

impl GoogleClientProvider {
    pub fn new(
        auth: ServiceAccountAuth,
        api_base_url: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Self {
        Self {
            auth,
            api_base_url: api_base_url.into(),
            timeout,
            client: OnceLock::new(),
        }
    }

    fn build_client(&self) -> Result<Arc<SearchConsoleClient>, AuthError> {
        let rest = RestClient::new(self.api_base_url.clone(), self.auth.clone(), self.timeout)
            .map_err(|e| AuthError::HttpClientInit(e.to_string()))?;
        Ok(Arc::new(SearchConsoleClient::new(rest)))
    }
}

#[async_trait]
impl ClientProvider for GoogleClientProvider {
    async fn client(&self) -> Result<Arc<dyn SearchConsoleApi>, AuthError> {
        // Fails fast on broken credentials; the token is cached afterwards.
        self.auth.get_token().await?;

        if let Some(client) = self.client.get() {
            let client: Arc<dyn SearchConsoleApi> = client.clone();
            return Ok(client);
        }

        // Concurrent first calls may both build a client; the first stored wins.
        let built = self.build_client()?;
        let client: Arc<dyn SearchConsoleApi> = self.client.get_or_init(|| built).clone();
        tracing::debug!(base_url = %self.api_base_url, "search console client ready");
        Ok(client)
    }
}

impl std::fmt::Debug for GoogleClientProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleClientProvider")
            .field("auth", &self.auth)
            .field("api_base_url", &self.api_base_url)
            .field("ready", &self.client.get().is_some())
            .finish()
    }
}
