//! In-memory backend and provider used by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{
    SearchAnalyticsRequest, SearchAnalyticsResponse, SearchConsoleApi, SiteEntry, Sitemap,
};
use crate::error::{ApiError, AuthError};
use crate::provider::ClientProvider;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    ListSites,
    QuerySearchAnalytics(String, SearchAnalyticsRequest),
    ListSitemaps(String),
    SubmitSitemap(String, String),
    DeleteSitemap(String, String),
}

/// Backend double that records every call and answers with canned data.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    provider_calls: AtomicUsize,
    sites: Vec<SiteEntry>,
    sitemaps: Vec<Sitemap>,
    analytics: SearchAnalyticsResponse,
    failure: Option<fn() -> ApiError>,
}

impl RecordingBackend {
    pub fn with_sites(mut self, sites: Vec<SiteEntry>) -> Self {
        self.sites = sites;
        self
    }

    pub fn with_sitemaps(mut self, sitemaps: Vec<Sitemap>) -> Self {
        self.sitemaps = sitemaps;
        self
    }

    pub fn with_analytics(mut self, analytics: SearchAnalyticsResponse) -> Self {
        self.analytics = analytics;
        self
    }

    /// Every call fails with the error produced by `failure`.
    pub fn failing_with(mut self, failure: fn() -> ApiError) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// How many times a provider handed this backend out.
    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::SeqCst)
    }

    pub fn last_analytics_request(&self) -> Option<SearchAnalyticsRequest> {
        self.calls().into_iter().rev().find_map(|call| match call {
            BackendCall::QuerySearchAnalytics(_, request) => Some(request),
            _ => None,
        })
    }

    fn record(&self, call: BackendCall) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SearchConsoleApi for RecordingBackend {
    async fn list_sites(&self) -> Result<Vec<SiteEntry>, ApiError> {
        self.record(BackendCall::ListSites)?;
        Ok(self.sites.clone())
    }

    async fn query_search_analytics(
        &self,
        site_url: &str,
        request: &SearchAnalyticsRequest,
    ) -> Result<SearchAnalyticsResponse, ApiError> {
        self.record(BackendCall::QuerySearchAnalytics(
            site_url.to_string(),
            request.clone(),
        ))?;
        Ok(self.analytics.clone())
    }

    async fn list_sitemaps(&self, site_url: &str) -> Result<Vec<Sitemap>, ApiError> {
        self.record(BackendCall::ListSitemaps(site_url.to_string()))?;
        Ok(self.sitemaps.clone())
    }

    async fn submit_sitemap(&self, site_url: &str, feedpath: &str) -> Result<(), ApiError> {
        self.record(BackendCall::SubmitSitemap(
            site_url.to_string(),
            feedpath.to_string(),
        ))
    }

    async fn delete_sitemap(&self, site_url: &str, feedpath: &str) -> Result<(), ApiError> {
        self.record(BackendCall::DeleteSitemap(
            site_url.to_string(),
            feedpath.to_string(),
        ))
    }
}

/// Provider that hands out a fixed backend, or always fails to authenticate.
pub struct StaticProvider {
    backend: Option<Arc<RecordingBackend>>,
    failure: Option<fn() -> AuthError>,
}

impl StaticProvider {
    pub fn new(backend: Arc<RecordingBackend>) -> Self {
        Self {
            backend: Some(backend),
            failure: None,
        }
    }

    pub fn failing(failure: fn() -> AuthError) -> Self {
        Self {
            backend: None,
            failure: Some(failure),
        }
    }
}

#[async_trait]
impl ClientProvider for StaticProvider {
    async fn client(&self) -> Result<Arc<dyn SearchConsoleApi>, AuthError> {
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        let backend = self.backend.clone().ok_or(AuthError::NoToken)?;
        backend.provider_calls.fetch_add(1, Ordering::SeqCst);
        let backend: Arc<dyn SearchConsoleApi> = backend;
        Ok(backend)
    }
}
