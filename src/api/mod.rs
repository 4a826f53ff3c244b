//! Google Search Console API surface.

pub mod searchanalytics;
pub mod sitemaps;
pub mod sites;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::rest::{encoded_path, RestClient};

pub use searchanalytics::{
    ApiDataRow, DimensionFilter, DimensionFilterGroup, SearchAnalyticsRequest,
    SearchAnalyticsResponse,
};
pub use sitemaps::Sitemap;
pub use sites::SiteEntry;

/// The backend capabilities the tools are allowed to use.
#[async_trait]
pub trait SearchConsoleApi: Send + Sync {
    async fn list_sites(&self) -> Result<Vec<SiteEntry>, ApiError>;

    async fn query_search_analytics(
        &self,
        site_url: &str,
        request: &SearchAnalyticsRequest,
    ) -> Result<SearchAnalyticsResponse, ApiError>;

    async fn list_sitemaps(&self, site_url: &str) -> Result<Vec<Sitemap>, ApiError>;

    async fn submit_sitemap(&self, site_url: &str, feedpath: &str) -> Result<(), ApiError>;

    async fn delete_sitemap(&self, site_url: &str, feedpath: &str) -> Result<(), ApiError>;
}

/// Webmasters v3 implementation of [`SearchConsoleApi`].
#[derive(Clone)]
pub struct SearchConsoleClient {
    rest: RestClient,
}

impl SearchConsoleClient {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl SearchConsoleApi for SearchConsoleClient {
    async fn list_sites(&self) -> Result<Vec<SiteEntry>, ApiError> {
        let response: sites::SitesListResponse = self.rest.get("/sites").await?;
        Ok(response.site_entry)
    }

    async fn query_search_analytics(
        &self,
        site_url: &str,
        request: &SearchAnalyticsRequest,
    ) -> Result<SearchAnalyticsResponse, ApiError> {
        let path = format!(
            "{}/searchAnalytics/query",
            encoded_path(&["sites", site_url])
        );
        self.rest.post(&path, request).await
    }

    async fn list_sitemaps(&self, site_url: &str) -> Result<Vec<Sitemap>, ApiError> {
        let path = encoded_path(&["sites", site_url, "sitemaps"]);
        let response: sitemaps::SitemapsListResponse = self.rest.get(&path).await?;
        Ok(response.sitemap)
    }

    async fn submit_sitemap(&self, site_url: &str, feedpath: &str) -> Result<(), ApiError> {
        let path = encoded_path(&["sites", site_url, "sitemaps", feedpath]);
        self.rest.put(&path).await
    }

    async fn delete_sitemap(&self, site_url: &str, feedpath: &str) -> Result<(), ApiError> {
        let path = encoded_path(&["sites", site_url, "sitemaps", feedpath]);
        self.rest.delete(&path).await
    }
}

impl std::fmt::Debug for SearchConsoleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConsoleClient")
            .field("rest", &self.rest)
            .finish()
    }
}
