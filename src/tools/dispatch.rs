//! Tool dispatch: lookup, validation, execution and the response envelope.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};

use crate::debug::DebugLogger;
use crate::error::ToolError;
use crate::provider::ClientProvider;
use crate::reference::ReferenceData;
use crate::tools::analytics::{self, AnalyticsQuery};
use crate::tools::registry::{JsonObject, OperationRegistry};
use crate::tools::validate::{validate, AnalyticsArgs, SitemapArgs, ValidatedArguments};

/// One block of response content. Always text carrying JSON.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// The single response shape for every invocation, success or failure.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub content: Vec<TextContent>,
    pub is_error: bool,
}

impl ToolResponse {
    fn from_json(payload: &Value, is_error: bool) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text",
                text: format!("{:#}", payload),
            }],
            is_error,
        }
    }

    pub fn success(payload: &Value) -> Self {
        Self::from_json(payload, false)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::from_json(&json!({ "error": message.into() }), true)
    }

    /// The JSON text of the single content block.
    pub fn text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or_default()
    }
}

/// Routes tool calls to their handlers.
pub struct Dispatcher {
    registry: OperationRegistry,
    provider: Arc<dyn ClientProvider>,
    reference: Arc<ReferenceData>,
    site_url: String,
    today: fn() -> NaiveDate,
    debug: Arc<DebugLogger>,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl Dispatcher {
    pub fn new(
        provider: Arc<dyn ClientProvider>,
        reference: Arc<ReferenceData>,
        site_url: impl Into<String>,
        debug: Arc<DebugLogger>,
    ) -> Self {
        Self {
            registry: OperationRegistry::new(),
            provider,
            reference,
            site_url: site_url.into(),
            today: local_today,
            debug,
        }
    }

    /// Replace the clock used for default analytics dates.
    #[cfg(test)]
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Run one tool call. Never fails: every error becomes an error envelope.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> ToolResponse {
        let arguments = arguments.unwrap_or_default();
        self.debug
            .log_tool_call(name, &Value::Object(arguments.clone()));

        match self.try_dispatch(name, &arguments).await {
            Ok(payload) => {
                let response = ToolResponse::success(&payload);
                self.debug.log_tool_result(name, response.text());
                response
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(tool = name, error = %message, "tool call failed");
                self.debug.log_error(name, &message);
                ToolResponse::error(message)
            }
        }
    }

    async fn try_dispatch(&self, name: &str, arguments: &JsonObject) -> Result<Value, ToolError> {
        let operation = self
            .registry
            .lookup(name)
            .ok_or_else(|| ToolError::UnknownOperation {
                name: name.to_string(),
            })?;

        // Nothing below runs unless validation passed.
        let validated = validate(operation, arguments)?;

        tracing::debug!(tool = name, "executing");
        self.execute(validated).await
    }

    async fn execute(&self, validated: ValidatedArguments) -> Result<Value, ToolError> {
        match validated {
            ValidatedArguments::ListSites => {
                let client = self.provider.client().await?;
                Ok(serde_json::to_value(client.list_sites().await?)?)
            }
            ValidatedArguments::ListDimensions => {
                Ok(serde_json::to_value(self.reference.dimensions())?)
            }
            ValidatedArguments::ListMetrics => Ok(serde_json::to_value(self.reference.metrics())?),
            ValidatedArguments::SearchAnalytics(args) => self.search_analytics(args).await,
            ValidatedArguments::GetSitemaps => {
                let client = self.provider.client().await?;
                Ok(serde_json::to_value(client.list_sitemaps(&self.site_url).await?)?)
            }
            ValidatedArguments::SubmitSitemap(SitemapArgs { sitemap_url }) => {
                let client = self.provider.client().await?;
                client.submit_sitemap(&self.site_url, &sitemap_url).await?;
                Ok(json!({ "success": format!("Sitemap submitted successfully: {}", sitemap_url) }))
            }
            ValidatedArguments::DeleteSitemap(SitemapArgs { sitemap_url }) => {
                let client = self.provider.client().await?;
                client.delete_sitemap(&self.site_url, &sitemap_url).await?;
                Ok(json!({ "success": format!("Sitemap deleted successfully: {}", sitemap_url) }))
            }
        }
    }

    async fn search_analytics(&self, args: AnalyticsArgs) -> Result<Value, ToolError> {
        let query = AnalyticsQuery::resolve(args, (self.today)());
        let request = query.to_request();

        let client = self.provider.client().await?;
        let response = client
            .query_search_analytics(&self.site_url, &request)
            .await?;

        let result = analytics::reshape(&query, &self.site_url, response);
        Ok(serde_json::to_value(result)?)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("site_url", &self.site_url)
            .field("operations", &self.registry.list_operations().len())
            .finish()
    }
}
