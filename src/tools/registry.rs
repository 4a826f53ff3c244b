//! The fixed set of operations and their discovery descriptors.

use serde::Serialize;
use serde_json::{json, Value};

pub type JsonObject = serde_json::Map<String, Value>;

/// Every operation the server exposes, in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListSites,
    ListDimensions,
    ListMetrics,
    SearchAnalytics,
    GetSitemaps,
    SubmitSitemap,
    DeleteSitemap,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::ListSites,
        Operation::ListDimensions,
        Operation::ListMetrics,
        Operation::SearchAnalytics,
        Operation::GetSitemaps,
        Operation::SubmitSitemap,
        Operation::DeleteSitemap,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ListSites => "list_gsc_sites",
            Self::ListDimensions => "list_available_dimensions",
            Self::ListMetrics => "list_available_metrics",
            Self::SearchAnalytics => "get_search_analytics",
            Self::GetSitemaps => "get_sitemaps",
            Self::SubmitSitemap => "submit_sitemap",
            Self::DeleteSitemap => "delete_sitemap",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::ListSites => "List all sites verified in Google Search Console",
            Self::ListDimensions => "List all available GSC dimensions with their descriptions",
            Self::ListMetrics => "List all available GSC metrics with their descriptions",
            Self::SearchAnalytics => "Retrieve Google Search Console search analytics data",
            Self::GetSitemaps => "Get all sitemaps for the configured site",
            Self::SubmitSitemap => "Submit a sitemap to Google Search Console",
            Self::DeleteSitemap => "Delete a sitemap from Google Search Console",
        }
    }

    pub fn input_schema(self) -> JsonObject {
        let schema = match self {
            Self::ListSites | Self::ListDimensions | Self::ListMetrics | Self::GetSitemaps => {
                json!({ "type": "object", "properties": {} })
            }
            Self::SearchAnalytics => search_analytics_schema(),
            Self::SubmitSitemap => sitemap_url_schema("Full URL of the sitemap to submit"),
            Self::DeleteSitemap => sitemap_url_schema("Full URL of the sitemap to delete"),
        };
        match schema {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        }
    }

    pub fn descriptor(self) -> OperationDescriptor {
        OperationDescriptor {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

fn search_analytics_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "dimensions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of dimensions: country, device, page, query, searchAppearance, date",
                "default": ["query"]
            },
            "start_date": {
                "type": "string",
                "description": "Start date in YYYY-MM-DD format (defaults to 30 days ago)"
            },
            "end_date": {
                "type": "string",
                "description": "End date in YYYY-MM-DD format (defaults to 3 days ago)"
            },
            "filters": {
                "type": "array",
                "description": "List of filter objects",
                "items": {
                    "type": "object",
                    "properties": {
                        "dimension": { "type": "string" },
                        "operator": { "type": "string" },
                        "expression": { "type": "string" }
                    }
                }
            },
            "search_type": {
                "type": "string",
                "description": "Type of search: web, image, video, news, discover, googleNews",
                "default": "web"
            },
            "row_limit": {
                "type": "number",
                "description": "Maximum number of rows to return (max 25000)",
                "default": 1000
            },
            "start_row": {
                "type": "number",
                "description": "Starting row for pagination (0-based)",
                "default": 0
            }
        }
    })
}

fn sitemap_url_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "sitemap_url": {
                "type": "string",
                "description": description
            }
        },
        "required": ["sitemap_url"]
    })
}

/// Discovery entry for one operation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: JsonObject,
}

/// Name lookup plus the discovery catalog, built once at startup.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    descriptors: Vec<OperationDescriptor>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: Operation::ALL.iter().map(|op| op.descriptor()).collect(),
        }
    }

    /// Descriptors in declaration order.
    pub fn list_operations(&self) -> &[OperationDescriptor] {
        &self.descriptors
    }

    pub fn lookup(&self, name: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_order_and_names() {
        let registry = OperationRegistry::new();
        let names: Vec<&str> = registry.list_operations().iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "list_gsc_sites",
                "list_available_dimensions",
                "list_available_metrics",
                "get_search_analytics",
                "get_sitemaps",
                "submit_sitemap",
                "delete_sitemap",
            ]
        );
    }

    #[test]
    fn test_lookup_round_trips_every_name() {
        let registry = OperationRegistry::new();
        for op in Operation::ALL {
            assert_eq!(registry.lookup(op.name()), Some(op));
        }
        assert_eq!(registry.lookup("drop_site"), None);
    }

    #[test]
    fn test_analytics_schema_carries_defaults() {
        let schema = Operation::SearchAnalytics.input_schema();
        let props = &schema["properties"];
        assert_eq!(props["dimensions"]["default"], json!(["query"]));
        assert_eq!(props["search_type"]["default"], "web");
        assert_eq!(props["row_limit"]["default"], 1000);
        assert_eq!(props["start_row"]["default"], 0);
    }

    #[test]
    fn test_sitemap_schemas_require_url() {
        for op in [Operation::SubmitSitemap, Operation::DeleteSitemap] {
            let schema = op.input_schema();
            assert_eq!(schema["required"], json!(["sitemap_url"]));
        }
    }

    #[test]
    fn test_descriptor_serializes_input_schema_camel_case() {
        let out = serde_json::to_value(Operation::GetSitemaps.descriptor()).unwrap();
        assert_eq!(out["inputSchema"]["type"], "object");
    }
}
