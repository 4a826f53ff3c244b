//! Search Analytics resource - the `searchAnalytics.query` request and rows.

use serde::{Deserialize, Serialize};

/// Body of `POST /sites/{site}/searchAnalytics/query`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsRequest {
    pub start_date: String,
    pub end_date: String,
    pub dimensions: Vec<String>,
    pub search_type: String,
    pub row_limit: u32,
    pub start_row: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension_filter_groups: Vec<DimensionFilterGroup>,
}

/// Filters inside one group are combined with AND.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilterGroup {
    pub filters: Vec<DimensionFilter>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    pub dimension: String,
    pub operator: String,
    pub expression: String,
}

/// Response of the query. `rows` is absent when nothing matched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsResponse {
    #[serde(default)]
    pub rows: Vec<ApiDataRow>,
    #[allow(dead_code)]
    #[serde(default)]
    pub response_aggregation_type: Option<String>,
}

/// One result row; `keys` follow the order of the requested dimensions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDataRow {
    #[serde(default)]
    pub keys: Vec<String>,
    pub clicks: Option<f64>,
    pub impressions: Option<f64>,
    pub ctr: Option<f64>,
    pub position: Option<f64>,
}
