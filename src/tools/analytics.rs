//! Search analytics query construction and result reshaping.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{
    ApiDataRow, DimensionFilter, DimensionFilterGroup, SearchAnalyticsRequest,
    SearchAnalyticsResponse,
};
use crate::tools::registry::JsonObject;
use crate::tools::validate::{AnalyticsArgs, Dimension, FilterSpec};

/// Largest page the API will return.
pub const MAX_ROW_LIMIT: u64 = 25_000;

/// Default window start, in days before today.
const DEFAULT_START_OFFSET_DAYS: u64 = 30;

/// Default window end. Search Console data lags by a few days.
const DEFAULT_END_OFFSET_DAYS: u64 = 3;

/// A fully resolved query: dates filled in, limits still as requested.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsQuery {
    pub dimensions: Vec<Dimension>,
    pub start_date: String,
    pub end_date: String,
    pub search_type: String,
    pub row_limit: u64,
    pub start_row: u64,
    pub filters: Vec<FilterSpec>,
}

impl AnalyticsQuery {
    /// Fill in default dates relative to `today`. Caller dates pass through
    /// untouched; the API rejects malformed ones.
    pub fn resolve(args: AnalyticsArgs, today: NaiveDate) -> Self {
        Self {
            start_date: args
                .start_date
                .unwrap_or_else(|| days_before(today, DEFAULT_START_OFFSET_DAYS)),
            end_date: args
                .end_date
                .unwrap_or_else(|| days_before(today, DEFAULT_END_OFFSET_DAYS)),
            dimensions: args.dimensions,
            search_type: args.search_type,
            row_limit: args.row_limit,
            start_row: args.start_row,
            filters: args.filters,
        }
    }

    /// The row limit actually sent to the API.
    pub fn effective_row_limit(&self) -> u32 {
        // MAX_ROW_LIMIT fits in u32.
        self.row_limit.min(MAX_ROW_LIMIT) as u32
    }

    pub fn to_request(&self) -> SearchAnalyticsRequest {
        let dimension_filter_groups = if self.filters.is_empty() {
            Vec::new()
        } else {
            vec![DimensionFilterGroup {
                filters: self
                    .filters
                    .iter()
                    .map(|f| DimensionFilter {
                        dimension: f.dimension.as_str().to_string(),
                        operator: f.operator.clone(),
                        expression: f.expression.clone(),
                    })
                    .collect(),
            }]
        };

        SearchAnalyticsRequest {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            dimensions: self
                .dimensions
                .iter()
                .map(|d| d.as_str().to_string())
                .collect(),
            search_type: self.search_type.clone(),
            row_limit: self.effective_row_limit(),
            start_row: self.start_row,
            dimension_filter_groups,
        }
    }
}

fn days_before(today: NaiveDate, days: u64) -> String {
    (today - Days::new(days)).format("%Y-%m-%d").to_string()
}

/// Echo of the resolved query. `row_limit` is the requested value, before
/// clamping, so callers can compare it with `total_rows`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyticsMetadata {
    pub site_url: String,
    pub start_date: String,
    pub end_date: String,
    pub dimensions: Vec<&'static str>,
    pub search_type: String,
    pub total_rows: usize,
    pub row_limit: u64,
    pub start_row: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyticsResult {
    pub metadata: AnalyticsMetadata,
    pub data: Vec<JsonObject>,
}

/// Reshape API rows into records keyed by the requested dimension names.
pub fn reshape(
    query: &AnalyticsQuery,
    site_url: &str,
    response: SearchAnalyticsResponse,
) -> AnalyticsResult {
    let data: Vec<JsonObject> = response
        .rows
        .iter()
        .map(|row| reshape_row(&query.dimensions, row))
        .collect();

    AnalyticsResult {
        metadata: AnalyticsMetadata {
            site_url: site_url.to_string(),
            start_date: query.start_date.clone(),
            end_date: query.end_date.clone(),
            dimensions: query.dimensions.iter().map(|d| d.as_str()).collect(),
            search_type: query.search_type.clone(),
            total_rows: data.len(),
            row_limit: query.row_limit,
            start_row: query.start_row,
        },
        data,
    }
}

fn reshape_row(dimensions: &[Dimension], row: &ApiDataRow) -> JsonObject {
    let mut record = JsonObject::new();

    // Keys align by position; short rows simply emit fewer dimensions.
    for (dimension, key) in dimensions.iter().zip(&row.keys) {
        record.insert(dimension.as_str().to_string(), Value::String(key.clone()));
    }

    record.insert("clicks".to_string(), count(row.clicks.unwrap_or(0.0)));
    record.insert("impressions".to_string(), count(row.impressions.unwrap_or(0.0)));
    record.insert("ctr".to_string(), json!(ctr_percent(row.ctr.unwrap_or(0.0))));
    record.insert(
        "position".to_string(),
        json!(round_position(row.position.unwrap_or(0.0))),
    );
    record
}

/// Fraction to percentage, two decimals.
pub fn ctr_percent(ctr: f64) -> f64 {
    (ctr * 100.0 * 100.0).round() / 100.0
}

/// Average position, one decimal.
pub fn round_position(position: f64) -> f64 {
    (position * 10.0).round() / 10.0
}

/// Clicks and impressions are whole numbers on the wire even though the
/// API types them as doubles.
fn count(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        json!(value as i64)
    } else {
        json!(value)
    }
}
