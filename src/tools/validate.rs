//! Argument validation.
//!
//! Raw argument objects are checked and converted into typed inputs before
//! any handler runs. The first problem found is reported; nothing is
//! accumulated.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::tools::registry::{JsonObject, Operation};

/// Dimensions the Search Analytics API can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Country,
    Device,
    Page,
    Query,
    SearchAppearance,
    Date,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Country,
        Dimension::Device,
        Dimension::Page,
        Dimension::Query,
        Dimension::SearchAppearance,
        Dimension::Date,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Device => "device",
            Self::Page => "page",
            Self::Query => "query",
            Self::SearchAppearance => "searchAppearance",
            Self::Date => "date",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }

    pub fn allowed() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.as_str()).collect()
    }
}

pub const SEARCH_TYPES: [&str; 6] = ["web", "image", "video", "news", "discover", "googleNews"];

pub const DEFAULT_SEARCH_TYPE: &str = "web";
pub const DEFAULT_ROW_LIMIT: u64 = 1000;
pub const DEFAULT_FILTER_OPERATOR: &str = "equals";

/// One dimension filter; the operator is already defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub dimension: Dimension,
    pub operator: String,
    pub expression: String,
}

/// Typed `get_search_analytics` input. Dates stay optional here; the
/// query builder resolves them against the current day.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsArgs {
    pub dimensions: Vec<Dimension>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub filters: Vec<FilterSpec>,
    pub search_type: String,
    pub row_limit: u64,
    pub start_row: u64,
}

/// Typed input of the sitemap mutation tools.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapArgs {
    pub sitemap_url: String,
}

/// Validated input, one variant per operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedArguments {
    ListSites,
    ListDimensions,
    ListMetrics,
    SearchAnalytics(AnalyticsArgs),
    GetSitemaps,
    SubmitSitemap(SitemapArgs),
    DeleteSitemap(SitemapArgs),
}

#[derive(Debug, Deserialize)]
struct RawAnalyticsArgs {
    dimensions: Option<Value>,
    start_date: Option<String>,
    end_date: Option<String>,
    filters: Option<Value>,
    search_type: Option<String>,
    row_limit: Option<f64>,
    start_row: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawFilter {
    dimension: Option<String>,
    operator: Option<String>,
    expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSitemapArgs {
    sitemap_url: Option<String>,
}

/// Check `arguments` against `operation` and produce its typed input.
pub fn validate(
    operation: Operation,
    arguments: &JsonObject,
) -> Result<ValidatedArguments, ValidationError> {
    match operation {
        Operation::ListSites => Ok(ValidatedArguments::ListSites),
        Operation::ListDimensions => Ok(ValidatedArguments::ListDimensions),
        Operation::ListMetrics => Ok(ValidatedArguments::ListMetrics),
        Operation::GetSitemaps => Ok(ValidatedArguments::GetSitemaps),
        Operation::SearchAnalytics => {
            validate_analytics(arguments).map(ValidatedArguments::SearchAnalytics)
        }
        Operation::SubmitSitemap => {
            validate_sitemap(arguments).map(ValidatedArguments::SubmitSitemap)
        }
        Operation::DeleteSitemap => {
            validate_sitemap(arguments).map(ValidatedArguments::DeleteSitemap)
        }
    }
}

fn deserialize_args<T: serde::de::DeserializeOwned>(
    arguments: &JsonObject,
) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(arguments.clone()))
        .map_err(|e| ValidationError::InvalidArguments(e.to_string()))
}

fn validate_analytics(arguments: &JsonObject) -> Result<AnalyticsArgs, ValidationError> {
    let raw: RawAnalyticsArgs = deserialize_args(arguments)?;

    let dimensions = parse_dimensions(raw.dimensions)?;
    let filters = parse_filters(raw.filters)?;

    let search_type = match raw.search_type {
        None => DEFAULT_SEARCH_TYPE.to_string(),
        Some(s) if SEARCH_TYPES.contains(&s.as_str()) => s,
        Some(s) => {
            return Err(ValidationError::InvalidSearchType {
                value: s,
                allowed: SEARCH_TYPES.to_vec(),
            })
        }
    };

    Ok(AnalyticsArgs {
        dimensions,
        start_date: raw.start_date.filter(|s| !s.is_empty()),
        end_date: raw.end_date.filter(|s| !s.is_empty()),
        filters,
        search_type,
        row_limit: whole_number("row_limit", raw.row_limit)?.unwrap_or(DEFAULT_ROW_LIMIT),
        start_row: whole_number("start_row", raw.start_row)?.unwrap_or(0),
    })
}

/// Accepts a JSON array, a JSON-encoded array or scalar, or a comma-separated list.
fn parse_dimensions(value: Option<Value>) -> Result<Vec<Dimension>, ValidationError> {
    let names: Vec<String> = match value {
        None | Some(Value::Null) => vec![Dimension::Query.as_str().to_string()],
        Some(Value::Array(items)) => string_items("dimensions", items)?,
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Array(items)) => string_items("dimensions", items)?,
            Ok(Value::String(name)) => vec![name],
            Ok(other) => vec![other.to_string()],
            // Empty entries stay in so they are reported as invalid.
            Err(_) => s.split(',').map(|d| d.trim().to_string()).collect(),
        },
        Some(other) => {
            return Err(ValidationError::InvalidArguments(format!(
                "dimensions must be an array of strings, got {}",
                other
            )))
        }
    };

    names
        .into_iter()
        .map(|name| {
            Dimension::from_name(&name).ok_or_else(|| ValidationError::InvalidDimension {
                value: name,
                allowed: Dimension::allowed(),
            })
        })
        .collect()
}

fn string_items(field: &str, items: Vec<Value>) -> Result<Vec<String>, ValidationError> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(ValidationError::InvalidArguments(format!(
                "{} must contain only strings, got {}",
                field, other
            ))),
        })
        .collect()
}

/// Accepts a JSON array of filter objects or the same array JSON-encoded.
/// An empty string means no filters.
fn parse_filters(value: Option<Value>) -> Result<Vec<FilterSpec>, ValidationError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Array(items)) => items,
            _ => {
                return Err(ValidationError::InvalidArguments(
                    "Invalid filters format. Expected JSON array.".to_string(),
                ))
            }
        },
        Some(other) => {
            return Err(ValidationError::InvalidArguments(format!(
                "filters must be an array, got {}",
                other
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let raw: RawFilter = serde_json::from_value(item).map_err(|e| {
                ValidationError::InvalidArguments(format!("filters[{}]: {}", i, e))
            })?;

            let dimension = match raw.dimension {
                Some(name) => {
                    Dimension::from_name(&name).ok_or_else(|| {
                        ValidationError::InvalidFilterDimension {
                            value: name,
                            allowed: Dimension::allowed(),
                        }
                    })?
                }
                None => {
                    return Err(ValidationError::MissingRequired {
                        field: format!("filters[{}].dimension", i),
                    })
                }
            };

            let expression = raw.expression.ok_or_else(|| ValidationError::MissingRequired {
                field: format!("filters[{}].expression", i),
            })?;

            Ok(FilterSpec {
                dimension,
                operator: raw
                    .operator
                    .filter(|o| !o.is_empty())
                    .unwrap_or_else(|| DEFAULT_FILTER_OPERATOR.to_string()),
                expression,
            })
        })
        .collect()
}

/// JSON numbers arrive as floats; only non-negative whole values are accepted.
fn whole_number(field: &str, value: Option<f64>) -> Result<Option<u64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(Some(v as u64)),
        Some(v) => Err(ValidationError::InvalidArguments(format!(
            "{} must be a non-negative integer, got {}",
            field, v
        ))),
    }
}

fn validate_sitemap(arguments: &JsonObject) -> Result<SitemapArgs, ValidationError> {
    let raw: RawSitemapArgs = deserialize_args(arguments)?;
    match raw.sitemap_url {
        Some(url) if !url.trim().is_empty() => Ok(SitemapArgs { sitemap_url: url }),
        _ => Err(ValidationError::MissingRequired {
            field: "sitemap_url".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn analytics(value: Value) -> Result<AnalyticsArgs, ValidationError> {
        match validate(Operation::SearchAnalytics, &args(value))? {
            ValidatedArguments::SearchAnalytics(a) => Ok(a),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_analytics_defaults() {
        let a = analytics(json!({})).unwrap();
        assert_eq!(a.dimensions, vec![Dimension::Query]);
        assert_eq!(a.search_type, "web");
        assert_eq!(a.row_limit, 1000);
        assert_eq!(a.start_row, 0);
        assert!(a.start_date.is_none());
        assert!(a.filters.is_empty());
    }

    #[test]
    fn test_first_invalid_dimension_is_reported() {
        let err = analytics(json!({"dimensions": ["query", "browser", "os"]})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDimension {
                value: "browser".to_string(),
                allowed: Dimension::allowed(),
            }
        );
        assert!(err.to_string().contains("'browser'"));
        assert!(err.to_string().contains("searchAppearance"));
    }

    #[test]
    fn test_dimensions_from_json_string() {
        let a = analytics(json!({"dimensions": "[\"page\", \"date\"]"})).unwrap();
        assert_eq!(a.dimensions, vec![Dimension::Page, Dimension::Date]);
    }

    #[test]
    fn test_dimensions_from_comma_separated_string() {
        let a = analytics(json!({"dimensions": "query, device"})).unwrap();
        assert_eq!(a.dimensions, vec![Dimension::Query, Dimension::Device]);
    }

    #[test]
    fn test_dimension_from_json_encoded_scalar() {
        let a = analytics(json!({"dimensions": "\"query\""})).unwrap();
        assert_eq!(a.dimensions, vec![Dimension::Query]);
    }

    #[test]
    fn test_empty_dimension_string_is_invalid() {
        let err = analytics(json!({"dimensions": ""})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDimension { ref value, .. } if value.is_empty()));

        let err = analytics(json!({"dimensions": "query,,page"})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDimension { ref value, .. } if value.is_empty()));
    }

    #[test]
    fn test_non_string_dimension_is_rejected() {
        let err = analytics(json!({"dimensions": ["query", 7]})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArguments(_)));
    }

    #[test]
    fn test_filter_operator_defaults_to_equals() {
        let a = analytics(json!({"filters": [{"dimension": "country", "expression": "usa"}]}))
            .unwrap();
        assert_eq!(
            a.filters,
            vec![FilterSpec {
                dimension: Dimension::Country,
                operator: "equals".to_string(),
                expression: "usa".to_string(),
            }]
        );
    }

    #[test]
    fn test_filters_from_json_string() {
        let a = analytics(json!({
            "filters": "[{\"dimension\": \"page\", \"operator\": \"contains\", \"expression\": \"/blog\"}]"
        }))
        .unwrap();
        assert_eq!(a.filters[0].operator, "contains");
    }

    #[test]
    fn test_malformed_filter_string_is_rejected() {
        let err = analytics(json!({"filters": "country=usa"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments: Invalid filters format. Expected JSON array."
        );
    }

    #[test]
    fn test_empty_filter_string_means_no_filters() {
        for filters in [json!(""), json!("  "), json!(null), json!([])] {
            let a = analytics(json!({"filters": filters})).unwrap();
            assert!(a.filters.is_empty());
        }
    }

    #[test]
    fn test_filter_dimension_is_whitelisted() {
        let err = analytics(json!({"filters": [{"dimension": "browser", "expression": "x"}]}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFilterDimension { ref value, .. } if value == "browser"));
    }

    #[test]
    fn test_filter_expression_is_required() {
        let err = analytics(json!({"filters": [{"dimension": "query"}]})).unwrap_err();
        assert_eq!(err.to_string(), "filters[0].expression is required");
    }

    #[test]
    fn test_search_type_is_validated() {
        let err = analytics(json!({"search_type": "maps"})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSearchType { .. }));
        assert!(analytics(json!({"search_type": "googleNews"})).is_ok());
    }

    #[test]
    fn test_row_limit_must_be_whole() {
        assert_eq!(analytics(json!({"row_limit": 50000})).unwrap().row_limit, 50000);
        assert!(analytics(json!({"row_limit": 10.5})).is_err());
        assert!(analytics(json!({"start_row": -1})).is_err());
        assert!(analytics(json!({"row_limit": "100"})).is_err());
    }

    #[test]
    fn test_empty_dates_count_as_absent() {
        let a = analytics(json!({"start_date": "", "end_date": "2024-02-01"})).unwrap();
        assert!(a.start_date.is_none());
        assert_eq!(a.end_date.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_sitemap_url_is_required() {
        for value in [json!({}), json!({"sitemap_url": ""}), json!({"sitemap_url": null})] {
            let err = validate(Operation::SubmitSitemap, &args(value)).unwrap_err();
            assert_eq!(
                err,
                ValidationError::MissingRequired {
                    field: "sitemap_url".to_string()
                }
            );
        }
    }

    #[test]
    fn test_delete_sitemap_carries_url() {
        let validated = validate(
            Operation::DeleteSitemap,
            &args(json!({"sitemap_url": "https://example.com/sitemap.xml"})),
        )
        .unwrap();
        assert_eq!(
            validated,
            ValidatedArguments::DeleteSitemap(SitemapArgs {
                sitemap_url: "https://example.com/sitemap.xml".to_string()
            })
        );
    }

    #[test]
    fn test_no_argument_tools_ignore_extras() {
        let validated = validate(Operation::ListSites, &args(json!({"unused": 1}))).unwrap();
        assert_eq!(validated, ValidatedArguments::ListSites);
    }
}
