//! Sitemaps resource.

use serde::{Deserialize, Deserializer, Serialize};

/// Sitemap status as returned by `GET /sites/{site}/sitemaps`.
///
/// The API encodes `warnings` and `errors` as int64 strings; both forms
/// are accepted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sitemap {
    pub path: Option<String>,
    pub last_submitted: Option<String>,
    #[serde(default)]
    pub is_pending: bool,
    #[serde(default)]
    pub is_sitemaps_index: bool,
    #[serde(rename = "type")]
    pub sitemap_type: Option<String>,
    pub last_downloaded: Option<String>,
    #[serde(default, deserialize_with = "int64_lenient")]
    pub warnings: i64,
    #[serde(default, deserialize_with = "int64_lenient")]
    pub errors: i64,
}

/// Response of the sitemap listing. `sitemap` is absent when there are none.
#[derive(Debug, Default, Deserialize)]
pub struct SitemapsListResponse {
    #[serde(default)]
    pub sitemap: Vec<Sitemap>,
}

fn int64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Option::<Int64>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Int64::Number(n)) => Ok(n),
        Some(Int64::Text(s)) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let response: SitemapsListResponse =
            serde_json::from_str(r#"{"sitemap": [{"path": "https://example.com/sitemap.xml"}]}"#)
                .unwrap();
        let sitemap = &response.sitemap[0];
        assert!(!sitemap.is_pending);
        assert!(!sitemap.is_sitemaps_index);
        assert_eq!(sitemap.warnings, 0);
        assert_eq!(sitemap.errors, 0);
    }

    #[test]
    fn test_string_counts_are_parsed() {
        let sitemap: Sitemap = serde_json::from_str(
            r#"{"path": "/s.xml", "warnings": "4", "errors": 2, "type": "sitemap", "isPending": true}"#,
        )
        .unwrap();
        assert_eq!(sitemap.warnings, 4);
        assert_eq!(sitemap.errors, 2);
        assert!(sitemap.is_pending);
    }

    #[test]
    fn test_serializes_caller_facing_keys() {
        let sitemap = Sitemap {
            path: Some("/s.xml".to_string()),
            sitemap_type: Some("sitemap".to_string()),
            ..Default::default()
        };
        let out = serde_json::to_value(&sitemap).unwrap();
        assert_eq!(out["type"], "sitemap");
        assert_eq!(out["isSitemapsIndex"], false);
        assert_eq!(out["lastSubmitted"], serde_json::Value::Null);
        assert_eq!(out["warnings"], 0);
    }

    #[test]
    fn test_empty_listing() {
        let response: SitemapsListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.sitemap.is_empty());
    }
}
