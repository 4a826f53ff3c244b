//! Dimension and metric catalogs served by the discovery tools.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;
use crate::error::ConfigError;

const BUNDLED_DIMENSIONS: &str = include_str!("../data/dimensions.json");
const BUNDLED_METRICS: &str = include_str!("../data/metrics.json");

/// One catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CatalogEntry {
    #[serde(alias = "api_name")]
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct DimensionsDocument {
    dimensions: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct MetricsDocument {
    metrics: Vec<CatalogEntry>,
}

/// Immutable catalogs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    dimensions: Vec<CatalogEntry>,
    metrics: Vec<CatalogEntry>,
}

impl ReferenceData {
    /// Catalogs compiled into the binary.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::parse(BUNDLED_DIMENSIONS, BUNDLED_METRICS)
    }

    /// Bundled catalogs, with any override files named in the config.
    pub fn load(config: &Config) -> Result<Self, ConfigError> {
        if config.dimensions_file.is_none() && config.metrics_file.is_none() {
            return Self::bundled();
        }
        let dimensions = read_override(config.dimensions_file.as_deref())?;
        let metrics = read_override(config.metrics_file.as_deref())?;
        Self::parse(
            dimensions.as_deref().unwrap_or(BUNDLED_DIMENSIONS),
            metrics.as_deref().unwrap_or(BUNDLED_METRICS),
        )
    }

    fn parse(dimensions: &str, metrics: &str) -> Result<Self, ConfigError> {
        let dimensions: DimensionsDocument = serde_json::from_str(dimensions)?;
        let metrics: MetricsDocument = serde_json::from_str(metrics)?;
        Ok(Self {
            dimensions: dimensions.dimensions,
            metrics: metrics.metrics,
        })
    }

    pub fn dimensions(&self) -> &[CatalogEntry] {
        &self.dimensions
    }

    pub fn metrics(&self) -> &[CatalogEntry] {
        &self.metrics
    }
}

fn read_override(path: Option<&Path>) -> Result<Option<String>, ConfigError> {
    path.map(std::fs::read_to_string).transpose().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::validate::Dimension;

    #[test]
    fn test_bundled_dimensions_match_the_whitelist() {
        let data = ReferenceData::bundled().unwrap();
        let names: Vec<&str> = data.dimensions().iter().map(|d| d.name.as_str()).collect();
        let allowed: Vec<&str> = Dimension::ALL.iter().map(|d| d.as_str()).collect();
        assert_eq!(names, allowed);
    }

    #[test]
    fn test_bundled_metrics() {
        let data = ReferenceData::bundled().unwrap();
        let names: Vec<&str> = data.metrics().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["clicks", "impressions", "ctr", "position"]);
    }

    #[test]
    fn test_api_name_alias_is_accepted() {
        let data = ReferenceData::parse(
            r#"{"dimensions": [{"api_name": "query", "description": "q"}]}"#,
            r#"{"metrics": []}"#,
        )
        .unwrap();
        assert_eq!(data.dimensions()[0].name, "query");
        let out = serde_json::to_value(&data.dimensions()[0]).unwrap();
        assert_eq!(out["name"], "query");
    }

    #[test]
    fn test_load_without_overrides_serves_bundled_catalogs() {
        let data = ReferenceData::load(&Config::default()).unwrap();
        assert_eq!(data.dimensions(), ReferenceData::bundled().unwrap().dimensions());
        assert_eq!(data.metrics().len(), 4);
    }

    #[test]
    fn test_missing_override_file_is_a_config_error() {
        let config = Config {
            metrics_file: Some("/nonexistent/metrics.json".into()),
            ..Config::default()
        };
        assert!(matches!(ReferenceData::load(&config), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_malformed_catalog_is_a_config_error() {
        let err = ReferenceData::parse("[]", BUNDLED_METRICS).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
