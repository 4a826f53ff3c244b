//! Sites resource - properties the service account can see.

use serde::{Deserialize, Serialize};

/// A Search Console property and the caller's access to it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    pub site_url: String,
    pub permission_level: String,
}

/// Response of `GET /sites`. The API omits `siteEntry` when the list is empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitesListResponse {
    #[serde(default)]
    pub site_entry: Vec<SiteEntry>,
}
