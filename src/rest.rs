//! Authenticated REST client for the Webmasters v3 API.

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::ServiceAccountAuth;
use crate::error::ApiError;

/// Build a path from segments, percent-encoding each one.
///
/// Site URLs and sitemap feed paths are full URLs themselves, so every
/// segment must be encoded to stay a single path component.
pub fn encoded_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| format!("/{}", urlencoding::encode(s)))
        .collect()
}

/// Google API error envelope.
#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    code: Option<u16>,
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// REST client bound to one API base URL.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    http_client: Client,
    auth: ServiceAccountAuth,
}

impl RestClient {
    /// Create a new REST client.
    pub fn new(
        base_url: impl Into<String>,
        auth: ServiceAccountAuth,
        timeout: std::time::Duration,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::HttpClientInit(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            auth,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        self.handle_response(response).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        self.handle_response(response).await
    }

    /// PUT without a body; the API answers with an empty response.
    pub async fn put(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(Method::PUT, path, None::<&()>).await?;
        self.handle_empty(response).await
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(Method::DELETE, path, None::<&()>).await?;
        self.handle_empty(response).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "api request");

        let token = self.auth.get_token().await?;

        let mut request = self
            .http_client
            .request(method, &url)
            .bearer_auth(token)
            .header("Accept", "application/json");

        request = match body {
            Some(body) => request.json(body),
            None => request.header("Content-Length", "0"),
        };

        Ok(request.send().await?)
    }

    /// Handle HTTP response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, %body, "api error response");
            return Err(parse_error_response(status, &body));
        }

        tracing::debug!(%status, body = %truncate(&body, 500), "api response");
        Ok(serde_json::from_str(&body)?)
    }

    async fn handle_empty(&self, response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() || status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%status, %body, "api error response");
        Err(parse_error_response(status, &body))
    }
}

/// Turn a non-success body into the most specific error available.
fn parse_error_response(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<GoogleErrorResponse>(body) {
        Ok(error) => ApiError::Google {
            status: error
                .error
                .code
                .and_then(|c| StatusCode::from_u16(c).ok())
                .unwrap_or(status),
            code: error
                .error
                .status
                .unwrap_or_else(|| status.as_u16().to_string()),
            message: error.error.message,
        },
        Err(_) => ApiError::HttpError {
            status,
            body: body.to_string(),
        },
    }
}

fn truncate(s: &str, max_len: usize) -> &str {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_path_escapes_urls() {
        assert_eq!(
            encoded_path(&["sites", "https://example.com/", "sitemaps"]),
            "/sites/https%3A%2F%2Fexample.com%2F/sitemaps"
        );
    }

    #[test]
    fn test_encoded_path_domain_property() {
        assert_eq!(
            encoded_path(&["sites", "sc-domain:example.com"]),
            "/sites/sc-domain%3Aexample.com"
        );
    }

    #[test]
    fn test_google_error_body_is_parsed() {
        let body = r#"{"error": {"code": 403, "message": "User does not have sufficient permission for site", "status": "PERMISSION_DENIED"}}"#;
        match parse_error_response(StatusCode::FORBIDDEN, body) {
            ApiError::Google {
                status,
                code,
                message,
            } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(code, "PERMISSION_DENIED");
                assert!(message.contains("sufficient permission"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_google_error_without_status_uses_http_code() {
        let body = r#"{"error": {"message": "Quota exceeded"}}"#;
        let err = parse_error_response(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(err.to_string(), "Google API error [429]: Quota exceeded");
    }

    #[test]
    fn test_non_json_error_body_falls_back() {
        let err = parse_error_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(err, ApiError::HttpError { status, .. } if status == StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
