/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::github
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Query the GitHub releases API for one page of Brave Browser
    releases and decode the release/asset records.

  Security / Safety Notes:
    Performs read-only HTTPS requests. The configured token is
    forwarded in the Authorization header and never logged.

  Dependencies:
    reqwest for HTTP, serde for response parsing.

  Operational Scope:
    Supplies raw release records to asset selection.

  Revision History:
    2026-10-17 COD  Implemented single-page releases client.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Fixed timeout, no retry on API failure
    - Structured response parsing with explicit error paths
============================================================*/

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Deserializer};

use crate::config::GithubConfig;
use crate::error::{CheckerError, Result};

/// Request timeout for the releases endpoint.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Release record as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRelease {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<RawAsset>,
}

/// Downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAsset {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: Option<String>,
}

/// Client for the releases endpoint of a single repository.
pub struct ReleaseClient {
    client: reqwest::Client,
    base_url: String,
    repo: String,
}

impl ReleaseClient {
    /// Construct a new client from configuration.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));
        let auth = HeaderValue::from_str(&config.token).map_err(|_| {
            CheckerError::Config("GitHub token contains characters not allowed in a header".into())
        })?;
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("brave-releases-checker/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|err| CheckerError::Network(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            repo: config.repo.trim_matches('/').to_string(),
        })
    }

    fn compose_url(&self, page: u32) -> String {
        format!("{}/repos/{}/releases?page={page}", self.base_url, self.repo)
    }

    /// Fetch one page of releases.
    pub async fn fetch(&self, page: u32) -> Result<Vec<RawRelease>> {
        let url = self.compose_url(page);
        let response = self.client.get(&url).send().await.map_err(|err| {
            if err.is_timeout() {
                CheckerError::Network(format!(
                    "Request to {url} timed out after {}s",
                    REQUEST_TIMEOUT.as_secs()
                ))
            } else {
                CheckerError::Network(format!("Request to {url} failed: {err}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckerError::Api {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        response.json::<Vec<RawRelease>>().await.map_err(|err| {
            CheckerError::Serialization(format!("Failed to decode releases response: {err}"))
        })
    }
}

/// Pull the `message` field out of an error body, if the body is JSON.
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiMessage>(body)
        .ok()
        .and_then(|parsed| parsed.message)
}

fn deserialize_nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config(base: &str, token: &str) -> GithubConfig {
        GithubConfig {
            token: token.to_string(),
            api_base: base.to_string(),
            repo: "brave/brave-browser".to_string(),
            download_base: None,
        }
    }

    #[tokio::test]
    async fn fetch_decodes_releases_for_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/brave/brave-browser/releases")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .match_header("accept", ACCEPT_V3)
            .match_header("authorization", "token abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v1.60.118", "prerelease": false,
                     "assets": [{"name": "brave-browser_1.60.118_amd64.deb", "size": 1}]},
                    {"tag_name": "v1.61.50", "assets": []}
                ]"#,
            )
            .create_async()
            .await;

        let client = ReleaseClient::new(&config(&server.url(), "token abc123")).expect("client");
        let releases = client.fetch(2).await.expect("releases");

        mock.assert_async().await;
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v1.60.118");
        assert_eq!(releases[0].assets[0].name, "brave-browser_1.60.118_amd64.deb");
        assert!(releases[1].assets.is_empty());
    }

    #[tokio::test]
    async fn empty_token_is_forwarded_as_empty_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/brave/brave-browser/releases")
            .match_query(Matcher::Any)
            .match_header("authorization", "")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = ReleaseClient::new(&config(&server.url(), "")).expect("client");
        let releases = client.fetch(1).await.expect("releases");

        mock.assert_async().await;
        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_carries_server_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/brave/brave-browser/releases")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let client = ReleaseClient::new(&config(&server.url(), "")).expect("client");
        let err = client.fetch(1).await.expect_err("403 must fail");

        mock.assert_async().await;
        match err {
            CheckerError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message.as_deref(), Some("API rate limit exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_a_serialization_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/brave/brave-browser/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"not": "a list"}"#)
            .create_async()
            .await;

        let client = ReleaseClient::new(&config(&server.url(), "")).expect("client");
        let err = client.fetch(1).await.expect_err("object is not a release list");
        assert!(matches!(err, CheckerError::Serialization(_)));
    }

    #[test]
    fn message_falls_back_when_body_is_not_json() {
        assert_eq!(extract_message("<html>bad gateway</html>"), None);
        assert_eq!(extract_message(r#"{"message": null}"#), None);
        assert_eq!(
            extract_message(r#"{"message": "Not Found"}"#).as_deref(),
            Some("Not Found")
        );
    }

    #[test]
    fn nullable_fields_decode_to_empty() {
        let parsed: Vec<RawRelease> =
            serde_json::from_str(r#"[{"tag_name": null, "assets": [{"name": null}]}]"#)
                .expect("valid json");
        assert_eq!(parsed[0].tag_name, "");
        assert_eq!(parsed[0].assets[0].name, "");
    }
}
