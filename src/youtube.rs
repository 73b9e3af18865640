use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::constants;
use crate::error::{SessionError, SessionResult};

// --- URL validation ---

/// Parse `raw` and accept it only if it is an http(s) URL on an allow-listed host.
/// The returned URL is the canonical form stored in the catalog.
pub fn normalize_url(raw: &str) -> SessionResult<Url> {
  normalize_url_with(raw, &constants().allowed_hosts)
}

pub fn normalize_url_with(raw: &str, allowed_hosts: &[String]) -> SessionResult<Url> {
  let url = Url::parse(raw.trim()).map_err(|_| SessionError::InvalidUrl)?;
  if !matches!(url.scheme(), "http" | "https") {
    return Err(SessionError::InvalidUrl);
  }
  let Some(host) = url.host_str() else { return Err(SessionError::InvalidUrl) };
  if !allowed_hosts.iter().any(|h| h.eq_ignore_ascii_case(host)) {
    return Err(SessionError::InvalidUrl);
  }
  Ok(url)
}

// --- Metadata ---

/// Title and thumbnail resolved for a video URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMeta {
  pub title: String,
  pub thumbnail: String,
}

/// Anything that can resolve metadata for a normalized video URL.
pub trait MetadataSource: Clone + Send + Sync + 'static {
  fn fetch(&self, url: &Url) -> impl Future<Output = SessionResult<VideoMeta>> + Send;
}

/// The subset of an oEmbed response we rely on.
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
  title: Option<String>,
  thumbnail_url: Option<String>,
}

impl OEmbedResponse {
  fn into_meta(self) -> SessionResult<VideoMeta> {
    let non_empty = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    match (non_empty(self.title), non_empty(self.thumbnail_url)) {
      (Some(title), Some(thumbnail)) => Ok(VideoMeta { title, thumbnail }),
      _ => Err(SessionError::IncompleteMetadata),
    }
  }
}

/// oEmbed client bound to one endpoint. The request timeout aborts the in-flight call.
#[derive(Debug, Clone)]
pub struct OEmbedClient {
  client: Client,
  endpoint: String,
}

impl OEmbedClient {
  pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build().context("Failed to build HTTP client")?;
    Ok(Self::with_client(client, endpoint))
  }

  pub fn with_client(client: Client, endpoint: &str) -> Self {
    Self { client, endpoint: endpoint.to_string() }
  }

  /// The endpoint templated with the video URL, e.g. `.../oembed?url=...&format=json`.
  pub fn request_url(&self, url: &Url) -> SessionResult<Url> {
    Url::parse_with_params(&self.endpoint, &[("url", url.as_str()), ("format", "json")])
      .map_err(|e| SessionError::MetadataFetchFailed(format!("bad endpoint: {e}")))
  }
}

impl MetadataSource for OEmbedClient {
  async fn fetch(&self, url: &Url) -> SessionResult<VideoMeta> {
    let request_url = self.request_url(url)?;
    debug!(url = %url, "oembed: requesting metadata");

    let response = self.client.get(request_url).send().await.map_err(|e| {
      warn!(url = %url, err = %e, "oembed: request failed");
      if e.is_timeout() {
        SessionError::MetadataFetchFailed("timed out".to_string())
      } else {
        SessionError::MetadataFetchFailed("network error".to_string())
      }
    })?;

    let status = response.status();
    if !status.is_success() {
      warn!(url = %url, status = status.as_u16(), "oembed: non-success response");
      return Err(SessionError::MetadataFetchFailed(format!("HTTP {}", status.as_u16())));
    }

    let body: OEmbedResponse = response.json().await.map_err(|e| {
      warn!(url = %url, err = %e, "oembed: unreadable body");
      if e.is_timeout() {
        SessionError::MetadataFetchFailed("timed out".to_string())
      } else if e.is_decode() {
        SessionError::IncompleteMetadata
      } else {
        SessionError::MetadataFetchFailed("network error".to_string())
      }
    })?;
    body.into_meta()
  }
}
