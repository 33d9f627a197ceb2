use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client;
use slimset_core::Release;
use std::time::Duration;
use tracing::{debug, info};

/// Characters escaped when a `group/project` path is used as one URL segment.
const PROJECT_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Read-only access to published releases and their assets.
///
/// Every call is a single attempt; callers decide what a failure means.
pub trait ReleaseSource: Send + Sync {
    /// Releases, most recent first.
    fn list_releases(&self) -> Result<Vec<Release>, NetError>;
    /// Complete raw bytes behind an asset URL.
    fn download(&self, url: &str) -> Result<Vec<u8>, NetError>;
}

/// Builds the blocking client shared by every network collaborator.
pub fn default_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("slimset/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// GitLab releases API (`/api/v4/projects/:id/releases`).
pub struct GitlabReleaseSource {
    client: Client,
    releases_url: String,
}

impl GitlabReleaseSource {
    /// `project` is a numeric id or a `group/project` path.
    pub fn new(client: Client, base_url: &str, project: &str) -> Result<Self, NetError> {
        let base = base_url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(NetError::InvalidUrl(base_url.to_string()));
        }
        let project = project.trim();
        if project.is_empty() {
            return Err(NetError::InvalidUrl(format!(
                "{base_url}: empty project id"
            )));
        }

        let releases_url = format!(
            "{base}/api/v4/projects/{}/releases",
            utf8_percent_encode(project, PROJECT_SEGMENT)
        );
        Ok(Self {
            client,
            releases_url,
        })
    }

    pub fn releases_url(&self) -> &str {
        &self.releases_url
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, NetError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|source| NetError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NetError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = resp.bytes().map_err(|source| NetError::Request {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

impl ReleaseSource for GitlabReleaseSource {
    fn list_releases(&self) -> Result<Vec<Release>, NetError> {
        info!("Checking {} for releases", self.releases_url);
        let bytes = self.get_bytes(&self.releases_url)?;
        let releases: Vec<Release> =
            serde_json::from_slice(&bytes).map_err(|source| NetError::Decode {
                url: self.releases_url.clone(),
                source,
            })?;
        debug!("Fetched {} releases", releases.len());
        Ok(releases)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, NetError> {
        info!("Downloading {}", url);
        let bytes = self.get_bytes(url)?;
        info!("Downloaded {} bytes", bytes.len());
        Ok(bytes)
    }
}
