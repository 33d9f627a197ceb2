//! Run configuration and runtime limits.

use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default bound on every HTTP call, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Minimum allowed HTTP timeout.
pub const MIN_HTTP_TIMEOUT_SECS: u64 = 1;

/// Maximum allowed HTTP timeout.
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 600;

/// rclone remote name used when the config does not name one.
pub const DEFAULT_REMOTE_NAME: &str = "gdrive";

pub const DEFAULT_RCLONE_BINARY: &str = "rclone";

/// Config file looked up in the working directory and the platform config dir.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Convenience function to clamp a timeout value into allowed range.
pub fn clamp_timeout_secs(v: u64) -> u64 {
    v.clamp(MIN_HTTP_TIMEOUT_SECS, MAX_HTTP_TIMEOUT_SECS)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Release project identifier: numeric id or `group/project` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Numeric(u64),
    Path(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectId::Numeric(id) => write!(f, "{id}"),
            ProjectId::Path(path) => f.write_str(path),
        }
    }
}

fn default_remote_name() -> String {
    DEFAULT_REMOTE_NAME.to_string()
}

fn default_rclone_binary() -> String {
    DEFAULT_RCLONE_BINARY.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

/// Process-wide settings, loaded once at startup and passed to each component.
///
/// Field names follow the snake_case form; the legacy `gitlab_*`/`drive_*`
/// keys and camelCase spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(alias = "gitlab_project_id", alias = "releaseProjectId")]
    pub release_project_id: ProjectId,
    #[serde(alias = "gitlab_url", alias = "releaseApiBaseUrl")]
    pub release_api_base_url: String,
    #[serde(alias = "drive_folder_id", alias = "remoteFolderId")]
    pub remote_folder_id: String,
    #[serde(default, alias = "keepOldVersions")]
    pub keep_old_versions: bool,
    #[serde(alias = "filePrefix")]
    pub file_prefix: String,
    #[serde(default = "default_remote_name", alias = "remoteName")]
    pub remote_name: String,
    #[serde(default = "default_rclone_binary", alias = "rcloneBinary")]
    pub rclone_binary: String,
    #[serde(default = "default_http_timeout_secs", alias = "httpTimeoutSecs")]
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.release_api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "release_api_base_url must be an http(s) URL, got {:?}",
                self.release_api_base_url
            )));
        }
        if let ProjectId::Path(path) = &self.release_project_id {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid("release_project_id is empty".into()));
            }
        }
        for (field, value) in [
            ("remote_folder_id", &self.remote_folder_id),
            ("file_prefix", &self.file_prefix),
            ("remote_name", &self.remote_name),
            ("rclone_binary", &self.rclone_binary),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} is empty")));
            }
        }
        Ok(())
    }

    /// Base URL without trailing slashes.
    pub fn api_base(&self) -> &str {
        self.release_api_base_url.trim().trim_end_matches('/')
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(clamp_timeout_secs(self.http_timeout_secs))
    }
}

/// Picks the config file: an explicit path wins, then `./config.json`,
/// then `config.json` in the platform config directory.
pub fn resolve_config_path(explicit: Option<&Utf8Path>) -> Result<Utf8PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_owned());
    }

    let local = Utf8PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    let proj_dirs = ProjectDirs::from("com", "slimset", "slimset")
        .ok_or_else(|| ConfigError::Invalid("cannot determine config dir".into()))?;
    let candidate = proj_dirs.config_dir().join(CONFIG_FILE_NAME);
    let candidate = Utf8PathBuf::from_path_buf(candidate)
        .map_err(|p| ConfigError::Invalid(format!("config dir is not UTF-8: {p:?}")))?;
    if candidate.exists() {
        Ok(candidate)
    } else {
        // Report the conventional location when nothing exists yet.
        Ok(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_timeout_bounds() {
        assert_eq!(clamp_timeout_secs(0), MIN_HTTP_TIMEOUT_SECS);
        assert_eq!(clamp_timeout_secs(30), 30);
        assert_eq!(clamp_timeout_secs(10_000), MAX_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn project_id_display() {
        assert_eq!(ProjectId::Numeric(42).to_string(), "42");
        assert_eq!(ProjectId::Path("group/app".into()).to_string(), "group/app");
    }
}
