use camino::{Utf8Path, Utf8PathBuf};
use slimset_config::Config;
use slimset_core::{select_asset, NamePattern, SelectedAsset, APKS_EXTENSION};
use slimset_infra::{
    default_http_client, GitlabReleaseSource, RcloneStore, ReleaseSource, RemoteStore,
};
use slimset_repack::{RepackReport, Repackager};
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::retention::prune_old_versions;

/// The slice of [`Config`] the run sequence itself needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub file_prefix: String,
    pub keep_old_versions: bool,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            file_prefix: config.file_prefix.clone(),
            keep_old_versions: config.keep_old_versions,
        }
    }
}

impl PipelineSettings {
    fn pattern(&self) -> NamePattern {
        NamePattern::new(self.file_prefix.clone(), APKS_EXTENSION)
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No release carries a qualifying asset.
    NoRelease,
    /// The remote already holds this file; nothing was processed.
    AlreadyPresent { tag: String, filename: String },
    Uploaded {
        tag: String,
        filename: String,
        bytes: u64,
        report: RepackReport,
        /// Older versions removed by retention.
        pruned: Vec<String>,
    },
}

/// fetch -> dedup check -> repackage -> upload -> retention.
pub struct Pipeline {
    settings: PipelineSettings,
    source: Box<dyn ReleaseSource>,
    store: Box<dyn RemoteStore>,
    repackager: Repackager,
    work_root: Option<Utf8PathBuf>,
}

impl Pipeline {
    pub fn new(
        settings: PipelineSettings,
        source: Box<dyn ReleaseSource>,
        store: Box<dyn RemoteStore>,
    ) -> Self {
        Self {
            settings,
            source,
            store,
            repackager: Repackager::default(),
            work_root: None,
        }
    }

    /// Wires the GitLab source and rclone store described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let client = default_http_client(config.http_timeout())
            .map_err(|e| PipelineError::Setup(format!("failed to build HTTP client: {e}")))?;
        let source = GitlabReleaseSource::new(
            client,
            config.api_base(),
            &config.release_project_id.to_string(),
        )?;
        let store = RcloneStore::new(
            config.rclone_binary.clone(),
            config.remote_name.clone(),
            config.remote_folder_id.clone(),
        );
        Ok(Self::new(
            PipelineSettings::from(config),
            Box::new(source),
            Box::new(store),
        ))
    }

    /// Directory under which the per-run scratch directory is created.
    /// Defaults to the system temp dir.
    pub fn with_work_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.work_root = Some(root.into());
        self
    }

    pub fn with_repackager(mut self, repackager: Repackager) -> Self {
        self.repackager = repackager;
        self
    }

    pub fn run(&self) -> Result<RunOutcome, PipelineError> {
        let releases = self.source.list_releases()?;
        let Some(asset) = select_asset(&releases, &self.settings.file_prefix, APKS_EXTENSION)
        else {
            info!(
                "No {}*{} asset found in {} releases",
                self.settings.file_prefix,
                APKS_EXTENSION,
                releases.len()
            );
            return Ok(RunOutcome::NoRelease);
        };
        info!("Latest qualifying release {} ({})", asset.tag, asset.filename);

        info!("Checking if {} exists remotely", asset.filename);
        if self.store.exists(&asset.filename)? {
            info!("File {} already exists remotely. Exiting.", asset.filename);
            return Ok(RunOutcome::AlreadyPresent {
                tag: asset.tag,
                filename: asset.filename,
            });
        }

        let input = self.source.download(&asset.url)?;
        let repackaged = self.repackager.repackage(&input)?;
        drop(input);

        let bytes = repackaged.bytes.len() as u64;
        self.publish(&asset, &repackaged.bytes)?;

        let pruned = if self.settings.keep_old_versions {
            Vec::new()
        } else {
            prune_old_versions(
                self.store.as_ref(),
                &self.settings.pattern(),
                &asset.filename,
            )
        };

        Ok(RunOutcome::Uploaded {
            tag: asset.tag,
            filename: asset.filename,
            bytes,
            report: repackaged.report,
            pruned,
        })
    }

    /// Writes the archive into a scratch directory and uploads it. The
    /// directory is removed on every path out of this function.
    fn publish(&self, asset: &SelectedAsset, bytes: &[u8]) -> Result<(), PipelineError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("slimset-");
        let scratch = match &self.work_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        let dir = Utf8Path::from_path(scratch.path()).ok_or_else(|| {
            PipelineError::Setup(format!("scratch dir is not UTF-8: {:?}", scratch.path()))
        })?;
        let local = dir.join(file_name_only(&asset.filename));
        std::fs::write(&local, bytes)?;
        info!("Processed file saved locally at {}", local);

        info!("Uploading {}", asset.filename);
        self.store.upload(&local, &asset.filename)?;
        info!("Upload successful");

        if let Err(e) = scratch.close() {
            warn!("Failed to remove scratch dir: {}", e);
        }
        Ok(())
    }
}

/// Asset names come from the release API; never let one escape the scratch dir.
fn file_name_only(name: &str) -> &str {
    name.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_names_are_flattened() {
        assert_eq!(file_name_only("app-1.apks"), "app-1.apks");
        assert_eq!(file_name_only("../../etc/app-1.apks"), "app-1.apks");
        assert_eq!(file_name_only(r"dir\app-1.apks"), "app-1.apks");
    }

    #[test]
    fn settings_follow_config() {
        let config = Config::from_json_str(
            r#"{"gitlab_project_id": 1, "gitlab_url": "https://g", "drive_folder_id": "f",
                "keep_old_versions": true, "file_prefix": "app-"}"#,
        )
        .unwrap();
        let settings = PipelineSettings::from(&config);
        assert!(settings.keep_old_versions);
        assert_eq!(settings.pattern(), NamePattern::new("app-", ".apks"));
    }
}
