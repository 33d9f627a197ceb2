use camino::Utf8Path;
use slimset_core::NamePattern;
use std::process::{Command, Output, Stdio};
use tracing::{debug, warn};

use super::{RemoteError, RemoteStore};

/// [`RemoteStore`] backed by the `rclone` command line tool.
///
/// Every path is addressed relative to `{remote},root_folder_id={folder}:`
/// so the store never leaves the configured folder.
pub struct RcloneStore {
    program: String,
    remote_name: String,
    folder_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedCommand {
    pub op: &'static str,
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum RcloneOp<'a> {
    Exists(&'a str),
    Upload { local: &'a Utf8Path, name: &'a str },
    List(&'a NamePattern),
    Delete(&'a str),
}

impl RcloneStore {
    pub fn new(
        program: impl Into<String>,
        remote_name: impl Into<String>,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            remote_name: remote_name.into(),
            folder_id: folder_id.into(),
        }
    }

    fn root(&self) -> String {
        format!("{},root_folder_id={}:", self.remote_name, self.folder_id)
    }

    pub(crate) fn resolve(&self, op: RcloneOp<'_>) -> ResolvedCommand {
        let root = self.root();
        let (name, args) = match op {
            RcloneOp::Exists(name) => ("exists", vec!["lsf".to_string(), format!("{root}{name}")]),
            RcloneOp::Upload { local, name } => (
                "upload",
                vec![
                    "copyto".to_string(),
                    local.to_string(),
                    format!("{root}{name}"),
                ],
            ),
            RcloneOp::List(pattern) => (
                "list",
                vec![
                    "lsf".to_string(),
                    root,
                    "--files-only".to_string(),
                    "--include".to_string(),
                    pattern.to_glob(),
                ],
            ),
            RcloneOp::Delete(name) => (
                "delete",
                vec!["deletefile".to_string(), format!("{root}{name}")],
            ),
        };
        ResolvedCommand {
            op: name,
            program: self.program.clone(),
            args,
        }
    }

    fn run(&self, op: RcloneOp<'_>) -> Result<Output, RemoteError> {
        let cmd = self.resolve(op);
        debug!("Running {} {:?}", cmd.program, cmd.args);
        Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RemoteError::Spawn {
                program: cmd.program.clone(),
                source,
            })
    }

    fn run_checked(&self, op: RcloneOp<'_>) -> Result<Output, RemoteError> {
        let op_name = self.resolve(op).op;
        let output = self.run(op)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(RemoteError::CommandFailed {
                op: op_name,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

impl RemoteStore for RcloneStore {
    fn exists(&self, name: &str) -> Result<bool, RemoteError> {
        let output = self.run(RcloneOp::Exists(name))?;
        if !output.status.success() {
            // lsf on a missing path exits non-zero; treat it as absent.
            debug!(
                "lsf for {} exited with {:?}: {}",
                name,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(stdout_lines(&output).iter().any(|l| l == name))
    }

    fn upload(&self, local_path: &Utf8Path, name: &str) -> Result<(), RemoteError> {
        self.run_checked(RcloneOp::Upload {
            local: local_path,
            name,
        })?;
        Ok(())
    }

    fn list(&self, pattern: &NamePattern) -> Result<Vec<String>, RemoteError> {
        let output = self.run_checked(RcloneOp::List(pattern))?;
        let names = stdout_lines(&output);
        if names.iter().any(|n| !pattern.matches(n)) {
            warn!("rclone listing returned names outside {}", pattern.to_glob());
        }
        Ok(names.into_iter().filter(|n| pattern.matches(n)).collect())
    }

    fn delete(&self, name: &str) -> Result<(), RemoteError> {
        self.run_checked(RcloneOp::Delete(name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RcloneStore {
        RcloneStore::new("rclone", "gdrive", "FOLDER123")
    }

    #[test]
    fn exists_lists_the_exact_file() {
        let cmd = store().resolve(RcloneOp::Exists("app-1.apks"));
        assert_eq!(cmd.program, "rclone");
        assert_eq!(cmd.args, ["lsf", "gdrive,root_folder_id=FOLDER123:app-1.apks"]);
    }

    #[test]
    fn upload_copies_to_explicit_name() {
        let local = Utf8Path::new("/tmp/work/app-1.apks");
        let cmd = store().resolve(RcloneOp::Upload {
            local,
            name: "app-1.apks",
        });
        assert_eq!(cmd.op, "upload");
        assert_eq!(
            cmd.args,
            [
                "copyto",
                "/tmp/work/app-1.apks",
                "gdrive,root_folder_id=FOLDER123:app-1.apks"
            ]
        );
    }

    #[test]
    fn list_filters_by_glob() {
        let pattern = NamePattern::new("app-", ".apks");
        let cmd = store().resolve(RcloneOp::List(&pattern));
        assert_eq!(
            cmd.args,
            [
                "lsf",
                "gdrive,root_folder_id=FOLDER123:",
                "--files-only",
                "--include",
                "app-*.apks"
            ]
        );
    }

    #[test]
    fn delete_targets_single_file() {
        let cmd = store().resolve(RcloneOp::Delete("app-0.apks"));
        assert_eq!(cmd.op, "delete");
        assert_eq!(
            cmd.args,
            ["deletefile", "gdrive,root_folder_id=FOLDER123:app-0.apks"]
        );
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let store = RcloneStore::new("/nonexistent/rclone-binary", "gdrive", "F");
        assert!(matches!(
            store.exists("x.apks"),
            Err(RemoteError::Spawn { .. })
        ));
    }
}
