use camino::Utf8Path;
use slimset_core::NamePattern;

mod memory;
mod rclone;

pub use memory::MemoryStore;
pub use rclone::RcloneStore;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("remote {op} failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        op: &'static str,
        code: Option<i32>,
        stderr: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("remote rejected {op} of {name}")]
    Rejected { op: &'static str, name: String },
}

/// File operations against the remote folder holding published sets.
pub trait RemoteStore: Send + Sync {
    fn exists(&self, name: &str) -> Result<bool, RemoteError>;
    /// Uploads `local_path` under `name`, replacing any existing file.
    fn upload(&self, local_path: &Utf8Path, name: &str) -> Result<(), RemoteError>;
    /// Names matching `pattern`, in the order the remote reports them.
    fn list(&self, pattern: &NamePattern) -> Result<Vec<String>, RemoteError>;
    fn delete(&self, name: &str) -> Result<(), RemoteError>;
}
