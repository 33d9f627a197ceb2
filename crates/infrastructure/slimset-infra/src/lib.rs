pub mod net;
pub mod remote;

// Re-exports for convenience
pub use net::{default_http_client, GitlabReleaseSource, NetError, ReleaseSource};
pub use remote::{MemoryStore, RcloneStore, RemoteError, RemoteStore};
