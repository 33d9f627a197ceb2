use slimset_core::{stale_versions, NamePattern};
use slimset_infra::RemoteStore;
use tracing::{info, warn};

/// Deletes every remote file matching `pattern` except `current`.
///
/// Best effort: listing or deletion failures are logged and skipped.
/// Returns the names actually deleted.
pub fn prune_old_versions(
    store: &dyn RemoteStore,
    pattern: &NamePattern,
    current: &str,
) -> Vec<String> {
    info!("Cleaning up old versions matching {}", pattern.to_glob());
    let listed = match store.list(pattern) {
        Ok(names) => names,
        Err(e) => {
            warn!("Could not list old versions: {}", e);
            return Vec::new();
        }
    };

    let mut deleted = Vec::new();
    for name in stale_versions(&listed, current) {
        info!("Deleting old version: {}", name);
        match store.delete(&name) {
            Ok(()) => deleted.push(name),
            Err(e) => warn!("Failed to delete {}: {}", name, e),
        }
    }
    deleted
}
