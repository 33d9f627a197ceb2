use camino::Utf8Path;
use slimset_core::NamePattern;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{RemoteError, RemoteStore};

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<String, Vec<u8>>,
    calls: Vec<String>,
    fail_exists: bool,
    fail_upload: bool,
    fail_list: bool,
    fail_delete: BTreeSet<String>,
}

/// In-memory [`RemoteStore`] with the same contract as the real remote.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the pipeline owns another. Listing is in name order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_file(self, name: &str, data: &[u8]) -> Self {
        self.insert(name, data);
        self
    }

    pub fn insert(&self, name: &str, data: &[u8]) {
        self.state().files.insert(name.to_string(), data.to_vec());
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.state().files.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.state().files.keys().cloned().collect()
    }

    /// Operations seen so far, e.g. `"upload app-1.apks"`.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn fail_exists(&self) {
        self.state().fail_exists = true;
    }

    pub fn fail_uploads(&self) {
        self.state().fail_upload = true;
    }

    pub fn fail_list(&self) {
        self.state().fail_list = true;
    }

    pub fn fail_delete_of(&self, name: &str) {
        self.state().fail_delete.insert(name.to_string());
    }
}

impl RemoteStore for MemoryStore {
    fn exists(&self, name: &str) -> Result<bool, RemoteError> {
        let mut state = self.state();
        state.calls.push(format!("exists {name}"));
        if state.fail_exists {
            return Err(RemoteError::Rejected {
                op: "exists",
                name: name.to_string(),
            });
        }
        Ok(state.files.contains_key(name))
    }

    fn upload(&self, local_path: &Utf8Path, name: &str) -> Result<(), RemoteError> {
        let mut state = self.state();
        state.calls.push(format!("upload {name}"));
        if state.fail_upload {
            return Err(RemoteError::Rejected {
                op: "upload",
                name: name.to_string(),
            });
        }
        let data = std::fs::read(local_path)?;
        state.files.insert(name.to_string(), data);
        Ok(())
    }

    fn list(&self, pattern: &NamePattern) -> Result<Vec<String>, RemoteError> {
        let mut state = self.state();
        state.calls.push(format!("list {}", pattern.to_glob()));
        if state.fail_list {
            return Err(RemoteError::Rejected {
                op: "list",
                name: pattern.to_glob(),
            });
        }
        Ok(state
            .files
            .keys()
            .filter(|n| pattern.matches(n))
            .cloned()
            .collect())
    }

    fn delete(&self, name: &str) -> Result<(), RemoteError> {
        let mut state = self.state();
        state.calls.push(format!("delete {name}"));
        if state.fail_delete.contains(name) {
            return Err(RemoteError::Rejected {
                op: "delete",
                name: name.to_string(),
            });
        }
        state.files.remove(name);
        Ok(())
    }
}
