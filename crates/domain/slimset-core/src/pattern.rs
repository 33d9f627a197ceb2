use std::collections::HashSet;

/// Remote file-name filter of the form `{prefix}*{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    pub prefix: String,
    pub suffix: String,
}

impl NamePattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.len() >= self.prefix.len() + self.suffix.len()
            && name.starts_with(&self.prefix)
            && name.ends_with(&self.suffix)
    }

    /// Glob form accepted by rclone's `--include` filter.
    pub fn to_glob(&self) -> String {
        format!("{}*{}", self.prefix, self.suffix)
    }
}

/// Names from a remote listing that are older versions of `current`.
///
/// Listing order is kept; duplicates and blank lines are dropped.
pub fn stale_versions<S: AsRef<str>>(listed: &[S], current: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    listed
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|name| !name.is_empty() && *name != current)
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}
