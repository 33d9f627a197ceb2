use slimset_core::markers::{
    ABI_MARKER, DENSITY_MARKER, MASTER_MARKER, SPLITS_PREFIX, TOC_MARKER,
};

/// Name-pattern predicates deciding which entries survive repackaging.
///
/// A policy is a static value; the default carries the markers used for
/// the xxhdpi / arm64-v8a device profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Entries whose name contains this are dropped everywhere.
    pub toc_marker: &'static str,
    /// Namespace holding configuration splits.
    pub split_prefix: &'static str,
    /// Substring identifying master split candidates.
    pub master_marker: &'static str,
    pub density_markers: &'static [&'static str],
    pub abi_markers: &'static [&'static str],
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            toc_marker: TOC_MARKER,
            split_prefix: SPLITS_PREFIX,
            master_marker: MASTER_MARKER,
            density_markers: &[DENSITY_MARKER],
            abi_markers: &[ABI_MARKER],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// Base module or any other member outside the split namespace.
    NonSplit,
    Density,
    Abi,
    /// The chosen master split.
    Master,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Table-of-contents delivery metadata.
    Metadata,
    /// A split matching none of the keep predicates.
    UnselectedSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep(KeepReason),
    Drop(DropReason),
}

impl Verdict {
    pub fn is_keep(self) -> bool {
        matches!(self, Verdict::Keep(_))
    }
}

impl SelectionPolicy {
    pub fn is_master_candidate(&self, name: &str) -> bool {
        name.contains(self.master_marker)
    }

    pub fn is_split(&self, name: &str) -> bool {
        name.starts_with(self.split_prefix)
    }

    /// Classifies one entry. Rules apply in order: metadata drop, then the
    /// split namespace keep predicates, then keep-everything-else.
    pub fn classify(&self, name: &str, chosen_master: Option<&str>) -> Verdict {
        if name.contains(self.toc_marker) {
            return Verdict::Drop(DropReason::Metadata);
        }

        if !self.is_split(name) {
            return Verdict::Keep(KeepReason::NonSplit);
        }

        if self.density_markers.iter().any(|m| name.contains(m)) {
            Verdict::Keep(KeepReason::Density)
        } else if self.abi_markers.iter().any(|m| name.contains(m)) {
            Verdict::Keep(KeepReason::Abi)
        } else if chosen_master == Some(name) {
            Verdict::Keep(KeepReason::Master)
        } else {
            Verdict::Drop(DropReason::UnselectedSplit)
        }
    }
}
