use crate::master::MasterCandidates;
use crate::policy::{SelectionPolicy, Verdict};

/// Archive entry metadata the policy looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub name: String,
    pub size: u64,
}

impl EntryMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Outcome of both selection passes over an archive's entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    pub candidates: MasterCandidates,
    pub master: Option<String>,
    /// One verdict per input entry, in input order.
    pub verdicts: Vec<(String, Verdict)>,
}

impl SelectionPlan {
    pub fn kept(&self) -> impl Iterator<Item = &str> {
        self.verdicts
            .iter()
            .filter(|(_, v)| v.is_keep())
            .map(|(name, _)| name.as_str())
    }

    pub fn verdict_at(&self, index: usize) -> Option<Verdict> {
        self.verdicts.get(index).map(|(_, v)| *v)
    }
}

/// Runs master selection, then classifies every entry against the result.
pub fn plan(entries: &[EntryMeta], policy: &SelectionPolicy) -> SelectionPlan {
    let candidates: MasterCandidates = entries
        .iter()
        .filter(|e| policy.is_master_candidate(&e.name))
        .map(|e| (e.name.as_str(), e.size))
        .collect();
    let master = candidates.select().map(str::to_string);

    let verdicts = entries
        .iter()
        .map(|e| (e.name.clone(), policy.classify(&e.name, master.as_deref())))
        .collect();

    SelectionPlan {
        candidates,
        master,
        verdicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{DropReason, KeepReason};

    fn metas(entries: &[(&str, u64)]) -> Vec<EntryMeta> {
        entries.iter().map(|(n, s)| EntryMeta::new(*n, *s)).collect()
    }

    #[test]
    fn scenario_keeps_base_density_and_largest_master() {
        let entries = metas(&[
            ("AndroidManifest.xml", 10),
            ("toc.pb", 4),
            ("splits/base-xxhdpi.apk", 30),
            ("splits/base-master-a.apk", 50),
            ("splits/base-master-b.apk", 80),
            ("splits/other.apk", 20),
        ]);
        let plan = plan(&entries, &SelectionPolicy::default());

        assert_eq!(plan.master.as_deref(), Some("splits/base-master-b.apk"));
        assert_eq!(plan.candidates.len(), 2);
        let kept: Vec<&str> = plan.kept().collect();
        assert_eq!(
            kept,
            vec![
                "AndroidManifest.xml",
                "splits/base-xxhdpi.apk",
                "splits/base-master-b.apk"
            ]
        );
        assert_eq!(plan.verdict_at(1), Some(Verdict::Drop(DropReason::Metadata)));
        assert_eq!(
            plan.verdict_at(3),
            Some(Verdict::Drop(DropReason::UnselectedSplit))
        );
        assert_eq!(plan.verdict_at(4), Some(Verdict::Keep(KeepReason::Master)));
    }

    #[test]
    fn no_master_candidates_keeps_device_splits_only() {
        let entries = metas(&[
            ("splits/base-arm64_v8a.apk", 30),
            ("splits/base-xxhdpi.apk", 30),
            ("splits/base-en.apk", 5),
        ]);
        let plan = plan(&entries, &SelectionPolicy::default());
        assert_eq!(plan.master, None);
        let kept: Vec<&str> = plan.kept().collect();
        assert_eq!(kept, vec!["splits/base-arm64_v8a.apk", "splits/base-xxhdpi.apk"]);
    }

    #[test]
    fn toc_named_master_is_a_candidate_but_never_kept() {
        let entries = metas(&[
            ("splits/base-master-toc.pb", 500),
            ("splits/base-master.apk", 40),
        ]);
        let plan = plan(&entries, &SelectionPolicy::default());
        assert_eq!(plan.master.as_deref(), Some("splits/base-master-toc.pb"));
        assert_eq!(plan.kept().count(), 0);
    }

    #[test]
    fn empty_entry_list_plans_nothing() {
        let plan = plan(&[], &SelectionPolicy::default());
        assert!(plan.candidates.is_empty());
        assert!(plan.verdicts.is_empty());
        assert_eq!(plan.master, None);
    }
}
