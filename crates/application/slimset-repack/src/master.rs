/// Master split candidates and their uncompressed sizes.
///
/// Only lives for the duration of one repackaging pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterCandidates {
    candidates: Vec<(String, u64)>,
}

impl MasterCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a candidate. A repeated name keeps the larger size.
    pub fn record(&mut self, name: impl Into<String>, size: u64) {
        let name = name.into();
        match self.candidates.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = (*existing).max(size),
            None => self.candidates.push((name, size)),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn size_of(&self, name: &str) -> Option<u64> {
        self.candidates
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, size)| *size)
    }

    /// The candidate with the greatest size.
    ///
    /// Equal sizes resolve to the lexicographically smallest name, so the
    /// result never depends on the order candidates were recorded in.
    pub fn select(&self) -> Option<&str> {
        self.candidates
            .iter()
            .min_by(|(a_name, a_size), (b_name, b_size)| {
                b_size.cmp(a_size).then_with(|| a_name.cmp(b_name))
            })
            .map(|(name, _)| name.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for MasterCandidates {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, size) in iter {
            set.record(name, size);
        }
        set
    }
}
