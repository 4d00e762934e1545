//! Deduplication of asset requests within one run.

use indexmap::IndexSet;

/// Asset keys already requested during a run, namespaced by asset kind.
#[derive(Debug, Clone, Default)]
pub struct FetchLedger {
    claimed: IndexSet<(String, String)>,
}

impl FetchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `keys` of `kind`, returning those not claimed before in first-seen order.
    pub fn claim(&mut self, kind: &str, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|key| self.claimed.insert((kind.to_string(), (*key).clone())))
            .cloned()
            .collect()
    }

    pub fn contains(&self, kind: &str, key: &str) -> bool {
        self.claimed.contains(&(kind.to_string(), key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
