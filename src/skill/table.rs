use super::SkillRecord;
use crate::store::Store;
use std::collections::HashMap;

/// constructs a fresh [`SkillRecord`] for a key absent from both the
/// in-memory cache and the durable store.
pub type MissingPolicy = Box<dyn Fn(&str) -> SkillRecord + Send + Sync>;

/// the reference player policy: default TrueSkill prior, no per-game drift.
pub fn player_policy() -> MissingPolicy {
    Box::new(|_key| SkillRecord::new(crate::INITIAL_MU, crate::INITIAL_SIGMA, 0.0))
}

/// the reference opening policy: centered at zero, with a small per-game
/// drift so pseudo-player openings don't freeze once well-observed.
pub fn opening_policy() -> MissingPolicy {
    Box::new(|_key| SkillRecord::new(0.0, crate::INITIAL_SIGMA, 1e-4))
}

/// keyed store of [`SkillRecord`]s over an abstract durable [`Store`], with
/// lazy-initialize semantics, global uncertainty inflation, and flush-to-
/// durable-store.
pub struct SkillTable<S: Store> {
    store: S,
    records: HashMap<String, SkillRecord>,
    missing: MissingPolicy,
    initial_sigma: f64,
}

impl<S: Store> SkillTable<S> {
    pub fn new(store: S, missing: MissingPolicy, initial_sigma: f64) -> Self {
        Self {
            store,
            records: HashMap::new(),
            missing,
            initial_sigma,
        }
    }

    /// if present in memory, return it; otherwise try the durable store,
    /// falling back to the missing policy; either way the key is
    /// materialized into the in-memory map before returning.
    pub fn get(&mut self, key: &str) -> SkillRecord {
        if let Some(record) = self.records.get(key) {
            return *record;
        }
        let record = match self.store.load(key) {
            Ok(Some(record)) => record,
            Ok(None) => (self.missing)(key),
            Err(err) => {
                log::warn!("store lookup failed for {key}, using missing policy: {err}");
                (self.missing)(key)
            }
        };
        self.records.insert(key.to_string(), record);
        record
    }

    pub fn mu(&mut self, key: &str) -> f64 {
        self.get(key).mu
    }

    pub fn sigma(&mut self, key: &str) -> f64 {
        self.get(key).sigma
    }

    pub fn gamma(&mut self, key: &str) -> f64 {
        self.get(key).gamma
    }

    pub fn set_mu(&mut self, key: &str, mu: f64) {
        let mut record = self.get(key);
        record.mu = mu;
        record.recompute_bounds();
        self.records.insert(key.to_string(), record);
    }

    pub fn set_sigma(&mut self, key: &str, sigma: f64) {
        let mut record = self.get(key);
        record.sigma = sigma;
        record.recompute_bounds();
        self.records.insert(key.to_string(), record);
    }

    /// for each record whose key matches `predicate`, relax `sigma` toward
    /// the table's initial prior sigma by `strength`:
    /// `sigma <- sigma*(1-strength) + sigma0*strength`. `strength = 0` is a
    /// no-op.
    pub fn inflate_uncertainty(&mut self, strength: f64, predicate: impl Fn(&str) -> bool) {
        debug_assert!((0.0..=1.0).contains(&strength), "strength must be in [0,1]");
        if strength == 0.0 {
            return;
        }
        for (key, record) in self.records.iter_mut() {
            if predicate(key) {
                record.sigma = record.sigma * (1.0 - strength) + self.initial_sigma * strength;
                record.recompute_bounds();
            }
        }
    }

    /// persist every in-memory record to the durable store, keyed by id.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        let snapshot = self
            .records
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect::<Vec<_>>();
        self.store.flush(&snapshot)
    }

    /// records sorted by descending mu.
    pub fn ordered(&self) -> Vec<(&str, &SkillRecord)> {
        let mut entries = self
            .records
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.1.mu.partial_cmp(&a.1.mu).unwrap());
        entries
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn get_materializes_missing_key() {
        let mut table = SkillTable::new(MemoryStore::new(), player_policy(), crate::INITIAL_SIGMA);
        let record = table.get("alice");
        assert_eq!(record.mu, crate::INITIAL_MU);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn set_mu_and_set_sigma_keep_bounds_consistent() {
        let mut table = SkillTable::new(MemoryStore::new(), player_policy(), crate::INITIAL_SIGMA);
        table.set_mu("alice", 40.0);
        table.set_sigma("alice", 2.0);
        let r = table.get("alice");
        assert_eq!(r.floor, 40.0 - 6.0);
        assert_eq!(r.ceil, 40.0 + 6.0);
    }

    #[test]
    fn inflate_zero_is_no_op() {
        let mut table = SkillTable::new(MemoryStore::new(), player_policy(), crate::INITIAL_SIGMA);
        table.set_sigma("alice", 1.0);
        let before = table.get("alice");
        table.inflate_uncertainty(0.0, |_| true);
        let after = table.get("alice");
        assert_eq!(before, after);
    }

    #[test]
    fn inflate_pulls_sigma_toward_prior() {
        let mut table = SkillTable::new(MemoryStore::new(), player_policy(), crate::INITIAL_SIGMA);
        table.set_sigma("alice", 1.0);
        table.inflate_uncertainty(0.5, |_| true);
        let r = table.get("alice");
        assert!((r.sigma - (1.0 * 0.5 + crate::INITIAL_SIGMA * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn flush_then_cold_reload_preserves_mu_sigma_gamma() {
        let mut table = SkillTable::new(MemoryStore::new(), player_policy(), crate::INITIAL_SIGMA);
        table.set_mu("alice", 30.0);
        table.set_sigma("alice", 4.0);
        table.flush().unwrap();

        // simulate a cold process restarted against the same backing store
        let mut store = MemoryStore::new();
        store.flush(&[("alice".to_string(), table.get("alice"))]).unwrap();
        let mut reloaded = SkillTable::new(store, player_policy(), crate::INITIAL_SIGMA);
        let r = reloaded.get("alice");
        assert_eq!(r.mu, 30.0);
        assert_eq!(r.sigma, 4.0);
        assert_eq!(r.gamma, 0.0);
    }

    #[test]
    fn ordered_sorts_by_descending_mu() {
        let mut table = SkillTable::new(MemoryStore::new(), player_policy(), crate::INITIAL_SIGMA);
        table.set_mu("low", 10.0);
        table.set_mu("high", 50.0);
        table.set_mu("mid", 25.0);
        let ordered = table.ordered();
        let names = ordered.iter().map(|(k, _)| *k).collect::<Vec<_>>();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }
}
