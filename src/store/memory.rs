use super::Store;
use crate::skill::SkillRecord;
use std::collections::HashMap;

/// in-memory [`Store`], used by tests and as a `--no-db` fallback. models
/// "durable" storage as a plain map; `flush` never fails.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: HashMap<String, SkillRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<SkillRecord> {
        self.records.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<SkillRecord>> {
        Ok(self.records.get(key).copied())
    }

    fn flush(&mut self, records: &[(String, SkillRecord)]) -> anyhow::Result<()> {
        for (key, record) in records {
            self.records.insert(key.clone(), *record);
        }
        Ok(())
    }
}
