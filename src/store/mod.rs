mod memory;

pub use memory::*;

use crate::skill::SkillRecord;

/// abstract key/value collection backing a [`SkillTable`](crate::skill::SkillTable):
/// a reference to a durable backing store. collapsed into one trait since
/// this domain has a single record shape rather than many distinct tables.
pub trait Store {
    /// lazily read a single record, for policies that hydrate from durable
    /// storage instead of constructing a fresh one.
    fn load(&self, key: &str) -> anyhow::Result<Option<SkillRecord>>;

    /// persist every given record keyed by its id. store I/O failures
    /// bubble out unchanged.
    fn flush(&mut self, records: &[(String, SkillRecord)]) -> anyhow::Result<()>;
}
