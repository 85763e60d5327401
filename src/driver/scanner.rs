use super::MatchRecord;

/// an incremental source of match records. the driver requires only
/// incremental semantics: resumption from the last [`Scanner::save`]. the
/// hosting application's upstream data source and filtering are external
/// collaborators behind this trait.
pub trait Scanner: Iterator<Item = MatchRecord> {
    /// discard the persisted cursor and restart from the beginning.
    fn reset(&mut self);

    /// persist the current cursor so a future scan resumes from here.
    fn save(&mut self) -> anyhow::Result<()>;

    /// a human-readable status line, printed once at driver completion.
    fn status_msg(&self) -> String;
}
