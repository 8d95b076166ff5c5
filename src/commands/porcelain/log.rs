use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::log::history::{History, TraversalMode};

impl Repository {
    /// History reachable from `start` (HEAD by default), newest first
    ///
    /// An unborn HEAD yields an empty history; the walk is lazy and reads a commit only
    /// when the iterator reaches it.
    pub fn log(&self, start: Option<&str>, mode: TraversalMode) -> anyhow::Result<History<'_>> {
        let start = match start {
            Some(revision) => Some(Revision::try_parse(revision)?.resolve(self)?),
            None => self.head_commit()?,
        };

        Ok(History::new(self.database(), start, mode))
    }
}
