use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VitError;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// Follow `parents[0]` only
    #[default]
    FirstParent,
    /// Depth first through every parent, first parent first
    Full,
}

#[derive(Debug)]
enum Step {
    Enter(ObjectId),
    Leave(ObjectId),
}

/// Lazy walk over the commits reachable from a starting commit
///
/// Each commit is yielded at most once. Reaching a commit again while one of its own
/// descendants is still being walked means the graph has a cycle: the walk yields
/// `CorruptHistory` and stops.
#[derive(Debug)]
pub struct History<'r> {
    database: &'r Database,
    mode: TraversalMode,
    steps: Vec<Step>,
    visited: HashSet<ObjectId>,
    on_path: HashSet<ObjectId>,
}

impl<'r> History<'r> {
    pub fn new(database: &'r Database, start: Option<ObjectId>, mode: TraversalMode) -> Self {
        History {
            database,
            mode,
            steps: start.into_iter().map(Step::Enter).collect(),
            visited: HashSet::new(),
            on_path: HashSet::new(),
        }
    }

    fn enter(&mut self, oid: ObjectId) -> anyhow::Result<Option<Commit>> {
        if self.on_path.contains(&oid) {
            return Err(VitError::CorruptHistory(oid).into());
        }
        if !self.visited.insert(oid.clone()) {
            return Ok(None);
        }

        let commit = self.database.parse_object_as_commit(&oid)?;
        let parents = match self.mode {
            TraversalMode::FirstParent => commit.parents().iter().take(1).collect::<Vec<_>>(),
            TraversalMode::Full => commit.parents().iter().collect(),
        };

        self.on_path.insert(oid.clone());
        self.steps.push(Step::Leave(oid));
        self.steps
            .extend(parents.into_iter().rev().cloned().map(Step::Enter));

        Ok(Some(commit))
    }
}

impl Iterator for History<'_> {
    type Item = anyhow::Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(step) = self.steps.pop() {
            match step {
                Step::Leave(oid) => {
                    self.on_path.remove(&oid);
                }
                Step::Enter(oid) => match self.enter(oid.clone()) {
                    Ok(Some(commit)) => return Some(Ok((oid, commit))),
                    Ok(None) => continue,
                    Err(err) => {
                        self.steps.clear();
                        return Some(Err(err));
                    }
                },
            }
        }

        None
    }
}

/// Whether `ancestor` is reachable from `descendant`, counting a commit as its own ancestor
pub fn is_ancestor(
    database: &Database,
    ancestor: &ObjectId,
    descendant: &ObjectId,
) -> anyhow::Result<bool> {
    for commit in History::new(database, Some(descendant.clone()), TraversalMode::Full) {
        let (oid, _) = commit?;
        if &oid == ancestor {
            return Ok(true);
        }
    }

    Ok(false)
}
