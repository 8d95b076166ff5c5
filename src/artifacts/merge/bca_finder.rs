//! Best common ancestor (merge base) search
//!
//! Two passes over the commit graph:
//!
//! 1. Paint ancestors of both commits, newest first. A commit reached from both sides is a
//!    common ancestor; everything below it is marked stale so it is not reported again.
//! 2. Drop candidates that are ancestors of another candidate. Whatever survives is a best
//!    common ancestor.
//!
//! Criss-cross histories can leave several best candidates; the most recent one (by
//! timestamp, then id) is returned so repeated merges pick the same base.
//!
//! Build with the `debug_merge` feature to trace every commit the search visits.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

macro_rules! trace_merge {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b0000;
        const VISITED_FROM_SOURCE = 0b0001;
        const VISITED_FROM_TARGET = 0b0010;
        const VISITED_FROM_BOTH =
            Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const STALE = 0b0100;
        const RESULT = 0b1000;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (VisitState::VISITED_FROM_SOURCE, "SOURCE"),
            (VisitState::VISITED_FROM_TARGET, "TARGET"),
            (VisitState::STALE, "STALE"),
            (VisitState::RESULT, "RESULT"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect::<Vec<_>>();

        match flags.is_empty() {
            true => write!(f, "NONE"),
            false => write!(f, "{}", flags.join("|")),
        }
    }
}

type AncestorStates = HashMap<ObjectId, VisitState>;

/// Merge base search over any commit source
///
/// The loader returns the parents and timestamp of a commit; root commits have no parents.
pub struct BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Best common ancestor of two commits, `None` for unrelated histories
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let states = self.paint_ancestors(source_commit_id, &[target_commit_id.clone()])?;
        let candidates = states
            .into_iter()
            .filter(|(_, state)| {
                state.contains(VisitState::RESULT) && !state.contains(VisitState::STALE)
            })
            .map(|(oid, _)| oid)
            .collect::<Vec<_>>();

        tracing::debug!(
            source = %source_commit_id,
            target = %target_commit_id,
            candidates = candidates.len(),
            "found common ancestors"
        );

        let best = self.remove_redundant(candidates)?;
        let mut best = best
            .iter()
            .map(|oid| (self.commit_loader)(oid))
            .collect::<anyhow::Result<Vec<_>>>()?;
        best.sort();

        Ok(best.pop().map(|commit| commit.oid))
    }

    /// Candidates that are not reachable from any other candidate
    fn remove_redundant(&self, candidates: Vec<ObjectId>) -> anyhow::Result<Vec<ObjectId>> {
        let mut redundant = vec![false; candidates.len()];

        for (i, candidate) in candidates.iter().enumerate() {
            if redundant[i] {
                continue;
            }

            let others = candidates
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i && !redundant[*j])
                .map(|(_, oid)| oid.clone())
                .collect::<Vec<_>>();
            if others.is_empty() {
                continue;
            }

            let states = self.paint_ancestors(candidate, &others)?;
            let state_of = |oid: &ObjectId| states.get(oid).copied().unwrap_or(VisitState::NONE);

            if state_of(candidate).contains(VisitState::VISITED_FROM_TARGET) {
                trace_merge!("{} is an ancestor of another candidate", candidate);
                redundant[i] = true;
            }

            for (j, other) in candidates.iter().enumerate() {
                if j != i && state_of(other).contains(VisitState::VISITED_FROM_SOURCE) {
                    trace_merge!("{} is an ancestor of {}", other, candidate);
                    redundant[j] = true;
                }
            }
        }

        Ok(candidates
            .into_iter()
            .zip(redundant)
            .filter(|(_, redundant)| !redundant)
            .map(|(oid, _)| oid)
            .collect())
    }

    /// Flag every ancestor of `source` and of `targets` with the sides that reach it
    ///
    /// Flags only ever grow, so each commit is queued a bounded number of times and the
    /// walk ends even on a malformed graph.
    fn paint_ancestors(
        &self,
        source_commit_id: &ObjectId,
        target_commit_ids: &[ObjectId],
    ) -> anyhow::Result<AncestorStates> {
        let mut states = AncestorStates::new();

        if target_commit_ids.contains(source_commit_id) {
            states.insert(
                source_commit_id.clone(),
                VisitState::VISITED_FROM_BOTH | VisitState::RESULT,
            );
            return Ok(states);
        }

        let mut queue = BinaryHeap::new();
        states.insert(source_commit_id.clone(), VisitState::VISITED_FROM_SOURCE);
        queue.push((self.commit_loader)(source_commit_id)?);
        for target_commit_id in target_commit_ids {
            states.insert(target_commit_id.clone(), VisitState::VISITED_FROM_TARGET);
            queue.push((self.commit_loader)(target_commit_id)?);
        }

        while let Some(commit) = queue.pop() {
            let state = states.get(&commit.oid).copied().unwrap_or(VisitState::NONE);
            trace_merge!("visiting {}: {:?}", commit.oid, state);

            let mut inherited = state & (VisitState::VISITED_FROM_BOTH | VisitState::STALE);
            if inherited == VisitState::VISITED_FROM_BOTH {
                states.insert(commit.oid.clone(), state | VisitState::RESULT);
                inherited |= VisitState::STALE;
            }

            for parent_id in &commit.parents {
                let parent_state = states.get(parent_id).copied().unwrap_or(VisitState::NONE);
                if parent_state.contains(inherited) {
                    continue;
                }

                states.insert(parent_id.clone(), parent_state | inherited);
                queue.push((self.commit_loader)(parent_id)?);
            }
        }

        Ok(states)
    }
}
