use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_id::ObjectId;

/// A branch as listed by `branches`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: BranchName,
    pub commit: ObjectId,
    /// HEAD is on this branch (for a detached HEAD, the first branch at its commit)
    pub is_current: bool,
}

impl Repository {
    /// Create a branch at `start`, HEAD by default
    pub fn branch(&mut self, name: &str, start: Option<&str>) -> anyhow::Result<ObjectId> {
        let name = BranchName::try_parse(name)?;

        let start_oid = match start {
            Some(start) => Revision::try_parse(start)?.resolve(self)?,
            None => self.require_head_commit()?,
        };

        self.refs().create_branch(&name, &start_oid)?;
        tracing::debug!(branch = %name, commit = %start_oid, "created branch");

        Ok(start_oid)
    }

    /// Every branch with a commit, sorted by name
    pub fn branches(&self) -> anyhow::Result<Vec<BranchInfo>> {
        let current = self.current_branch()?;
        let mut branches = Vec::new();

        for name in self.refs().list_branches()? {
            let Some(commit) = self.refs().branch_commit(&name)? else {
                continue;
            };

            branches.push(BranchInfo {
                is_current: current.as_ref() == Some(&name),
                name,
                commit,
            });
        }

        Ok(branches)
    }

    /// Delete a branch HEAD is not attached to, returning the commit it pointed at
    pub fn delete_branch(&mut self, name: &str) -> anyhow::Result<ObjectId> {
        let name = BranchName::try_parse(name)?;
        let head = self.head()?;

        let oid = self.refs().delete_branch(&name, Some(&head))?;
        tracing::debug!(branch = %name, commit = %oid, "deleted branch");

        Ok(oid)
    }
}
