use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, MIN_ABBREVIATED_OID, PARENT_REGEX, REF_ALIASES};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::VitError;
use anyhow::Context;

/// Revision expression naming a commit
///
/// Supported forms:
/// - `HEAD` and its alias `@`
/// - branch names, then tag names
/// - full or abbreviated (at least 4 hex characters) commit ids
/// - `<revision>^` for the first parent
/// - `<revision>~<n>` for the n-th first-parent ancestor
///
/// Refs win over ids when a name could be both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Ref(String),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Revision> {
        let parent_re = regex::Regex::new(PARENT_REGEX)
            .with_context(|| format!("invalid parent regex: {PARENT_REGEX}"))?;
        if let Some(caps) = parent_re.captures(revision) {
            return Ok(Revision::Parent(Box::new(Self::try_parse(&caps[1])?)));
        }

        let ancestor_re = regex::Regex::new(ANCESTOR_REGEX)
            .with_context(|| format!("invalid ancestor regex: {ANCESTOR_REGEX}"))?;
        if let Some(caps) = ancestor_re.captures(revision) {
            let generations = caps[2]
                .parse::<usize>()
                .with_context(|| format!("invalid ancestor count in {revision}"))?;
            return Ok(Revision::Ancestor(
                Box::new(Self::try_parse(&caps[1])?),
                generations,
            ));
        }

        let name = REF_ALIASES.get(revision).copied().unwrap_or(revision);
        if name != "HEAD" && !Self::looks_like_oid(name) {
            BranchName::try_parse(name)?;
        }

        Ok(Revision::Ref(name.to_string()))
    }

    /// Resolve to the commit the expression names
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Ref(name) => Self::resolve_name(name, repository),
            Revision::Parent(base) => {
                let oid = base.resolve(repository)?;
                Self::first_parent(&oid, repository)
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = base.resolve(repository)?;
                for _ in 0..*generations {
                    oid = Self::first_parent(&oid, repository)?;
                }

                Ok(oid)
            }
        }
    }

    fn resolve_name(name: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if name == "HEAD" {
            return repository
                .head_commit()?
                .ok_or_else(|| VitError::NoCommits("HEAD".to_string()).into());
        }

        if let Ok(ref_name) = BranchName::try_parse(name) {
            if let Some(oid) = repository.refs().branch_commit(&ref_name)? {
                return Ok(oid);
            }
            if let Some(oid) = repository.refs().tag_commit(&ref_name)? {
                return Ok(oid);
            }
        }

        if Self::looks_like_oid(name) {
            return Self::resolve_oid(name, repository);
        }

        Err(VitError::RefNotFound(name.to_string()).into())
    }

    fn looks_like_oid(candidate: &str) -> bool {
        candidate.len() >= MIN_ABBREVIATED_OID
            && ObjectId::is_full_hex(&format!("{candidate:0<40}"))
    }

    fn resolve_oid(prefix: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        let prefix = prefix.to_ascii_lowercase();
        let commits = repository
            .database()
            .find_objects_by_prefix(&prefix)?
            .into_iter()
            .filter(|oid| {
                matches!(
                    repository.database().get_object_type(oid),
                    Ok(ObjectType::Commit)
                )
            })
            .collect::<Vec<_>>();

        match commits.as_slice() {
            [] => Err(VitError::RefNotFound(prefix).into()),
            [oid] => Ok(oid.clone()),
            candidates => {
                let candidates = candidates
                    .iter()
                    .map(ObjectId::to_short_oid)
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow::bail!("short id {prefix} is ambiguous, candidates are: {candidates}")
            }
        }
    }

    fn first_parent(oid: &ObjectId, repository: &Repository) -> anyhow::Result<ObjectId> {
        let commit = repository.database().parse_object_as_commit(oid)?;

        commit
            .parent()
            .cloned()
            .with_context(|| format!("commit {} has no parent", oid.to_short_oid()))
    }
}
