use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VitError;
use anyhow::Context;

/// Validated name of a branch or a tag
///
/// A name shaped like a full object id is refused too, since HEAD stores
/// either a branch name or an id and must be able to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(VitError::InvalidRefName(name).into());
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .with_context(|| format!("invalid branch name regex: {INVALID_BRANCH_NAME_REGEX}"))?;

        if re.is_match(&name) || ObjectId::is_full_hex(&name) {
            Err(VitError::InvalidRefName(name).into())
        } else {
            Ok(Self(name))
        }
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
