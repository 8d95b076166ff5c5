use crate::errors::VitError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookEvent {
    PreCommit,
    PostCommit,
    PreMerge,
    PostMerge,
    PreCheckout,
    PostCheckout,
}

impl HookEvent {
    pub const ALL: [HookEvent; 6] = [
        HookEvent::PreCommit,
        HookEvent::PostCommit,
        HookEvent::PreMerge,
        HookEvent::PostMerge,
        HookEvent::PreCheckout,
        HookEvent::PostCheckout,
    ];

    /// File name of the script under `hooks/`
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::PreCommit => "pre-commit",
            HookEvent::PostCommit => "post-commit",
            HookEvent::PreMerge => "pre-merge",
            HookEvent::PostMerge => "post-merge",
            HookEvent::PreCheckout => "pre-checkout",
            HookEvent::PostCheckout => "post-checkout",
        }
    }

    /// Pre hooks can veto their operation; post hooks only observe it
    pub fn is_pre(&self) -> bool {
        matches!(
            self,
            HookEvent::PreCommit | HookEvent::PreMerge | HookEvent::PreCheckout
        )
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> anyhow::Result<Self> {
        HookEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == name)
            .ok_or_else(|| VitError::HookNotFound(name.to_string()).into())
    }
}
