use colored::Colorize;

const LABEL_WIDTH: usize = 8;

/// How a tracked file in the working tree differs from its index entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorkspaceChangeType {
    #[default]
    None,
    Modified,
    Deleted,
}

impl WorkspaceChangeType {
    pub fn status_char(&self) -> char {
        match self {
            WorkspaceChangeType::None => ' ',
            WorkspaceChangeType::Modified => 'M',
            WorkspaceChangeType::Deleted => 'D',
        }
    }
}

/// How an index entry differs from the HEAD tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum IndexChangeType {
    #[default]
    None,
    Added,
    Modified,
    Deleted,
}

impl IndexChangeType {
    pub fn status_char(&self) -> char {
        match self {
            IndexChangeType::None => ' ',
            IndexChangeType::Added => 'A',
            IndexChangeType::Modified => 'M',
            IndexChangeType::Deleted => 'D',
        }
    }
}

/// Change label for the long status listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileChangeType {
    Workspace(WorkspaceChangeType),
    Index(IndexChangeType),
}

impl FileChangeType {
    fn label(&self) -> &'static str {
        match self {
            FileChangeType::Workspace(WorkspaceChangeType::Modified)
            | FileChangeType::Index(IndexChangeType::Modified) => "modified:   ",
            FileChangeType::Workspace(WorkspaceChangeType::Deleted)
            | FileChangeType::Index(IndexChangeType::Deleted) => "deleted:    ",
            FileChangeType::Index(IndexChangeType::Added) => "new file:   ",
            FileChangeType::Workspace(WorkspaceChangeType::None)
            | FileChangeType::Index(IndexChangeType::None) => "",
        }
    }
}

impl std::fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileChangeType::Workspace(_) => self.label().red(),
            FileChangeType::Index(_) => self.label().green(),
        };
        write!(f, "{:>width$}{}", "", label, width = LABEL_WIDTH)
    }
}
