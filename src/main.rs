use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use vit::areas::refs::Head;
use vit::areas::repository::Repository;
use vit::artifacts::diff::file_diff::FileDiff;
use vit::artifacts::hooks::hook_event::HookEvent;
use vit::artifacts::log::history::TraversalMode;
use vit::artifacts::status::file_change::{FileChangeType, IndexChangeType, WorkspaceChangeType};
use vit::artifacts::status::status_info::StatusInfo;
use vit::commands::porcelain::checkout::CheckoutOutcome;
use vit::commands::porcelain::init::InitOutcome;
use vit::commands::porcelain::merge::MergeOutcome;
use vit::errors::VitError;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the branch command. Example:

    vit branch <new-branch-name>
"#;

#[derive(Parser)]
#[command(
    name = "vit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A local version control engine",
    long_about = "vit records snapshots of a working tree as content-addressed objects, \
    with branches, tags, three-way merges, a stash, hooks and submodule pins.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        long = "directory",
        global = true,
        env = "VIT_WORK_TREE",
        help = "Run as if vit was started in this directory"
    )]
    directory: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "Create the .vit metadata directory in the current directory \
        or at the given path. Running it again on an existing repository changes nothing."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(name = "add", about = "Stage files, expanding directories recursively")]
    Add {
        #[arg(required = true, help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Record the staged snapshot",
        long_about = "Create a commit from the index on top of HEAD. While a merge is in progress \
        the commit completes it and records both parents."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(short, long, help = "Stage every change in the working tree first")]
        all: bool,
        #[arg(long, help = "Override the author, formatted as \"Name <email>\"")]
        author: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at HEAD or at a start revision")]
    Branch {
        name: String,
        #[arg(index = 2, help = "Revision the branch starts from")]
        start: Option<String>,
    },
    #[command(name = "branches", about = "List branches, marking the current one")]
    Branches,
    #[command(name = "delete-branch", about = "Delete a branch other than the current one")]
    DeleteBranch { name: String },
    #[command(
        name = "checkout",
        about = "Switch to a branch, tag or commit",
        long_about = "A branch name attaches HEAD to the branch; anything else is resolved as a \
        revision and detaches HEAD. Local changes the switch would overwrite abort it."
    )]
    Checkout { target: String },
    #[command(name = "log", about = "Show commit history")]
    Log {
        #[arg(index = 1, help = "Revision to start from, HEAD by default")]
        start: Option<String>,
        #[arg(long, help = "One line per commit")]
        oneline: bool,
        #[arg(long = "all-parents", help = "Walk every parent of merge commits")]
        all_parents: bool,
        #[arg(short = 'n', long = "max-count", help = "Show at most this many commits")]
        max_count: Option<usize>,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(long, help = "Machine readable two-column output")]
        porcelain: bool,
    },
    #[command(
        name = "diff",
        about = "Show line changes",
        long_about = "Without options, compare the index with the working tree. --staged compares \
        HEAD with the index and --commit compares a revision with HEAD."
    )]
    Diff {
        #[arg(help = "Limit the working tree diff to this file or directory")]
        #[arg(conflicts_with_all = ["staged", "commit"])]
        target: Option<PathBuf>,
        #[arg(long, alias = "cached", conflicts_with = "commit")]
        staged: bool,
        #[arg(long, value_name = "REVISION")]
        commit: Option<String>,
    },
    #[command(name = "revert", about = "Commit the inverse of an earlier commit")]
    Revert {
        commit: String,
        #[arg(long, help = "Override the author, formatted as \"Name <email>\"")]
        author: Option<String>,
    },
    #[command(
        name = "reset",
        about = "Unstage files, or move HEAD with --hard",
        long_about = "With paths, restore their index entries to HEAD's versions. With --hard, \
        move the current branch to a revision and make the index and working tree match it."
    )]
    Reset {
        #[arg(required_unless_present = "hard", conflicts_with = "hard")]
        paths: Vec<PathBuf>,
        #[arg(long)]
        hard: bool,
        #[arg(long, requires = "hard", value_name = "REVISION")]
        commit: Option<String>,
    },
    #[command(name = "merge", about = "Join another history into the current branch")]
    Merge {
        target: String,
        #[arg(short, long, help = "Message of the merge commit")]
        message: Option<String>,
    },
    #[command(name = "tag", about = "Create, list, delete or check out tags")]
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    #[command(name = "stash", about = "Put local changes aside")]
    Stash {
        #[command(subcommand)]
        command: StashCommands,
    },
    #[command(name = "hook", about = "Manage lifecycle hook scripts")]
    Hook {
        #[command(subcommand)]
        command: HookCommands,
    },
    #[command(name = "submodule", about = "Manage submodule pins")]
    Submodule {
        #[command(subcommand)]
        command: SubmoduleCommands,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "cat-file", about = "Print the content of an object")]
    CatFile {
        #[arg(short = 'p', long, help = "The object id, full or abbreviated")]
        sha: String,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    Create {
        name: String,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    List,
    Delete {
        name: String,
    },
    Checkout {
        name: String,
    },
}

#[derive(Subcommand)]
enum StashCommands {
    Save {
        #[arg(short, long)]
        message: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    List,
    Pop {
        #[arg(default_value_t = 0)]
        index: usize,
    },
    Apply {
        #[arg(default_value_t = 0)]
        index: usize,
    },
    Drop {
        #[arg(default_value_t = 0)]
        index: usize,
    },
    Clear,
}

#[derive(Subcommand)]
enum HookCommands {
    List,
    Install {
        event: String,
        #[arg(help = "Script to copy into the hooks directory")]
        script: PathBuf,
    },
    Uninstall {
        event: String,
    },
}

#[derive(Subcommand)]
enum SubmoduleCommands {
    Add {
        name: String,
        url: String,
        path: PathBuf,
        #[arg(long, help = "Commit to pin, HEAD's commit by default")]
        commit: Option<String>,
    },
    Remove {
        name: String,
    },
    Update {
        name: String,
        commit: String,
    },
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = match cli.directory {
        Some(directory) => directory,
        None => std::env::current_dir().context("unable to read the current directory")?,
    };
    let cwd = cwd
        .canonicalize()
        .map_err(VitError::Io)
        .with_context(|| format!("unable to resolve {}", cwd.display()))?;

    if let Commands::Init { path } = &cli.command {
        let root = path.as_ref().map_or(cwd.clone(), |path| cwd.join(path));
        let mut repository = Repository::new(root)?;
        let outcome = repository.init().await?;
        let verb = match outcome {
            InitOutcome::Created => "Initialized empty",
            InitOutcome::Reinitialized => "Reinitialized existing",
        };
        println!("{verb} vit repository in {}", repository.metadata_path().display());
        return Ok(());
    }

    let mut repository = Repository::discover(&cwd)?;
    let root = repository.path().to_path_buf();
    let relative = |paths: &[PathBuf]| -> anyhow::Result<Vec<PathBuf>> {
        paths
            .iter()
            .map(|path| workspace_relative(&root, &cwd, path))
            .collect()
    };

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Add { paths } => {
            let paths = relative(&paths)?;
            let summary = repository.add(&paths).await?;
            for path in summary.removed {
                println!("removed '{}'", path.display());
            }
        }
        Commands::Commit {
            message,
            all,
            author,
        } => {
            if all {
                repository.add(&[PathBuf::from(".")]).await?;
            }
            let parent = repository.head_commit()?;
            let commit_id = repository.commit(&message, author.as_deref()).await?;
            let root = match parent {
                Some(_) => "",
                None => " (root-commit)",
            };
            println!(
                "[{}{root} {}] {}",
                repository.head_name(),
                commit_id.to_short_oid(),
                message.lines().next().unwrap_or_default()
            );
        }
        Commands::Branch { name, start } => {
            let commit_id = repository.branch(&name, start.as_deref())?;
            println!("Created branch '{name}' at {}", commit_id.to_short_oid());
        }
        Commands::Branches => {
            for branch in repository.branches()? {
                match branch.is_current {
                    true => println!("* {}", branch.name.to_string().green()),
                    false => println!("  {}", branch.name),
                }
            }
        }
        Commands::DeleteBranch { name } => {
            let commit_id = repository.delete_branch(&name)?;
            println!("Deleted branch {name} (was {}).", commit_id.to_short_oid());
        }
        Commands::Checkout { target } => {
            let outcome = repository.checkout(&target).await?;
            print_checkout(&target, &outcome);
        }
        Commands::Log {
            start,
            oneline,
            all_parents,
            max_count,
        } => {
            let mode = match all_parents {
                true => TraversalMode::Full,
                false => TraversalMode::FirstParent,
            };
            let history = repository.log(start.as_deref(), mode)?;
            for (i, step) in history.take(max_count.unwrap_or(usize::MAX)).enumerate() {
                let (oid, commit) = step?;
                match oneline {
                    true => println!("{} {}", oid.to_short_oid().yellow(), commit.short_message()),
                    false => {
                        if i > 0 {
                            println!();
                        }
                        println!("{}", format!("commit {oid}").yellow());
                        if commit.is_merge() {
                            let parents = commit
                                .parents()
                                .iter()
                                .map(|parent| parent.to_short_oid())
                                .collect::<Vec<_>>();
                            println!("Merge: {}", parents.join(" "));
                        }
                        println!("Author: {}", commit.author().display_name());
                        println!("Date:   {}", commit.author().readable_timestamp());
                        println!();
                        for line in commit.message().lines() {
                            println!("    {line}");
                        }
                    }
                }
            }
        }
        Commands::Status { porcelain } => {
            let status = repository.status().await?;
            match porcelain {
                true => status.porcelain().iter().for_each(|line| println!("{line}")),
                false => print_long_status(&repository, &status),
            }
        }
        Commands::Diff {
            target,
            staged,
            commit,
        } => {
            let target = target
                .map(|target| workspace_relative(&root, &cwd, &target))
                .transpose()?;
            let diffs = match (staged, commit) {
                (_, Some(revision)) => repository.diff_commit(&revision).await?,
                (true, None) => repository.diff_staged().await?,
                (false, None) => repository.diff(target.as_deref()).await?,
            };
            diffs.iter().for_each(print_diff);
        }
        Commands::Revert { commit, author } => {
            let commit_id = repository.revert(&commit, author.as_deref()).await?;
            let reverted = repository.database().parse_object_as_commit(&commit_id)?;
            println!(
                "[{} {}] {}",
                repository.head_name(),
                commit_id.to_short_oid(),
                reverted.short_message()
            );
        }
        Commands::Reset { paths, hard, commit } => match hard {
            true => {
                let revision = commit.unwrap_or_else(|| "HEAD".to_string());
                let commit_id = repository.reset_hard(&revision).await?;
                println!("HEAD is now at {}", commit_id.to_short_oid());
            }
            false => {
                let paths = relative(&paths)?;
                let reset = repository.reset_files(&paths).await?;
                if !reset.is_empty() {
                    println!("Unstaged changes after reset:");
                    reset.iter().for_each(|path| println!("{}", path.display()));
                }
            }
        },
        Commands::Merge { target, message } => {
            match repository.merge(&target, message.as_deref()).await {
                Ok(MergeOutcome::AlreadyUpToDate) => println!("Already up to date."),
                Ok(MergeOutcome::FastForward(commit_id)) => {
                    println!("Fast-forward to {}", commit_id.to_short_oid())
                }
                Ok(MergeOutcome::Merged(commit_id)) => {
                    println!("Merge made by the 'recursive' strategy: {}", commit_id.to_short_oid())
                }
                Err(err) => {
                    if let Some(VitError::MergeConflict(paths)) = err.downcast_ref::<VitError>() {
                        for path in paths {
                            println!("CONFLICT (content): Merge conflict in {}", path.display());
                        }
                        println!(
                            "Automatic merge failed; fix conflicts and then commit the result."
                        );
                    }
                    return Err(err);
                }
            }
        }
        Commands::Tag { command } => match command {
            TagCommands::Create {
                name,
                message,
                author,
            } => {
                let tag_id = repository.tag_create(&name, message.as_deref(), author.as_deref())?;
                println!("Created tag '{name}' ({})", tag_id.to_short_oid());
            }
            TagCommands::List => {
                for tag in repository.tag_list()? {
                    let message = tag
                        .annotation
                        .as_ref()
                        .and_then(|annotation| annotation.message())
                        .unwrap_or_default();
                    println!("{:<20} {} {message}", tag.name, tag.commit.to_short_oid());
                }
            }
            TagCommands::Delete { name } => {
                let commit_id = repository.tag_delete(&name)?;
                println!("Deleted tag '{name}' (was {})", commit_id.to_short_oid());
            }
            TagCommands::Checkout { name } => {
                let outcome = repository.tag_checkout(&name).await?;
                print_checkout(&name, &outcome);
            }
        },
        Commands::Stash { command } => match command {
            StashCommands::Save { message, author } => {
                let entry = repository.stash_save(message.as_deref(), author.as_deref()).await?;
                println!("Saved working directory and index state {}", entry.message);
            }
            StashCommands::List => {
                repository
                    .stash_list()?
                    .iter()
                    .for_each(|entry| println!("{entry}"));
            }
            StashCommands::Pop { index } => {
                let entry = repository.stash_pop(index).await?;
                println!("Dropped {entry}");
            }
            StashCommands::Apply { index } => {
                let entry = repository.stash_apply(index).await?;
                println!("Applied {entry}");
            }
            StashCommands::Drop { index } => {
                let entry = repository.stash_drop(index)?;
                println!("Dropped {entry}");
            }
            StashCommands::Clear => {
                let count = repository.stash_clear()?;
                println!("Cleared {count} stash entries");
            }
        },
        Commands::Hook { command } => match command {
            HookCommands::List => {
                for (event, installed) in repository.hook_list() {
                    let state = match installed {
                        true => "installed".green(),
                        false => "-".normal(),
                    };
                    println!("{:<15} {state}", event.as_str());
                }
            }
            HookCommands::Install { event, script } => {
                let event = HookEvent::from_str(&event)?;
                let installed = repository.hook_install(event, &cwd.join(script))?;
                println!("Installed {event} hook at {}", installed.display());
            }
            HookCommands::Uninstall { event } => {
                let event = HookEvent::from_str(&event)?;
                repository.hook_uninstall(event)?;
                println!("Uninstalled {event} hook");
            }
        },
        Commands::Submodule { command } => match command {
            SubmoduleCommands::Add {
                name,
                url,
                path,
                commit,
            } => {
                let path = workspace_relative(&root, &cwd, &path)?;
                let submodule = repository.submodule_add(&name, &url, path, commit.as_deref())?;
                println!("Added submodule {submodule}");
            }
            SubmoduleCommands::Remove { name } => {
                let submodule = repository.submodule_remove(&name)?;
                println!("Removed submodule {submodule}");
            }
            SubmoduleCommands::Update { name, commit } => {
                let submodule = repository.submodule_update(&name, &commit)?;
                println!("Updated submodule {submodule}");
            }
            SubmoduleCommands::List => {
                repository
                    .submodule_list()?
                    .iter()
                    .for_each(|submodule| println!("{submodule}"));
            }
        },
        Commands::HashObject { write, file } => {
            let file = workspace_relative(&root, &cwd, &file)?;
            println!("{}", repository.hash_object(&file, write)?);
        }
        Commands::CatFile { sha } => {
            let (_, object) = repository.cat_file(&sha)?;
            print!("{}", object.display());
        }
    }

    Ok(())
}

/// `path` as given on the command line, made relative to the working tree root
///
/// Resolved lexically, so it works for paths that no longer exist on disk.
fn workspace_relative(root: &Path, cwd: &Path, path: &Path) -> anyhow::Result<PathBuf> {
    let mut absolute = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                absolute.pop();
            }
            component => absolute.push(component),
        }
    }

    let relative = absolute
        .strip_prefix(root)
        .map_err(|_| VitError::PathNotFound(path.to_path_buf()))?;

    match relative.as_os_str().is_empty() {
        true => Ok(PathBuf::from(".")),
        false => Ok(relative.to_path_buf()),
    }
}

fn print_checkout(target: &str, outcome: &CheckoutOutcome) {
    if outcome.detached_now() {
        eprintln!("Note: checking out '{target}'.\n{DETACHMENT_NOTICE}");
    }

    match &outcome.head {
        Head::Attached(branch) => eprintln!("Switched to branch '{branch}'"),
        Head::Detached(oid) => eprintln!("HEAD is now at {}", oid.to_short_oid()),
    }
}

fn print_long_status(repository: &Repository, status: &StatusInfo) {
    match repository.head() {
        Ok(Head::Attached(branch)) => println!("On branch {branch}"),
        Ok(Head::Detached(oid)) => println!("HEAD detached at {}", oid.to_short_oid()),
        Err(_) => {}
    }

    if !status.conflicted.is_empty() {
        println!("\nUnmerged paths:");
        for path in &status.conflicted {
            println!("{:>8}{}", "", format!("both modified:   {}", path.display()).red());
        }
    }

    if !status.index_changes.is_empty() {
        println!("\nChanges to be committed:");
        for (path, change) in &status.index_changes {
            if *change != IndexChangeType::None {
                let path = path.display().to_string().green();
                println!("{}{path}", FileChangeType::Index(*change));
            }
        }
    }

    if !status.workspace_changes.is_empty() {
        println!("\nChanges not staged for commit:");
        for (path, change) in &status.workspace_changes {
            if *change != WorkspaceChangeType::None {
                let path = path.display().to_string().red();
                println!("{}{path}", FileChangeType::Workspace(*change));
            }
        }
    }

    if !status.untracked.is_empty() {
        println!("\nUntracked files:");
        for path in &status.untracked {
            println!("{:>8}{}", "", path.display().to_string().red());
        }
    }

    if status.is_clean() {
        match status.untracked.is_empty() {
            true => println!("nothing to commit, working tree clean"),
            false => println!("\nnothing added to commit but untracked files present"),
        }
    }
}

fn print_diff(diff: &FileDiff) {
    for line in diff.to_string().lines() {
        let line = match line {
            line if ["diff ", "---", "+++"].iter().any(|prefix| line.starts_with(prefix)) => {
                line.bold()
            }
            line if line.starts_with("@@") => line.cyan(),
            line if line.starts_with('+') => line.green(),
            line if line.starts_with('-') => line.red(),
            line => line.normal(),
        };
        println!("{line}");
    }
}
