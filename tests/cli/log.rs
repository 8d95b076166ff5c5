use crate::common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, get_head_commit_sha, init_repository_dir, run_vit_command,
    stdout_of, vit_commit_all,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn commit_sequence(dir: &TempDir, count: usize) {
    for i in 1..=count {
        write_file(FileSpec::new(dir.path().join("1.txt"), format!("version {i}")));
        vit_commit_all(dir.path(), &format!("Change {i}"));
    }
}

#[rstest]
fn oneline_lists_newest_first(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    commit_sequence(&dir, 2);

    let output = stdout_of(&mut run_vit_command(dir.path(), &["log", "--oneline"]))?;
    let messages = output
        .lines()
        .map(|line| line.split_once(' ').map(|(_, message)| message).unwrap_or_default())
        .collect::<Vec<_>>();

    assert_eq!(messages, vec!["Change 2", "Change 1", "Initial commit"]);
    Ok(())
}

#[rstest]
fn medium_format_shows_author_and_date(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let head = get_head_commit_sha(dir.path())?;

    run_vit_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("commit {head}\n")))
        .stdout(predicate::str::contains(format!("Author: {AUTHOR_NAME} <{AUTHOR_EMAIL}>")))
        .stdout(predicate::str::contains("Date:   Sun Jan 1 12:00:00 2023 +0000"))
        .stdout(predicate::str::contains("    Initial commit"));

    Ok(())
}

#[rstest]
fn max_count_and_start_revision(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    commit_sequence(&dir, 3);

    let limited = stdout_of(&mut run_vit_command(dir.path(), &["log", "--oneline", "-n", "2"]))?;
    assert_eq!(limited.lines().count(), 2);

    let from_parent = stdout_of(&mut run_vit_command(dir.path(), &["log", "--oneline", "HEAD~2"]))?;
    assert_eq!(from_parent.lines().count(), 2);
    assert!(from_parent.lines().next().unwrap_or_default().ends_with("Change 1"));

    Ok(())
}
