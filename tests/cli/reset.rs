use crate::common::command::{
    get_head_commit_sha, init_repository_dir, run_vit_command, vit_commit_all,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn reset_paths_unstages_but_keeps_the_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "one, staged".to_string()));
    run_vit_command(dir.path(), &["add", "1.txt"]).assert().success();

    run_vit_command(dir.path(), &["reset", "1.txt"])
        .assert()
        .success()
        .stdout("Unstaged changes after reset:\n1.txt\n");

    assert_eq!(read_file(&dir.path().join("1.txt")), "one, staged");
    run_vit_command(dir.path(), &["status", "--porcelain"])
        .assert()
        .success()
        .stdout(" M 1.txt\n");
}

#[rstest]
fn hard_reset_moves_the_branch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let first = get_head_commit_sha(dir.path())?;
    write_file(FileSpec::new(dir.path().join("1.txt"), "one, again".to_string()));
    write_file(FileSpec::new(dir.path().join("extra.txt"), "extra".to_string()));
    vit_commit_all(dir.path(), "Second");
    write_file(FileSpec::new(dir.path().join("scratch.txt"), "untracked".to_string()));

    run_vit_command(dir.path(), &["reset", "--hard", "--commit", "HEAD^"])
        .assert()
        .success()
        .stdout(format!("HEAD is now at {}\n", &first[..7]));

    assert_eq!(get_head_commit_sha(dir.path())?, first);
    assert_eq!(read_file(&dir.path().join("1.txt")), "one");
    assert!(!dir.path().join("extra.txt").exists());
    assert_eq!(read_file(&dir.path().join("scratch.txt")), "untracked");

    Ok(())
}

#[rstest]
fn reset_requires_paths_or_hard(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["reset"])
        .assert()
        .failure()
        .code(2);
}

#[rstest]
fn revert_commits_the_inverse(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "one, changed".to_string()));
    vit_commit_all(dir.path(), "Change one");

    run_vit_command(dir.path(), &["revert", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Revert \"Change one\""));

    assert_eq!(read_file(&dir.path().join("1.txt")), "one");
    run_vit_command(dir.path(), &["status", "--porcelain"])
        .assert()
        .success()
        .stdout("");
}
