use crate::common::command::{init_repository_dir, run_vit_command, vit_commit_all};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn clean_tree_has_no_diff(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["diff"])
        .assert()
        .success()
        .stdout("");
}

#[rstest]
fn unstaged_edit_shows_a_hunk(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "uno".to_string()));

    run_vit_command(dir.path(), &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("diff --vit a/1.txt b/1.txt"))
        .stdout(predicate::str::contains("--- a/1.txt\n+++ b/1.txt"))
        .stdout(predicate::str::contains("@@ -1,1 +1,1 @@"))
        .stdout(predicate::str::contains("-one\n+uno"));

    run_vit_command(dir.path(), &["diff", "--staged"])
        .assert()
        .success()
        .stdout("");
}

#[rstest]
fn staged_new_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("new.txt"), "fresh\n".to_string()));
    run_vit_command(dir.path(), &["add", "new.txt"]).assert().success();

    run_vit_command(dir.path(), &["diff", "--cached"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- /dev/null\n+++ b/new.txt"))
        .stdout(predicate::str::contains("+fresh"));
}

#[rstest]
fn diff_against_an_older_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    std::fs::remove_file(dir.path().join("a/b/3.txt")).unwrap();
    vit_commit_all(dir.path(), "Drop three");

    run_vit_command(dir.path(), &["diff", "--commit", "HEAD^"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- a/a/b/3.txt\n+++ /dev/null"))
        .stdout(predicate::str::contains("-three"));
}

#[rstest]
fn target_limits_the_working_tree_diff(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "uno".to_string()));
    write_file(FileSpec::new(dir.path().join("a/b/3.txt"), "tres".to_string()));

    run_vit_command(dir.path(), &["diff", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("diff --vit a/a/b/3.txt b/a/b/3.txt"))
        .stdout(predicate::str::contains("1.txt").not());

    run_vit_command(&dir.path().join("a"), &["diff", "../1.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-one\n+uno"))
        .stdout(predicate::str::contains("3.txt").not());

    run_vit_command(dir.path(), &["diff", "a", "--staged"]).assert().failure();
}
