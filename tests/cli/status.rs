use crate::common::command::{init_repository_dir, run_vit_command};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn clean_tree_prints_nothing_in_porcelain(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["status", "--porcelain"])
        .assert()
        .success()
        .stdout("");
}

#[rstest]
fn clean_tree_long_format(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("On branch master"))
        .stdout(predicate::str::contains("nothing to commit, working tree clean"));
}

#[rstest]
fn reports_every_kind_of_change(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "one, edited".to_string()));
    delete_path(&dir.path().join("a/2.txt"));
    write_file(FileSpec::new(dir.path().join("staged.txt"), "staged".to_string()));
    run_vit_command(dir.path(), &["add", "staged.txt"]).assert().success();
    write_file(FileSpec::new(dir.path().join("outside/file.txt"), "x".to_string()));

    run_vit_command(dir.path(), &["status", "--porcelain"])
        .assert()
        .success()
        .stdout(" M 1.txt\n D a/2.txt\nA  staged.txt\n?? outside/\n");
}

#[rstest]
fn long_format_groups_changes(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "one, edited".to_string()));
    write_file(FileSpec::new(dir.path().join("new.txt"), "new".to_string()));

    run_vit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes not staged for commit:"))
        .stdout(predicate::str::contains("modified:   1.txt"))
        .stdout(predicate::str::contains("Untracked files:"))
        .stdout(predicate::str::contains("new.txt"));
}
