use crate::common::command::{init_repository_dir, run_vit_command};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn save_list_and_pop(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "one, in progress".to_string()));

    run_vit_command(dir.path(), &["stash", "save"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Saved working directory and index state WIP on master:",
        ));
    assert_eq!(read_file(&dir.path().join("1.txt")), "one");

    run_vit_command(dir.path(), &["stash", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("stash@{0}: WIP on master:"));

    run_vit_command(dir.path(), &["stash", "pop"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Dropped stash@{0}"));
    assert_eq!(read_file(&dir.path().join("1.txt")), "one, in progress");

    run_vit_command(dir.path(), &["stash", "list"])
        .assert()
        .success()
        .stdout("");
}

#[rstest]
fn custom_messages_and_clear(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "first".to_string()));
    run_vit_command(dir.path(), &["stash", "save", "-m", "first try"]).assert().success();
    write_file(FileSpec::new(dir.path().join("1.txt"), "second".to_string()));
    run_vit_command(dir.path(), &["stash", "save", "-m", "second try"]).assert().success();

    run_vit_command(dir.path(), &["stash", "list"])
        .assert()
        .success()
        .stdout("stash@{0}: second try\nstash@{1}: first try\n");

    run_vit_command(dir.path(), &["stash", "clear"])
        .assert()
        .success()
        .stdout("Cleared 2 stash entries\n");
}

#[rstest]
fn nothing_to_stash(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["stash", "save"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no local changes to stash"));
}

#[rstest]
fn missing_entry(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["stash", "drop", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stash@{2} does not exist"));
}
