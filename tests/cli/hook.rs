use crate::common::command::{init_repository_dir, run_vit_command, vit_commit};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn list_shows_every_event(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["hook", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pre-commit"))
        .stdout(predicate::str::contains("post-checkout"))
        .stdout(predicate::str::contains("installed").count(0));
}

#[rstest]
fn install_and_uninstall(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("hook.sh"), "#!/bin/sh\nexit 0\n".to_string()));

    run_vit_command(dir.path(), &["hook", "install", "pre-commit", "hook.sh"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Installed pre-commit hook at"));
    assert!(dir.path().join(".vit/hooks/pre-commit").is_file());

    run_vit_command(dir.path(), &["hook", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"pre-commit\s+installed").unwrap());

    run_vit_command(dir.path(), &["hook", "uninstall", "pre-commit"])
        .assert()
        .success()
        .stdout("Uninstalled pre-commit hook\n");

    run_vit_command(dir.path(), &["hook", "uninstall", "pre-commit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pre-commit hook is installed"));
}

#[rstest]
fn unknown_event_is_rejected(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("hook.sh"),
        "#!/bin/sh\n".to_string(),
    ));

    run_vit_command(init_repository_dir.path(), &["hook", "install", "pre-push", "hook.sh"])
        .assert()
        .failure();
}

#[cfg(unix)]
#[rstest]
fn failing_pre_commit_hook_blocks_the_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("hook.sh"), "#!/bin/sh\nexit 1\n".to_string()));
    run_vit_command(dir.path(), &["hook", "install", "pre-commit", "hook.sh"]).assert().success();
    std::fs::remove_file(dir.path().join("hook.sh"))?;
    let before = crate::common::command::get_head_commit_sha(dir.path())?;

    write_file(FileSpec::new(dir.path().join("1.txt"), "one, blocked".to_string()));
    run_vit_command(dir.path(), &["add", "1.txt"]).assert().success();

    vit_commit(dir.path(), "Blocked")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pre-commit hook rejected the operation (exit code 1)"));
    assert_eq!(crate::common::command::get_head_commit_sha(dir.path())?, before);

    Ok(())
}
