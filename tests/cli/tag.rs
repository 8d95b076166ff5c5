use crate::common::command::{get_head_commit_sha, init_repository_dir, run_vit_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn create_list_checkout_and_delete(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let head = get_head_commit_sha(dir.path())?;

    run_vit_command(dir.path(), &["tag", "create", "v1.0", "-m", "first release"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Created tag 'v1.0'"));
    assert_eq!(std::fs::read_to_string(dir.path().join(".vit/refs/tags/v1.0"))?.trim(), head);

    run_vit_command(dir.path(), &["tag", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("v1.0"))
        .stdout(predicate::str::contains(&head[..7]))
        .stdout(predicate::str::contains("first release"));

    run_vit_command(dir.path(), &["tag", "checkout", "v1.0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("detached HEAD"));
    assert_eq!(std::fs::read_to_string(dir.path().join(".vit/HEAD"))?.trim(), head);

    run_vit_command(dir.path(), &["tag", "delete", "v1.0"])
        .assert()
        .success()
        .stdout(format!("Deleted tag 'v1.0' (was {})\n", &head[..7]));
    run_vit_command(dir.path(), &["tag", "list"])
        .assert()
        .success()
        .stdout("");

    Ok(())
}

#[rstest]
fn duplicate_tag_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_vit_command(dir.path(), &["tag", "create", "v1"]).assert().success();

    run_vit_command(dir.path(), &["tag", "create", "v1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
