use crate::common::command::{get_head_commit_sha, init_repository_dir, run_vit_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn add_update_list_and_remove(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let head = get_head_commit_sha(dir.path())?;
    let pin = "0123456789abcdef0123456789abcdef01234567";

    let url = "https://example.com/lib.git";
    run_vit_command(dir.path(), &["submodule", "add", "lib", url, "vendor/lib"])
        .assert()
        .success()
        .stdout(format!("Added submodule {} vendor/lib (lib)\n", &head[..7]));

    run_vit_command(dir.path(), &["submodule", "update", "lib", pin])
        .assert()
        .success()
        .stdout("Updated submodule 0123456 vendor/lib (lib)\n");

    run_vit_command(dir.path(), &["submodule", "list"])
        .assert()
        .success()
        .stdout("0123456 vendor/lib (lib)\n");

    run_vit_command(dir.path(), &["submodule", "remove", "lib"])
        .assert()
        .success();
    run_vit_command(dir.path(), &["submodule", "list"])
        .assert()
        .success()
        .stdout("");

    Ok(())
}

#[rstest]
fn path_outside_the_working_tree_is_rejected(init_repository_dir: TempDir) {
    run_vit_command(
        init_repository_dir.path(),
        &["submodule", "add", "lib", "https://example.com/lib.git", "../lib"],
    )
    .assert()
    .failure();
}
