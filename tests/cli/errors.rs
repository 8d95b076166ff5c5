use crate::common::command::{init_repository_dir, repository_dir, run_vit_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
#[case(&["status"])]
#[case(&["log"])]
#[case(&["branches"])]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] args: &[&str]) {
    run_vit_command(repository_dir.path(), args)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("not a vit repository"));
}

#[rstest]
fn log_of_an_unborn_branch_is_empty(repository_dir: TempDir) {
    run_vit_command(repository_dir.path(), &["init"]).assert().success();

    run_vit_command(repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout("");
}

#[rstest]
fn directory_flag_runs_elsewhere(init_repository_dir: TempDir, repository_dir: TempDir) {
    let target = init_repository_dir.path().to_string_lossy().to_string();

    run_vit_command(repository_dir.path(), &["-C", &target, "status", "--porcelain"])
        .assert()
        .success()
        .stdout("");
}

#[rstest]
fn unknown_subcommand_is_a_usage_error(repository_dir: TempDir) {
    run_vit_command(repository_dir.path(), &["frobnicate"])
        .assert()
        .failure()
        .code(2);
}
