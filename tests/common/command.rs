use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with `1.txt`, `a/2.txt` and `a/b/3.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_vit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string()));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_vit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    vit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_vit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("vit").expect("Failed to find vit binary");
    cmd.current_dir(dir);
    cmd.env_remove("VIT_WORK_TREE");
    cmd.env("NO_COLOR", "1");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn vit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_vit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("VIT_AUTHOR_NAME", AUTHOR_NAME),
        ("VIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("VIT_AUTHOR_DATE", "2023-01-01 12:00:00 +0000"), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

pub fn vit_merge(dir: &Path, target: &str, message: &str) -> Command {
    let mut cmd = run_vit_command(dir, &["merge", target, "-m", message]);
    cmd.envs(vec![("VIT_AUTHOR_NAME", AUTHOR_NAME), ("VIT_AUTHOR_EMAIL", AUTHOR_EMAIL)]);
    cmd
}

/// Stage everything and commit it
pub fn vit_commit_all(dir: &Path, message: &str) {
    run_vit_command(dir, &["add", "."]).assert().success();
    vit_commit(dir, message).assert().success();
}

/// Commit HEAD resolves to, read straight from the metadata directory
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_content = std::fs::read_to_string(dir.join(".vit").join("HEAD"))?;
    let head_content = head_content.trim();

    // HEAD holds either a commit id or the name of a branch
    if head_content.len() == 40 && head_content.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(head_content.to_string());
    }

    let branch_path = dir.join(".vit").join("refs").join("heads").join(head_content);
    Ok(std::fs::read_to_string(branch_path)?.trim().to_string())
}

pub fn stdout_of(cmd: &mut Command) -> Result<String, Box<dyn std::error::Error>> {
    let output = cmd.assert().success().get_output().stdout.clone();
    Ok(String::from_utf8(output)?)
}
