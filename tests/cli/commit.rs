use crate::common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, get_head_commit_sha, init_repository_dir, repository_dir,
    run_vit_command, vit_commit,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn first_commit_is_a_root_commit(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_vit_command(dir.path(), &["init"]).assert().success();
    write_file(FileSpec::new(dir.path().join("hello.txt"), "hello".to_string()));
    run_vit_command(dir.path(), &["add", "hello.txt"]).assert().success();

    vit_commit(dir.path(), "First commit")
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^\[master \(root-commit\) [0-9a-f]{7}\] First commit\n$",
        )?);

    let head = get_head_commit_sha(dir.path())?;
    run_vit_command(dir.path(), &["cat-file", "-p", &head])
        .assert()
        .success()
        .stdout(predicate::str::contains(AUTHOR_NAME))
        .stdout(predicate::str::contains(AUTHOR_EMAIL))
        .stdout(predicate::str::contains("First commit"))
        .stdout(predicate::str::contains("parent").count(0));

    Ok(())
}

#[rstest]
fn second_commit_records_its_parent(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    let first = get_head_commit_sha(dir.path())?;
    write_file(FileSpec::new(dir.path().join("1.txt"), "one, again".to_string()));

    let author = "Ada <ada@example.com>";
    run_vit_command(dir.path(), &["commit", "-a", "-m", "Second", "--author", author])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[master "));

    let second = get_head_commit_sha(dir.path())?;
    run_vit_command(dir.path(), &["cat-file", "-p", &second])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("parent {first}")))
        .stdout(predicate::str::contains("Ada <ada@example.com>"));

    Ok(())
}

#[rstest]
fn empty_message_is_rejected(init_repository_dir: TempDir) {
    vit_commit(init_repository_dir.path(), "   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("commit message cannot be empty"));
}

#[rstest]
fn malformed_author_is_rejected(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["commit", "-m", "msg", "--author", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid author"));
}
