use crate::common::command::{init_repository_dir, run_vit_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

const HELLO_BLOB_ID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

#[rstest]
fn hash_object_without_write_stores_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("hello.txt"), "hello\n".to_string()));

    run_vit_command(dir.path(), &["hash-object", "hello.txt"])
        .assert()
        .success()
        .stdout(format!("{HELLO_BLOB_ID}\n"));

    assert!(!dir.path().join(".vit/objects/ce/013625030ba8dba906f756967f9e9ca394464a").exists());
}

#[rstest]
fn hash_object_write_then_cat_file(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("hello.txt"), "hello\n".to_string()));

    let oid = stdout_of(&mut run_vit_command(dir.path(), &["hash-object", "-w", "hello.txt"]))?;
    assert_eq!(oid.trim(), HELLO_BLOB_ID);
    assert!(dir.path().join(".vit/objects/ce/013625030ba8dba906f756967f9e9ca394464a").exists());

    run_vit_command(dir.path(), &["cat-file", "-p", &HELLO_BLOB_ID[..8]])
        .assert()
        .success()
        .stdout("hello\n");

    Ok(())
}

#[rstest]
fn cat_file_unknown_object(init_repository_dir: TempDir) {
    run_vit_command(init_repository_dir.path(), &["cat-file", "-p", "deadbeef"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
