use crate::common::repository::{AUTHOR, committed, vit_error};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use vit::errors::VitError;

#[tokio::test]
async fn save_then_pop_restores_the_working_tree() {
    let mut test_repo = committed().await;
    test_repo.write("f.txt", "A, edited\n");
    test_repo.write("new.txt", "brand new\n");
    test_repo.repository.add(&[PathBuf::from("new.txt")]).await.unwrap();
    test_repo.write("untracked.txt", "left alone");

    let entry = test_repo.repository.stash_save(None, Some(AUTHOR)).await.unwrap();

    assert!(entry.message.starts_with("WIP on master:"));
    assert_eq!(test_repo.read("f.txt"), "A");
    assert!(!test_repo.exists("new.txt"));
    assert_eq!(test_repo.read("untracked.txt"), "left alone");
    assert!(test_repo.repository.status().await.unwrap().is_clean());

    test_repo.repository.stash_pop(0).await.unwrap();

    assert_eq!(test_repo.read("f.txt"), "A, edited\n");
    assert_eq!(test_repo.read("new.txt"), "brand new\n");
    assert!(test_repo.repository.stash_list().unwrap().is_empty());
}

#[tokio::test]
async fn deleted_files_are_stashed_too() {
    let mut test_repo = committed().await;
    test_repo.commit_files(&[("g.txt", "G")], "second").await;
    test_repo.remove("g.txt");

    test_repo.repository.stash_save(Some("drop g"), Some(AUTHOR)).await.unwrap();
    assert_eq!(test_repo.read("g.txt"), "G");

    test_repo.repository.stash_apply(0).await.unwrap();
    assert!(!test_repo.exists("g.txt"));
}

#[tokio::test]
async fn clean_tree_has_nothing_to_stash() {
    let mut test_repo = committed().await;

    let err = test_repo.repository.stash_save(None, Some(AUTHOR)).await.unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::NothingToStash)));
}

#[tokio::test]
async fn unreadable_stash_file_keeps_local_changes() {
    let mut test_repo = committed().await;
    test_repo.write(".vit/stash", "entries = 7\n");
    test_repo.write("f.txt", "precious edit");

    let result = test_repo.repository.stash_save(None, Some(AUTHOR)).await;

    assert!(result.is_err());
    assert_eq!(test_repo.read("f.txt"), "precious edit");
    let status = test_repo.repository.status().await.unwrap();
    assert_eq!(status.changed_paths(), vec![PathBuf::from("f.txt")]);
}

#[tokio::test]
async fn entries_are_listed_newest_first() {
    let mut test_repo = committed().await;
    test_repo.write("f.txt", "first change");
    test_repo.repository.stash_save(Some("first"), Some(AUTHOR)).await.unwrap();
    test_repo.write("f.txt", "second change");
    test_repo.repository.stash_save(Some("second"), Some(AUTHOR)).await.unwrap();

    let listed = test_repo
        .repository
        .stash_list()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    assert_eq!(listed, vec!["stash@{0}: second", "stash@{1}: first"]);

    let dropped = test_repo.repository.stash_drop(1).unwrap();
    assert_eq!(dropped.message, "first");
    assert_eq!(test_repo.repository.stash_clear().unwrap(), 1);
}

#[tokio::test]
async fn unknown_entry_is_reported() {
    let mut test_repo = committed().await;

    let err = test_repo.repository.stash_apply(3).await.unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::StashNotFound(3))));
}

#[tokio::test]
async fn overlapping_edit_on_head_conflicts_and_keeps_the_entry() {
    let mut test_repo = committed().await;
    test_repo.write("f.txt", "B");
    test_repo.repository.stash_save(None, Some(AUTHOR)).await.unwrap();
    test_repo.commit_files(&[("f.txt", "C")], "edit on head").await;

    let err = test_repo.repository.stash_pop(0).await.unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::MergeConflict(_))));
    assert_eq!(test_repo.read("f.txt"), "<<<<<<< HEAD\nC\n=======\nB\n>>>>>>> stash@{0}\n");
    assert_eq!(test_repo.repository.stash_list().unwrap().len(), 1);
}
