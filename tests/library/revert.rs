use crate::common::repository::{AUTHOR, committed, vit_error};
use pretty_assertions::assert_eq;
use vit::errors::VitError;

#[tokio::test]
async fn revert_undoes_a_commit_on_top_of_head() {
    let mut test_repo = committed().await;
    let reverted = test_repo
        .commit_files(&[("f.txt", "B\n"), ("g.txt", "G")], "change f, add g")
        .await;
    test_repo.commit_files(&[("h.txt", "H")], "unrelated").await;
    let head = test_repo.repository.require_head_commit().unwrap();

    let revert_id = test_repo
        .repository
        .revert(&reverted.to_string(), Some(AUTHOR))
        .await
        .unwrap();

    let commit = test_repo
        .repository
        .database()
        .parse_object_as_commit(&revert_id)
        .unwrap();
    assert_eq!(commit.parents(), &[head]);
    assert_eq!(commit.message().trim(), "Revert \"change f, add g\"");
    assert_eq!(test_repo.read("f.txt"), "A");
    assert!(!test_repo.exists("g.txt"));
    assert_eq!(test_repo.read("h.txt"), "H");
}

#[tokio::test]
async fn reverting_the_root_commit_empties_its_files() {
    let mut test_repo = committed().await;

    test_repo.repository.revert("HEAD", Some(AUTHOR)).await.unwrap();

    assert!(!test_repo.exists("f.txt"));
}

#[tokio::test]
async fn later_edit_to_the_same_file_conflicts() {
    let mut test_repo = committed().await;
    test_repo.commit_files(&[("f.txt", "B")], "to B").await;
    test_repo.commit_files(&[("f.txt", "C")], "to C").await;

    let err = test_repo.repository.revert("HEAD^", Some(AUTHOR)).await.unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::MergeConflict(_))));
    assert!(test_repo.read("f.txt").starts_with("<<<<<<< HEAD\nC\n=======\nA\n>>>>>>> parent of "));
}
