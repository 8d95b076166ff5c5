use crate::common::repository::{TestRepository, committed, vit_error};
use pretty_assertions::assert_eq;
use vit::artifacts::branch::branch_name::BranchName;
use vit::errors::VitError;

#[tokio::test]
async fn create_then_delete_removes_the_branch() {
    let mut test_repo = committed().await;
    let head = test_repo.repository.require_head_commit().unwrap();

    let created = test_repo.repository.branch("feature", None).unwrap();
    assert_eq!(created, head);

    let names = |test_repo: &TestRepository| {
        test_repo
            .repository
            .branches()
            .unwrap()
            .into_iter()
            .map(|branch| (branch.name.to_string(), branch.is_current))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        names(&test_repo),
        vec![("feature".to_string(), false), ("master".to_string(), true)]
    );

    let deleted = test_repo.repository.delete_branch("feature").unwrap();

    assert_eq!(deleted, head);
    assert_eq!(names(&test_repo), vec![("master".to_string(), true)]);
    let feature = BranchName::try_parse("feature").unwrap();
    assert_eq!(test_repo.repository.refs().branch_commit(&feature).unwrap(), None);
}

#[tokio::test]
async fn branch_from_an_earlier_revision() {
    let mut test_repo = committed().await;
    let first = test_repo.repository.require_head_commit().unwrap();
    test_repo.commit_files(&[("g.txt", "G")], "second").await;

    let created = test_repo.repository.branch("from-parent", Some("HEAD^")).unwrap();

    assert_eq!(created, first);
}

#[tokio::test]
async fn current_branch_cannot_be_deleted() {
    let mut test_repo = committed().await;

    let err = test_repo.repository.delete_branch("master").unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::CurrentBranch(_))));
}

#[tokio::test]
async fn duplicate_branch_is_refused() {
    let mut test_repo = committed().await;
    test_repo.repository.branch("feature", None).unwrap();

    let err = test_repo.repository.branch("feature", None).unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::RefAlreadyExists(_))));
}

#[tokio::test]
async fn deleting_a_missing_branch_fails() {
    let mut test_repo = committed().await;

    let err = test_repo.repository.delete_branch("nope").unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::RefNotFound(_))));
}

#[tokio::test]
async fn branch_needs_a_commit() {
    let mut test_repo = TestRepository::new().await;

    let err = test_repo.repository.branch("feature", None).unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::NoCommits(_))));
}
