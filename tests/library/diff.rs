use crate::common::repository::committed;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use vit::artifacts::diff::file_diff::{FileDiff, FileDiffKind};

#[tokio::test]
async fn identical_sides_have_no_differences() {
    let mut test_repo = committed().await;

    assert!(test_repo.repository.diff(None).await.unwrap().is_empty());
    assert!(test_repo.repository.diff_staged().await.unwrap().is_empty());
    assert!(test_repo.repository.diff_commits("HEAD", "HEAD").await.unwrap().is_empty());
}

#[tokio::test]
async fn unstaged_edit_shows_in_the_working_tree_diff() {
    let mut test_repo = committed().await;
    test_repo.write("f.txt", "B");

    let diffs = test_repo.repository.diff(None).await.unwrap();

    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].path, PathBuf::from("f.txt"));
    assert_eq!(diffs[0].kind, FileDiffKind::Modified);
    let patch = diffs[0].to_string();
    assert!(patch.contains("-A\n"), "{patch}");
    assert!(patch.contains("+B\n"), "{patch}");
    assert!(test_repo.repository.diff_staged().await.unwrap().is_empty());
}

#[tokio::test]
async fn staged_addition_shows_in_the_staged_diff() {
    let mut test_repo = committed().await;
    test_repo.write("new.txt", "fresh\n");
    test_repo.repository.add(&[PathBuf::from("new.txt")]).await.unwrap();

    let diffs = test_repo.repository.diff_staged().await.unwrap();

    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].kind, FileDiffKind::Added);
    assert!(test_repo.repository.diff(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn diff_against_an_earlier_commit() {
    let mut test_repo = committed().await;
    test_repo.commit_files(&[("g.txt", "G\n")], "second").await;
    test_repo.remove("f.txt");
    test_repo.commit_all("third").await;

    let diffs = test_repo.repository.diff_commit("HEAD~2").await.unwrap();

    let summary = diffs
        .iter()
        .map(|diff| (diff.path.display().to_string(), diff.kind))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            ("f.txt".to_string(), FileDiffKind::Deleted),
            ("g.txt".to_string(), FileDiffKind::Added),
        ]
    );
}

#[tokio::test]
async fn working_tree_diff_limited_to_a_target() {
    let mut test_repo = committed().await;
    test_repo
        .commit_files(&[("docs/guide.txt", "one\n"), ("docs/api/ref.txt", "two\n")], "docs")
        .await;
    test_repo.write("f.txt", "B");
    test_repo.write("docs/guide.txt", "uno\n");
    test_repo.write("docs/api/ref.txt", "dos\n");

    let paths = |diffs: Vec<FileDiff>| diffs.into_iter().map(|diff| diff.path).collect::<Vec<_>>();
    let repository = &mut test_repo.repository;

    assert_eq!(
        paths(repository.diff(Some(Path::new("docs"))).await.unwrap()),
        vec![PathBuf::from("docs/api/ref.txt"), PathBuf::from("docs/guide.txt")]
    );
    assert_eq!(
        paths(repository.diff(Some(Path::new("f.txt"))).await.unwrap()),
        vec![PathBuf::from("f.txt")]
    );
    assert!(repository.diff(Some(Path::new("doc"))).await.unwrap().is_empty());
    assert_eq!(repository.diff(Some(Path::new("."))).await.unwrap().len(), 3);
}
