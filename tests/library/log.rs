use crate::common::repository::{TestRepository, committed};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use vit::artifacts::log::history::TraversalMode;

fn messages(test_repo: &TestRepository, start: Option<&str>, mode: TraversalMode) -> Vec<String> {
    test_repo
        .repository
        .log(start, mode)
        .unwrap()
        .map(|step| step.unwrap().1.message().trim().to_string())
        .collect()
}

#[tokio::test]
async fn linear_history_newest_first() {
    let mut test_repo = committed().await;
    test_repo.commit_files(&[("g.txt", "G")], "second").await;
    test_repo.commit_files(&[("h.txt", "H")], "third").await;

    assert_eq!(
        messages(&test_repo, None, TraversalMode::FirstParent),
        vec!["third", "second", "base"]
    );
    assert_eq!(
        messages(&test_repo, Some("HEAD^"), TraversalMode::FirstParent),
        vec!["second", "base"]
    );
}

#[tokio::test]
async fn unborn_branch_has_no_history() {
    let test_repo = TestRepository::new().await;

    assert!(messages(&test_repo, None, TraversalMode::Full).is_empty());
}

#[tokio::test]
async fn full_traversal_visits_each_merged_commit_once() {
    let mut test_repo = committed().await;
    test_repo.repository.branch("feature", None).unwrap();
    test_repo.commit_files(&[("left.txt", "L")], "left").await;
    test_repo.repository.checkout("feature").await.unwrap();
    test_repo.commit_files(&[("right.txt", "R")], "right").await;
    test_repo.repository.checkout("master").await.unwrap();
    test_repo.repository.merge("feature", Some("merge")).await.unwrap();

    let first_parent = messages(&test_repo, None, TraversalMode::FirstParent);
    let full = messages(&test_repo, None, TraversalMode::Full);

    assert_eq!(first_parent, vec!["merge", "left", "base"]);
    assert_eq!(full.len(), 4);
    assert_eq!(full[0], "merge");
    assert_eq!(full.iter().collect::<HashSet<_>>().len(), 4);
    assert!(full.contains(&"right".to_string()));
}

#[tokio::test]
async fn history_can_be_dropped_early() {
    let mut test_repo = committed().await;
    for i in 0..5 {
        let content = i.to_string();
        test_repo
            .commit_files(&[("counter.txt", content.as_str())], &format!("commit {i}"))
            .await;
    }

    let newest = test_repo
        .repository
        .log(None, TraversalMode::FirstParent)
        .unwrap()
        .take(2)
        .map(|step| step.unwrap().1.message().trim().to_string())
        .collect::<Vec<_>>();

    assert_eq!(newest, vec!["commit 4", "commit 3"]);
}
