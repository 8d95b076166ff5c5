use crate::common::repository::{AUTHOR, committed, vit_error};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::path::Path;
use vit::areas::repository::Repository;
use vit::artifacts::log::history::TraversalMode;
use vit::artifacts::objects::object_id::ObjectId;
use vit::errors::VitError;

const COMMITTERS: usize = 12;

fn commit_from_own_process(root: &Path, message: String) -> anyhow::Result<ObjectId> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut repository = Repository::discover(root)?;
        repository.commit(&message, Some(AUTHOR)).await
    })
}

#[test]
fn concurrent_commits_never_lose_an_update() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let test_repo = runtime.block_on(committed());
    let root = test_repo.dir.path();

    let results = std::thread::scope(|scope| {
        let handles = (0..COMMITTERS)
            .map(|i| scope.spawn(move || commit_from_own_process(root, format!("commit {i}"))))
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });

    let mut committed_ids = HashSet::new();
    for result in results {
        match result {
            Ok(commit_id) => {
                committed_ids.insert(commit_id);
            }
            Err(err) => assert!(
                matches!(vit_error(&err), Some(VitError::RefChanged(_))),
                "unexpected failure: {err:#}"
            ),
        }
    }
    assert!(!committed_ids.is_empty());

    let repository = Repository::discover(root).unwrap();
    let reachable = repository
        .log(None, TraversalMode::Full)
        .unwrap()
        .map(|step| step.unwrap().0)
        .collect::<HashSet<_>>();

    // every reported commit is on master, chained on top of the base commit
    assert_eq!(reachable.len(), committed_ids.len() + 1);
    assert!(committed_ids.is_subset(&reachable));
}
