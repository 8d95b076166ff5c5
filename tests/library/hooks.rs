use crate::common::repository::{TestRepository, committed, vit_error};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use vit::artifacts::hooks::hook_event::HookEvent;
use vit::artifacts::hooks::runner::{HookContext, HookRunner};
use vit::errors::VitError;

/// Records every invocation and answers with a fixed exit code per event
#[derive(Clone, Default)]
struct RecordingRunner {
    calls: Rc<RefCell<Vec<HookContext>>>,
    failing: Vec<(HookEvent, i32)>,
}

impl HookRunner for RecordingRunner {
    fn run(&self, _script: &Path, context: &HookContext) -> anyhow::Result<i32> {
        self.calls.borrow_mut().push(context.clone());
        Ok(self
            .failing
            .iter()
            .find(|(event, _)| *event == context.event)
            .map_or(0, |(_, code)| *code))
    }
}

async fn with_runner(runner: RecordingRunner, events: &[HookEvent]) -> TestRepository {
    let TestRepository { dir, repository } = committed().await;
    for event in events {
        repository.hooks().install(*event, "#!/bin/sh\nexit 0\n").unwrap();
    }

    TestRepository {
        dir,
        repository: repository.with_hook_runner(Box::new(runner)),
    }
}

#[tokio::test]
async fn failing_pre_commit_hook_blocks_the_commit() {
    let runner = RecordingRunner {
        failing: vec![(HookEvent::PreCommit, 1)],
        ..Default::default()
    };
    let mut test_repo = with_runner(runner.clone(), &[HookEvent::PreCommit]).await;
    let head = test_repo.repository.require_head_commit().unwrap();
    test_repo.write("f.txt", "B");
    test_repo.repository.add(&[PathBuf::from("f.txt")]).await.unwrap();

    let err = test_repo.repository.commit("blocked", None).await.unwrap_err();

    assert!(matches!(
        vit_error(&err),
        Some(VitError::HookRejected { event, code: 1 }) if event == "pre-commit"
    ));
    assert_eq!(test_repo.repository.require_head_commit().unwrap(), head);
    assert_eq!(runner.calls.borrow().len(), 1);
}

#[tokio::test]
async fn failing_post_commit_hook_only_warns() {
    let runner = RecordingRunner {
        failing: vec![(HookEvent::PostCommit, 7)],
        ..Default::default()
    };
    let events = [HookEvent::PreCommit, HookEvent::PostCommit];
    let mut test_repo = with_runner(runner.clone(), &events).await;

    let commit_id = test_repo.commit_files(&[("g.txt", "G")], "goes through").await;

    assert_eq!(test_repo.repository.require_head_commit().unwrap(), commit_id);
    let events = runner
        .calls
        .borrow()
        .iter()
        .map(|context| context.event)
        .collect::<Vec<_>>();
    assert_eq!(events, vec![HookEvent::PreCommit, HookEvent::PostCommit]);
}

#[tokio::test]
async fn hooks_receive_the_checkout_target() {
    let runner = RecordingRunner::default();
    let mut test_repo = with_runner(runner.clone(), &[HookEvent::PreCheckout]).await;
    test_repo.repository.branch("feature", None).unwrap();

    test_repo.repository.checkout("feature").await.unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].event, HookEvent::PreCheckout);
    assert_eq!(calls[0].repo_path, test_repo.repository.path());
    assert_eq!(calls[0].refs, vec!["master".to_string(), "feature".to_string()]);
}

#[tokio::test]
async fn rejected_merge_leaves_everything_in_place() {
    let runner = RecordingRunner {
        failing: vec![(HookEvent::PreMerge, 2)],
        ..Default::default()
    };
    let mut test_repo = with_runner(runner, &[HookEvent::PreMerge]).await;
    test_repo.repository.branch("feature", None).unwrap();
    test_repo.repository.checkout("feature").await.unwrap();
    test_repo.commit_files(&[("g.txt", "G")], "feature").await;
    test_repo.repository.checkout("master").await.unwrap();
    let head = test_repo.repository.require_head_commit().unwrap();

    let err = test_repo.repository.merge("feature", None).await.unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::HookRejected { code: 2, .. })));
    assert_eq!(test_repo.repository.require_head_commit().unwrap(), head);
    assert!(!test_repo.exists("g.txt"));
}

#[tokio::test]
async fn uninstalled_hooks_are_not_run() {
    let runner = RecordingRunner::default();
    let mut test_repo = with_runner(runner.clone(), &[HookEvent::PreCommit]).await;

    test_repo.repository.hook_uninstall(HookEvent::PreCommit).unwrap();
    test_repo.commit_files(&[("g.txt", "G")], "no hooks").await;

    assert!(runner.calls.borrow().is_empty());
    let err = test_repo.repository.hook_uninstall(HookEvent::PreCommit).unwrap_err();
    assert!(matches!(vit_error(&err), Some(VitError::HookNotFound(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn script_exit_code_is_honoured() {
    let mut test_repo = committed().await;
    let script = test_repo.dir.path().join("reject.sh");
    std::fs::write(&script, "#!/bin/sh\necho \"$VIT_HOOK_EVENT\" > hook-ran\nexit 3\n").unwrap();
    test_repo.repository.hook_install(HookEvent::PreCommit, &script).unwrap();
    test_repo.write("g.txt", "G");
    test_repo.repository.add(&[PathBuf::from("g.txt")]).await.unwrap();

    let err = test_repo.repository.commit("blocked", None).await.unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::HookRejected { code: 3, .. })));
    assert_eq!(test_repo.read("hook-ran"), "pre-commit\n");
    assert!(
        test_repo
            .repository
            .hook_list()
            .contains(&(HookEvent::PreCommit, true))
    );
}

#[cfg(unix)]
#[tokio::test]
async fn post_commit_hook_that_cannot_start_only_warns() {
    let mut test_repo = committed().await;
    let head = test_repo.repository.require_head_commit().unwrap();
    test_repo
        .repository
        .hooks()
        .install(HookEvent::PostCommit, "#!/nonexistent/interpreter\n")
        .unwrap();

    let commit_id = test_repo.commit_files(&[("g.txt", "G")], "goes through").await;

    assert_ne!(commit_id, head);
    assert_eq!(test_repo.repository.require_head_commit().unwrap(), commit_id);
}

#[cfg(unix)]
#[tokio::test]
async fn pre_commit_hook_that_cannot_start_blocks_the_commit() {
    let mut test_repo = committed().await;
    let head = test_repo.repository.require_head_commit().unwrap();
    test_repo
        .repository
        .hooks()
        .install(HookEvent::PreCommit, "#!/nonexistent/interpreter\n")
        .unwrap();
    test_repo.write("g.txt", "G");
    test_repo.repository.add(&[PathBuf::from("g.txt")]).await.unwrap();

    assert!(test_repo.repository.commit("blocked", None).await.is_err());
    assert_eq!(test_repo.repository.require_head_commit().unwrap(), head);
}
