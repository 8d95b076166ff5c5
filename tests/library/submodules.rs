use crate::common::repository::{TestRepository, committed, vit_error};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use vit::errors::VitError;

const PIN: &str = "0123456789abcdef0123456789abcdef01234567";
const OTHER_URL: &str = "https://example.com/other.git";

fn is_submodule_error(err: &anyhow::Error) -> bool {
    matches!(vit_error(err), Some(VitError::SubmoduleError(_)))
}

#[tokio::test]
async fn add_defaults_the_pin_to_head() {
    let mut test_repo = committed().await;
    let head = test_repo.repository.require_head_commit().unwrap();

    let added = test_repo
        .repository
        .submodule_add("lib", "https://example.com/lib.git", PathBuf::from("vendor/lib"), None)
        .unwrap();

    assert_eq!(added.commit, head);
    assert_eq!(test_repo.repository.submodule("lib").unwrap(), added);
}

#[tokio::test]
async fn lifecycle_is_persisted() {
    let mut test_repo = committed().await;
    test_repo
        .repository
        .submodule_add("zeta", "https://example.com/z.git", PathBuf::from("z"), Some(PIN))
        .unwrap();
    test_repo
        .repository
        .submodule_add("alpha", "https://example.com/a.git", PathBuf::from("a"), Some(PIN))
        .unwrap();

    let new_pin = test_repo.repository.require_head_commit().unwrap();
    let updated = test_repo
        .repository
        .submodule_update("zeta", &new_pin.to_string())
        .unwrap();
    assert_eq!(updated.commit, new_pin);

    let removed = test_repo.repository.submodule_remove("alpha").unwrap();
    assert_eq!(removed.path, PathBuf::from("a"));

    // a fresh handle reads the same registry back
    let reopened = vit::areas::repository::Repository::new(test_repo.dir.path()).unwrap();
    let names = reopened
        .submodule_list()
        .unwrap()
        .into_iter()
        .map(|submodule| (submodule.name, submodule.commit))
        .collect::<Vec<_>>();
    assert_eq!(names, vec![("zeta".to_string(), new_pin)]);
}

#[tokio::test]
async fn invalid_registrations_are_refused() {
    let mut test_repo = committed().await;
    test_repo
        .repository
        .submodule_add("lib", "https://example.com/lib.git", PathBuf::from("lib"), Some(PIN))
        .unwrap();

    let repository = &mut test_repo.repository;
    for result in [
        repository.submodule_add("lib", OTHER_URL, PathBuf::from("other"), Some(PIN)),
        repository.submodule_add("other", OTHER_URL, PathBuf::from("lib"), Some(PIN)),
        repository.submodule_add("empty-url", "", PathBuf::from("empty"), Some(PIN)),
        repository.submodule_add("escape", OTHER_URL, PathBuf::from("../outside"), Some(PIN)),
        repository.submodule_add("short", OTHER_URL, PathBuf::from("short"), Some("abc123")),
    ] {
        assert!(is_submodule_error(&result.unwrap_err()));
    }

    assert!(is_submodule_error(&repository.submodule_remove("missing").unwrap_err()));
    assert!(is_submodule_error(&repository.submodule_update("lib", "not-a-commit").unwrap_err()));
}

#[tokio::test]
async fn default_pin_needs_a_commit() {
    let mut test_repo = TestRepository::new().await;

    let err = test_repo
        .repository
        .submodule_add("lib", "https://example.com/lib.git", PathBuf::from("lib"), None)
        .unwrap_err();

    assert!(matches!(vit_error(&err), Some(VitError::NoCommits(_))));
}
