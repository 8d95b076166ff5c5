use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use std::path::PathBuf;
use vit::areas::repository::Repository;
use vit::artifacts::objects::object_id::ObjectId;
use vit::errors::VitError;

pub const AUTHOR: &str = "Test User <test@example.com>";

/// A repository driven through the library rather than the binary
pub struct TestRepository {
    pub dir: TempDir,
    pub repository: Repository,
}

impl TestRepository {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut repository = Repository::new(dir.path()).expect("Failed to open repository");
        repository.init().await.expect("Failed to initialize repository");

        TestRepository { dir, repository }
    }

    pub fn write(&self, path: &str, content: &str) {
        write_file(FileSpec::new(self.dir.path().join(path), content.to_string()));
    }

    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file")
    }

    pub fn exists(&self, path: &str) -> bool {
        self.dir.path().join(path).exists()
    }

    pub fn remove(&self, path: &str) {
        std::fs::remove_file(self.dir.path().join(path)).expect("Failed to remove file");
    }

    pub async fn commit_all(&mut self, message: &str) -> ObjectId {
        self.repository
            .add(&[PathBuf::from(".")])
            .await
            .expect("Failed to stage files");
        self.repository
            .commit(message, Some(AUTHOR))
            .await
            .expect("Failed to commit")
    }

    /// Write files and commit them in one step
    pub async fn commit_files(&mut self, files: &[(&str, &str)], message: &str) -> ObjectId {
        for (path, content) in files {
            self.write(path, content);
        }
        self.commit_all(message).await
    }
}

/// Repository with one commit holding `f.txt` = "A"
pub async fn committed() -> TestRepository {
    let mut test_repo = TestRepository::new().await;
    test_repo.commit_files(&[("f.txt", "A")], "base").await;
    test_repo
}

/// The typed failure carried anywhere in the error chain
pub fn vit_error(err: &anyhow::Error) -> Option<&VitError> {
    err.chain().find_map(|cause| cause.downcast_ref::<VitError>())
}
