use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::Path;

impl Repository {
    /// Blob id of a working-tree file, stored in the database when `write` is set
    pub fn hash_object(&self, file_path: &Path, write: bool) -> anyhow::Result<ObjectId> {
        let blob = self.workspace().parse_blob(file_path)?;

        match write {
            true => self.database().store(&blob),
            false => blob.object_id(),
        }
    }
}
