use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;

impl Repository {
    /// Compare HEAD, the index and the working tree
    pub async fn status(&mut self) -> anyhow::Result<StatusInfo> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        self.collect_status(&mut index)
    }
}
