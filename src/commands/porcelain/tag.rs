use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tag::Tag;
use crate::commands::porcelain::checkout::CheckoutOutcome;
use crate::commands::porcelain::commit::resolve_author;
use crate::errors::VitError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: BranchName,
    pub commit: ObjectId,
    /// Tagger and message, missing when the tag object cannot be found
    pub annotation: Option<Tag>,
}

impl Repository {
    /// Tag the HEAD commit, returning the id of the stored tag object
    pub fn tag_create(
        &mut self,
        name: &str,
        message: Option<&str>,
        author: Option<&str>,
    ) -> anyhow::Result<ObjectId> {
        let name = BranchName::try_parse(name)?;
        let commit = self.require_head_commit()?;
        let tagger = resolve_author(author)?;

        let tag = Tag::new(
            commit.clone(),
            name.to_string(),
            tagger,
            message.map(str::to_string),
        );
        let tag_id = self.database().store(&tag)?;

        self.refs().create_tag(&name, &commit)?;
        self.tags().record(name.as_ref(), &tag_id)?;
        tracing::debug!(tag = %name, %commit, "created tag");

        Ok(tag_id)
    }

    /// Every tag, sorted by name
    pub fn tag_list(&self) -> anyhow::Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        for name in self.refs().list_tags()? {
            let Some(commit) = self.refs().tag_commit(&name)? else {
                continue;
            };
            let annotation = match self.tags().get(name.as_ref())? {
                Some(tag_id) if self.database().exists(&tag_id) => {
                    Some(self.database().parse_object_as_tag(&tag_id)?)
                }
                _ => None,
            };

            tags.push(TagInfo {
                name,
                commit,
                annotation,
            });
        }

        Ok(tags)
    }

    /// Delete a tag, returning the commit it pointed at
    pub fn tag_delete(&mut self, name: &str) -> anyhow::Result<ObjectId> {
        let name = BranchName::try_parse(name)?;

        let commit = self.refs().delete_tag(&name)?;
        self.tags().forget(name.as_ref())?;

        Ok(commit)
    }

    /// Detached checkout of the tagged commit
    pub async fn tag_checkout(&mut self, name: &str) -> anyhow::Result<CheckoutOutcome> {
        let tag_name = BranchName::try_parse(name)?;
        let commit = self
            .refs()
            .tag_commit(&tag_name)?
            .ok_or_else(|| VitError::RefNotFound(name.to_string()))?;

        self.switch_to(Head::Detached(commit), name).await
    }
}
