//! Tag object
//!
//! A tag object annotates a commit with a tagger, a timestamp and an optional message.
//! The tag ref itself points at the commit; the annotation is looked up separately.
//!
//! ## Format
//!
//! ```text
//! tag <size>\0
//! object <commit-sha>
//! type commit
//! tag <name>
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <message>
//! ```

use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Tag {
    target: ObjectId,
    name: String,
    tagger: Author,
    message: Option<String>,
}

impl Tag {
    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tagger(&self) -> &Author {
        &self.tagger
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn content(&self) -> String {
        format!(
            "object {}\ntype {}\ntag {}\ntagger {}\n\n{}",
            self.target,
            ObjectType::Commit,
            self.name,
            self.tagger.display(),
            self.message.as_deref().unwrap_or_default()
        )
    }
}

impl Packable for Tag {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        frame(self.object_type(), self.content().as_bytes())
    }
}

impl Unpackable for Tag {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid tag object: missing message separator")?;
        let mut lines = headers.lines();
        let mut field = |prefix: &str| {
            lines
                .next()
                .and_then(|line| line.strip_prefix(prefix))
                .map(str::to_string)
                .with_context(|| format!("Invalid tag object: missing {}line", prefix))
        };

        let target = ObjectId::try_parse(field("object ")?)?;
        let target_type = field("type ")?;
        if ObjectType::try_from(target_type.as_str())? != ObjectType::Commit {
            anyhow::bail!("Invalid tag object: only commits can be tagged");
        }
        let name = field("tag ")?;
        let tagger = Author::try_from(field("tagger ")?.as_str())?;

        let message = Some(message.to_string()).filter(|message| !message.is_empty());
        Ok(Tag::new(target, name, tagger, message))
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }

    fn display(&self) -> String {
        self.content()
    }
}
