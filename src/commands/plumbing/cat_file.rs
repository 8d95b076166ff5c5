use crate::areas::repository::Repository;
use crate::artifacts::branch::MIN_ABBREVIATED_OID;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::VitError;

impl Repository {
    /// Decode the object named by a full or abbreviated id
    pub fn cat_file(&self, object_id: &str) -> anyhow::Result<(ObjectId, ObjectBox)> {
        let object_id = self.expand_object_id(object_id)?;
        let object = self.database().parse_object(&object_id)?;

        Ok((object_id, object))
    }

    fn expand_object_id(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let prefix = prefix.to_ascii_lowercase();
        if ObjectId::is_full_hex(&prefix) {
            return ObjectId::try_parse(prefix);
        }
        if prefix.len() < MIN_ABBREVIATED_OID {
            anyhow::bail!("object id {prefix} is too short");
        }

        match self.database().find_objects_by_prefix(&prefix)?.as_slice() {
            [] => Err(VitError::RefNotFound(prefix).into()),
            [object_id] => Ok(object_id.clone()),
            _ => anyhow::bail!("short id {prefix} is ambiguous"),
        }
    }
}
