//! Annotated tag object
//!
//! Same header/body layout as commits:
//!
//! ```text
//! object <sha>
//! type commit
//! tag v1.0
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <tag message>
//! ```

use crate::artifacts::objects::headers::Headers;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::signature::Signature;
use crate::errors::{OdbError, Result};
use bytes::Bytes;

const TAG: &str = "tag";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    headers: Headers,
}

impl Tag {
    pub fn new(
        target: &ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: &Signature,
        message: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        let mut headers = Headers::new(message);
        headers.push(TAG, "object", target.as_ref())?;
        headers.push(TAG, "type", target_type.as_str())?;
        headers.push(TAG, "tag", name)?;
        headers.push(TAG, "tagger", tagger.to_string())?;

        Ok(Tag { headers })
    }

    pub fn from_headers(headers: Headers) -> Self {
        Tag { headers }
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn message(&self) -> &[u8] {
        self.headers.body()
    }

    pub fn target(&self) -> Result<ObjectId> {
        ObjectId::try_parse(self.required("object")?)
    }

    pub fn target_type(&self) -> Result<ObjectType> {
        ObjectType::try_from(self.required("type")?)
    }

    pub fn name(&self) -> Result<&str> {
        self.required("tag")
    }

    pub fn tagger(&self) -> Result<Signature> {
        Signature::parse(TAG, self.required("tagger")?)
    }

    fn required(&self, key: &str) -> Result<&str> {
        self.headers
            .get_text(TAG, key)?
            .ok_or_else(|| OdbError::malformed(TAG, format!("missing {key} header")))
    }
}

impl Packable for Tag {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.headers.serialize().into())
    }
}

impl Unpackable for Tag {
    fn deserialize(payload: &[u8]) -> Result<Self> {
        Headers::parse(TAG, payload).map(Self::from_headers)
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }

    fn display(&self) -> Bytes {
        self.headers.serialize().into()
    }
}
