//! Content identifier value object.

use std::fmt;
use std::str::FromStr;

use cid::{Cid, Version};
use multihash::Multihash;

/// Identifies a stored payload by its content hash.
///
/// The textual form handed in by the caller (or returned by the backend) is
/// kept verbatim, alongside the decoded [`Cid`] the backend works with.
/// Nothing beyond "non-empty and decodable" is checked here; the digest is
/// never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId {
    raw: String,
    cid: Cid,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentIdError {
    #[error("content identifier must not be empty")]
    Empty,
    #[error("malformed content identifier {value:?}: {reason}")]
    Malformed { value: String, reason: String },
}

impl ContentId {
    /// Parses a textual identifier (`Qm...` base58 multihash or a multibase CIDv1).
    pub fn parse(value: &str) -> Result<Self, ContentIdError> {
        if value.trim().is_empty() {
            return Err(ContentIdError::Empty);
        }
        let cid = Cid::try_from(value).map_err(|err| ContentIdError::Malformed {
            value: value.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            raw: value.to_string(),
            cid,
        })
    }

    pub fn from_cid(cid: Cid) -> Self {
        Self {
            raw: cid.to_string(),
            cid,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    pub fn multihash(&self) -> &Multihash<64> {
        self.cid.hash()
    }

    /// `true` for legacy base58 `Qm...` identifiers.
    pub fn is_v0(&self) -> bool {
        self.cid.version() == Version::V0
    }

    pub fn into_inner(self) -> String {
        self.raw
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ContentId {
    type Err = ContentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentId {
    type Error = ContentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.raw
    }
}
