use crate::protocol::pb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, server-issued credential for the current state of a session.
///
/// A token is superseded by every call that advances the session; only the
/// most recently received token may be sent back to the server.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken {
    #[serde(with = "base64_bytes")]
    data: Vec<u8>,
    id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    metadata: String,
}

impl SessionToken {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>, id: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            id: id.into(),
            metadata: String::new(),
        }
    }

    /// Session id, stable across tokens of the same session. Useful for
    /// correlating client and server logs.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn metadata(&self) -> &str {
        &self.metadata
    }
}

// Token data is a bearer credential: keep it out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("id", &self.id)
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl From<pb::TokenData> for SessionToken {
    fn from(token: pb::TokenData) -> Self {
        Self {
            data: token.data,
            id: token.id,
            metadata: token.metadata,
        }
    }
}

impl From<SessionToken> for pb::TokenData {
    fn from(token: SessionToken) -> Self {
        Self {
            data: token.data,
            id: token.id,
            metadata: token.metadata,
        }
    }
}

impl From<&SessionToken> for pb::TokenData {
    fn from(token: &SessionToken) -> Self {
        token.clone().into()
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
