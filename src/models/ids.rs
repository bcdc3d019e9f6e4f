//! Strongly-typed entry identifier
//!
//! Entries are keyed by a random UUID. Documents written by older versions
//! of the tracker used millisecond timestamps as ids; those are mapped onto
//! deterministic v5 UUIDs when read so that the same legacy id always
//! resolves to the same entry.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Short display prefix for entry ids
const DISPLAY_PREFIX: &str = "ent-";

/// Unique identifier of an [`Entry`](super::Entry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an ID from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Map a non-UUID legacy identifier onto a stable UUID
    pub fn from_legacy(legacy: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, legacy.as_bytes()))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Check whether a user-supplied identifier refers to this id.
    ///
    /// Accepts the full UUID, the short display form (`ent-xxxxxxxx`) or
    /// any prefix of the UUID's hyphenated form.
    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim().to_ascii_lowercase();
        let identifier = identifier
            .strip_prefix(DISPLAY_PREFIX)
            .unwrap_or(identifier.as_str());
        !identifier.is_empty() && self.0.to_string().starts_with(identifier)
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, &self.0.to_string()[..8])
    }
}

impl From<Uuid> for EntryId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(uuid) = Uuid::parse_str(s) {
            return Ok(Self(uuid));
        }
        let s = s.strip_prefix(DISPLAY_PREFIX).unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => match Uuid::parse_str(&text) {
                Ok(uuid) => Self(uuid),
                Err(_) => Self::from_legacy(&text),
            },
            RawId::Number(n) => Self::from_legacy(&n.to_string()),
        })
    }
}
