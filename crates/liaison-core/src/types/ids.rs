//! Platform identifiers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Snowflake of the community (tenant) a run audits.
pub type GuildId = u64;
/// Snowflake of a staff member (owner or manager).
pub type UserId = u64;
/// Snowflake of the channel a record's messages live in.
pub type ChannelId = u64;
/// Snowflake of one logged message.
pub type MessageId = u64;
/// Identifier of one partnership record in the record store.
pub type RecordId = u64;

/// The short identifier portion of a server-invite link.
///
/// The constructor lowercases, so equality and hashing are
/// case-insensitive by construction; there is no way to hold a
/// mixed-case code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Manual impl so deserialization goes through the lowercasing
// constructor and cannot smuggle in a mixed-case code.
impl<'de> Deserialize<'de> for InviteCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
