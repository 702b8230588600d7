//! Audit flags, reasons, and invite verification outcomes.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{GuildId, RecordId, UserId};

/// Why a record was flagged, in the fixed order rules are evaluated.
///
/// The `as_str` forms are the exact strings reviewers see; rule code
/// pushes variants, the report layer renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    MissingManager,
    MissingInvite,
    QuotaExceeded,
    RepeatedSameDay,
    RepeatedWithinCooldown,
    DisallowedExternalContent,
    ExpiredInvite,
    NsfwDestination,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingManager => "missing manager attribution",
            Self::MissingInvite => "missing invite link",
            Self::QuotaExceeded => "manager daily quota exceeded",
            Self::RepeatedSameDay => "repeated same day",
            Self::RepeatedWithinCooldown => "repeated within cooldown window",
            Self::DisallowedExternalContent => "disallowed external content",
            Self::ExpiredInvite => "expired/invalid invite",
            Self::NsfwDestination => "disallowed destination (nsfw)",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one external invite lookup.
///
/// `Transient` means the lookup could not be confirmed this run. It
/// contributes no flag and must never be collapsed into either of the
/// other outcomes; callers have to handle all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Valid { nsfw: bool },
    Expired,
    Transient,
}

/// Advisory flag for one record. Produced only when `reasons` is
/// non-empty; rule order is preserved and reasons never repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFlag {
    pub record_id: RecordId,
    pub owner_id: UserId,
    /// Every manager the record was attributed to. Empty when
    /// attribution failed (which is itself the first reason).
    pub manager_ids: Vec<UserId>,
    pub reasons: Vec<Reason>,
}

/// One flag plus the context a reviewer needs to follow it back to
/// the original record. This is what the sink receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagReport {
    pub guild_id: GuildId,
    pub target_day: NaiveDate,
    pub flag: AuditFlag,
    /// Human-followable link to the flagged record's first message,
    /// empty when the record has no resolvable message.
    pub record_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_strings_are_the_reviewer_facing_forms() {
        assert_eq!(Reason::MissingManager.as_str(), "missing manager attribution");
        assert_eq!(Reason::MissingInvite.as_str(), "missing invite link");
        assert_eq!(Reason::QuotaExceeded.as_str(), "manager daily quota exceeded");
        assert_eq!(Reason::RepeatedSameDay.as_str(), "repeated same day");
        assert_eq!(
            Reason::RepeatedWithinCooldown.as_str(),
            "repeated within cooldown window"
        );
        assert_eq!(
            Reason::DisallowedExternalContent.as_str(),
            "disallowed external content"
        );
        assert_eq!(Reason::ExpiredInvite.as_str(), "expired/invalid invite");
        assert_eq!(Reason::NsfwDestination.as_str(), "disallowed destination (nsfw)");
    }
}
