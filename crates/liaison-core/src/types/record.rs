//! Partnership records as returned by the record source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, MessageId, RecordId, UserId};

/// Action logged on a partnership record. Only `Create` is audited;
/// every other action type is ignored by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Create,
    Update,
    Remove,
}

/// One logged instance of a staff member publicizing a cross-promotion.
///
/// The announcement text is not stored on the record. The runner
/// resolves it through the `MessageResolver` boundary at audit time,
/// so a failed fetch degrades that one record to an empty fingerprint
/// instead of dropping it or aborting the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnershipRecord {
    pub id: RecordId,
    /// The staff member whose roster this record belongs to.
    pub owner_id: UserId,
    /// Manager declared at submission time. Lowest-priority
    /// attribution signal; its absence is a flaggable condition,
    /// never an error.
    pub manager_id: Option<UserId>,
    pub timestamp: DateTime<Utc>,
    pub action: ActionType,
    /// Invite reference declared at submission time, either a full
    /// link or a bare code.
    pub declared_invite: Option<String>,
    pub channel_id: ChannelId,
    pub message_ids: Vec<MessageId>,
}
