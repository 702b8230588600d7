//! Read-only boundaries onto the record store and message history.

use crate::errors::SourceError;
use crate::types::{ChannelId, GuildId, MessageId, PartnershipRecord, UserId};

/// The record store. Returns every partnership record on one owner's
/// roster; the runner filters to `Create` actions and the audit window.
pub trait RecordSource: Send + Sync {
    fn records_for(
        &self,
        guild_id: GuildId,
        owner_id: UserId,
    ) -> Result<Vec<PartnershipRecord>, SourceError>;
}

/// Message history. Returns the concatenated plain text plus embed
/// text (title, description, field names/values, url) of the given
/// messages, newline-joined. Unresolvable messages contribute an
/// empty string; a failed call is recovered per record by the runner.
pub trait MessageResolver: Send + Sync {
    fn resolve_text(
        &self,
        channel_id: ChannelId,
        message_ids: &[MessageId],
    ) -> Result<String, SourceError>;
}
