//! Domain types shared across the workspace.

pub mod collections;
pub mod flag;
pub mod ids;
pub mod record;

pub use flag::{AuditFlag, FlagReport, Reason, Verification};
pub use ids::{ChannelId, GuildId, InviteCode, MessageId, RecordId, UserId};
pub use record::{ActionType, PartnershipRecord};
