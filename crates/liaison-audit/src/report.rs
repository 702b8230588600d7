//! Flag report rendering and the default logging sink.

use liaison_core::errors::SinkError;
use liaison_core::traits::FlagSink;
use liaison_core::types::{ChannelId, FlagReport, GuildId, MessageId};

/// Human-followable link to the message behind a record.
pub fn record_link(guild_id: GuildId, channel_id: ChannelId, message_id: MessageId) -> String {
    format!("https://discord.com/channels/{guild_id}/{channel_id}/{message_id}")
}

/// Render one report as the plain-text block a review channel shows.
pub fn render(report: &FlagReport) -> String {
    let flag = &report.flag;
    let managers = if flag.manager_ids.is_empty() {
        "unattributed".to_string()
    } else {
        flag.manager_ids
            .iter()
            .map(|id| format!("<@{id}>"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let reasons = flag
        .reasons
        .iter()
        .map(|reason| format!("- {reason}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = format!(
        "Partnership audit {} | record {} | owner <@{}> | manager(s): {}\n{}",
        report.target_day, flag.record_id, flag.owner_id, managers, reasons
    );
    if !report.record_link.is_empty() {
        out.push('\n');
        out.push_str(&report.record_link);
    }
    out
}

/// Default sink: logs each report, so deployments without a review
/// channel wired up still surface flags.
pub struct TracingSink;

impl FlagSink for TracingSink {
    fn deliver(&self, report: &FlagReport) -> Result<(), SinkError> {
        tracing::info!(
            guild = report.guild_id,
            record = report.flag.record_id,
            "\n{}",
            render(report)
        );
        Ok(())
    }
}
