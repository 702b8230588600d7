//! Shared in-memory fakes for the engine integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use liaison_core::errors::{SinkError, SourceError};
use liaison_core::traits::{FlagSink, InviteLookup, MessageResolver, RecordSource};
use liaison_core::types::collections::{FxHashMap, FxHashSet};
use liaison_core::types::{
    ActionType, FlagReport, GuildId, InviteCode, MessageId, PartnershipRecord, RecordId, UserId,
    Verification,
};

pub const GUILD: GuildId = 900;
pub const CHANNEL: u64 = 500;

/// The audited day used by every scenario.
pub fn target_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 2).expect("valid date")
}

/// A timestamp on the target day.
pub fn ts(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, hour, minute, second)
        .single()
        .expect("valid time")
}

/// A timestamp on the lookback day.
pub fn prev_ts(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, second)
        .single()
        .expect("valid time")
}

/// A `Create` record whose single message id equals the record id.
pub fn record(id: RecordId, owner: UserId, timestamp: DateTime<Utc>) -> PartnershipRecord {
    PartnershipRecord {
        id,
        owner_id: owner,
        manager_id: None,
        timestamp,
        action: ActionType::Create,
        declared_invite: None,
        channel_id: CHANNEL,
        message_ids: vec![id],
    }
}

#[derive(Default)]
pub struct MemorySource {
    pub records: FxHashMap<UserId, Vec<PartnershipRecord>>,
}

impl MemorySource {
    pub fn push(&mut self, record: PartnershipRecord) {
        self.records.entry(record.owner_id).or_default().push(record);
    }
}

impl RecordSource for MemorySource {
    fn records_for(
        &self,
        _guild_id: GuildId,
        owner_id: UserId,
    ) -> Result<Vec<PartnershipRecord>, SourceError> {
        Ok(self.records.get(&owner_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MemoryResolver {
    pub texts: FxHashMap<MessageId, String>,
    pub fail: FxHashSet<MessageId>,
}

impl MemoryResolver {
    pub fn set(&mut self, message_id: MessageId, text: &str) {
        self.texts.insert(message_id, text.to_string());
    }
}

impl MessageResolver for MemoryResolver {
    fn resolve_text(
        &self,
        _channel_id: u64,
        message_ids: &[MessageId],
    ) -> Result<String, SourceError> {
        if message_ids.iter().any(|id| self.fail.contains(id)) {
            return Err(SourceError::ContentUnavailable {
                message: "message fetch failed".to_string(),
            });
        }
        Ok(message_ids
            .iter()
            .map(|id| self.texts.get(id).cloned().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// Lookup fake with canned outcomes and a shared call counter.
/// Unknown codes verify as valid and safe.
pub struct StaticLookup {
    pub outcomes: FxHashMap<InviteCode, Verification>,
    pub calls: Arc<AtomicUsize>,
}

impl StaticLookup {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                outcomes: FxHashMap::default(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    pub fn set(&mut self, code: &str, outcome: Verification) {
        self.outcomes.insert(InviteCode::new(code), outcome);
    }
}

impl InviteLookup for StaticLookup {
    fn lookup(&self, code: &InviteCode) -> Verification {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .get(code)
            .copied()
            .unwrap_or(Verification::Valid { nsfw: false })
    }
}

/// Sink fake that shares its delivered reports with the test.
pub struct MemorySink {
    pub reports: Arc<Mutex<Vec<FlagReport>>>,
    pub fail: bool,
}

impl MemorySink {
    pub fn new() -> (Self, Arc<Mutex<Vec<FlagReport>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                reports: Arc::clone(&reports),
                fail: false,
            },
            reports,
        )
    }

    pub fn failing() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }
}

impl FlagSink for MemorySink {
    fn deliver(&self, report: &FlagReport) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::DeliveryFailed {
                message: "review channel unavailable".to_string(),
            });
        }
        self.reports
            .lock()
            .expect("reports lock poisoned")
            .push(report.clone());
        Ok(())
    }
}
