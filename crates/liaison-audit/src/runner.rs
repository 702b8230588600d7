//! Top-level audit runner: fetch, prepare, group, evaluate, deliver.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use dashmap::DashMap;
use rayon::prelude::*;

use liaison_core::config::{LiaisonConfig, RuleScope};
use liaison_core::errors::AuditError;
use liaison_core::traits::{Cancellable, FlagSink, InviteLookup, MessageResolver, RecordSource};
use liaison_core::types::{ActionType, FlagReport, GuildId, RecordId, UserId};

use crate::quota::QuotaTracker;
use crate::rules::{self, AuditRunContext, PreparedRecord};
use crate::verify::VerifierCache;
use crate::window::WindowIndex;
use crate::{attribution, extract, fingerprint, report};

/// The target day is always the calendar day, in the audit timezone,
/// immediately preceding the trigger time.
pub fn target_day_before(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    let local = now.with_timezone(&offset).date_naive();
    local.checked_sub_days(Days::new(1)).unwrap_or(local)
}

/// One scheduled audit invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub guild_id: GuildId,
    /// Owners whose rosters are in scope for this run.
    pub owners: Vec<UserId>,
    pub target_day: NaiveDate,
}

/// A non-fatal failure attributed to one owner or record, accumulated
/// in the summary instead of aborting the run.
#[derive(Debug, Clone)]
pub struct RecordFailure {
    pub owner_id: UserId,
    /// Unset when the whole fetch for the owner failed.
    pub record_id: Option<RecordId>,
    pub message: String,
}

/// What one run did, for the scheduler's log line.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub owners_audited: usize,
    pub records_fetched: usize,
    pub records_audited: usize,
    pub flags_emitted: usize,
    pub flags_delivered: usize,
    pub invite_lookups: u64,
    pub failures: Vec<RecordFailure>,
    pub duration_ms: u64,
}

/// Orchestrates one audit run per `(guild, target day)`.
///
/// Owner preparation and group evaluation are data-parallel; within a
/// group, records are evaluated sequentially in timestamp order since
/// the quota counters and window index are not designed for
/// concurrent mutation. The verifier cache is shared across groups
/// and single-flighted per code.
pub struct AuditRunner<S, M, V, K>
where
    S: RecordSource,
    M: MessageResolver,
    V: InviteLookup,
    K: FlagSink,
{
    config: LiaisonConfig,
    source: S,
    resolver: M,
    lookup: V,
    sink: K,
    active_runs: DashMap<(GuildId, NaiveDate), ()>,
}

impl<S, M, V, K> AuditRunner<S, M, V, K>
where
    S: RecordSource,
    M: MessageResolver,
    V: InviteLookup,
    K: FlagSink,
{
    pub fn new(config: LiaisonConfig, source: S, resolver: M, lookup: V, sink: K) -> Self {
        Self {
            config,
            source,
            resolver,
            lookup,
            sink,
            active_runs: DashMap::new(),
        }
    }

    /// Run one audit. Refuses to overlap another run for the same
    /// `(guild, target day)`; per-record failures are accumulated in
    /// the summary, never propagated.
    pub fn run(
        &self,
        request: &RunRequest,
        cancel: &dyn Cancellable,
    ) -> Result<RunSummary, AuditError> {
        let _guard = RunGuard::acquire(&self.active_runs, request.guild_id, request.target_day)
            .ok_or(AuditError::RunInProgress {
                guild_id: request.guild_id,
                target_day: request.target_day,
            })?;

        let started = Instant::now();
        let offset = self.config.audit.effective_offset();
        let day_start = day_start_utc(request.target_day, offset);
        let day_end = day_start_utc(next_day(request.target_day), offset);
        let window_start = day_start_utc(prev_day(request.target_day), offset);
        let cooldown = self.config.audit.effective_cooldown();
        let threshold = self.config.audit.effective_quota_threshold();

        tracing::info!(
            guild = request.guild_id,
            day = %request.target_day,
            owners = request.owners.len(),
            "partnership audit started"
        );

        let verifier = VerifierCache::new(&self.lookup);

        let batches: Vec<OwnerBatch> = request
            .owners
            .par_iter()
            .map(|&owner| self.prepare_owner(request.guild_id, owner, window_start, day_start, day_end))
            .collect();

        if cancel.is_cancelled() {
            tracing::warn!(guild = request.guild_id, "audit cancelled during preparation");
            return Err(AuditError::Cancelled);
        }

        let groups: Vec<Vec<OwnerBatch>> = match self.config.audit.effective_scope() {
            RuleScope::Owner => batches.into_iter().map(|batch| vec![batch]).collect(),
            RuleScope::Global => vec![batches],
        };

        let outcomes: Vec<GroupOutcome> = groups
            .into_par_iter()
            .map(|group| {
                evaluate_group(
                    group,
                    &verifier,
                    GroupParams {
                        guild_id: request.guild_id,
                        target_day: request.target_day,
                        day_start,
                        day_end,
                        cooldown,
                        threshold,
                    },
                    cancel,
                )
            })
            .collect();

        if cancel.is_cancelled() {
            tracing::warn!(guild = request.guild_id, "audit cancelled during evaluation");
            return Err(AuditError::Cancelled);
        }

        let mut summary = RunSummary {
            owners_audited: request.owners.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            summary.records_fetched += outcome.fetched;
            summary.records_audited += outcome.audited;
            summary.failures.extend(outcome.failures);
            for flag_report in outcome.reports {
                summary.flags_emitted += 1;
                match self.sink.deliver(&flag_report) {
                    Ok(()) => summary.flags_delivered += 1,
                    Err(e) => tracing::warn!(
                        record = flag_report.flag.record_id,
                        error = %e,
                        "flag delivery failed"
                    ),
                }
            }
        }
        summary.invite_lookups = verifier.lookup_count();
        summary.duration_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            guild = request.guild_id,
            day = %request.target_day,
            records = summary.records_audited,
            flags = summary.flags_emitted,
            failures = summary.failures.len(),
            duration_ms = summary.duration_ms,
            "partnership audit finished"
        );
        Ok(summary)
    }

    /// Fetch and prepare one owner's records. A fetch failure marks
    /// the owner in the summary; an unresolvable message text
    /// degrades that record to an empty fingerprint.
    fn prepare_owner(
        &self,
        guild_id: GuildId,
        owner_id: UserId,
        window_start: DateTime<Utc>,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> OwnerBatch {
        let mut batch = OwnerBatch::default();
        let records = match self.source.records_for(guild_id, owner_id) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(owner = owner_id, error = %e, "record fetch failed, skipping owner");
                batch.failures.push(RecordFailure {
                    owner_id,
                    record_id: None,
                    message: e.to_string(),
                });
                return batch;
            }
        };

        for record in records {
            if record.action != ActionType::Create {
                continue;
            }
            if record.timestamp < window_start || record.timestamp >= day_end {
                continue;
            }
            batch.fetched += 1;

            let raw_text = match self
                .resolver
                .resolve_text(record.channel_id, &record.message_ids)
            {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(
                        record = record.id,
                        error = %e,
                        "message text unavailable, auditing with empty fingerprint"
                    );
                    String::new()
                }
            };

            let fp = fingerprint::fingerprint(&raw_text);
            let codes = extract::extract_with_fallback(&raw_text, record.declared_invite.as_deref());
            let managers = attribution::attribute_managers(&fp, record.manager_id);
            let is_target = record.timestamp >= day_start;
            let prepared = PreparedRecord {
                record,
                fingerprint: fp,
                codes,
                managers,
            };
            if is_target {
                batch.target.push(prepared);
            } else {
                batch.lookback.push(prepared);
            }
        }

        batch.target.sort_by_key(|p| (p.record.timestamp, p.record.id));
        batch
    }
}

/// Prepared records for one owner, split into the target day and the
/// lookback context.
#[derive(Default)]
struct OwnerBatch {
    fetched: usize,
    target: Vec<PreparedRecord>,
    lookback: Vec<PreparedRecord>,
    failures: Vec<RecordFailure>,
}

struct GroupParams {
    guild_id: GuildId,
    target_day: NaiveDate,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    cooldown: chrono::Duration,
    threshold: u32,
}

struct GroupOutcome {
    fetched: usize,
    audited: usize,
    reports: Vec<FlagReport>,
    failures: Vec<RecordFailure>,
}

/// Evaluate one group (one owner, or everyone under global scope):
/// build the window index over the combined window, then walk the
/// target-day records in timestamp order. An evaluation panic is
/// caught per record and the run continues.
fn evaluate_group(
    group: Vec<OwnerBatch>,
    verifier: &VerifierCache<'_>,
    params: GroupParams,
    cancel: &dyn Cancellable,
) -> GroupOutcome {
    let mut outcome = GroupOutcome {
        fetched: 0,
        audited: 0,
        reports: Vec::new(),
        failures: Vec::new(),
    };

    let mut target: Vec<PreparedRecord> = Vec::new();
    let mut entries = Vec::new();
    for batch in group {
        outcome.fetched += batch.fetched;
        outcome.failures.extend(batch.failures);
        for prepared in batch.target.iter().chain(batch.lookback.iter()) {
            for code in &prepared.codes {
                entries.push((code.clone(), prepared.record.timestamp, prepared.record.id));
            }
        }
        target.extend(batch.target);
    }
    target.sort_by_key(|p| (p.record.timestamp, p.record.id));

    let window = WindowIndex::build(params.day_start, params.day_end, entries);
    let mut ctx = AuditRunContext {
        cooldown: params.cooldown,
        window,
        quota: QuotaTracker::new(params.threshold),
        verifier,
    };

    for prepared in &target {
        if cancel.is_cancelled() {
            break;
        }
        match catch_unwind(AssertUnwindSafe(|| rules::evaluate_record(&mut ctx, prepared))) {
            Ok(Some(flag)) => {
                outcome.audited += 1;
                let record_link = prepared
                    .record
                    .message_ids
                    .first()
                    .map(|&message_id| {
                        report::record_link(params.guild_id, prepared.record.channel_id, message_id)
                    })
                    .unwrap_or_default();
                outcome.reports.push(FlagReport {
                    guild_id: params.guild_id,
                    target_day: params.target_day,
                    flag,
                    record_link,
                });
            }
            Ok(None) => outcome.audited += 1,
            Err(payload) => {
                let message = panic_message(payload);
                tracing::error!(
                    record = prepared.record.id,
                    error = %message,
                    "record evaluation failed, continuing with next record"
                );
                outcome.failures.push(RecordFailure {
                    owner_id: prepared.record.owner_id,
                    record_id: Some(prepared.record.id),
                    message,
                });
            }
        }
    }

    outcome
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// In-process guard: at most one evaluation of a given `(guild, day)`.
struct RunGuard<'a> {
    runs: &'a DashMap<(GuildId, NaiveDate), ()>,
    key: (GuildId, NaiveDate),
}

impl<'a> RunGuard<'a> {
    fn acquire(
        runs: &'a DashMap<(GuildId, NaiveDate), ()>,
        guild_id: GuildId,
        target_day: NaiveDate,
    ) -> Option<Self> {
        use dashmap::mapref::entry::Entry;
        match runs.entry((guild_id, target_day)) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(Self {
                    runs,
                    key: (guild_id, target_day),
                })
            }
        }
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.runs.remove(&self.key);
    }
}

/// UTC instant of local midnight opening `day` in the audit timezone.
fn day_start_utc(day: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = day.and_time(NaiveTime::MIN);
    let utc_naive =
        local_midnight - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&utc_naive)
}

fn next_day(day: NaiveDate) -> NaiveDate {
    day.checked_add_days(Days::new(1)).unwrap_or(day)
}

fn prev_day(day: NaiveDate) -> NaiveDate {
    day.checked_sub_days(Days::new(1)).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use chrono::Offset;

    use super::*;

    #[test]
    fn target_day_is_the_preceding_local_day() {
        let trigger = Utc
            .with_ymd_and_hms(2024, 5, 3, 4, 0, 0)
            .single()
            .expect("valid time");
        assert_eq!(
            target_day_before(trigger, Utc.fix()),
            NaiveDate::from_ymd_opt(2024, 5, 2).expect("valid date")
        );

        // 04:00 UTC is still the previous day at UTC-6, so the
        // audited day shifts back one more.
        let offset = FixedOffset::west_opt(6 * 3600).expect("valid offset");
        assert_eq!(
            target_day_before(trigger, offset),
            NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
        );
    }

    #[test]
    fn day_bounds_respect_the_offset() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).expect("valid date");
        let offset = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        let start = day_start_utc(day, offset);
        assert_eq!(
            start,
            Utc.with_ymd_and_hms(2024, 5, 1, 22, 0, 0)
                .single()
                .expect("valid time")
        );
    }
}
