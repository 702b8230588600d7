//! Rule evaluation: composes the rule components into one reason
//! list per record, in fixed order.

use chrono::Duration;

use liaison_core::types::{AuditFlag, InviteCode, PartnershipRecord, Reason, UserId, Verification};

use crate::linkscan;
use crate::quota::QuotaTracker;
use crate::verify::VerifierCache;
use crate::window::WindowIndex;

/// One record with its run-derived artifacts, prepared once by the
/// runner and shared by every rule.
#[derive(Debug, Clone)]
pub struct PreparedRecord {
    pub record: PartnershipRecord,
    pub fingerprint: String,
    pub codes: Vec<InviteCode>,
    pub managers: Vec<UserId>,
}

/// Per-run shared mutable state, passed explicitly to every rule.
/// One context per evaluation group; the verifier cache is shared by
/// every group in the run. Nothing survives the run.
pub struct AuditRunContext<'a> {
    pub cooldown: Duration,
    pub window: WindowIndex,
    pub quota: QuotaTracker,
    pub verifier: &'a VerifierCache<'a>,
}

/// Evaluate one target-day record against every rule, in fixed order.
/// Records must arrive in timestamp order (the quota counters depend
/// on it). Returns a flag only when at least one rule triggered; a
/// rule contributes its reason at most once.
pub fn evaluate_record(ctx: &mut AuditRunContext<'_>, prepared: &PreparedRecord) -> Option<AuditFlag> {
    let record = &prepared.record;
    let mut reasons = Vec::new();

    if prepared.managers.is_empty() {
        reasons.push(Reason::MissingManager);
    }

    if prepared.codes.is_empty() {
        reasons.push(Reason::MissingInvite);
    }

    if !ctx.quota.record(&prepared.managers).is_empty() {
        reasons.push(Reason::QuotaExceeded);
    }

    let mut same_day = false;
    let mut within_cooldown = false;
    for code in &prepared.codes {
        same_day = same_day || ctx.window.is_same_day_repeat(code, record.timestamp, record.id);
        within_cooldown = within_cooldown
            || ctx
                .window
                .violates_cooldown(code, record.timestamp, record.id, ctx.cooldown);
    }
    if same_day {
        reasons.push(Reason::RepeatedSameDay);
    }
    if within_cooldown {
        reasons.push(Reason::RepeatedWithinCooldown);
    }

    if !linkscan::disallowed_tokens(&prepared.fingerprint).is_empty() {
        reasons.push(Reason::DisallowedExternalContent);
    }

    // Verifier outcomes last: deterministic local rules above hold
    // even when the external service is unavailable, and a transient
    // outcome contributes nothing.
    let mut expired = false;
    let mut nsfw = false;
    for code in &prepared.codes {
        match ctx.verifier.verify(code) {
            Verification::Expired => expired = true,
            Verification::Valid { nsfw: true } => nsfw = true,
            Verification::Valid { nsfw: false } | Verification::Transient => {}
        }
    }
    if expired {
        reasons.push(Reason::ExpiredInvite);
    }
    if nsfw {
        reasons.push(Reason::NsfwDestination);
    }

    if reasons.is_empty() {
        None
    } else {
        Some(AuditFlag {
            record_id: record.id,
            owner_id: record.owner_id,
            manager_ids: prepared.managers.clone(),
            reasons,
        })
    }
}
