//! Run-level guarantees: overlap lock, cancellation, best-effort sink.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use liaison_core::config::LiaisonConfig;
use liaison_core::errors::{AuditError, SourceError};
use liaison_core::traits::{Cancellable, CancellationToken, MessageResolver, RecordSource};
use liaison_core::types::MessageId;

use liaison_audit::{AuditRunner, RunRequest};

use common::*;

fn request(owners: Vec<u64>) -> RunRequest {
    RunRequest {
        guild_id: GUILD,
        owners,
        target_day: target_day(),
    }
}

/// Resolver that parks inside the first run until the test releases
/// it; later calls pass straight through.
struct BlockingResolver {
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
    armed: std::sync::atomic::AtomicBool,
}

impl MessageResolver for BlockingResolver {
    fn resolve_text(
        &self,
        _channel_id: u64,
        _message_ids: &[MessageId],
    ) -> Result<String, SourceError> {
        if self.armed.swap(false, std::sync::atomic::Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
        Ok(String::new())
    }
}

#[test]
fn concurrent_runs_for_the_same_day_are_refused() {
    let mut source = MemorySource::default();
    source.push(record(1, 10, ts(9, 0, 0)));

    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));
    let resolver = BlockingResolver {
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
        armed: std::sync::atomic::AtomicBool::new(true),
    };

    let (lookup, _) = StaticLookup::new();
    let (sink, _) = MemorySink::new();
    let runner = Arc::new(AuditRunner::new(
        LiaisonConfig::default(),
        source,
        resolver,
        lookup,
        sink,
    ));

    let background = {
        let runner = Arc::clone(&runner);
        thread::spawn(move || runner.run(&request(vec![10]), &CancellationToken::new()))
    };

    // Wait until the first run is inside record preparation, then try
    // to start a second evaluation of the same (guild, day).
    entered.wait();
    let overlap = runner.run(&request(vec![10]), &CancellationToken::new());
    assert!(matches!(overlap, Err(AuditError::RunInProgress { .. })));

    release.wait();
    let first = background.join().expect("first run thread");
    assert!(first.is_ok(), "the original run completes normally");

    // The lock is released once the first run finishes.
    let again = runner.run(&request(vec![10]), &CancellationToken::new());
    assert!(again.is_ok());
}

#[test]
fn cancelled_token_stops_the_run() {
    let mut source = MemorySource::default();
    let mut resolver = MemoryResolver::default();
    source.push(record(1, 10, ts(9, 0, 0)));
    resolver.set(1, "discord.gg/abc Manager: <@111>");

    let (lookup, _) = StaticLookup::new();
    let (sink, reports) = MemorySink::new();
    let runner = AuditRunner::new(LiaisonConfig::default(), source, resolver, lookup, sink);

    let token = CancellationToken::new();
    token.cancel();
    let outcome = runner.run(&request(vec![10]), &token);
    assert!(matches!(outcome, Err(AuditError::Cancelled)));
    assert!(reports.lock().expect("reports").is_empty());
}

#[test]
fn sink_failures_do_not_fail_the_run() {
    let mut source = MemorySource::default();
    let resolver = MemoryResolver::default();
    // No text, no declared fields: this record flags.
    source.push(record(1, 10, ts(9, 0, 0)));

    let (lookup, _) = StaticLookup::new();
    let runner = AuditRunner::new(
        LiaisonConfig::default(),
        source,
        resolver,
        lookup,
        MemorySink::failing(),
    );

    let summary = runner
        .run(&request(vec![10]), &CancellationToken::new())
        .expect("run completes despite sink failures");
    assert_eq!(summary.flags_emitted, 1);
    assert_eq!(summary.flags_delivered, 0);
}

#[test]
fn owner_fetch_failure_is_contained() {
    /// Source that fails for one owner and works for the rest.
    struct HalfBrokenSource {
        inner: MemorySource,
        broken_owner: u64,
    }

    impl RecordSource for HalfBrokenSource {
        fn records_for(
            &self,
            guild_id: u64,
            owner_id: u64,
        ) -> Result<Vec<liaison_core::types::PartnershipRecord>, SourceError> {
            if owner_id == self.broken_owner {
                return Err(SourceError::Unavailable {
                    message: "store offline".to_string(),
                });
            }
            self.inner.records_for(guild_id, owner_id)
        }
    }

    let mut inner = MemorySource::default();
    let mut resolver = MemoryResolver::default();
    inner.push(record(1, 20, ts(9, 0, 0)));
    resolver.set(1, "discord.gg/fine1 Manager: <@111>");

    let (lookup, _) = StaticLookup::new();
    let (sink, _) = MemorySink::new();
    let runner = AuditRunner::new(
        LiaisonConfig::default(),
        HalfBrokenSource {
            inner,
            broken_owner: 10,
        },
        resolver,
        lookup,
        sink,
    );

    let summary = runner
        .run(&request(vec![10, 20]), &CancellationToken::new())
        .expect("run survives a broken owner fetch");
    assert_eq!(summary.records_audited, 1, "the healthy owner is audited");
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].owner_id, 10);
    assert!(summary.failures[0].record_id.is_none());
}
