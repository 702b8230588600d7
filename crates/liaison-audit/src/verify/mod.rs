//! Invite verification with a run-scoped cache.

pub mod http;

pub use http::HttpInviteLookup;

use moka::sync::Cache;

use liaison_core::traits::InviteLookup;
use liaison_core::types::{InviteCode, Verification};

/// Run-scoped verification cache over an [`InviteLookup`].
///
/// Population is single-flighted per code, so every distinct code
/// referenced anywhere in the run is looked up exactly once no matter
/// how many records (or evaluation groups) reference it concurrently.
/// Dropped at run end; outcomes are never persisted across runs.
pub struct VerifierCache<'a> {
    lookup: &'a dyn InviteLookup,
    cache: Cache<InviteCode, Verification>,
}

impl<'a> VerifierCache<'a> {
    pub fn new(lookup: &'a dyn InviteLookup) -> Self {
        Self {
            lookup,
            cache: Cache::new(16_384),
        }
    }

    /// Verification outcome for `code`, from cache or one external
    /// lookup. `Transient` outcomes are cached too: one run gets one
    /// answer per code, confirmed or not.
    pub fn verify(&self, code: &InviteCode) -> Verification {
        self.cache.get_with(code.clone(), || {
            let outcome = self.lookup.lookup(code);
            if outcome == Verification::Transient {
                tracing::warn!(code = %code, "invite lookup unconfirmed this run");
            }
            outcome
        })
    }

    /// Number of codes looked up so far this run.
    pub fn lookup_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}
