//! The external invite lookup boundary.

use crate::types::{InviteCode, Verification};

/// One external lookup per invite code. Implementations classify
/// every outcome into the three-state `Verification`; there is no
/// error path, ambiguous failures are `Transient`.
pub trait InviteLookup: Send + Sync {
    fn lookup(&self, code: &InviteCode) -> Verification;
}
