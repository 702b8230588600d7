//! Invite verification errors.

/// Errors constructing the invite lookup client.
///
/// Lookup outcomes themselves are not errors: every call classifies
/// into the three-state `Verification`, and ambiguous failures become
/// `Verification::Transient` rather than surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("failed to build HTTP client: {message}")]
    ClientBuild { message: String },
}
