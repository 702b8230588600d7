//! Blocking invite lookup against the platform's public API.

use serde::Deserialize;

use liaison_core::config::VerifyConfig;
use liaison_core::errors::VerifyError;
use liaison_core::traits::InviteLookup;
use liaison_core::types::{InviteCode, Verification};

/// `GET {api_base}/invites/{code}?with_counts=true` with a bounded
/// per-call timeout. 404/400 mean the invite is gone for good; every
/// other failure mode is transient and only degrades this run's
/// classification to "unconfirmed".
pub struct HttpInviteLookup {
    client: reqwest::blocking::Client,
    api_base: String,
}

impl HttpInviteLookup {
    pub fn new(config: &VerifyConfig) -> Result<Self, VerifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.effective_timeout())
            .build()
            .map_err(|e| VerifyError::ClientBuild {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            api_base: config.effective_api_base(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct InviteBody {
    guild: Option<GuildBody>,
}

#[derive(Debug, Deserialize)]
struct GuildBody {
    #[serde(default)]
    nsfw_level: u8,
}

impl InviteLookup for HttpInviteLookup {
    fn lookup(&self, code: &InviteCode) -> Verification {
        let url = format!("{}/invites/{}?with_counts=true", self.api_base, code);
        let response = match self.client.get(&url).send() {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "invite lookup request failed");
                return Verification::Transient;
            }
        };

        let status = response.status();
        if status.is_success() {
            // Any non-zero maturity level on the destination counts.
            let nsfw = response
                .json::<InviteBody>()
                .ok()
                .and_then(|body| body.guild)
                .map(|guild| guild.nsfw_level > 0)
                .unwrap_or(false);
            return Verification::Valid { nsfw };
        }

        match status.as_u16() {
            400 | 404 => Verification::Expired,
            _ => {
                tracing::warn!(code = %code, status = %status, "invite lookup unconfirmed");
                Verification::Transient
            }
        }
    }
}
