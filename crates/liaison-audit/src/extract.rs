//! Invite code extraction from announcement text.

use std::sync::LazyLock;

use liaison_core::types::collections::FxHashSet;
use liaison_core::types::InviteCode;
use regex::Regex;

/// The platform's three invite-link forms, in match order.
static INVITE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bdiscord\.gg/([a-z0-9-]{2,32})",
        r"(?i)\bdiscord\.com/invite/([a-z0-9-]{2,32})",
        r"(?i)\bdiscordapp\.com/invite/([a-z0-9-]{2,32})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invite pattern compiles"))
    .collect()
});

/// A bare invite code with no surrounding link.
static BARE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9-]{2,32}$").expect("bare code pattern compiles"));

/// Extract every distinct invite code from `text`, lowercased,
/// order-preserving. An empty result is a normal outcome, handled
/// upstream as a missing invite.
pub fn extract_codes(text: &str) -> Vec<InviteCode> {
    let mut codes = Vec::new();
    let mut seen = FxHashSet::default();
    for pattern in INVITE_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let code = InviteCode::new(m.as_str());
                if seen.insert(code.clone()) {
                    codes.push(code);
                }
            }
        }
    }
    codes
}

/// Extract codes from `text`, falling back to a single code from the
/// declared invite reference (full link or bare code) when the text
/// yields nothing.
pub fn extract_with_fallback(text: &str, declared: Option<&str>) -> Vec<InviteCode> {
    let codes = extract_codes(text);
    if !codes.is_empty() {
        return codes;
    }
    let Some(declared) = declared else {
        return Vec::new();
    };
    let from_ref = extract_codes(declared);
    if !from_ref.is_empty() {
        return from_ref.into_iter().take(1).collect();
    }
    let trimmed = declared.trim();
    if BARE_CODE.is_match(trimmed) {
        return vec![InviteCode::new(trimmed)];
    }
    Vec::new()
}
