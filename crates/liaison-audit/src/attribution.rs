//! Manager attribution: which staff member is credited for a record.

use std::sync::LazyLock;

use liaison_core::types::collections::FxHashSet;
use liaison_core::types::UserId;
use regex::Regex;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?(\d+)>").expect("mention pattern compiles"));

static MANAGER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmanager:\s*").expect("manager prefix compiles"));

/// Resolve the managers credited for a record, in priority order:
/// mentions on `Manager:` lines in the fingerprint, then any mention
/// anywhere in the fingerprint, then the declared manager field.
/// An empty result is the "missing manager attribution" condition,
/// not an error.
pub fn attribute_managers(fingerprint: &str, declared: Option<UserId>) -> Vec<UserId> {
    let mut managers = Vec::new();
    let mut seen = FxHashSet::default();

    for line in fingerprint.lines() {
        if let Some(prefix) = MANAGER_PREFIX.find(line) {
            collect_mentions(&line[prefix.end()..], &mut managers, &mut seen);
        }
    }
    if !managers.is_empty() {
        return managers;
    }

    collect_mentions(fingerprint, &mut managers, &mut seen);
    if !managers.is_empty() {
        return managers;
    }

    declared.into_iter().collect()
}

fn collect_mentions(text: &str, out: &mut Vec<UserId>, seen: &mut FxHashSet<UserId>) {
    for caps in MENTION.captures_iter(text) {
        if let Some(id) = caps.get(1).and_then(|m| m.as_str().parse::<UserId>().ok()) {
            if seen.insert(id) {
                out.push(id);
            }
        }
    }
}
