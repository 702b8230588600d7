//! Announcement fingerprints: normalized text with dynamic trailing
//! boilerplate stripped, so template lines never trigger false
//! positives in attribution or link scanning.

use std::sync::LazyLock;

use regex::Regex;

/// A standalone trailing manager-declaration line.
static MANAGER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*manager:\s*<@!?\d+>(?:\s*,?\s*<@!?\d+>)*\s*$")
        .expect("manager line pattern compiles")
});

/// A trailing "partnered via X" suffix line.
static PARTNERED_VIA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*partnered\s+via\b.*$").expect("partnered-via pattern compiles")
});

/// Build the comparable fingerprint of an announcement: normalize
/// line endings, strip the known dynamic trailing lines while one
/// remains at the end, trim. Stripping runs to a fixed point, so the
/// function is idempotent.
pub fn fingerprint(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut rest = normalized.trim_end();
    loop {
        let (head, last) = match rest.rsplit_once('\n') {
            Some(pair) => pair,
            None => ("", rest),
        };
        if !is_dynamic_trailing_line(last) {
            break;
        }
        rest = head.trim_end();
        if rest.is_empty() {
            break;
        }
    }
    rest.trim().to_string()
}

fn is_dynamic_trailing_line(line: &str) -> bool {
    MANAGER_LINE.is_match(line) || PARTNERED_VIA_LINE.is_match(line)
}
