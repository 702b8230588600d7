//! External link scanning over announcement fingerprints.

use std::sync::LazyLock;

use regex::Regex;

/// URL-like tokens: raw http(s)/www tokens. Externally hosted images
/// and GIFs present as URLs, so they are caught here too.
static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("url pattern compiles"));

/// Tokens pointing at the platform's own invite-link domains.
static PLATFORM_INVITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.)?(?:discord\.gg|discord(?:app)?\.com/invite)/")
        .expect("platform invite pattern compiles")
});

/// Return every URL-like token in the fingerprint that is not a
/// platform invite link. Non-empty means "disallowed external
/// content".
pub fn disallowed_tokens(fingerprint: &str) -> Vec<&str> {
    URL_TOKEN
        .find_iter(fingerprint)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ')', '!', '?']))
        .filter(|token| !PLATFORM_INVITE.is_match(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_external_url_is_disallowed() {
        let tokens = disallowed_tokens("visit https://example.com/cool");
        assert_eq!(tokens, vec!["https://example.com/cool"]);
    }

    #[test]
    fn invite_links_are_allowed() {
        assert!(disallowed_tokens("join https://discord.gg/abc123").is_empty());
        assert!(disallowed_tokens("join discord.com/invite/abc").is_empty());
        assert!(disallowed_tokens("join www.discord.gg/abc").is_empty());
    }

    #[test]
    fn hosted_image_urls_are_caught() {
        let tokens = disallowed_tokens("banner: https://cdn.example.net/banner.gif");
        assert_eq!(tokens, vec!["https://cdn.example.net/banner.gif"]);
    }

    #[test]
    fn www_tokens_are_scanned() {
        let tokens = disallowed_tokens("see www.example.org, it rocks");
        assert_eq!(tokens, vec!["www.example.org"]);
    }

    #[test]
    fn text_without_urls_is_clean() {
        assert!(disallowed_tokens("no links, just words").is_empty());
    }
}
