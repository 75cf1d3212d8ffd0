// src/extractor.rs
use crate::types::SourceError;
use regex::Regex;

// Both cases spelled out instead of `(?i)`, whose Unicode folding lets
// `[a-z]` match U+017F and U+212A.
const LABEL: &str = r"[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?";

/// Finds subdomains of one root domain inside arbitrary text.
///
/// A match is one or more labels followed by the root on a label boundary,
/// so `foo.example.com` matches `example.com` while `evil-example.com`,
/// `foo.example.community` and the bare root do not. In
/// `baz.example.com.evil.com` only `baz.example.com` is taken.
#[derive(Debug, Clone)]
pub struct SubdomainExtractor {
    root: String,
    pattern: Regex,
}

impl SubdomainExtractor {
    pub fn new(domain: &str) -> Result<Self, SourceError> {
        let root = normalize_domain(domain);
        if !is_valid_domain(&root) {
            return Err(SourceError::Construction(domain.to_string()));
        }

        // The trailing group consumes one boundary character; the regex
        // crate has no look-around.
        let pattern = format!(
            r"((?:{label}\.)+(?i-u:{root}))(?:[^a-zA-Z0-9\-]|$)",
            label = LABEL,
            root = regex::escape(&root),
        );
        let pattern = Regex::new(&pattern)
            .map_err(|e| SourceError::Construction(format!("{}: {}", domain, e)))?;

        Ok(Self { root, pattern })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// All non-overlapping matches in order of appearance, lowercased.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        let bytes = text.as_bytes();
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter(|m| m.start() == 0 || !continues_label(bytes[m.start() - 1]))
            .map(|m| m.as_str().to_ascii_lowercase())
            .collect()
    }
}

// A match preceded by one of these started in the middle of a longer,
// invalid label (over-long, underscored or non-ASCII).
fn continues_label(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || !byte.is_ascii()
}

/// Lowercase and drop a trailing root dot.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Check if a string is a well-formed hostname with at least two labels.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() < 2 {
        return false;
    }

    for part in parts {
        if part.is_empty() || part.len() > 63 {
            return false;
        }

        if !part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }

        if part.starts_with('-') || part.ends_with('-') {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(root: &str, text: &str) -> Vec<String> {
        SubdomainExtractor::new(root).unwrap().find_all(text)
    }

    #[test]
    fn test_is_valid_domain() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("sub.example.com"));
        assert!(!is_valid_domain("example"));
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("-example.com"));
        assert!(!is_valid_domain("example-.com"));
        assert!(!is_valid_domain("exa mple.com"));
        assert!(!is_valid_domain("example..com"));
    }

    #[test]
    fn test_rejects_malformed_root() {
        for root in ["", "com", "exa(mple).com", "*.example.com", "a..b"] {
            assert!(
                matches!(SubdomainExtractor::new(root), Err(SourceError::Construction(_))),
                "{root:?} should not build an extractor"
            );
        }
    }

    #[test]
    fn test_mixed_text() {
        assert_eq!(
            extract(
                "example.com",
                "foo.example.com bar example.com baz.example.com.evil.com"
            ),
            vec!["foo.example.com", "baz.example.com"]
        );
    }

    #[test]
    fn test_suffix_must_be_on_label_boundary() {
        assert!(extract("example.com", "evil-example.com notexample.com").is_empty());
        assert!(extract("example.com", "www.example.community").is_empty());
        assert!(extract("example.com", "a.example.com-cdn.net").is_empty());
    }

    #[test]
    fn test_order_and_case() {
        assert_eq!(
            extract(
                "Example.COM",
                "<a href=\"https://WWW.example.com/x\">mail.Example.com</a>, api.v2.example.com."
            ),
            vec!["www.example.com", "mail.example.com", "api.v2.example.com"]
        );
    }

    #[test]
    fn test_repeats_are_kept() {
        assert_eq!(
            extract("example.com", "a.example.com\na.example.com"),
            vec!["a.example.com", "a.example.com"]
        );
    }

    #[test]
    fn test_root_dots_are_literal() {
        assert!(extract("example.com", "foo.exampleXcom").is_empty());
    }

    #[test]
    fn test_truncated_labels_are_skipped() {
        let long = "a".repeat(70);
        assert!(extract("example.com", &format!("{long}.example.com")).is_empty());
        assert!(extract("example.com", "_dmarc.example.com").is_empty());
    }

    #[test]
    fn test_case_folding_stays_ascii() {
        // Long s and the Kelvin sign fold to `s` and `k` under Unicode rules.
        assert!(extract("example.com", "\u{17F}tage.example.com \u{212A}ey.example.com").is_empty());
        assert!(extract("example.com", "www.example.\u{17F}om").is_empty());
        assert_eq!(
            extract("example.com", "Key.example.com key.example.com"),
            vec!["key.example.com", "key.example.com"]
        );
    }

    #[test]
    fn test_non_ascii_neighbours() {
        assert!(extract("example.com", "\u{fc}.example.com").is_empty());
        assert!(extract("example.com", "m\u{fc}ller.example.com").is_empty());
        assert_eq!(
            extract("example.com", "\u{fc} mail.example.com caf\u{e9}.example.com"),
            vec!["mail.example.com"]
        );
        assert_eq!(
            extract("example.com", "<www.example.com\u{ab} cdn.example.com\u{e9}"),
            vec!["www.example.com", "cdn.example.com"]
        );
    }

    #[test]
    fn test_no_matches_is_empty() {
        assert!(extract("example.com", "").is_empty());
        assert!(extract("example.com", "nothing to see here").is_empty());
    }
}
