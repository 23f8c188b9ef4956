//! Quoted-text scanning
//!
//! Hybrid pipelines ask a second model for prose that quotes the source, in
//! either bracketed (`["..."]`) or plain (`"..."`, `“...”`) form. The quoted
//! strings become low-confidence citations when they can be found in the
//! source.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static BRACKET_QUOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[\s*["“]([^"“”\]]+)["”]\s*\]"#).expect("valid bracket quote regex")
});

static PLAIN_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["“]([^"“”]+)["”]"#).expect("valid plain quote regex"));

/// A quoted string found in free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedSpan {
    /// Text between the quotes, trimmed
    pub text: String,

    /// Whether the quote was wrapped in square brackets
    pub bracketed: bool,
}

/// Find quoted strings in `text`
///
/// Bracketed quotes come first and are always kept; plain quotes must be at
/// least `min_chars` long. Each distinct text is returned once.
pub fn scan_quotes(text: &str, min_chars: usize) -> Vec<QuotedSpan> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for cap in BRACKET_QUOTE.captures_iter(text) {
        let quoted = cap[1].trim();
        if !quoted.is_empty() && seen.insert(quoted.to_string()) {
            out.push(QuotedSpan {
                text: quoted.to_string(),
                bracketed: true,
            });
        }
    }

    for cap in PLAIN_QUOTE.captures_iter(text) {
        let quoted = cap[1].trim();
        if quoted.chars().count() < min_chars {
            continue;
        }
        if seen.insert(quoted.to_string()) {
            out.push(QuotedSpan {
                text: quoted.to_string(),
                bracketed: false,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_quotes() {
        let prose = r#"The trust is revocable ["may be revoked by the Grantor"] at any time."#;
        let quotes = scan_quotes(prose, 10);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "may be revoked by the Grantor");
        assert!(quotes[0].bracketed);
    }

    #[test]
    fn test_plain_and_curly_quotes() {
        let prose = "Income is paid \"at least quarterly to the spouse\" and “principal as needed for health”.";
        let quotes = scan_quotes(prose, 10);
        let texts: Vec<_> = quotes.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["at least quarterly to the spouse", "principal as needed for health"]
        );
        assert!(quotes.iter().all(|q| !q.bracketed));
    }

    #[test]
    fn test_short_plain_quotes_are_ignored() {
        let quotes = scan_quotes(r#"The "Trustee" shall act."#, 10);
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_short_bracketed_quotes_are_kept() {
        let quotes = scan_quotes(r#"Named ["Trustee"] here."#, 10);
        assert_eq!(quotes.len(), 1);
    }

    #[test]
    fn test_bracket_and_plain_forms_deduplicate() {
        let prose = r#"["no contest clause applies"] and again "no contest clause applies"."#;
        let quotes = scan_quotes(prose, 5);
        assert_eq!(quotes.len(), 1);
        assert!(quotes[0].bracketed);
    }
}
