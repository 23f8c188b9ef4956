//! Char-offset helpers
//!
//! Rust strings index by byte; spans in this crate count chars. These helpers
//! do the conversion so callers never slice on a non-boundary.

/// Number of chars in `s`
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Slice `s` by char offsets, `None` if out of range or inverted
pub fn char_slice(s: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let mut boundaries = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()));
    let begin = boundaries.nth(start)?;
    let finish = if end == start {
        begin
    } else {
        boundaries.nth(end - start - 1)?
    };
    Some(&s[begin..finish])
}

/// First occurrence of `needle` in `haystack` as `(start, end)` char offsets
pub fn find_chars(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let byte_start = haystack.find(needle)?;
    let start = char_len(&haystack[..byte_start]);
    Some((start, start + char_len(needle)))
}

/// Truncate to at most `max` chars, appending `ellipsis` if anything was cut
pub fn truncate_chars(s: &str, max: usize, ellipsis: &str) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}{}", &s[..byte_idx], ellipsis),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_char_slice_ascii() {
        assert_eq!(char_slice("hello world", 6, 11), Some("world"));
        assert_eq!(char_slice("hello", 2, 2), Some(""));
        assert_eq!(char_slice("hello", 0, 5), Some("hello"));
    }

    #[test]
    fn test_char_slice_out_of_range() {
        assert_eq!(char_slice("hello", 3, 9), None);
        assert_eq!(char_slice("hello", 4, 2), None);
        assert_eq!(char_slice("hello", 6, 6), None);
    }

    #[test]
    fn test_char_slice_multibyte() {
        let s = "José’s trust";
        assert_eq!(char_slice(s, 0, 6), Some("José’s"));
        assert_eq!(char_slice(s, 7, 12), Some("trust"));
    }

    #[test]
    fn test_find_chars_counts_chars_not_bytes() {
        let s = "Señor García, trustee";
        assert_eq!(find_chars(s, "trustee"), Some((14, 21)));
        assert_eq!(find_chars(s, "absent"), None);
        assert_eq!(find_chars(s, ""), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3, "..."), "abc...");
        assert_eq!(truncate_chars("abc", 3, "..."), "abc");
        assert_eq!(truncate_chars("ééé", 2, "…"), "éé…");
    }

    proptest! {
        #[test]
        fn prop_find_then_slice_recovers_needle(
            prefix in "\\PC{0,20}",
            needle in "\\PC{1,10}",
            suffix in "\\PC{0,20}",
        ) {
            let haystack = format!("{}{}{}", prefix, needle, suffix);
            let (start, end) = find_chars(&haystack, &needle).unwrap();
            prop_assert_eq!(char_slice(&haystack, start, end), Some(needle.as_str()));
        }
    }
}
