//! Partial-substring expansion for roster search.
//!
//! A query is expanded into progressively shorter windows of itself so that
//! near misses still match. Longer windows come first and rank higher.

/// Queries shorter than this return no results.
pub const MIN_SEARCH_QUERY_LENGTH: usize = 3;

/// Expand `query` into ranked partial substrings.
///
/// The full query comes first, followed by every contiguous window one
/// character shorter (left to right), then two shorter, and so on down to
/// windows of exactly `min_len` characters. A query shorter than `min_len`
/// expands to nothing.
///
/// ```
/// use teamlist_core::roster::expand_query;
///
/// assert_eq!(
///     expand_query("ABCDE", 3),
///     ["ABCDE", "ABCD", "BCDE", "ABC", "BCD", "CDE"],
/// );
/// assert!(expand_query("AB", 3).is_empty());
/// ```
pub fn expand_query(query: &str, min_len: usize) -> Vec<String> {
    let chars: Vec<char> = query.chars().collect();
    let len = chars.len();
    if len < min_len {
        return Vec::new();
    }

    let mut partials = vec![query.to_string()];
    if len <= min_len {
        return partials;
    }

    let mut shrink = 1;
    loop {
        let window = len - shrink;
        partials.extend(chars.windows(window).map(|w| w.iter().collect::<String>()));
        if window <= min_len {
            break;
        }
        shrink += 1;
    }

    partials
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_five_characters() {
        assert_eq!(
            expand_query("ABCDE", 3),
            vec!["ABCDE", "ABCD", "BCDE", "ABC", "BCD", "CDE"]
        );
    }

    #[test]
    fn test_expand_below_threshold_is_empty() {
        assert!(expand_query("AB", 3).is_empty());
        assert!(expand_query("", 3).is_empty());
    }

    #[test]
    fn test_expand_at_threshold_is_query_only() {
        assert_eq!(expand_query("amy", 3), vec!["amy"]);
    }

    #[test]
    fn test_expand_one_above_threshold() {
        assert_eq!(expand_query("abcd", 3), vec!["abcd", "abc", "bcd"]);
    }

    #[test]
    fn test_expand_window_counts() {
        // 1 full query + 2 + 3 + 4 windows of lengths 5, 4, 3
        let partials = expand_query("abcdef", 3);
        assert_eq!(partials.len(), 1 + 2 + 3 + 4);
        assert!(partials.windows(2).all(|w| w[0].len() >= w[1].len()));
        assert!(partials.iter().all(|p| p.len() >= 3));
    }

    #[test]
    fn test_expand_counts_characters_not_bytes() {
        assert_eq!(expand_query("Zoë", 3), vec!["Zoë"]);
        assert_eq!(expand_query("Zoëy", 3), vec!["Zoëy", "Zoë", "oëy"]);
    }
}
