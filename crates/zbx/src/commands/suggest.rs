//! "Did you mean" hints for exact-name filters that match nothing.

use strsim::levenshtein;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Finds the best matching name from a list of candidates using Levenshtein distance.
///
/// Returns the best match if its edit distance is within the threshold,
/// otherwise returns `None`.
pub fn find_similar_name<'a>(
    query: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    // Case-only differences still count: exact filters are case-sensitive.
    if best_match != query && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}

/// Formats the "nothing matched" hint, optionally including a suggestion.
pub fn format_no_match(kind: &str, name: &str, suggestion: Option<&str>) -> String {
    let base = format!("No {} named '{}'.", kind, name);
    match suggestion {
        Some(s) => format!("{} Did you mean '{}'?", base, s),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_name_is_suggested() {
        let names = ["Linux servers", "Windows servers", "Zabbix servers"];
        assert_eq!(
            find_similar_name("Linux server", names.into_iter()),
            Some("Linux servers".to_string())
        );
    }

    #[test]
    fn test_case_difference_is_suggested() {
        let names = ["web-01", "web-02"];
        assert_eq!(
            find_similar_name("WEB-01", names.into_iter()),
            Some("web-01".to_string())
        );
    }

    #[test]
    fn test_distant_names_are_not_suggested() {
        let names = ["Discovered hosts", "Templates"];
        assert_eq!(find_similar_name("Linux servers", names.into_iter()), None);
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(find_similar_name("web-01", std::iter::empty()), None);
        assert_eq!(find_similar_name("web-01", [""].into_iter()), None);
    }

    #[test]
    fn test_format_no_match() {
        assert_eq!(
            format_no_match("host", "web-1", Some("web-01")),
            "No host named 'web-1'. Did you mean 'web-01'?"
        );
        assert_eq!(format_no_match("item", "CPU", None), "No item named 'CPU'.");
    }
}
