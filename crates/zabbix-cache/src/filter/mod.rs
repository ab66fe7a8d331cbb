//! Name filters for groups, hosts, applications and items.
//!
//! A filter is either an exact name or a regular expression written between
//! slashes, optionally followed by flags:
//!
//! - `Linux servers` - exact name
//! - `/^web-\d+$/` - regular expression
//! - `/cpu/i` - case-insensitive (`i`), multi-line (`m`); `g` is accepted and ignored
//!
//! Filters are parsed once into a [`Filter`] and then applied in one of two
//! modes:
//!
//! | Mode | Pattern | Exact name |
//! |---|---|---|
//! | [`find_by_filter`] | all matches | first match only |
//! | [`filter_by_query`] | all matches | all matches |
//!
//! # Pattern syntax
//!
//! Patterns use the [`regex`] crate syntax, which has no lookaround or
//! backreferences. A filter such as `/^((?!test).)*$/` is rejected with
//! [`FilterError::InvalidPattern`] rather than silently matching something
//! else.
//!
//! # Example
//!
//! ```
//! use zabbix_cache_rs::filter::{filter_by_query, find_by_filter, Filter};
//! use zabbix_api_rs::models::Group;
//!
//! let groups = vec![
//!     Group { groupid: "1".into(), name: "Linux servers".into() },
//!     Group { groupid: "2".into(), name: "Linux servers".into() },
//!     Group { groupid: "3".into(), name: "Windows servers".into() },
//! ];
//!
//! let exact = Filter::parse("Linux servers").unwrap().unwrap();
//! assert_eq!(find_by_filter(groups.clone(), &exact).len(), 1);
//! assert_eq!(filter_by_query(groups.clone(), &exact).len(), 2);
//!
//! let pattern = Filter::parse("/servers$/").unwrap().unwrap();
//! assert_eq!(find_by_filter(groups, &pattern).len(), 3);
//! ```

mod error;

use std::fmt;

use regex::{Regex, RegexBuilder};
use zabbix_api_rs::models::Named;

pub use error::{FilterError, FilterResult};

/// Flags accepted after the closing slash.
const PATTERN_FLAGS: &str = "gim";

/// A parsed name filter.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Matches names equal to the string.
    Exact(String),
    /// Matches names the regex finds a match in.
    Pattern(Regex),
}

impl Filter {
    /// Parses a user-supplied filter.
    ///
    /// Returns `Ok(None)` for an empty or blank string, which means
    /// "no constraint".
    pub fn parse(input: &str) -> FilterResult<Option<Filter>> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let Some((body, flags)) = split_pattern(input) else {
            return Ok(Some(Filter::Exact(input.to_string())));
        };

        let regex = RegexBuilder::new(body)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .build()
            .map_err(|e| FilterError::invalid_pattern(input, e.to_string()))?;
        Ok(Some(Filter::Pattern(regex)))
    }

    /// Returns true if `name` satisfies the filter.
    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Filter::Exact(expected) => expected == name,
            Filter::Pattern(regex) => regex.is_match(name),
        }
    }

    /// Returns true for regex filters.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Filter::Pattern(_))
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Filter::Exact(a), Filter::Exact(b)) => a == b,
            (Filter::Pattern(a), Filter::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Exact(name) => f.write_str(name),
            Filter::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// Returns true if `input` is written as a `/regex/flags` pattern.
pub fn is_regex(input: &str) -> bool {
    split_pattern(input).is_some()
}

/// Splits `/body/flags` into body and flags.
fn split_pattern(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    flags
        .chars()
        .all(|c| PATTERN_FLAGS.contains(c))
        .then_some((body, flags))
}

/// "Find" evaluation: every match for a pattern, at most one for an exact name.
pub fn find_by_filter<T: Named>(list: Vec<T>, filter: &Filter) -> Vec<T> {
    match filter {
        Filter::Exact(name) => list
            .into_iter()
            .find(|entry| entry.name() == name)
            .into_iter()
            .collect(),
        Filter::Pattern(_) => filter_matching(list, filter),
    }
}

/// "Filter" evaluation: every match, since a name may recur across hosts.
pub fn filter_by_query<T: Named>(list: Vec<T>, filter: &Filter) -> Vec<T> {
    filter_matching(list, filter)
}

fn filter_matching<T: Named>(list: Vec<T>, filter: &Filter) -> Vec<T> {
    list.into_iter()
        .filter(|entry| filter.is_match(entry.name()))
        .collect()
}
