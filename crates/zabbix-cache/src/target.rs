//! Dashboard panel targets.

use serde::{Deserialize, Serialize};

use crate::filter::{Filter, FilterResult};

/// One filter field of a target, e.g. `"host": {"filter": "/^web-/"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    #[serde(default)]
    pub filter: String,
}

impl FilterField {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
        }
    }
}

/// A panel query target as stored in dashboard JSON.
///
/// Missing fields deserialize to empty filters (no constraint).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub group: FilterField,
    #[serde(default)]
    pub host: FilterField,
    #[serde(default)]
    pub application: FilterField,
    #[serde(default)]
    pub item: FilterField,
}

/// Parsed filters of a target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilters {
    pub group: Option<Filter>,
    pub host: Option<Filter>,
    pub app: Option<Filter>,
    pub item: Option<Filter>,
}

impl QueryFilters {
    /// Parses the four filter strings.
    pub fn parse(group: &str, host: &str, app: &str, item: &str) -> FilterResult<Self> {
        Ok(Self {
            group: Filter::parse(group)?,
            host: Filter::parse(host)?,
            app: Filter::parse(app)?,
            item: Filter::parse(item)?,
        })
    }
}

impl Target {
    /// Parses the target's filter strings.
    pub fn filters(&self) -> FilterResult<QueryFilters> {
        QueryFilters::parse(
            &self.group.filter,
            &self.host.filter,
            &self.application.filter,
            &self.item.filter,
        )
    }
}
