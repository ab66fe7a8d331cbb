//! Request parameter types shared by the API methods.

use serde::{Deserialize, Serialize};

/// Restricts `item.get` to a family of value types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Every value type.
    #[default]
    All,
    /// Numeric float (0) and numeric unsigned (3).
    #[serde(rename = "num")]
    Numeric,
    /// Character (1), log (2) and text (4).
    Text,
}

impl ItemType {
    /// Zabbix `value_type` codes for this family, `None` for no restriction.
    pub fn value_types(self) -> Option<&'static [u8]> {
        match self {
            ItemType::All => None,
            ItemType::Numeric => Some(&[0, 3]),
            ItemType::Text => Some(&[1, 2, 4]),
        }
    }
}

/// Which triggers `trigger.get` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowTriggers {
    /// Triggers in any state.
    #[default]
    All,
    /// Only triggers currently in problem state.
    Problems,
}

/// Which events `event.get` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowEvents {
    /// OK and problem events.
    #[default]
    All,
    /// Only problem events.
    Problems,
}

impl ShowEvents {
    /// Event `value` codes to request.
    pub fn values(self) -> &'static [u8] {
        match self {
            ShowEvents::All => &[0, 1],
            ShowEvents::Problems => &[1],
        }
    }
}

/// A closed time interval in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: i64,
    pub till: i64,
}

impl TimeRange {
    pub fn new(from: i64, till: i64) -> Self {
        Self { from, till }
    }
}

/// Id constraints for a trigger lookup.
///
/// A `None` field means "do not constrain by this dimension"; `Some(vec![])`
/// constrains to nothing and yields no triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groupids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicationids: Option<Vec<String>>,
}

impl TriggerQuery {
    /// Returns true if any present dimension is an empty id set.
    pub fn matches_nothing(&self) -> bool {
        [&self.groupids, &self.hostids, &self.applicationids]
            .into_iter()
            .any(|ids| ids.as_ref().is_some_and(Vec::is_empty))
    }
}
