//! Triggers, events and acknowledges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::inventory::HostRef;

/// Item reference embedded in a trigger (`selectItems`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerItem {
    pub itemid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key_: String,
    #[serde(default)]
    pub lastvalue: String,
}

/// A trigger with its related hosts, groups and last event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub triggerid: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expression: String,
    /// Severity, "0" (not classified) to "5" (disaster).
    #[serde(default)]
    pub priority: String,
    /// "0" = OK, "1" = problem.
    #[serde(default)]
    pub value: String,
    /// Unix timestamp of the last state change.
    #[serde(default)]
    pub lastchange: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
    #[serde(default)]
    pub groups: Vec<TriggerGroup>,
    #[serde(default)]
    pub items: Vec<TriggerItem>,
    #[serde(
        default,
        rename = "lastEvent",
        deserialize_with = "deserialize_last_event",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_event: Option<Event>,
}

/// Group reference embedded in a trigger (`selectGroups: ["name"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groupid: Option<String>,
    pub name: String,
}

impl Trigger {
    /// Returns true while the trigger is in problem state.
    pub fn is_problem(&self) -> bool {
        self.value == "1"
    }

    /// Time of the last state change.
    pub fn last_change_time(&self) -> Option<DateTime<Utc>> {
        parse_clock(&self.lastchange)
    }
}

/// An event generated by a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub eventid: String,
    #[serde(default)]
    pub objectid: String,
    #[serde(default)]
    pub clock: String,
    /// "0" = OK, "1" = problem.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub acknowledged: String,
    #[serde(default)]
    pub acknowledges: Vec<Acknowledge>,
    #[serde(default)]
    pub hosts: Vec<HostRef>,
}

impl Event {
    /// Time the event was generated.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_clock(&self.clock)
    }
}

/// An acknowledgement attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledge {
    pub acknowledgeid: String,
    #[serde(default)]
    pub eventid: String,
    #[serde(default)]
    pub userid: String,
    #[serde(default)]
    pub clock: String,
    #[serde(default)]
    pub message: String,
    /// Login of the acknowledging user.
    #[serde(default)]
    pub alias: String,
}

fn parse_clock(clock: &str) -> Option<DateTime<Utc>> {
    clock
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Zabbix returns `"lastEvent": []` when a trigger never fired.
fn deserialize_last_event<'de, D>(deserializer: D) -> Result<Option<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
