//! IT services, SLA reports and trends.

use serde::{Deserialize, Serialize};

/// An IT service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItService {
    pub serviceid: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub showsla: String,
    #[serde(default)]
    pub goodsla: String,
    #[serde(default)]
    pub sortorder: String,
}

/// SLA report for one service, as returned by `service.getsla`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSla {
    #[serde(default)]
    pub status: serde_json::Value,
    #[serde(default)]
    pub problems: serde_json::Value,
    #[serde(default)]
    pub sla: Vec<SlaInterval>,
}

/// SLA figures over one requested interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaInterval {
    pub from: i64,
    pub to: i64,
    pub sla: f64,
    #[serde(default)]
    pub ok_time: i64,
    #[serde(default)]
    pub problem_time: i64,
    #[serde(default)]
    pub downtime_time: i64,
}

/// Hourly trend aggregate for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub itemid: String,
    pub clock: String,
    #[serde(default)]
    pub num: String,
    #[serde(default)]
    pub value_min: String,
    #[serde(default)]
    pub value_avg: String,
    #[serde(default)]
    pub value_max: String,
}
