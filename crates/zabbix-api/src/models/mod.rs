//! Data models for records returned by the Zabbix API.
//!
//! Zabbix serializes ids, flags and most numbers as JSON strings; the models
//! keep them as strings so that records pass through unchanged.

mod inventory;
mod item;
mod problems;
mod service;

pub use inventory::{Application, Group, Host, HostRef, Macro, Named};
pub use item::{expand_item_name, split_key_params, Item};
pub use problems::{Acknowledge, Event, Trigger, TriggerGroup, TriggerItem};
pub use service::{ItService, ServiceSla, SlaInterval, Trend};
