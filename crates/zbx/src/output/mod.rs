//! Output formatting utilities for the zbx CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by entity type:
//!
//! - [`inventory`] - Host groups, hosts, applications and items
//! - [`triggers`] - Triggers with severity and state
//! - [`helpers`] - Common formatting utilities (truncation, padding, severities)

pub mod helpers;
mod inventory;
mod triggers;

// Inventory
pub use inventory::{
    format_apps_json, format_apps_table, format_groups_json, format_groups_table,
    format_hosts_json, format_hosts_table, format_items_json, format_items_table,
};

// Triggers
pub use triggers::{format_triggers_json, format_triggers_table};
