//! Host group, host, application and item output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use zabbix_api_rs::models::{Application, Group, Host, Item};

use super::helpers::{format_header, truncate_str, value_type_name};

/// JSON output structure for the groups command.
#[derive(Serialize)]
pub struct GroupsListOutput<'a> {
    pub groups: &'a [Group],
}

/// Formats host groups as JSON.
pub fn format_groups_json(groups: &[Group]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&GroupsListOutput { groups })
}

/// Formats host groups as a table.
pub fn format_groups_table(groups: &[Group], use_colors: bool) -> String {
    if groups.is_empty() {
        return "No host groups found.\n".to_string();
    }

    let mut output = format_header(&format!("{:<8} {}", "ID", "Name"), use_colors);
    for group in groups {
        output.push_str(&format!("{:<8} {}\n", group.groupid, group.name));
    }
    output
}

/// JSON output structure for the hosts command.
#[derive(Serialize)]
pub struct HostsListOutput<'a> {
    pub hosts: &'a [Host],
}

/// Formats hosts as JSON.
pub fn format_hosts_json(hosts: &[Host]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&HostsListOutput { hosts })
}

/// Formats hosts as a table.
pub fn format_hosts_table(hosts: &[Host], use_colors: bool) -> String {
    if hosts.is_empty() {
        return "No hosts found.\n".to_string();
    }

    let mut output = format_header(
        &format!("{:<8} {:<30} {}", "ID", "Name", "Host"),
        use_colors,
    );
    for host in hosts {
        let in_maintenance = host.maintenance_status.as_deref() == Some("1");
        let marker = match (in_maintenance, use_colors) {
            (true, true) => format!(" {}", "[maintenance]".yellow()),
            (true, false) => " [maintenance]".to_string(),
            (false, _) => String::new(),
        };
        output.push_str(&format!(
            "{:<8} {:<30} {}{}\n",
            host.hostid,
            truncate_str(&host.name, 30),
            host.host,
            marker
        ));
    }
    output
}

/// JSON output structure for the apps command.
#[derive(Serialize)]
pub struct AppsListOutput<'a> {
    pub applications: &'a [Application],
}

/// Formats applications as JSON.
pub fn format_apps_json(apps: &[Application]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&AppsListOutput { applications: apps })
}

/// Formats applications as a table.
pub fn format_apps_table(apps: &[Application], use_colors: bool) -> String {
    if apps.is_empty() {
        return "No applications found.\n".to_string();
    }

    let mut output = format_header(
        &format!("{:<8} {:<8} {}", "ID", "Host ID", "Name"),
        use_colors,
    );
    for app in apps {
        output.push_str(&format!(
            "{:<8} {:<8} {}\n",
            app.applicationid,
            app.hostid.as_deref().unwrap_or(""),
            app.name
        ));
    }
    output
}

/// JSON output structure for the items command.
#[derive(Serialize)]
pub struct ItemsListOutput<'a> {
    pub items: Vec<ItemOutput<'a>>,
}

/// JSON output structure for a single item.
#[derive(Serialize)]
pub struct ItemOutput<'a> {
    pub itemid: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_name: Option<&'a str>,
    pub key: &'a str,
    pub value_type: &'static str,
    pub hostid: &'a str,
    pub hosts: Vec<&'a str>,
    pub enabled: bool,
}

/// Formats items as JSON.
pub fn format_items_json(items: &[Item]) -> Result<String, serde_json::Error> {
    let items = items
        .iter()
        .map(|item| ItemOutput {
            itemid: &item.itemid,
            name: &item.name,
            raw_name: item.raw_name.as_deref(),
            key: &item.key_,
            value_type: value_type_name(&item.value_type),
            hostid: &item.hostid,
            hosts: item.hosts.iter().map(|h| h.name.as_str()).collect(),
            enabled: item.is_enabled(),
        })
        .collect();

    serde_json::to_string_pretty(&ItemsListOutput { items })
}

/// Formats items as a table.
pub fn format_items_table(items: &[Item], use_colors: bool) -> String {
    if items.is_empty() {
        return "No items found.\n".to_string();
    }

    let mut output = format_header(
        &format!(
            "{:<8} {:<20} {:<40} {:<9} {}",
            "ID", "Host", "Name", "Type", "Key"
        ),
        use_colors,
    );
    for item in items {
        let host = item
            .hosts
            .first()
            .map(|h| h.name.as_str())
            .unwrap_or(item.hostid.as_str());
        let name = truncate_str(&item.name, 40);
        let name = if use_colors && !item.is_enabled() {
            format!("{:<40}", name).dimmed().to_string()
        } else {
            format!("{:<40}", name)
        };
        output.push_str(&format!(
            "{:<8} {:<20} {} {:<9} {}\n",
            item.itemid,
            truncate_str(host, 20),
            name,
            value_type_name(&item.value_type),
            item.key_
        ));
    }
    output
}
