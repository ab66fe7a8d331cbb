//! Trigger output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use zabbix_api_rs::models::Trigger;

use super::helpers::{format_header, format_severity, format_time, pad, severity_name, truncate_str};

/// JSON output structure for the triggers command.
#[derive(Serialize)]
pub struct TriggersListOutput<'a> {
    pub triggers: Vec<TriggerOutput<'a>>,
}

/// JSON output structure for a single trigger.
#[derive(Serialize)]
pub struct TriggerOutput<'a> {
    pub triggerid: &'a str,
    pub description: &'a str,
    pub severity: &'static str,
    pub priority: &'a str,
    pub problem: bool,
    pub hosts: Vec<&'a str>,
    pub groups: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_eventid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<bool>,
}

/// Formats triggers as JSON.
pub fn format_triggers_json(triggers: &[Trigger]) -> Result<String, serde_json::Error> {
    let triggers = triggers
        .iter()
        .map(|t| TriggerOutput {
            triggerid: &t.triggerid,
            description: &t.description,
            severity: severity_name(&t.priority),
            priority: &t.priority,
            problem: t.is_problem(),
            hosts: t.hosts.iter().map(|h| h.name.as_str()).collect(),
            groups: t.groups.iter().map(|g| g.name.as_str()).collect(),
            lastchange: t.last_change_time().map(|time| time.to_rfc3339()),
            last_eventid: t.last_event.as_ref().map(|e| e.eventid.as_str()),
            acknowledged: t.last_event.as_ref().map(|e| e.acknowledged == "1"),
        })
        .collect();

    serde_json::to_string_pretty(&TriggersListOutput { triggers })
}

/// Formats triggers as a table.
pub fn format_triggers_table(triggers: &[Trigger], use_colors: bool) -> String {
    if triggers.is_empty() {
        return "No triggers found.\n".to_string();
    }

    let mut output = format_header(
        &format!(
            "{:<14} {:<7} {:<16} {:<20} {}",
            "Severity", "Status", "Last change", "Host", "Description"
        ),
        use_colors,
    );

    for trigger in triggers {
        let severity = pad(
            &format_severity(&trigger.priority, use_colors),
            severity_name(&trigger.priority),
            14,
        );
        let status_text = if trigger.is_problem() { "PROBLEM" } else { "OK" };
        let status = match (trigger.is_problem(), use_colors) {
            (true, true) => status_text.red().to_string(),
            (false, true) => status_text.green().to_string(),
            (_, false) => status_text.to_string(),
        };
        let status = pad(&status, status_text, 7);
        let hosts: Vec<&str> = trigger.hosts.iter().map(|h| h.name.as_str()).collect();

        output.push_str(&format!(
            "{} {} {:<16} {:<20} {}\n",
            severity,
            status,
            format_time(trigger.last_change_time()),
            truncate_str(&hosts.join(", "), 20),
            trigger.description
        ));
    }
    output
}
