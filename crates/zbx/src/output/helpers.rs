//! Common helper functions for output formatting.

use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Pads `s` to `width` characters, counting the visible text only.
///
/// Colored strings carry escape codes, so `{:<width}` would under-pad them.
pub fn pad(s: &str, visible: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible.chars().count());
    format!("{s}{}", " ".repeat(fill))
}

/// Returns the display name of a trigger severity ("0".."5").
pub fn severity_name(priority: &str) -> &'static str {
    match priority {
        "1" => "Information",
        "2" => "Warning",
        "3" => "Average",
        "4" => "High",
        "5" => "Disaster",
        _ => "Not classified",
    }
}

/// Formats a trigger severity for display.
pub fn format_severity(priority: &str, use_colors: bool) -> String {
    let label = severity_name(priority);
    if !use_colors {
        return label.to_string();
    }
    match priority {
        "5" => label.red().bold().to_string(),
        "4" => label.red().to_string(),
        "3" => label.yellow().to_string(),
        "2" => label.bright_yellow().to_string(),
        "1" => label.blue().to_string(),
        _ => label.dimmed().to_string(),
    }
}

/// Returns the display name of an item value type.
pub fn value_type_name(value_type: &str) -> &'static str {
    match value_type {
        "0" => "float",
        "1" => "char",
        "2" => "log",
        "3" => "unsigned",
        "4" => "text",
        _ => "unknown",
    }
}

/// Formats a UTC timestamp in local time.
pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

/// Formats a table header line.
pub fn format_header(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}
