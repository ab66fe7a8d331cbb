//! Items and item name expansion from key parameters.

use serde::{Deserialize, Serialize};

use super::inventory::{HostRef, Named};

/// A monitored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub itemid: String,
    pub name: String,
    #[serde(default)]
    pub key_: String,
    #[serde(default)]
    pub value_type: String,
    /// Host the item is defined on.
    #[serde(default)]
    pub hostid: String,
    /// "0" = enabled, "1" = disabled.
    #[serde(default)]
    pub status: String,
    /// "0" = normal, "1" = not supported.
    #[serde(default)]
    pub state: String,
    /// Owning hosts (`selectHosts`).
    #[serde(default)]
    pub hosts: Vec<HostRef>,
    /// Name as stored on the server, before `$N` key-parameter expansion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_name: Option<String>,
}

impl Item {
    /// Returns true if the item is enabled.
    pub fn is_enabled(&self) -> bool {
        self.status == "0"
    }

    /// Replaces `$1`..`$N` in the name with the parameters of the item key.
    ///
    /// The original name is kept in `raw_name` when it changes.
    pub fn expand_key_params(&mut self) {
        let expanded = expand_item_name(&self.name, &self.key_);
        if expanded != self.name {
            self.raw_name = Some(std::mem::replace(&mut self.name, expanded));
        }
    }
}

impl Named for Item {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Expands positional references in an item name using its key parameters.
///
/// `("CPU $2 time", "system.cpu.util[,system,avg1]")` → `"CPU system time"`.
/// Each reference is substituted once, highest index first so that `$1`
/// never clobbers the prefix of `$10`.
pub fn expand_item_name(name: &str, key: &str) -> String {
    let (Some(open), Some(close)) = (key.find('['), key.rfind(']')) else {
        return name.to_string();
    };
    if close <= open {
        return name.to_string();
    }

    let params = split_key_params(&key[open + 1..close]);
    let mut expanded = name.to_string();
    for (index, param) in params.iter().enumerate().rev() {
        let reference = format!("${}", index + 1);
        expanded = expanded.replacen(&reference, param, 1);
    }
    expanded
}

/// Splits a key parameter list on top-level commas.
///
/// Double quotes group a parameter and are stripped; commas inside a nested
/// `[...]` array do not split, and quotes inside an array are kept.
pub fn split_key_params(params: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_array = false;

    for symbol in params.chars() {
        match symbol {
            '"' if in_array => current.push(symbol),
            '"' => quoted = !quoted,
            '[' if !quoted => in_array = true,
            ']' if !quoted => in_array = false,
            ',' if !quoted && !in_array => result.push(std::mem::take(&mut current)),
            _ => current.push(symbol),
        }
    }
    result.push(current);
    result
}
