//! User macro substitution in item names.
//!
//! Item names may embed user macros such as `{$MOUNT_POINT}`. A token is
//! replaced by the value of the first definition with the same name that is
//! either global or defined on the item's own host. Tokens without a
//! definition, or whose definition has an empty value, are left as written.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use zabbix_api_rs::models::{Item, Macro};

/// Matches a user macro token such as `{$SNMP_COMMUNITY}`.
fn macro_token() -> &'static Regex {
    static MACRO_TOKEN: OnceLock<Regex> = OnceLock::new();
    MACRO_TOKEN.get_or_init(|| Regex::new(r"\{\$[A-Z0-9_.]+\}").expect("macro token regex is valid"))
}

/// Returns true if `name` contains at least one user macro token.
pub fn contains_macro(name: &str) -> bool {
    macro_token().is_match(name)
}

/// Distinct ids of all hosts owning any of `items`, in first-seen order.
pub fn host_ids(items: &[Item]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .flat_map(|item| item.hosts.iter())
        .filter(|host| seen.insert(host.hostid.as_str()))
        .map(|host| host.hostid.clone())
        .collect()
}

/// Returns `item.name` with every resolvable macro token substituted.
pub fn replace_macros(item: &Item, macros: &[Macro]) -> String {
    let tokens: Vec<&str> = macro_token()
        .find_iter(&item.name)
        .map(|m| m.as_str())
        .collect();

    let mut name = item.name.clone();
    for token in tokens {
        let definition = macros
            .iter()
            .filter(|m| m.hostid.as_deref().map_or(true, |id| id == item.hostid))
            .find(|m| m.macro_name == token);

        if let Some(definition) = definition.filter(|m| !m.value.is_empty()) {
            name = name.replacen(token, &definition.value, 1);
        }
    }
    name
}

/// Rewrites the names of `items` in place.
pub fn expand_item_macros(items: &mut [Item], macros: &[Macro]) {
    for item in items.iter_mut().filter(|item| contains_macro(&item.name)) {
        item.name = replace_macros(item, macros);
    }
}
