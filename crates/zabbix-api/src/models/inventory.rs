//! Host groups, hosts, applications and user macros.

use serde::{Deserialize, Serialize};

/// A record that can be selected by name.
pub trait Named {
    /// Display name used for filter matching.
    fn name(&self) -> &str;
}

/// A host group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub groupid: String,
    pub name: String,
}

/// A monitored host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub hostid: String,
    pub name: String,
    /// Technical host name.
    #[serde(default)]
    pub host: String,
    /// "1" when the host is in maintenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_status: Option<String>,
}

/// Reference to a host embedded in another record (`selectHosts`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRef {
    pub hostid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// An application grouping items on a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub applicationid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostid: Option<String>,
}

/// A user macro definition.
///
/// Host macros carry the owning `hostid`; global macros have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macro {
    /// Macro token, e.g. `{$SNMP_COMMUNITY}`.
    #[serde(rename = "macro")]
    pub macro_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostid: Option<String>,
    #[serde(default)]
    pub value: String,
}

impl Macro {
    /// Returns true for macros defined at global scope.
    pub fn is_global(&self) -> bool {
        self.hostid.is_none()
    }
}

impl Named for Group {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Host {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Application {
    fn name(&self) -> &str {
        &self.name
    }
}
