//! Prelude module for convenient imports.
//!
//! ```
//! use zabbix_api_rs::prelude::*;
//!
//! let config = ConnectionConfig::new(
//!     "https://zabbix.example.com/api_jsonrpc.php",
//!     AuthMode::Token("api-token".to_string()),
//! );
//! let client = ZabbixClient::new(&config).unwrap();
//! assert_eq!(client.url(), "https://zabbix.example.com/api_jsonrpc.php");
//! ```

// Client types
pub use crate::api::ZabbixApi;
pub use crate::client::ZabbixClient;
pub use crate::config::{AuthMode, ConnectionConfig};

// Error types
pub use crate::error::{ApiError, Error, Result};

// Request parameters
pub use crate::query::{ItemType, ShowEvents, ShowTriggers, TimeRange, TriggerQuery};

// Data models
pub use crate::models::{
    Acknowledge, Application, Event, Group, Host, HostRef, ItService, Item, Macro, Named,
    ServiceSla, SlaInterval, Trend, Trigger,
};
