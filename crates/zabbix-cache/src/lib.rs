//! Filter resolution over a cached view of the Zabbix inventory.
//!
//! This crate turns dashboard-style queries (group / host / application /
//! item filters, each an exact name or a `/regex/`) into concrete Zabbix
//! records:
//!
//! - [`filter`] parses and evaluates name filters.
//! - [`proxy`] caches inventory lookups in front of the API client.
//! - [`macros`] expands user macros in item names.
//! - [`resolver`] chains the lookups groups → hosts → applications → items,
//!   and builds trigger queries from them.
//!
//! # Example
//!
//! ```no_run
//! use zabbix_api_rs::config::{AuthMode, ConnectionConfig};
//! use zabbix_cache_rs::filter::Filter;
//! use zabbix_cache_rs::{FilterResolver, ItemOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::new(
//!         "https://zabbix.example.com/api_jsonrpc.php",
//!         AuthMode::Password { user: "Admin".into(), password: "zabbix".into() },
//!     );
//!     let resolver = FilterResolver::connect(&config)?;
//!
//!     let hosts = Filter::parse("/^web-/")?;
//!     let items = resolver
//!         .get_items(None, hosts.as_ref(), None, None, &ItemOptions::default())
//!         .await?;
//!     println!("{} items", items.len());
//!     Ok(())
//! }
//! ```

pub mod filter;
pub mod macros;
pub mod proxy;
pub mod resolver;
pub mod target;
mod ttl;

pub use proxy::{CachingProxy, InventorySource};
pub use resolver::{AppsResolution, FilterResolver, ItemOptions};
pub use target::{QueryFilters, Target};

/// Errors returned by the resolver.
///
/// API failures are passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure reported by the API client or the caching proxy.
    #[error(transparent)]
    Api(#[from] zabbix_api_rs::error::Error),

    /// A filter string could not be parsed.
    #[error("filter error: {0}")]
    Filter(#[from] filter::FilterError),
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;
