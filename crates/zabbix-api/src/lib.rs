//! Zabbix API client library
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use zabbix_api_rs::prelude::*;
//! ```
//!
//! This re-exports the most commonly used types including [`ZabbixClient`](client::ZabbixClient),
//! the [`ZabbixApi`](api::ZabbixApi) trait, error types, request parameters and data models.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod query;
