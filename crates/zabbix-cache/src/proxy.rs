//! Caching layer in front of the inventory part of the Zabbix API.
//!
//! [`InventorySource`] is what the filter resolver consumes for groups,
//! hosts, applications, items and macros. [`CachingProxy`] implements it by
//! memoizing each [`ZabbixApi`] call per argument set for a fixed TTL.
//!
//! # Consistency
//!
//! - Results may be up to one TTL old; [`CachingProxy::invalidate`] forces
//!   fresh lookups.
//! - At most one request per distinct argument set is in flight; concurrent
//!   callers share its result.
//! - Failures are not cached. A caller that was waiting on a failed request
//!   issues its own, still one at a time per argument set.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use zabbix_api_rs::api::ZabbixApi;
use zabbix_api_rs::error::Result as ApiResult;
use zabbix_api_rs::models::{Application, Group, Host, Item, Macro};
use zabbix_api_rs::query::ItemType;

use crate::ttl::TtlCache;

/// Inventory lookups consumed by the filter resolver.
///
/// Results are scoped by the given id sets. `None` for an optional id set
/// means "do not constrain by this dimension".
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn get_groups(&self) -> ApiResult<Vec<Group>>;

    async fn get_hosts(&self, groupids: &[String]) -> ApiResult<Vec<Host>>;

    async fn get_apps(&self, hostids: &[String]) -> ApiResult<Vec<Application>>;

    async fn get_items(
        &self,
        hostids: Option<&[String]>,
        appids: Option<&[String]>,
        itemtype: ItemType,
    ) -> ApiResult<Vec<Item>>;

    async fn get_macros(&self, hostids: &[String]) -> ApiResult<Vec<Macro>>;
}

type ItemsKey = (Option<Vec<String>>, Option<Vec<String>>, ItemType);

/// TTL cache over a [`ZabbixApi`] implementation.
pub struct CachingProxy<A> {
    api: Arc<A>,
    ttl: Duration,
    groups: TtlCache<(), Vec<Group>>,
    hosts: TtlCache<Vec<String>, Vec<Host>>,
    apps: TtlCache<Vec<String>, Vec<Application>>,
    items: TtlCache<ItemsKey, Vec<Item>>,
    macros: TtlCache<Vec<String>, Vec<Macro>>,
}

impl<A: ZabbixApi> CachingProxy<A> {
    /// Creates a proxy bound to `api` whose entries live for `ttl`.
    pub fn new(api: Arc<A>, ttl: Duration) -> Self {
        Self {
            api,
            ttl,
            groups: TtlCache::new("hostgroup.get", ttl),
            hosts: TtlCache::new("host.get", ttl),
            apps: TtlCache::new("application.get", ttl),
            items: TtlCache::new("item.get", ttl),
            macros: TtlCache::new("usermacro.get", ttl),
        }
    }

    /// Returns the wrapped API client.
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Returns the entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of unexpired cached lookups across all methods.
    pub fn cached_entries(&self) -> usize {
        self.groups.len() + self.hosts.len() + self.apps.len() + self.items.len() + self.macros.len()
    }

    /// Drops every cached result.
    pub fn invalidate(&self) {
        self.groups.clear();
        self.hosts.clear();
        self.apps.clear();
        self.items.clear();
        self.macros.clear();
    }
}

#[async_trait]
impl<A: ZabbixApi> InventorySource for CachingProxy<A> {
    async fn get_groups(&self) -> ApiResult<Vec<Group>> {
        self.groups
            .get_or_fetch((), || self.api.get_groups())
            .await
    }

    async fn get_hosts(&self, groupids: &[String]) -> ApiResult<Vec<Host>> {
        self.hosts
            .get_or_fetch(groupids.to_vec(), || self.api.get_hosts(Some(groupids)))
            .await
    }

    async fn get_apps(&self, hostids: &[String]) -> ApiResult<Vec<Application>> {
        self.apps
            .get_or_fetch(hostids.to_vec(), || self.api.get_apps(Some(hostids)))
            .await
    }

    async fn get_items(
        &self,
        hostids: Option<&[String]>,
        appids: Option<&[String]>,
        itemtype: ItemType,
    ) -> ApiResult<Vec<Item>> {
        let key = (hostids.map(<[String]>::to_vec), appids.map(<[String]>::to_vec), itemtype);
        self.items
            .get_or_fetch(key, || self.api.get_items(hostids, appids, itemtype))
            .await
    }

    async fn get_macros(&self, hostids: &[String]) -> ApiResult<Vec<Macro>> {
        self.macros
            .get_or_fetch(hostids.to_vec(), || self.api.get_macros(hostids))
            .await
    }
}
