//! Resolution of dashboard filters into Zabbix records.
//!
//! Every lookup narrows the output of the previous one:
//!
//! ```text
//! groups ──▶ hosts ──▶ applications ──▶ items
//!    │         │            │
//!    └─────────┴────────────┴──▶ trigger query
//! ```
//!
//! A stage only ever sees the ids produced by the stage before it, so an
//! empty stage empties everything downstream without raising an error.
//!
//! The resolver holds no state of its own beyond the API client and the
//! inventory source it was built with.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use zabbix_api_rs::api::ZabbixApi;
use zabbix_api_rs::client::ZabbixClient;
use zabbix_api_rs::config::ConnectionConfig;
use zabbix_api_rs::models::{
    Application, Event, Group, Host, ItService, Item, Named, ServiceSla, Trend, Trigger,
};
use zabbix_api_rs::query::{ItemType, ShowEvents, ShowTriggers, TimeRange, TriggerQuery};

use crate::filter::{filter_by_query, find_by_filter, Filter};
use crate::macros::{contains_macro, expand_item_macros, host_ids};
use crate::proxy::{CachingProxy, InventorySource};
use crate::target::Target;
use crate::Result;

/// Options for item lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemOptions {
    /// Restricts items to a value-type family.
    pub itemtype: ItemType,
    /// Keeps items whose status is not "0" (enabled).
    pub show_disabled_items: bool,
}

/// Outcome of the application stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppsResolution {
    /// An application filter was applied.
    Resolved(Vec<Application>),
    /// No application filter was given; downstream lookups should be
    /// scoped by these hosts instead.
    Unfiltered { hostids: Vec<String> },
}

impl AppsResolution {
    /// Application ids, or `None` when applications were not filtered.
    pub fn application_ids(&self) -> Option<Vec<String>> {
        match self {
            AppsResolution::Resolved(apps) => {
                Some(apps.iter().map(|a| a.applicationid.clone()).collect())
            }
            AppsResolution::Unfiltered { .. } => None,
        }
    }
}

/// Resolves group/host/application/item filters against an inventory source.
pub struct FilterResolver<A, C> {
    api: Arc<A>,
    proxy: C,
}

impl FilterResolver<ZabbixClient, CachingProxy<ZabbixClient>> {
    /// Builds a client and a caching proxy bound to it.
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let api = Arc::new(ZabbixClient::new(config)?);
        let proxy = CachingProxy::new(Arc::clone(&api), config.cache_ttl);
        Ok(Self::new(api, proxy))
    }
}

impl<A: ZabbixApi, C: InventorySource> FilterResolver<A, C> {
    /// Creates a resolver over injected collaborators.
    pub fn new(api: Arc<A>, proxy: C) -> Self {
        Self { api, proxy }
    }

    /// Returns the API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Returns the inventory source.
    pub fn proxy(&self) -> &C {
        &self.proxy
    }

    // ==================== Pass-through API calls ====================

    pub async fn login(&self) -> Result<String> {
        Ok(self.api.login().await?)
    }

    pub async fn get_version(&self) -> Result<String> {
        Ok(self.api.get_version().await?)
    }

    pub async fn get_trend(&self, itemids: &[String], range: TimeRange) -> Result<Vec<Trend>> {
        Ok(self.api.get_trend(itemids, range).await?)
    }

    pub async fn get_events(
        &self,
        objectids: &[String],
        range: TimeRange,
        show_events: ShowEvents,
    ) -> Result<Vec<Event>> {
        Ok(self.api.get_events(objectids, range, show_events).await?)
    }

    pub async fn get_alerts(
        &self,
        itemids: &[String],
        range: Option<TimeRange>,
    ) -> Result<Vec<Trigger>> {
        Ok(self.api.get_alerts(itemids, range).await?)
    }

    pub async fn get_acknowledges(&self, eventids: &[String]) -> Result<Vec<Event>> {
        Ok(self.api.get_acknowledges(eventids).await?)
    }

    pub async fn get_it_service(&self, serviceids: Option<&[String]>) -> Result<Vec<ItService>> {
        Ok(self.api.get_it_service(serviceids).await?)
    }

    pub async fn get_sla(
        &self,
        serviceids: &[String],
        range: TimeRange,
    ) -> Result<HashMap<String, ServiceSla>> {
        Ok(self.api.get_sla(serviceids, range).await?)
    }

    // ==================== Filter resolution ====================

    /// Host groups matching `group_filter` (all groups when `None`).
    pub async fn get_groups(&self, group_filter: Option<&Filter>) -> Result<Vec<Group>> {
        let groups = self.proxy.get_groups().await?;
        let groups = narrow(groups, group_filter, find_by_filter);
        debug!(count = groups.len(), "resolved groups");
        Ok(groups)
    }

    /// Hosts of the matching groups, narrowed by `host_filter`.
    pub async fn get_hosts(
        &self,
        group_filter: Option<&Filter>,
        host_filter: Option<&Filter>,
    ) -> Result<Vec<Host>> {
        let groups = self.get_groups(group_filter).await?;
        let groupids: Vec<String> = groups.into_iter().map(|g| g.groupid).collect();

        let hosts = self.proxy.get_hosts(&groupids).await?;
        let hosts = narrow(hosts, host_filter, find_by_filter);
        debug!(count = hosts.len(), "resolved hosts");
        Ok(hosts)
    }

    /// Applications of the matching hosts.
    ///
    /// Without an application filter no applications are fetched and the
    /// host ids are returned instead.
    pub async fn get_apps(
        &self,
        group_filter: Option<&Filter>,
        host_filter: Option<&Filter>,
        app_filter: Option<&Filter>,
    ) -> Result<AppsResolution> {
        let hosts = self.get_hosts(group_filter, host_filter).await?;
        let hostids: Vec<String> = hosts.into_iter().map(|h| h.hostid).collect();

        let Some(app_filter) = app_filter else {
            return Ok(AppsResolution::Unfiltered { hostids });
        };

        let apps = self.proxy.get_apps(&hostids).await?;
        let apps = filter_by_query(apps, app_filter);
        debug!(count = apps.len(), "resolved applications");
        Ok(AppsResolution::Resolved(apps))
    }

    /// All items below the matching applications (or hosts, without an
    /// application filter), with disabled items dropped unless requested
    /// and user macros expanded.
    pub async fn get_all_items(
        &self,
        group_filter: Option<&Filter>,
        host_filter: Option<&Filter>,
        app_filter: Option<&Filter>,
        options: &ItemOptions,
    ) -> Result<Vec<Item>> {
        let apps = self.get_apps(group_filter, host_filter, app_filter).await?;

        let mut items = match &apps {
            AppsResolution::Unfiltered { hostids } => {
                self.proxy
                    .get_items(Some(hostids), None, options.itemtype)
                    .await?
            }
            AppsResolution::Resolved(apps) => {
                let appids: Vec<String> = apps.iter().map(|a| a.applicationid.clone()).collect();
                self.proxy
                    .get_items(None, Some(&appids), options.itemtype)
                    .await?
            }
        };

        if !options.show_disabled_items {
            items.retain(Item::is_enabled);
        }

        self.expand_user_macro(items).await
    }

    /// Items matching `item_filter` among [`get_all_items`](Self::get_all_items).
    pub async fn get_items(
        &self,
        group_filter: Option<&Filter>,
        host_filter: Option<&Filter>,
        app_filter: Option<&Filter>,
        item_filter: Option<&Filter>,
        options: &ItemOptions,
    ) -> Result<Vec<Item>> {
        let items = self
            .get_all_items(group_filter, host_filter, app_filter, options)
            .await?;
        let items = narrow(items, item_filter, filter_by_query);
        debug!(count = items.len(), "resolved items");
        Ok(items)
    }

    /// Resolves the items selected by a panel target.
    pub async fn get_items_from_target(
        &self,
        target: &Target,
        options: &ItemOptions,
    ) -> Result<Vec<Item>> {
        let filters = target.filters()?;
        self.get_items(
            filters.group.as_ref(),
            filters.host.as_ref(),
            filters.app.as_ref(),
            filters.item.as_ref(),
            options,
        )
        .await
    }

    /// Substitutes user macros in item names using the macros of the items'
    /// hosts plus global macros.
    pub async fn expand_user_macro(&self, mut items: Vec<Item>) -> Result<Vec<Item>> {
        if !items.iter().any(|item| contains_macro(&item.name)) {
            return Ok(items);
        }

        let hostids = host_ids(&items);
        let macros = self.proxy.get_macros(&hostids).await?;
        expand_item_macros(&mut items, &macros);
        Ok(items)
    }

    /// Triggers scoped by whichever of the group, host and application
    /// filters are given.
    ///
    /// The three lookups run concurrently; any failure fails the call.
    pub async fn get_triggers(
        &self,
        group_filter: Option<&Filter>,
        host_filter: Option<&Filter>,
        app_filter: Option<&Filter>,
        show_triggers: ShowTriggers,
        hide_hosts_in_maintenance: bool,
    ) -> Result<Vec<Trigger>> {
        let (groups, hosts, apps) = tokio::try_join!(
            self.get_groups(group_filter),
            self.get_hosts(group_filter, host_filter),
            self.get_apps(group_filter, host_filter, app_filter),
        )?;

        let query = TriggerQuery {
            groupids: group_filter.map(|_| groups.into_iter().map(|g| g.groupid).collect()),
            hostids: host_filter.map(|_| hosts.into_iter().map(|h| h.hostid).collect()),
            applicationids: app_filter.and(apps.application_ids()),
        };
        debug!(?query, "trigger query");

        Ok(self
            .api
            .get_triggers(&query, show_triggers, hide_hosts_in_maintenance)
            .await?)
    }
}

/// Applies `eval` when a filter is present.
fn narrow<T: Named>(
    list: Vec<T>,
    filter: Option<&Filter>,
    eval: fn(Vec<T>, &Filter) -> Vec<T>,
) -> Vec<T> {
    match filter {
        Some(filter) => eval(list, filter),
        None => list,
    }
}

#[cfg(test)]
mod tests;
