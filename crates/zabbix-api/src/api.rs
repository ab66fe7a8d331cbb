//! Typed Zabbix API methods.
//!
//! [`ZabbixApi`] is the seam the caching layer and the filter resolver
//! consume; [`ZabbixClient`] implements it over JSON-RPC.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::ZabbixClient;
use crate::error::Result;
use crate::models::{Application, Event, Group, Host, ItService, Item, Macro, ServiceSla, Trend, Trigger};
use crate::query::{ItemType, ShowEvents, ShowTriggers, TimeRange, TriggerQuery};

/// Output fields requested for items.
const ITEM_OUTPUT: [&str; 6] = ["name", "key_", "value_type", "hostid", "status", "state"];

/// Operations of the remote monitoring API.
///
/// Id-set parameters typed `Option<&[String]>` accept `None` for "do not
/// constrain by this dimension". An empty slice constrains to nothing and
/// returns an empty result.
#[async_trait]
pub trait ZabbixApi: Send + Sync {
    /// Authenticates and returns the session (or API) token.
    async fn login(&self) -> Result<String>;

    /// Returns the API version string, e.g. `"6.0.21"`.
    async fn get_version(&self) -> Result<String>;

    async fn get_groups(&self) -> Result<Vec<Group>>;

    async fn get_hosts(&self, groupids: Option<&[String]>) -> Result<Vec<Host>>;

    async fn get_apps(&self, hostids: Option<&[String]>) -> Result<Vec<Application>>;

    /// Items scoped by hosts and/or applications; names are returned with
    /// `$N` key parameters expanded.
    async fn get_items(
        &self,
        hostids: Option<&[String]>,
        appids: Option<&[String]>,
        itemtype: ItemType,
    ) -> Result<Vec<Item>>;

    /// Host macros of `hostids` followed by all global macros.
    async fn get_macros(&self, hostids: &[String]) -> Result<Vec<Macro>>;

    async fn get_trend(&self, itemids: &[String], range: TimeRange) -> Result<Vec<Trend>>;

    async fn get_events(
        &self,
        objectids: &[String],
        range: TimeRange,
        show_events: ShowEvents,
    ) -> Result<Vec<Event>>;

    /// Triggers depending on the given items, optionally limited to those
    /// that changed state within `range`.
    async fn get_alerts(&self, itemids: &[String], range: Option<TimeRange>) -> Result<Vec<Trigger>>;

    async fn get_acknowledges(&self, eventids: &[String]) -> Result<Vec<Event>>;

    async fn get_it_service(&self, serviceids: Option<&[String]>) -> Result<Vec<ItService>>;

    async fn get_sla(
        &self,
        serviceids: &[String],
        range: TimeRange,
    ) -> Result<HashMap<String, ServiceSla>>;

    async fn get_triggers(
        &self,
        query: &TriggerQuery,
        show_triggers: ShowTriggers,
        hide_hosts_in_maintenance: bool,
    ) -> Result<Vec<Trigger>>;
}

fn is_empty_set(ids: Option<&[String]>) -> bool {
    ids.is_some_and(<[String]>::is_empty)
}

#[async_trait]
impl ZabbixApi for ZabbixClient {
    async fn login(&self) -> Result<String> {
        ZabbixClient::login(self).await
    }

    async fn get_version(&self) -> Result<String> {
        self.request_anonymous("apiinfo.version", &json!([])).await
    }

    async fn get_groups(&self) -> Result<Vec<Group>> {
        let params = json!({
            "output": ["name"],
            "sortfield": "name",
            "real_hosts": true
        });
        self.request("hostgroup.get", &params).await
    }

    async fn get_hosts(&self, groupids: Option<&[String]>) -> Result<Vec<Host>> {
        if is_empty_set(groupids) {
            return Ok(Vec::new());
        }
        let mut params = json!({
            "output": ["name", "host", "maintenance_status"],
            "sortfield": "name"
        });
        if let Some(ids) = groupids {
            params["groupids"] = json!(ids);
        }
        self.request("host.get", &params).await
    }

    async fn get_apps(&self, hostids: Option<&[String]>) -> Result<Vec<Application>> {
        if is_empty_set(hostids) {
            return Ok(Vec::new());
        }
        let mut params = json!({ "output": "extend" });
        if let Some(ids) = hostids {
            params["hostids"] = json!(ids);
        }
        self.request("application.get", &params).await
    }

    async fn get_items(
        &self,
        hostids: Option<&[String]>,
        appids: Option<&[String]>,
        itemtype: ItemType,
    ) -> Result<Vec<Item>> {
        if is_empty_set(hostids) || is_empty_set(appids) {
            return Ok(Vec::new());
        }
        let mut params = json!({
            "output": ITEM_OUTPUT,
            "sortfield": "name",
            "webitems": true,
            "filter": {},
            "selectHosts": ["hostid", "name"]
        });
        if let Some(ids) = hostids {
            params["hostids"] = json!(ids);
        }
        if let Some(ids) = appids {
            params["applicationids"] = json!(ids);
        }
        if let Some(value_types) = itemtype.value_types() {
            params["filter"]["value_type"] = json!(value_types);
        }

        let mut items: Vec<Item> = self.request("item.get", &params).await?;
        items.iter_mut().for_each(Item::expand_key_params);
        debug!(count = items.len(), "fetched items");
        Ok(items)
    }

    async fn get_macros(&self, hostids: &[String]) -> Result<Vec<Macro>> {
        let mut macros: Vec<Macro> = if hostids.is_empty() {
            Vec::new()
        } else {
            let params = json!({ "output": "extend", "hostids": hostids });
            self.request("usermacro.get", &params).await?
        };

        let params = json!({ "output": "extend", "globalmacro": true });
        let globals: Vec<Macro> = self.request("usermacro.get", &params).await?;
        // Global macro records carry no hostid; drop any a proxy may add.
        macros.extend(globals.into_iter().map(|m| Macro { hostid: None, ..m }));
        Ok(macros)
    }

    async fn get_trend(&self, itemids: &[String], range: TimeRange) -> Result<Vec<Trend>> {
        if itemids.is_empty() {
            return Ok(Vec::new());
        }
        let params = json!({
            "output": ["itemid", "clock", "num", "value_min", "value_avg", "value_max"],
            "itemids": itemids,
            "time_from": range.from,
            "time_till": range.till
        });
        self.request("trend.get", &params).await
    }

    async fn get_events(
        &self,
        objectids: &[String],
        range: TimeRange,
        show_events: ShowEvents,
    ) -> Result<Vec<Event>> {
        if objectids.is_empty() {
            return Ok(Vec::new());
        }
        let params = json!({
            "output": "extend",
            "time_from": range.from,
            "time_till": range.till,
            "objectids": objectids,
            "select_acknowledges": "extend",
            "selectHosts": "extend",
            "value": show_events.values()
        });
        self.request("event.get", &params).await
    }

    async fn get_alerts(&self, itemids: &[String], range: Option<TimeRange>) -> Result<Vec<Trigger>> {
        if itemids.is_empty() {
            return Ok(Vec::new());
        }
        let mut params = json!({
            "output": "extend",
            "itemids": itemids,
            "expandDescription": true,
            "expandData": true,
            "expandComment": true,
            "monitored": true,
            "skipDependent": true,
            "selectLastEvent": "extend"
        });
        if let Some(range) = range {
            params["lastChangeSince"] = json!(range.from);
            params["lastChangeTill"] = json!(range.till);
        }
        self.request("trigger.get", &params).await
    }

    async fn get_acknowledges(&self, eventids: &[String]) -> Result<Vec<Event>> {
        if eventids.is_empty() {
            return Ok(Vec::new());
        }
        let params = json!({
            "output": "extend",
            "eventids": eventids,
            "select_acknowledges": "extend",
            "sortfield": "clock",
            "sortorder": "DESC"
        });
        self.request("event.get", &params).await
    }

    async fn get_it_service(&self, serviceids: Option<&[String]>) -> Result<Vec<ItService>> {
        if is_empty_set(serviceids) {
            return Ok(Vec::new());
        }
        let mut params = json!({ "output": "extend" });
        if let Some(ids) = serviceids {
            params["serviceids"] = json!(ids);
        }
        self.request("service.get", &params).await
    }

    async fn get_sla(
        &self,
        serviceids: &[String],
        range: TimeRange,
    ) -> Result<HashMap<String, ServiceSla>> {
        if serviceids.is_empty() {
            return Ok(HashMap::new());
        }
        let params = json!({
            "serviceids": serviceids,
            "intervals": [{ "from": range.from, "to": range.till }]
        });
        self.request("service.getsla", &params).await
    }

    async fn get_triggers(
        &self,
        query: &TriggerQuery,
        show_triggers: ShowTriggers,
        hide_hosts_in_maintenance: bool,
    ) -> Result<Vec<Trigger>> {
        if query.matches_nothing() {
            return Ok(Vec::new());
        }
        let mut params = trigger_params(query)?;
        if show_triggers == ShowTriggers::Problems {
            params["filter"] = json!({ "value": 1 });
        }
        if hide_hosts_in_maintenance {
            params["maintenance"] = json!(false);
        }
        self.request("trigger.get", &params).await
    }
}

/// Base `trigger.get` parameters merged with the query's id constraints.
fn trigger_params(query: &TriggerQuery) -> Result<Value> {
    let mut params = json!({
        "output": "extend",
        "expandDescription": true,
        "expandData": true,
        "expandComment": true,
        "monitored": true,
        "skipDependent": true,
        "selectGroups": ["name"],
        "selectHosts": ["name", "host", "maintenance_status"],
        "selectItems": ["name", "key_", "lastvalue"],
        "selectLastEvent": "extend"
    });
    if let (Value::Object(base), Value::Object(ids)) = (&mut params, serde_json::to_value(query)?) {
        base.extend(ids);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_params_include_only_present_dimensions() {
        let query = TriggerQuery {
            groupids: Some(vec!["2".to_string()]),
            ..Default::default()
        };
        let params = trigger_params(&query).unwrap();
        assert_eq!(params["groupids"], json!(["2"]));
        assert!(params.get("hostids").is_none());
        assert!(params.get("applicationids").is_none());
        assert_eq!(params["selectLastEvent"], "extend");
    }

    #[test]
    fn test_is_empty_set() {
        assert!(!is_empty_set(None));
        assert!(is_empty_set(Some(&[])));
        assert!(!is_empty_set(Some(&["1".to_string()])));
    }
}
