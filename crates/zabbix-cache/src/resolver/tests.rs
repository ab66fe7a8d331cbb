use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;
use zabbix_api_rs::error::{ApiError, Error as ApiClientError, Result as ApiResult};
use zabbix_api_rs::models::{HostRef, Macro};

use super::*;
use crate::target::FilterField;
use crate::Error;

// ==================== Fakes ====================

/// In-memory inventory recording every lookup it serves.
#[derive(Default)]
struct FakeInventory {
    groups: Vec<Group>,
    /// (groupid, host)
    hosts: Vec<(String, Host)>,
    apps: Vec<Application>,
    /// (applicationid, item)
    items: Vec<(Option<String>, Item)>,
    macros: Vec<Macro>,
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
    groups_barrier: Option<Barrier>,
}

impl FakeInventory {
    fn record(&self, call: &'static str) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.fail_on == Some(call) {
            return Err(ApiClientError::Api(ApiError::Network {
                message: format!("{call} unavailable"),
            }));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

#[async_trait]
impl InventorySource for FakeInventory {
    async fn get_groups(&self) -> ApiResult<Vec<Group>> {
        if let Some(barrier) = &self.groups_barrier {
            barrier.wait().await;
        }
        self.record("groups")?;
        Ok(self.groups.clone())
    }

    async fn get_hosts(&self, groupids: &[String]) -> ApiResult<Vec<Host>> {
        self.record("hosts")?;
        Ok(self
            .hosts
            .iter()
            .filter(|(groupid, _)| groupids.contains(groupid))
            .map(|(_, host)| host.clone())
            .collect())
    }

    async fn get_apps(&self, hostids: &[String]) -> ApiResult<Vec<Application>> {
        self.record("apps")?;
        Ok(self
            .apps
            .iter()
            .filter(|app| app.hostid.as_ref().is_some_and(|id| hostids.contains(id)))
            .cloned()
            .collect())
    }

    async fn get_items(
        &self,
        hostids: Option<&[String]>,
        appids: Option<&[String]>,
        itemtype: ItemType,
    ) -> ApiResult<Vec<Item>> {
        self.record("items")?;
        Ok(self
            .items
            .iter()
            .filter(|(_, item)| hostids.map_or(true, |ids| ids.contains(&item.hostid)))
            .filter(|(appid, _)| {
                appids.map_or(true, |ids| appid.as_ref().is_some_and(|id| ids.contains(id)))
            })
            .filter(|(_, item)| {
                itemtype.value_types().map_or(true, |types| {
                    item.value_type
                        .parse::<u8>()
                        .is_ok_and(|vt| types.contains(&vt))
                })
            })
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn get_macros(&self, hostids: &[String]) -> ApiResult<Vec<Macro>> {
        self.record("macros")?;
        Ok(self
            .macros
            .iter()
            .filter(|m| m.hostid.as_ref().map_or(true, |id| hostids.contains(id)))
            .cloned()
            .collect())
    }
}

/// API fake that only answers trigger queries.
#[derive(Default)]
struct FakeApi {
    trigger_queries: Mutex<Vec<(TriggerQuery, ShowTriggers, bool)>>,
}

impl FakeApi {
    fn trigger_queries(&self) -> Vec<(TriggerQuery, ShowTriggers, bool)> {
        self.trigger_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ZabbixApi for FakeApi {
    async fn login(&self) -> ApiResult<String> {
        Ok("session".to_string())
    }

    async fn get_version(&self) -> ApiResult<String> {
        Ok("5.0.0".to_string())
    }

    async fn get_groups(&self) -> ApiResult<Vec<Group>> {
        Ok(vec![])
    }

    async fn get_hosts(&self, _groupids: Option<&[String]>) -> ApiResult<Vec<Host>> {
        Ok(vec![])
    }

    async fn get_apps(&self, _hostids: Option<&[String]>) -> ApiResult<Vec<Application>> {
        Ok(vec![])
    }

    async fn get_items(
        &self,
        _hostids: Option<&[String]>,
        _appids: Option<&[String]>,
        _itemtype: ItemType,
    ) -> ApiResult<Vec<Item>> {
        Ok(vec![])
    }

    async fn get_macros(&self, _hostids: &[String]) -> ApiResult<Vec<Macro>> {
        Ok(vec![])
    }

    async fn get_trend(&self, _itemids: &[String], _range: TimeRange) -> ApiResult<Vec<Trend>> {
        Ok(vec![])
    }

    async fn get_events(
        &self,
        _objectids: &[String],
        _range: TimeRange,
        _show_events: ShowEvents,
    ) -> ApiResult<Vec<Event>> {
        Ok(vec![])
    }

    async fn get_alerts(
        &self,
        _itemids: &[String],
        _range: Option<TimeRange>,
    ) -> ApiResult<Vec<Trigger>> {
        Ok(vec![])
    }

    async fn get_acknowledges(&self, _eventids: &[String]) -> ApiResult<Vec<Event>> {
        Ok(vec![])
    }

    async fn get_it_service(&self, _serviceids: Option<&[String]>) -> ApiResult<Vec<ItService>> {
        Ok(vec![])
    }

    async fn get_sla(
        &self,
        _serviceids: &[String],
        _range: TimeRange,
    ) -> ApiResult<HashMap<String, ServiceSla>> {
        Ok(HashMap::new())
    }

    async fn get_triggers(
        &self,
        query: &TriggerQuery,
        show_triggers: ShowTriggers,
        hide_hosts_in_maintenance: bool,
    ) -> ApiResult<Vec<Trigger>> {
        self.trigger_queries.lock().unwrap().push((
            query.clone(),
            show_triggers,
            hide_hosts_in_maintenance,
        ));
        Ok(vec![serde_json::from_value(serde_json::json!({
            "triggerid": "13000",
            "description": "High CPU load",
            "value": "1"
        }))
        .unwrap()])
    }
}

// ==================== Fixtures ====================

fn group(id: &str, name: &str) -> Group {
    Group {
        groupid: id.to_string(),
        name: name.to_string(),
    }
}

fn host(id: &str, name: &str) -> Host {
    Host {
        hostid: id.to_string(),
        name: name.to_string(),
        host: name.to_string(),
        maintenance_status: None,
    }
}

fn app(id: &str, name: &str, hostid: &str) -> Application {
    Application {
        applicationid: id.to_string(),
        name: name.to_string(),
        hostid: Some(hostid.to_string()),
    }
}

fn item(id: &str, name: &str, hostid: &str, value_type: &str, status: &str) -> Item {
    Item {
        itemid: id.to_string(),
        name: name.to_string(),
        key_: String::new(),
        value_type: value_type.to_string(),
        hostid: hostid.to_string(),
        status: status.to_string(),
        state: "0".to_string(),
        hosts: vec![HostRef {
            hostid: hostid.to_string(),
            name: String::new(),
            host: None,
        }],
        raw_name: None,
    }
}

/// Two groups share the name "Linux servers"; "CPU" exists on three hosts.
fn inventory() -> FakeInventory {
    FakeInventory {
        groups: vec![
            group("1", "Linux servers"),
            group("2", "Windows servers"),
            group("3", "Linux servers"),
        ],
        hosts: vec![
            ("1".into(), host("10", "web-01")),
            ("1".into(), host("11", "web-02")),
            ("2".into(), host("20", "win-01")),
            ("3".into(), host("30", "web-03")),
        ],
        apps: vec![
            app("100", "CPU", "10"),
            app("101", "CPU", "11"),
            app("102", "Filesystems", "10"),
            app("200", "CPU", "20"),
        ],
        items: vec![
            (Some("100".into()), item("1", "CPU load", "10", "0", "0")),
            (Some("101".into()), item("2", "CPU load", "11", "0", "0")),
            (Some("100".into()), item("3", "CPU idle time", "10", "0", "1")),
            (
                Some("102".into()),
                item("4", "Free space on {$MOUNT}", "10", "3", "0"),
            ),
            (None, item("5", "Agent version", "10", "1", "0")),
            (Some("200".into()), item("6", "CPU load", "20", "0", "0")),
        ],
        macros: vec![
            Macro {
                macro_name: "{$MOUNT}".into(),
                hostid: Some("10".into()),
                value: "/data".into(),
            },
            Macro {
                macro_name: "{$MOUNT}".into(),
                hostid: None,
                value: "/".into(),
            },
        ],
        ..Default::default()
    }
}

fn resolver(inventory: FakeInventory) -> FilterResolver<FakeApi, FakeInventory> {
    FilterResolver::new(Arc::new(FakeApi::default()), inventory)
}

fn filter(input: &str) -> Option<Filter> {
    Filter::parse(input).unwrap()
}

fn ids<T>(list: &[T], id: impl Fn(&T) -> &str) -> Vec<String> {
    list.iter().map(|e| id(e).to_string()).collect()
}

fn item_ids(items: &[Item]) -> Vec<String> {
    ids(items, |i| i.itemid.as_str())
}

// ==================== Groups & hosts ====================

#[tokio::test]
async fn test_exact_group_name_selects_first_match() {
    let r = resolver(inventory());
    let groups = r.get_groups(filter("Linux servers").as_ref()).await.unwrap();
    assert_eq!(ids(&groups, |g| g.groupid.as_str()), vec!["1"]);
}

#[tokio::test]
async fn test_group_pattern_selects_all_matches() {
    let r = resolver(inventory());
    let groups = r.get_groups(filter("/^linux/i").as_ref()).await.unwrap();
    assert_eq!(ids(&groups, |g| g.groupid.as_str()), vec!["1", "3"]);
}

#[tokio::test]
async fn test_no_group_filter_returns_every_group() {
    let r = resolver(inventory());
    let groups = r.get_groups(None).await.unwrap();
    assert_eq!(groups.len(), 3);
}

#[tokio::test]
async fn test_hosts_are_scoped_by_resolved_groups() {
    let r = resolver(inventory());

    let hosts = r
        .get_hosts(filter("Linux servers").as_ref(), None)
        .await
        .unwrap();
    assert_eq!(ids(&hosts, |h| h.hostid.as_str()), vec!["10", "11"]);

    let hosts = r
        .get_hosts(filter("/servers$/").as_ref(), filter("/^web-/").as_ref())
        .await
        .unwrap();
    assert_eq!(ids(&hosts, |h| h.hostid.as_str()), vec!["10", "11", "30"]);
}

// ==================== Applications ====================

#[tokio::test]
async fn test_without_app_filter_hosts_are_passed_through() {
    let r = resolver(inventory());
    let apps = r
        .get_apps(filter("Linux servers").as_ref(), filter("web-02").as_ref(), None)
        .await
        .unwrap();

    assert_eq!(
        apps,
        AppsResolution::Unfiltered {
            hostids: vec!["11".to_string()]
        }
    );
    assert_eq!(apps.application_ids(), None);
    assert_eq!(r.proxy().count("apps"), 0);
}

#[tokio::test]
async fn test_app_filter_keeps_same_name_across_hosts() {
    let r = resolver(inventory());
    let apps = r
        .get_apps(filter("/servers/").as_ref(), None, filter("CPU").as_ref())
        .await
        .unwrap();

    let AppsResolution::Resolved(apps) = &apps else {
        panic!("expected resolved applications, got {apps:?}");
    };
    assert_eq!(ids(apps, |a| a.applicationid.as_str()), vec!["100", "101", "200"]);
}

// ==================== Items ====================

#[tokio::test]
async fn test_items_by_host_when_no_app_filter() {
    let r = resolver(inventory());
    let items = r
        .get_all_items(None, filter("web-01").as_ref(), None, &ItemOptions::default())
        .await
        .unwrap();

    // Disabled item 3 is dropped; item 5 has no application but belongs to the host.
    assert_eq!(item_ids(&items), vec!["1", "4", "5"]);
}

#[tokio::test]
async fn test_items_by_application_when_app_filter_given() {
    let r = resolver(inventory());
    let items = r
        .get_all_items(
            None,
            filter("web-01").as_ref(),
            filter("CPU").as_ref(),
            &ItemOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(item_ids(&items), vec!["1"]);
}

#[tokio::test]
async fn test_disabled_items_are_kept_on_request() {
    let r = resolver(inventory());
    let options = ItemOptions {
        show_disabled_items: true,
        ..Default::default()
    };
    let items = r
        .get_all_items(None, filter("web-01").as_ref(), filter("CPU").as_ref(), &options)
        .await
        .unwrap();
    assert_eq!(item_ids(&items), vec!["1", "3"]);
}

#[tokio::test]
async fn test_item_type_is_forwarded() {
    let r = resolver(inventory());
    let options = ItemOptions {
        itemtype: ItemType::Text,
        ..Default::default()
    };
    let items = r
        .get_all_items(None, filter("web-01").as_ref(), None, &options)
        .await
        .unwrap();
    assert_eq!(item_ids(&items), vec!["5"]);
}

#[tokio::test]
async fn test_item_filter_keeps_every_match() {
    let r = resolver(inventory());
    let items = r
        .get_items(
            None,
            None,
            None,
            filter("CPU load").as_ref(),
            &ItemOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(item_ids(&items), vec!["1", "2", "6"]);
}

#[tokio::test]
async fn test_item_names_have_macros_expanded() {
    let r = resolver(inventory());
    let items = r
        .get_items(
            None,
            filter("web-01").as_ref(),
            None,
            filter("/^Free space/").as_ref(),
            &ItemOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Free space on /data");
    assert_eq!(r.proxy().count("macros"), 1);
}

#[tokio::test]
async fn test_item_filter_sees_expanded_names() {
    let r = resolver(inventory());
    let items = r
        .get_items(
            None,
            None,
            None,
            filter("Free space on /data").as_ref(),
            &ItemOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(item_ids(&items), vec!["4"]);
}

#[tokio::test]
async fn test_macros_not_fetched_without_tokens() {
    let r = resolver(inventory());
    let items = r
        .get_all_items(None, None, filter("CPU").as_ref(), &ItemOptions::default())
        .await
        .unwrap();

    assert_eq!(item_ids(&items), vec!["1", "2", "6"]);
    assert_eq!(r.proxy().count("macros"), 0);
}

#[tokio::test]
async fn test_expand_user_macro_uses_global_fallback() {
    let r = resolver(inventory());
    let items = vec![
        item("7", "Mount {$MOUNT}", "10", "0", "0"),
        item("8", "Mount {$MOUNT}", "30", "0", "0"),
    ];
    let items = r.expand_user_macro(items).await.unwrap();
    assert_eq!(items[0].name, "Mount /data");
    assert_eq!(items[1].name, "Mount /");
}

#[tokio::test]
async fn test_items_from_target() {
    let r = resolver(inventory());
    let target = Target {
        group: FilterField::new("/servers/"),
        host: FilterField::new("/^web-0[12]$/"),
        application: FilterField::new("CPU"),
        item: FilterField::new("CPU load"),
    };
    let items = r
        .get_items_from_target(&target, &ItemOptions::default())
        .await
        .unwrap();
    assert_eq!(item_ids(&items), vec!["1", "2"]);
}

#[tokio::test]
async fn test_invalid_target_filter_is_reported() {
    let r = resolver(inventory());
    let target = Target {
        host: FilterField::new("/web-(/"),
        ..Default::default()
    };
    let err = r
        .get_items_from_target(&target, &ItemOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Filter(_)));
    assert!(r.proxy().calls().is_empty());
}

#[tokio::test]
async fn test_unmatched_group_empties_the_chain() {
    let r = resolver(inventory());
    let items = r
        .get_items(
            filter("Solaris servers").as_ref(),
            None,
            None,
            None,
            &ItemOptions::default(),
        )
        .await
        .unwrap();

    assert!(items.is_empty());
    assert_eq!(r.proxy().calls(), vec!["groups", "hosts", "items"]);
}

#[tokio::test]
async fn test_repeated_resolution_is_stable() {
    let r = resolver(inventory());
    let host = filter("/^web-/");
    let app = filter("CPU");

    let first = r
        .get_items(None, host.as_ref(), app.as_ref(), None, &ItemOptions::default())
        .await
        .unwrap();
    let second = r
        .get_items(None, host.as_ref(), app.as_ref(), None, &ItemOptions::default())
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_lookup_failure_propagates() {
    let r = resolver(FakeInventory {
        fail_on: Some("hosts"),
        ..inventory()
    });

    let err = r
        .get_items(None, None, None, None, &ItemOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("hosts unavailable"));
    assert_eq!(r.proxy().count("items"), 0);
}

// ==================== Triggers ====================

#[tokio::test]
async fn test_triggers_constrained_only_by_given_filters() {
    let r = resolver(inventory());
    let triggers = r
        .get_triggers(
            filter("Linux servers").as_ref(),
            None,
            None,
            ShowTriggers::Problems,
            true,
        )
        .await
        .unwrap();
    assert_eq!(triggers.len(), 1);

    let (query, show, hide) = r.api().trigger_queries().remove(0);
    assert_eq!(
        query,
        TriggerQuery {
            groupids: Some(vec!["1".to_string()]),
            hostids: None,
            applicationids: None,
        }
    );
    assert_eq!(show, ShowTriggers::Problems);
    assert!(hide);
}

#[tokio::test]
async fn test_trigger_query_with_all_filters() {
    let r = resolver(inventory());
    r.get_triggers(
        filter("/servers/").as_ref(),
        filter("/^web-/").as_ref(),
        filter("CPU").as_ref(),
        ShowTriggers::All,
        false,
    )
    .await
    .unwrap();

    let (query, _, _) = r.api().trigger_queries().remove(0);
    assert_eq!(query.groupids, Some(vec!["1".into(), "2".into(), "3".into()]));
    assert_eq!(query.hostids, Some(vec!["10".into(), "11".into(), "30".into()]));
    assert_eq!(query.applicationids, Some(vec!["100".into(), "101".into()]));
}

#[tokio::test]
async fn test_trigger_query_with_app_but_no_host_filter() {
    let r = resolver(inventory());
    r.get_triggers(None, None, filter("Filesystems").as_ref(), ShowTriggers::All, false)
        .await
        .unwrap();

    let (query, _, _) = r.api().trigger_queries().remove(0);
    assert_eq!(query.groupids, None);
    assert_eq!(query.hostids, None);
    assert_eq!(query.applicationids, Some(vec!["102".to_string()]));
}

#[tokio::test]
async fn test_unfiltered_trigger_query_is_unconstrained() {
    let r = resolver(inventory());
    r.get_triggers(None, None, None, ShowTriggers::All, false)
        .await
        .unwrap();

    let (query, _, _) = r.api().trigger_queries().remove(0);
    assert_eq!(query, TriggerQuery::default());
}

#[tokio::test]
async fn test_trigger_lookups_run_concurrently() {
    // Each of the three lookups starts with a group fetch; the barrier only
    // opens once all three are waiting at the same time.
    let r = resolver(FakeInventory {
        groups_barrier: Some(Barrier::new(3)),
        ..inventory()
    });

    let triggers = tokio::time::timeout(
        Duration::from_secs(5),
        r.get_triggers(
            filter("Linux servers").as_ref(),
            filter("web-01").as_ref(),
            filter("CPU").as_ref(),
            ShowTriggers::All,
            false,
        ),
    )
    .await
    .expect("lookups did not overlap")
    .unwrap();
    assert_eq!(triggers.len(), 1);
}

#[tokio::test]
async fn test_trigger_lookup_failure_skips_query() {
    let r = resolver(FakeInventory {
        fail_on: Some("apps"),
        ..inventory()
    });

    let result = r
        .get_triggers(None, None, filter("CPU").as_ref(), ShowTriggers::All, false)
        .await;
    assert!(matches!(result, Err(Error::Api(_))));
    assert!(r.api().trigger_queries().is_empty());
}
